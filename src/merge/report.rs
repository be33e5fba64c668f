//! Conflict rendering: inline markers, text summary, JSON report.

use serde::Serialize;

use super::types::MergeOutcome;

/// Render conflicts as a git-style marker block for appending to the merged
/// output. Returns `None` when the merge was clean.
///
/// Local operations are listed under `<<<<<<< HEAD`, remote operations after
/// `=======`.
pub fn conflict_markers(outcome: &MergeOutcome) -> Option<String> {
    if outcome.is_clean() {
        return None;
    }

    let mut local = String::new();
    let mut remote = String::new();
    for (i, conflict) in outcome.conflicts.iter().enumerate() {
        if i != 0 {
            local.push('\n');
            remote.push('\n');
        }
        local.push_str(&conflict.local_description());
        remote.push_str(&conflict.remote_description());
    }

    let mut out = String::new();
    out.push_str("<<<<<<< HEAD\n");
    out.push_str(&local);
    out.push_str("\n=======\n");
    out.push_str(&remote);
    out.push_str("\n>>>>>>> \n");
    Some(out)
}

/// Render conflicts as a human-readable summary for a diagnostics stream.
/// Returns `None` when the merge was clean.
pub fn conflict_summary(outcome: &MergeOutcome) -> Option<String> {
    if outcome.is_clean() {
        return None;
    }

    let mut out = String::from("Conflict summary\n");
    for conflict in &outcome.conflicts {
        out.push_str("<<<<<<<\n");
        out.push_str(&format!(
            "A: [{}] {}\n",
            conflict.dictionary(),
            conflict.local_description()
        ));
        out.push_str(&format!(
            "B: [{}] {}\n",
            conflict.dictionary(),
            conflict.remote_description()
        ));
        out.push_str(">>>>>>>\n");
    }
    Some(out)
}

/// One conflict in the JSON report.
#[derive(Debug, Serialize)]
struct ConflictReportEntry {
    dictionary: String,
    local: String,
    remote: String,
}

/// The JSON report document.
#[derive(Debug, Serialize)]
struct ConflictReport {
    conflicts: Vec<ConflictReportEntry>,
}

/// Render conflicts as a JSON report. Returns `None` when the merge was
/// clean.
pub fn conflict_report_json(outcome: &MergeOutcome) -> Option<serde_json::Result<String>> {
    if outcome.is_clean() {
        return None;
    }

    let report = ConflictReport {
        conflicts: outcome
            .conflicts
            .iter()
            .map(|c| ConflictReportEntry {
                dictionary: c.dictionary().to_string(),
                local: c.local_description(),
                remote: c.remote_description(),
            })
            .collect(),
    };
    Some(serde_json::to_string_pretty(&report))
}

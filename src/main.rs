use textmerge_rs::cli;

fn main() {
    match cli::main() {
        Ok(outcome) if outcome.is_clean() => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

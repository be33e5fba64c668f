//! Codec for the packed hexadecimal key array.
//!
//! Keys are serialized as a concatenation of 8-hex-digit windows, each
//! window holding one 32-bit integer in little-endian byte order: the hex
//! digits are reversed two at a time, so `"0a000000"` decodes to `10`.

use thiserror::Error;

/// Errors raised while decoding a packed key array.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The packed string length is not a multiple of 8.
    #[error("packed key array length {len} is not a multiple of 8")]
    InvalidLength {
        /// Length of the packed string.
        len: usize,
    },

    /// A window contained a non-hexadecimal digit.
    #[error("invalid hex window '{window}' in packed key array")]
    InvalidDigit {
        /// The offending 8-character window.
        window: String,
    },
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Decode a packed hex string into its ordered key list.
pub fn decode_keys(packed: &str) -> Result<Vec<u32>> {
    if packed.len() % 8 != 0 {
        return Err(CodecError::InvalidLength { len: packed.len() });
    }

    let mut keys = Vec::with_capacity(packed.len() / 8);
    for window in packed.as_bytes().chunks(8) {
        if !window.iter().all(|b| b.is_ascii_hexdigit()) {
            return Err(CodecError::InvalidDigit {
                window: String::from_utf8_lossy(window).to_string(),
            });
        }
        let mut value = 0u32;
        // Pairwise-reversed digits: the last pair is the most significant.
        for pair in window.chunks(2).rev() {
            value = value << 8 | hex_pair(pair);
        }
        keys.push(value);
    }
    Ok(keys)
}

/// Encode keys into the packed hex string, in iteration order.
pub fn encode_keys<I: IntoIterator<Item = u32>>(keys: I) -> String {
    let mut out = String::new();
    for key in keys {
        for byte in key.to_le_bytes() {
            out.push_str(&format!("{:02x}", byte));
        }
    }
    out
}

/// Value of one validated ASCII hex digit pair.
fn hex_pair(pair: &[u8]) -> u32 {
    pair.iter().fold(0, |acc, &b| {
        acc << 4 | u32::from((b as char).to_digit(16).unwrap_or(0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_values() {
        assert_eq!(decode_keys("01000000").unwrap(), vec![1]);
        assert_eq!(decode_keys("0a000000").unwrap(), vec![10]);
        assert_eq!(decode_keys("ffffffff").unwrap(), vec![u32::MAX]);
        assert_eq!(decode_keys("0100000002000000").unwrap(), vec![1, 2]);
        assert_eq!(decode_keys("aabbccdd").unwrap(), vec![0xddccbbaa]);
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode_keys([1]), "01000000");
        assert_eq!(encode_keys([10]), "0a000000");
        assert_eq!(encode_keys([1, 2]), "0100000002000000");
        assert_eq!(encode_keys([0xddccbbaa]), "aabbccdd");
    }

    #[test]
    fn test_empty_round_trip() {
        assert_eq!(decode_keys("").unwrap(), Vec::<u32>::new());
        assert_eq!(encode_keys([]), "");
    }

    #[test]
    fn test_inverse_law() {
        let keys = vec![0, 1, 2, 255, 256, 0xdead_beef, u32::MAX, 42];
        let packed = encode_keys(keys.iter().copied());
        assert_eq!(decode_keys(&packed).unwrap(), keys);
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        assert_eq!(decode_keys("AABBCCDD").unwrap(), vec![0xddccbbaa]);
    }

    #[test]
    fn test_invalid_length_rejected() {
        assert!(matches!(
            decode_keys("0100000"),
            Err(CodecError::InvalidLength { len: 7 })
        ));
    }

    #[test]
    fn test_invalid_digit_rejected() {
        assert!(matches!(
            decode_keys("zz000000"),
            Err(CodecError::InvalidDigit { .. })
        ));
    }
}

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Reads a program image, either raw bytes or a hex text listing.
pub fn load(path: &Path, hex: bool) -> Result<Vec<u8>> {
    if hex {
        let text = fs::read_to_string(path)
            .with_context(|| format!("unable to read {}", path.display()))?;
        parse_hex(&text).with_context(|| format!("malformed hex listing in {}", path.display()))
    } else {
        fs::read(path).with_context(|| format!("unable to read {}", path.display()))
    }
}

/// Parses a listing of bytes such as `0x60 0x0A 0xF0 0x29`.
///
/// Bytes are separated by whitespace or commas; the `0x` prefix is optional.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            u8::from_str_radix(digits, 16).with_context(|| format!("invalid byte {:?}", token))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(
            parse_hex("0x60 0x0A\n0xF0,0x29  12").unwrap(),
            vec![0x60, 0x0A, 0xF0, 0x29, 0x12]
        );
    }

    #[test]
    fn test_parse_hex_empty() {
        assert_eq!(parse_hex(" \n\t").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_parse_hex_rejects_bad_bytes() {
        let err = parse_hex("0x60 0xZZ").unwrap_err();
        assert_eq!(err.to_string(), "invalid byte \"0xZZ\"");
        assert!(parse_hex("0x100").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/rom.ch8"), false).unwrap_err();
        assert_eq!(err.to_string(), "unable to read /nonexistent/rom.ch8");
    }
}

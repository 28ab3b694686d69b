//! Unlock secret generation and intake.

use crate::constants;
use crate::error::{KeychainError, Result};
use rand::{rngs::OsRng, RngCore};
use std::io::Read;
use zeroize::{Zeroize, Zeroizing};

/// Generate a hex-encoded secret from the OS CSPRNG.
pub fn generate() -> Zeroizing<String> {
    let mut bytes = [0u8; constants::SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let secret = Zeroizing::new(hex::encode(bytes));
    bytes.zeroize();
    secret
}

/// Read a caller-supplied secret verbatim, minus trailing whitespace.
pub fn read_supplied<R: Read>(mut input: R) -> Result<Zeroizing<String>> {
    let mut buf = Zeroizing::new(Vec::new());
    input
        .by_ref()
        .take(constants::MAX_SECRET_SIZE as u64 + 1)
        .read_to_end(&mut buf)
        .map_err(|e| KeychainError::Input(format!("read password from stdin: {}", e)))?;
    if buf.len() > constants::MAX_SECRET_SIZE {
        return Err(KeychainError::Input(format!(
            "password exceeds maximum size ({} bytes)",
            constants::MAX_SECRET_SIZE
        )));
    }
    let text = std::str::from_utf8(&buf)
        .map_err(|_| KeychainError::Input("password is not valid UTF-8".into()))?;
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return Err(KeychainError::Input("password from stdin is empty".into()));
    }
    Ok(Zeroizing::new(trimmed.to_string()))
}

/// The supplied secret when present, otherwise a fresh one.
pub fn resolve(supplied: Option<Zeroizing<String>>) -> Zeroizing<String> {
    match supplied {
        Some(secret) => secret,
        None => generate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_generate_is_hex_with_256_bits() {
        let s = generate();
        assert_eq!(s.len(), constants::SECRET_BYTES * 2);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(constants::SECRET_BYTES * 8 >= 128);
    }

    #[test]
    fn test_generate_differs_between_calls() {
        assert_ne!(*generate(), *generate());
    }

    #[test]
    fn test_read_supplied_strips_trailing_newline() {
        let s = read_supplied(Cursor::new("secretXYZ\n")).unwrap();
        assert_eq!(s.as_str(), "secretXYZ");
    }

    #[test]
    fn test_read_supplied_strips_crlf_and_spaces() {
        let s = read_supplied(Cursor::new("secretXYZ  \r\n")).unwrap();
        assert_eq!(s.as_str(), "secretXYZ");
    }

    #[test]
    fn test_read_supplied_keeps_leading_and_inner_whitespace() {
        let s = read_supplied(Cursor::new("  pass word\n")).unwrap();
        assert_eq!(s.as_str(), "  pass word");
    }

    #[test]
    fn test_read_supplied_rejects_empty() {
        assert!(matches!(
            read_supplied(Cursor::new("")),
            Err(KeychainError::Input(_))
        ));
        assert!(matches!(
            read_supplied(Cursor::new(" \n\n")),
            Err(KeychainError::Input(_))
        ));
    }

    #[test]
    fn test_read_supplied_rejects_oversized() {
        let big = "a".repeat(constants::MAX_SECRET_SIZE + 1);
        assert!(matches!(
            read_supplied(Cursor::new(big)),
            Err(KeychainError::Input(_))
        ));
    }

    #[test]
    fn test_resolve_prefers_supplied() {
        let s = resolve(Some(Zeroizing::new("given".into())));
        assert_eq!(s.as_str(), "given");
        assert_eq!(resolve(None).len(), constants::SECRET_BYTES * 2);
    }
}

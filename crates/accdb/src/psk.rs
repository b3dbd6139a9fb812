//! OATH preshared keys.
//!
//! Keys are stored in `!2fa.oath-psk` in one of three textual forms:
//!
//! - `<hex digits>(hex)`
//! - `<base64>(b64)`, padding optional
//! - bare base32, case-insensitive, padding optional
//!
//! Generating the one-time code is left to an external tool; this module
//! only turns the stored text into key bytes and back into canonical base32.

use crate::error::{AccdbError, Result};
use data_encoding::{Encoding, BASE32, BASE32_NOPAD, BASE64, HEXLOWER_PERMISSIVE};

const HEX_SUFFIX: &str = "(hex)";
const BASE64_SUFFIX: &str = "(b64)";

pub fn decode_psk(text: &str) -> Result<Vec<u8>> {
    if let Some(hex) = text.strip_suffix(HEX_SUFFIX) {
        decode_with(&HEXLOWER_PERMISSIVE, hex)
    } else if let Some(b64) = text.strip_suffix(BASE64_SUFFIX) {
        decode_with(&BASE64, &pad(b64, 4))
    } else {
        decode_with(&BASE32, &pad(&text.to_ascii_uppercase(), 8))
    }
}

/// Canonical unpadded base32 form of a key.
pub fn encode_psk(key: &[u8]) -> String {
    BASE32_NOPAD.encode(key)
}

fn decode_with(encoding: &Encoding, text: &str) -> Result<Vec<u8>> {
    encoding
        .decode(text.as_bytes())
        .map_err(|e| AccdbError::InvalidKey(e.to_string()))
}

fn pad(text: &str, block: usize) -> String {
    let short = text.len() % block;
    if short == 0 {
        text.to_string()
    } else {
        format!("{}{}", text, "=".repeat(block - short))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base32_without_padding() {
        assert_eq!(decode_psk("MZXW6").unwrap(), b"foo");
        assert_eq!(decode_psk("mzxw6").unwrap(), b"foo");
    }

    #[test]
    fn base32_already_padded() {
        assert_eq!(decode_psk("MZXW6YQ=").unwrap(), b"foob");
        assert_eq!(decode_psk("MZXW6YTBOI").unwrap(), b"foobar");
    }

    #[test]
    fn hex_form() {
        assert_eq!(decode_psk("666f6f(hex)").unwrap(), b"foo");
        assert_eq!(decode_psk("666F6F(hex)").unwrap(), b"foo");
    }

    #[test]
    fn base64_form() {
        assert_eq!(decode_psk("Zm9vYg(b64)").unwrap(), b"foob");
        assert_eq!(decode_psk("Zm9v(b64)").unwrap(), b"foo");
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(matches!(decode_psk("not base32!"), Err(AccdbError::InvalidKey(_))));
        assert!(decode_psk("zz(hex)").is_err());
    }

    #[test]
    fn encode_is_unpadded_base32() {
        assert_eq!(encode_psk(b"foob"), "MZXW6YQ");
        let key = decode_psk("666f6f62(hex)").unwrap();
        assert_eq!(encode_psk(&key), "MZXW6YQ");
    }
}

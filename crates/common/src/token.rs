//! Compact single-string form of an [`EncodedRecord`].
//!
//! # Format
//!
//! ```text
//! v1.<hex(nonce)>.<hex(ciphertext)>.<hex(tag)>.<hex(fingerprint)>
//! ```
//!
//! Suitable for embedding in a QR code or a URL path segment. The `v1`
//! prefix leaves room for a future layout change without breaking existing
//! tokens.

use thiserror::Error;

use crate::error::EncoderError;
use crate::protocol::{EncodedRecord, FINGERPRINT_LEN, NONCE_LEN, TAG_LEN};

/// Prefix that appears at the start of every token.
pub const VERSION_PREFIX: &str = "v1";

/// Errors produced while parsing a token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Wrong prefix or wrong number of `.`-separated parts.
    #[error("invalid token format")]
    InvalidFormat,

    /// A part is not valid hex.
    #[error("token part `{0}` is not valid hex")]
    InvalidHex(&'static str),

    /// A fixed-size part decoded to the wrong number of bytes.
    #[error("token part `{part}` has invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        part: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl From<TokenError> for EncoderError {
    fn from(e: TokenError) -> Self {
        EncoderError::Crypto(e.to_string())
    }
}

impl EncodedRecord {
    /// Encode this record to its token representation.
    pub fn to_token(&self) -> String {
        format!(
            "{}.{}.{}.{}.{}",
            VERSION_PREFIX,
            hex::encode(self.nonce),
            self.ciphertext,
            self.auth_tag,
            self.fingerprint,
        )
    }

    /// Parse a token back into an [`EncodedRecord`].
    ///
    /// Hex parts are normalised to lowercase.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] if the string does not match the
    /// `v1.<nonce>.<ciphertext>.<tag>.<fingerprint>` structure.
    pub fn from_token(s: &str) -> Result<Self, TokenError> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 5 || parts[0] != VERSION_PREFIX {
            return Err(TokenError::InvalidFormat);
        }

        let nonce_bytes = decode_part(parts[1], "nonce", Some(NONCE_LEN))?;
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&nonce_bytes);

        let ciphertext = decode_part(parts[2], "ciphertext", None)?;
        let auth_tag = decode_part(parts[3], "tag", Some(TAG_LEN))?;
        let fingerprint = decode_part(parts[4], "fingerprint", Some(FINGERPRINT_LEN))?;

        Ok(Self {
            ciphertext: hex::encode(ciphertext),
            nonce,
            auth_tag: hex::encode(auth_tag),
            fingerprint: hex::encode(fingerprint),
        })
    }
}

fn decode_part(
    part: &str,
    name: &'static str,
    expected: Option<usize>,
) -> Result<Vec<u8>, TokenError> {
    let bytes = hex::decode(part).map_err(|_| TokenError::InvalidHex(name))?;
    match expected {
        Some(len) if bytes.len() != len => Err(TokenError::InvalidLength {
            part: name,
            expected: len,
            actual: bytes.len(),
        }),
        _ => Ok(bytes),
    }
}

//! [`SecretKey`]: the fixed 256-bit encryption key.
//!
//! The key is provisioned out-of-band (see [`crate::config`]) and is immutable
//! for the lifetime of the process. This module never generates or rotates keys.
//!
//! # Security invariants
//!
//! - Key bytes are **never** logged or printed, not even through `Debug`.
//! - Key bytes are overwritten with zeroes when the last owner drops them.

use thiserror::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Length of the hex form of a key.
pub const KEY_HEX_LEN: usize = KEY_LEN * 2;

/// Errors produced while loading key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The key string contains non-hex characters or an odd number of digits.
    #[error("key is not valid hex")]
    InvalidHex,

    /// The decoded key material has an unexpected length.
    #[error("key has invalid length: expected {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
pub struct SecretKey(Box<[u8; KEY_LEN]>);

impl SecretKey {
    /// Build a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidLength`] if the slice is not [`KEY_LEN`] bytes.
    pub fn from_bytes(key_bytes: &[u8]) -> Result<Self, KeyError> {
        if key_bytes.len() != KEY_LEN {
            return Err(KeyError::InvalidLength(key_bytes.len()));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(key_bytes);
        Ok(Self(buf))
    }

    /// Parse a key from its 64-character hex form (either case).
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidHex`] for non-hex or odd-length input and
    /// [`KeyError::InvalidLength`] if it does not decode to [`KEY_LEN`] bytes.
    pub fn from_hex(key_hex: &str) -> Result<Self, KeyError> {
        let mut decoded = hex::decode(key_hex.trim()).map_err(|_| KeyError::InvalidHex)?;
        let key = Self::from_bytes(&decoded);
        decoded.iter_mut().for_each(|b| *b = 0);
        key
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Write the lowercase hex form of the key into `out`.
    ///
    /// Callers own the buffer and are expected to zero it after use.
    pub(crate) fn write_hex(&self, out: &mut [u8; KEY_HEX_LEN]) {
        // Output buffer length is exactly 2 * KEY_LEN, so encoding cannot fail.
        let _ = hex::encode_to_slice(&self.0[..], out);
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

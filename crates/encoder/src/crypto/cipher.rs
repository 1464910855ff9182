//! AES-256-GCM encryption and decryption with a detached authentication tag.
//!
//! **Nonce discipline:** every seal uses a fresh 96-bit nonce drawn from a
//! [`NonceSource`]. The production source is the OS CSPRNG. Never substitute a
//! counter, a timestamp, or a fixed nonce: GCM nonce reuse under the same key
//! breaks both confidentiality and authentication.

use aes_gcm::{
    aead::{rand_core::RngCore, AeadInPlace, KeyInit, OsRng},
    Aes256Gcm, Nonce, Tag,
};
use common::protocol::{NONCE_LEN, TAG_LEN};
use thiserror::Error;

use crate::key::{SecretKey, KEY_LEN};

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes")]
    InvalidKeyLength,

    /// The random source could not produce a nonce.
    #[error("random source unavailable")]
    RandomSource,

    /// AES-GCM encryption failed, or decryption failed tag verification.
    #[error("aead operation failed")]
    AeadFailure,
}

/// Source of per-call nonces.
///
/// Implementations must be safe to share across threads and must never return
/// the same value twice for the same key.
#[cfg_attr(test, mockall::automock)]
pub trait NonceSource: Send + Sync {
    /// Fill `nonce` with fresh random bytes.
    fn fill_nonce(&self, nonce: &mut [u8; NONCE_LEN]) -> Result<(), CipherError>;
}

/// [`NonceSource`] backed by the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn fill_nonce(&self, nonce: &mut [u8; NONCE_LEN]) -> Result<(), CipherError> {
        OsRng
            .try_fill_bytes(nonce)
            .map_err(|_| CipherError::RandomSource)
    }
}

/// Ciphertext and tag produced by [`seal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Raw ciphertext, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// Raw 128-bit authentication tag.
    pub tag: [u8; TAG_LEN],
}

/// Encrypt `plaintext` under `key` and `nonce` with empty associated data.
///
/// # Errors
///
/// Returns [`CipherError::AeadFailure`] on an internal AEAD error (unreachable
/// for payloads under the GCM length limit).
pub fn seal(
    key: &SecretKey,
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Sealed, CipherError> {
    let cipher = build_cipher(key)?;
    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(nonce), b"", &mut buffer)
        .map_err(|_| CipherError::AeadFailure)?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(tag.as_slice());
    Ok(Sealed {
        ciphertext: buffer,
        tag: tag_bytes,
    })
}

/// Decrypt and authenticate `ciphertext` against `tag`.
///
/// # Errors
///
/// Returns [`CipherError::AeadFailure`] if tag verification fails (wrong key,
/// wrong nonce, or tampered ciphertext/tag).
pub fn open(
    key: &SecretKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(key)?;
    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(Nonce::from_slice(nonce), b"", &mut buffer, Tag::from_slice(tag))
        .map_err(|_| CipherError::AeadFailure)?;
    Ok(buffer)
}

fn build_cipher(key: &SecretKey) -> Result<Aes256Gcm, CipherError> {
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CipherError::InvalidKeyLength)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::tests::test_key;

    const NONCE: [u8; NONCE_LEN] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
    const PLAINTEXT: &[u8] = br#"{"name":"Nathanael","phone":"0900017309"}"#;

    #[test]
    fn known_answer() {
        let sealed = seal(&test_key(), &NONCE, PLAINTEXT).unwrap();
        assert_eq!(
            hex::encode(&sealed.ciphertext),
            "fa26f47c6b820032b885a8671fdecca12da03692f9804272c6bfa5f77fe3403173fbb8514588d6bf66"
        );
        assert_eq!(hex::encode(sealed.tag), "c616bb8f89066ba16cf1b0c5f8a35af5");
    }

    #[test]
    fn seal_open_round_trip() {
        let key = test_key();
        let sealed = seal(&key, &NONCE, PLAINTEXT).unwrap();
        let opened = open(&key, &NONCE, &sealed.ciphertext, &sealed.tag).unwrap();
        assert_eq!(opened, PLAINTEXT);
    }

    #[test]
    fn wrong_key_fails_open() {
        let sealed = seal(&test_key(), &NONCE, PLAINTEXT).unwrap();
        let other = SecretKey::from_bytes(&[0x42u8; KEY_LEN]).unwrap();
        assert!(open(&other, &NONCE, &sealed.ciphertext, &sealed.tag).is_err());
    }

    #[test]
    fn wrong_nonce_fails_open() {
        let key = test_key();
        let sealed = seal(&key, &NONCE, PLAINTEXT).unwrap();
        let mut nonce = NONCE;
        nonce[0] ^= 0x01;
        assert!(open(&key, &nonce, &sealed.ciphertext, &sealed.tag).is_err());
    }

    #[test]
    fn tampered_tag_fails_auth() {
        let key = test_key();
        let mut sealed = seal(&key, &NONCE, PLAINTEXT).unwrap();
        sealed.tag[TAG_LEN - 1] ^= 0x80;
        assert!(matches!(
            open(&key, &NONCE, &sealed.ciphertext, &sealed.tag),
            Err(CipherError::AeadFailure)
        ));
    }

    #[test]
    fn os_nonce_source_draws_distinct_nonces() {
        let mut a = [0u8; NONCE_LEN];
        let mut b = [0u8; NONCE_LEN];
        OsNonceSource.fill_nonce(&mut a).unwrap();
        OsNonceSource.fill_nonce(&mut b).unwrap();
        assert_ne!(a, b);
    }
}

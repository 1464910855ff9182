//! [`AuthenticatedEncoder`]: encrypt a `(name, phone)` payload and fingerprint the result.
//!
//! # Encode
//!
//! 1. Validate both fields are non-empty (no entropy consumed on failure).
//! 2. Serialise the payload canonically as `{"name":…,"phone":…}`.
//! 3. Draw a fresh 96-bit nonce.
//! 4. AES-256-GCM seal, yielding ciphertext and a 128-bit tag.
//! 5. Fingerprint key, ciphertext, nonce and tag with SHA-256.
//!
//! The encoder performs no logging and holds no mutable state; the key is read
//! only. It either returns a complete [`EncodedRecord`] or a typed
//! [`EncoderError`], never partial output.

use std::sync::Arc;

use common::protocol::{EncodedRecord, Payload, NONCE_LEN, TAG_LEN};
use common::EncoderError;

use crate::crypto::{cipher, fingerprint, CipherError, NonceSource, OsNonceSource};
use crate::key::{KeyError, SecretKey};

impl From<CipherError> for EncoderError {
    fn from(e: CipherError) -> Self {
        EncoderError::Crypto(e.to_string())
    }
}

impl From<KeyError> for EncoderError {
    fn from(e: KeyError) -> Self {
        EncoderError::Crypto(e.to_string())
    }
}

/// Stateless authenticated encoder over a fixed key.
///
/// Cheap to clone; clones share the key and nonce source. Safe to call from
/// many threads at once.
#[derive(Clone)]
pub struct AuthenticatedEncoder {
    key: Arc<SecretKey>,
    nonces: Arc<dyn NonceSource>,
}

impl AuthenticatedEncoder {
    /// Create an encoder drawing nonces from the OS CSPRNG.
    pub fn new(key: SecretKey) -> Self {
        Self::with_nonce_source(key, OsNonceSource)
    }

    /// Create an encoder from a 64-character hex key.
    ///
    /// # Errors
    ///
    /// Returns [`EncoderError::Crypto`] if the key is not valid hex or not 32 bytes.
    pub fn from_hex_key(key_hex: &str) -> Result<Self, EncoderError> {
        Ok(Self::new(SecretKey::from_hex(key_hex)?))
    }

    /// Create an encoder with an explicit nonce source.
    pub fn with_nonce_source(key: SecretKey, nonces: impl NonceSource + 'static) -> Self {
        Self {
            key: Arc::new(key),
            nonces: Arc::new(nonces),
        }
    }

    /// Encrypt and fingerprint `(name, phone)`.
    ///
    /// # Errors
    ///
    /// Returns [`EncoderError::Validation`] if either field is empty, and
    /// [`EncoderError::Crypto`] if the random source, cipher, or serialiser fails.
    pub fn encode(&self, name: &str, phone: &str) -> Result<EncodedRecord, EncoderError> {
        self.encode_payload(&Payload::new(name, phone))
    }

    /// Encrypt and fingerprint an already-built [`Payload`].
    ///
    /// # Errors
    ///
    /// Same as [`AuthenticatedEncoder::encode`].
    pub fn encode_payload(&self, payload: &Payload) -> Result<EncodedRecord, EncoderError> {
        payload.validate()?;

        let mut plaintext = payload
            .to_canonical_bytes()
            .map_err(|e| EncoderError::Crypto(format!("payload serialisation failed: {e}")))?;

        let mut nonce = [0u8; NONCE_LEN];
        self.nonces.fill_nonce(&mut nonce)?;

        let sealed = cipher::seal(&self.key, &nonce, &plaintext);
        plaintext.iter_mut().for_each(|b| *b = 0);
        let sealed = sealed?;

        let ciphertext = hex::encode(&sealed.ciphertext);
        let auth_tag = hex::encode(sealed.tag);
        let fingerprint = fingerprint::compute(&self.key, &ciphertext, &nonce, &auth_tag);

        Ok(EncodedRecord {
            ciphertext,
            nonce,
            auth_tag,
            fingerprint,
        })
    }

    /// Verify and decrypt a record produced by [`AuthenticatedEncoder::encode`].
    ///
    /// The fingerprint is checked first, then the GCM tag.
    ///
    /// # Errors
    ///
    /// Returns [`EncoderError::Crypto`] on a fingerprint mismatch, malformed
    /// hex, failed tag verification, or a plaintext that is not a payload.
    pub fn decode(&self, record: &EncodedRecord) -> Result<Payload, EncoderError> {
        if !fingerprint::verify(&self.key, record) {
            return Err(EncoderError::Crypto("fingerprint mismatch".into()));
        }

        let ciphertext = hex::decode(&record.ciphertext)
            .map_err(|_| EncoderError::Crypto("ciphertext is not valid hex".into()))?;
        let tag = decode_tag(&record.auth_tag)?;

        let plaintext = cipher::open(&self.key, &record.nonce, &ciphertext, &tag)
            .map_err(|_| EncoderError::Crypto("authentication failed".into()))?;

        serde_json::from_slice(&plaintext)
            .map_err(|e| EncoderError::Crypto(format!("decrypted payload is malformed: {e}")))
    }

    /// Parse a `v1.…` token and decode it.
    ///
    /// # Errors
    ///
    /// Returns [`EncoderError::Crypto`] if the token is malformed or fails
    /// [`AuthenticatedEncoder::decode`].
    pub fn decode_token(&self, token: &str) -> Result<Payload, EncoderError> {
        let record = EncodedRecord::from_token(token)?;
        self.decode(&record)
    }

    /// Returns `true` if `record.fingerprint` matches the fingerprint recomputed
    /// under this encoder's key.
    pub fn verify_fingerprint(&self, record: &EncodedRecord) -> bool {
        fingerprint::verify(&self.key, record)
    }
}

impl std::fmt::Debug for AuthenticatedEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedEncoder")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

fn decode_tag(tag_hex: &str) -> Result<[u8; TAG_LEN], EncoderError> {
    let bytes =
        hex::decode(tag_hex).map_err(|_| EncoderError::Crypto("tag is not valid hex".into()))?;
    <[u8; TAG_LEN]>::try_from(bytes.as_slice()).map_err(|_| {
        EncoderError::Crypto(format!(
            "tag has invalid length: expected {TAG_LEN} bytes, got {}",
            bytes.len()
        ))
    })
}

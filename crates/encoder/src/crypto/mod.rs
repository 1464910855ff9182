//! AES-256-GCM sealing and SHA-256 fingerprinting.
//!
//! This module is intentionally free of configuration and I/O. It provides the
//! low-level primitives composed by [`crate::encoder::AuthenticatedEncoder`].
//!
//! # Fingerprint
//!
//! ```text
//! hex(SHA-256(hex(key) || hex(ciphertext) || hex(nonce) || hex(tag)))
//! ```
//!
//! All components are hashed as lowercase ASCII hex strings.

pub mod cipher;
pub mod fingerprint;

pub use cipher::{CipherError, NonceSource, OsNonceSource};

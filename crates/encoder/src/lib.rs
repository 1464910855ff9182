//! Authenticated payload encoder.
//!
//! Encrypts a `(name, phone)` payload with AES-256-GCM under a fixed key and a
//! fresh random nonce, then binds key, ciphertext, nonce and tag together with
//! a SHA-256 fingerprint.
//!
//! ```no_run
//! use encoder::AuthenticatedEncoder;
//!
//! # fn main() -> Result<(), common::EncoderError> {
//! let key_hex = std::env::var("SECRET_KEY_HEX").unwrap_or_default();
//! let encoder = AuthenticatedEncoder::from_hex_key(&key_hex)?;
//! let record = encoder.encode("Nathanael", "0900017309")?;
//! assert_eq!(encoder.decode(&record)?.name, "Nathanael");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod encoder;
pub mod key;
pub mod stdio;
pub mod telemetry;

pub use encoder::AuthenticatedEncoder;
pub use key::SecretKey;

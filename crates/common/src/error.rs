//! Common error types shared across crates.

use thiserror::Error;

/// Top-level encoder error type.
///
/// Variants map to HTTP status codes for callers that front the encoder with
/// an HTTP handler:
/// - [`EncoderError::Validation`] → 400
/// - [`EncoderError::Crypto`] → 500
#[derive(Debug, Error)]
pub enum EncoderError {
    /// The input was incomplete: `name` or `phone` missing or empty, or the
    /// request body could not be read.
    #[error("validation error: {0}")]
    Validation(String),

    /// A cipher, digest, key, or random-source failure. Retrying with the same
    /// inputs will not change the outcome.
    #[error("crypto error: {0}")]
    Crypto(String),
}

impl EncoderError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            EncoderError::Validation(_) => 400,
            EncoderError::Crypto(_) => 500,
        }
    }

    /// Short machine-readable code used in [`ErrorResponse`](crate::protocol::ErrorResponse).
    pub fn code(&self) -> &'static str {
        match self {
            EncoderError::Validation(_) => "validation_error",
            EncoderError::Crypto(_) => "crypto_error",
        }
    }
}

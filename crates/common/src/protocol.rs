//! Payload, record, and request/response types exchanged with callers.
//!
//! These types are serialised as JSON by the `encoder` binary and by any
//! surrounding system that transports the encoded record.

use serde::{Deserialize, Serialize};

use crate::error::EncoderError;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of an AES-GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Byte length of a SHA-256 fingerprint.
pub const FINGERPRINT_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// The plaintext being protected.
///
/// Field order is significant: it fixes the canonical serialisation
/// `{"name":"…","phone":"…"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub name: String,
    pub phone: String,
}

impl Payload {
    /// Construct a [`Payload`] without validating it.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Ensure both fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`EncoderError::Validation`] if `name` or `phone` is empty.
    pub fn validate(&self) -> Result<(), EncoderError> {
        if self.name.is_empty() || self.phone.is_empty() {
            return Err(EncoderError::Validation(
                "name and phone are required".into(),
            ));
        }
        Ok(())
    }

    /// Canonical byte encoding fed to the cipher.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

// ---------------------------------------------------------------------------
// Result record
// ---------------------------------------------------------------------------

/// Output of a single encode call.
///
/// Hex fields are lowercase. The record carries no key material; ownership
/// passes entirely to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedRecord {
    /// Hex-encoded AES-256-GCM ciphertext (tag excluded).
    pub ciphertext: String,
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Hex-encoded 16-byte authentication tag.
    pub auth_tag: String,
    /// Hex-encoded SHA-256 fingerprint over key, ciphertext, nonce and tag.
    pub fingerprint: String,
}

// ---------------------------------------------------------------------------
// Encode request / response
// ---------------------------------------------------------------------------

/// Request body accepted by the `encoder` binary.
///
/// Absent fields deserialise as empty strings so that they surface as
/// validation errors rather than parse errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncodeRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

impl From<EncodeRequest> for Payload {
    fn from(req: EncodeRequest) -> Self {
        Payload::new(req.name, req.phone)
    }
}

/// Successful response body: the record plus its compact token form.
#[derive(Debug, Clone, Serialize)]
pub struct EncodeResponse {
    #[serde(flatten)]
    pub record: EncodedRecord,
    /// `v1.<nonce>.<ciphertext>.<tag>.<fingerprint>`; see [`crate::token`].
    pub token: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error body written on any failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"validation_error"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&EncoderError> for ErrorResponse {
    fn from(e: &EncoderError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_bytes_have_fixed_key_order() {
        let p = Payload::new("Nathanael", "0900017309");
        let bytes = p.to_canonical_bytes().unwrap();
        assert_eq!(bytes, br#"{"name":"Nathanael","phone":"0900017309"}"#);
    }

    #[test]
    fn validate_rejects_empty_fields() {
        assert!(matches!(
            Payload::new("", "0900017309").validate(),
            Err(EncoderError::Validation(_))
        ));
        assert!(matches!(
            Payload::new("Nathanael", "").validate(),
            Err(EncoderError::Validation(_))
        ));
        assert!(Payload::new("Nathanael", "0900017309").validate().is_ok());
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let r = EncodedRecord {
            ciphertext: "ab".into(),
            nonce: [0u8; NONCE_LEN],
            auth_tag: "cd".into(),
            fingerprint: "ef".into(),
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["authTag"], "cd");
        assert_eq!(v["nonce"].as_array().unwrap().len(), NONCE_LEN);
        let decoded: EncodedRecord = serde_json::from_value(v).unwrap();
        assert_eq!(decoded, r);
    }

    #[test]
    fn request_missing_fields_default_to_empty() {
        let req: EncodeRequest = serde_json::from_str(r#"{"name":"Nathanael"}"#).unwrap();
        assert_eq!(req.phone, "");
        assert!(Payload::from(req).validate().is_err());
    }

    #[test]
    fn response_flattens_record() {
        let resp = EncodeResponse {
            record: EncodedRecord {
                ciphertext: "ab".into(),
                nonce: [1u8; NONCE_LEN],
                auth_tag: "cd".into(),
                fingerprint: "ef".into(),
            },
            token: "v1.x".into(),
        };
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["ciphertext"], "ab");
        assert_eq!(v["token"], "v1.x");
    }

    #[test]
    fn error_response_from_encoder_error() {
        let e = ErrorResponse::from(&EncoderError::Validation("name and phone are required".into()));
        assert_eq!(e.code, "validation_error");
        assert!(e.message.contains("required"));
    }
}

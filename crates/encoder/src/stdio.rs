//! One-shot JSON driver: read an [`EncodeRequest`], write an [`EncodeResponse`].
//!
//! On failure an [`ErrorResponse`] is written instead and the error is
//! returned so the caller can choose an exit status.

use std::io::{self, Read, Write};

use common::protocol::{EncodeRequest, EncodeResponse, ErrorResponse, Payload};
use common::EncoderError;
use thiserror::Error;
use tracing::{info, warn};

use crate::encoder::AuthenticatedEncoder;

/// Errors produced by [`run`].
#[derive(Debug, Error)]
pub enum DriverError {
    /// The request was rejected or could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncoderError),

    /// The successful response could not be written to the output.
    #[error("failed to write response: {0}")]
    Write(#[source] io::Error),
}

/// Read one request from `input`, encode it, and write the JSON result to `output`.
///
/// # Errors
///
/// Returns [`DriverError::Encode`] for an unreadable, incomplete, or
/// unencodable request, even if the [`ErrorResponse`] could not be written.
/// Returns [`DriverError::Write`] if a successful response could not be written.
pub fn run<R: Read, W: Write>(
    encoder: &AuthenticatedEncoder,
    input: R,
    mut output: W,
) -> Result<(), DriverError> {
    match encode_request(encoder, input) {
        Ok(resp) => {
            info!(
                ciphertext_hex_len = resp.record.ciphertext.len(),
                "payload encoded"
            );
            write_json(&mut output, &resp).map_err(DriverError::Write)
        }
        Err(e) => {
            warn!(code = e.code(), error = %e, "encode failed");
            if let Err(write_err) = write_json(&mut output, &ErrorResponse::from(&e)) {
                warn!(error = %write_err, "failed to write error response");
            }
            Err(DriverError::Encode(e))
        }
    }
}

fn encode_request<R: Read>(
    encoder: &AuthenticatedEncoder,
    input: R,
) -> Result<EncodeResponse, EncoderError> {
    let req: EncodeRequest = serde_json::from_reader(input)
        .map_err(|e| EncoderError::Validation(format!("invalid request body: {e}")))?;
    let record = encoder.encode_payload(&Payload::from(req))?;
    let token = record.to_token();
    Ok(EncodeResponse { record, token })
}

fn write_json<W: Write, T: serde::Serialize>(output: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *output, value).map_err(io::Error::from)?;
    writeln!(output)
}

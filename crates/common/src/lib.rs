//! Common types, protocol definitions, and errors shared across the encoder crates.

pub mod error;
pub mod protocol;
pub mod token;

pub use error::EncoderError;
pub use protocol::{EncodedRecord, Payload};

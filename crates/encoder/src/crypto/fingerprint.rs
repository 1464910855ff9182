//! SHA-256 integrity fingerprint binding key, ciphertext, nonce and tag.
//!
//! The fingerprint is a coarse tamper-evidence check layered on top of the
//! GCM tag. It does not replace tag verification.

use common::protocol::{EncodedRecord, NONCE_LEN};
use sha2::{Digest, Sha256};

use crate::key::{SecretKey, KEY_HEX_LEN};

/// Compute the hex fingerprint over the hex-encoded components of a record.
pub fn compute(
    key: &SecretKey,
    ciphertext_hex: &str,
    nonce: &[u8; NONCE_LEN],
    tag_hex: &str,
) -> String {
    let mut key_hex = [0u8; KEY_HEX_LEN];
    key.write_hex(&mut key_hex);

    let digest = Sha256::new()
        .chain_update(&key_hex[..])
        .chain_update(ciphertext_hex.as_bytes())
        .chain_update(hex::encode(nonce).as_bytes())
        .chain_update(tag_hex.as_bytes())
        .finalize();

    key_hex.iter_mut().for_each(|b| *b = 0);
    hex::encode(digest)
}

/// Recompute the fingerprint of `record` and compare it in constant time.
pub fn verify(key: &SecretKey, record: &EncodedRecord) -> bool {
    let expected = compute(key, &record.ciphertext, &record.nonce, &record.auth_tag);
    constant_time_eq(expected.as_bytes(), record.fingerprint.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

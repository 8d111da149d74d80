//! Generated secrets: temporary passwords, verification codes, opaque refresh tokens

use rand::{distr::Alphanumeric, Rng, RngCore};
use sha2::{Digest, Sha256};

pub fn generate_temporary_password(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Six digits, zero padded.
pub fn generate_verification_code() -> String {
    format!("{:06}", rand::rng().random_range(0..=999_999u32))
}

/// 256 bits of randomness, hex encoded. Only the digest is ever persisted.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn digest_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

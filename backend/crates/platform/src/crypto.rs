//! Hashing and randomness helpers

use rand::RngCore;
use sha2::{Digest, Sha256};

/// `len` bytes from the thread-local CSPRNG
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Leading `len` characters of the uppercase hex SHA-256 of `data`.
///
/// `len` saturates at 64.
pub fn sha256_hex_upper(data: &[u8], len: usize) -> String {
    let mut digest = hex::encode_upper(sha256(data));
    digest.truncate(len.min(64));
    digest
}

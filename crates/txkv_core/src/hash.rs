//! Key hashing.
//!
//! Keys are hashed with the djb2 function: starting from 5381, every byte
//! `c` updates the state as `hash * 33 + c`. Arithmetic wraps at 64 bits.

/// Initial djb2 state.
pub const DJB2_SEED: u64 = 5381;

/// Hashes a key.
#[must_use]
pub fn hash_key(key: &[u8]) -> u64 {
    key.iter().fold(DJB2_SEED, |hash, &byte| {
        hash.wrapping_mul(33).wrapping_add(u64::from(byte))
    })
}

/// Hashes a string key by its UTF-8 bytes.
#[must_use]
pub fn hash_str(key: &str) -> u64 {
    hash_key(key.as_bytes())
}

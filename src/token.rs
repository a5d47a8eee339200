//! Confirmation token generation and comparison utilities.

use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Generate a random confirmation token.
///
/// 32 bytes from the thread-local CSPRNG, hex encoded (64 characters).
pub fn token_generate() -> String {
    let mut rng = rand::rng();
    let token: [u8; 32] = rng.random();

    hex::encode(token)
}

/// Hash a token for storage (SHA-256).
///
/// Only the hash is ever handed to the store, so a leaked user record does
/// not disclose a usable token.
pub fn token_hash_sha256(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Compare a stored token hash against a supplied one in constant time.
///
/// Store implementations should use this inside their compare-and-clear so
/// the comparison leaks no timing information about the stored value.
pub fn token_hash_matches(stored_hash: &str, supplied_hash: &str) -> bool {
    stored_hash
        .as_bytes()
        .ct_eq(supplied_hash.as_bytes())
        .into()
}

// src/auth/token.rs
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Entropy of a login token.
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Fresh login token handed to an agent once and never stored.
pub fn new_session_token() -> String {
    random_token(&mut OsRng, SESSION_TOKEN_BYTES)
}

/// `len` random bytes, base64url without padding (32 bytes give 43 chars).
pub fn random_token<R: RngCore>(rng: &mut R, len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Session key for a token: its SHA-256, base64url.
pub fn token_digest(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}

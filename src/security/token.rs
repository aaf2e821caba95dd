/// Opaque session tokens.
///
/// The client holds the raw token; the database stores only its SHA-256
/// digest, so a leaked sessions table cannot be replayed.
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Generate a 256-bit random session token, hex-encoded.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Digest stored in sessions.token_hash.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

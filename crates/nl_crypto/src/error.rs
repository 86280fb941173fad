use thiserror::Error;

/// Unified error type for the protocol core.
///
/// MAC and signature mismatches are deliberately NOT errors — they are
/// boolean verdicts returned next to decrypted content, so callers can show
/// distrusted content with a warning. Everything here is a hard failure of
/// the operation itself.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("Invalid CBC padding: {0}")]
    Padding(String),

    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}

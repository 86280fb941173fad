//! Per-user crypto configuration
//!
//! Chosen once at registration and immutable afterwards: the AES mode, the
//! HMAC width, and the three purpose-specific salts. All blocks in a user's
//! chains are created and decrypted under one `CryptoConfig`; this layer
//! does not (and cannot, being stateless) police a chain that was somehow
//! written under two different suites — that is the storage layer's job.

use serde::{Deserialize, Serialize};

/// Symmetric encryption mode for note titles and bodies.
/// Key size is 128 bits in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherMode {
    #[serde(rename = "aes-128-cbc")]
    Aes128Cbc,
    #[serde(rename = "aes-128-ctr")]
    Aes128Ctr,
}

/// HMAC hash width for block integrity tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacAlgorithm {
    #[serde(rename = "hmac-sha256")]
    HmacSha256,
    #[serde(rename = "hmac-sha512")]
    HmacSha512,
}

impl MacAlgorithm {
    /// Derived-key and tag length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            MacAlgorithm::HmacSha256 => 32,
            MacAlgorithm::HmacSha512 => 64,
        }
    }
}

/// Everything the core needs to operate on one user's blocks, besides the
/// password itself. Salts are base64, server-stored, and not secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoConfig {
    pub login_salt: String,
    pub encryption_salt: String,
    pub hmac_salt: String,
    pub encryption_type: CipherMode,
    pub hmac_type: MacAlgorithm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_serialise_to_wire_strings() {
        assert_eq!(
            serde_json::to_string(&CipherMode::Aes128Cbc).unwrap(),
            "\"aes-128-cbc\""
        );
        assert_eq!(
            serde_json::to_string(&MacAlgorithm::HmacSha512).unwrap(),
            "\"hmac-sha512\""
        );
        let mode: CipherMode = serde_json::from_str("\"aes-128-ctr\"").unwrap();
        assert_eq!(mode, CipherMode::Aes128Ctr);
    }
}

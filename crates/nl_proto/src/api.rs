//! Authentication API payloads
//!
//! Registration and login proof payloads are produced by `nl_crypto::auth`
//! and re-exported here so server code can depend on one wire crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nl_crypto::config::{CipherMode, MacAlgorithm};

pub use nl_crypto::auth::{LoginProof, RegistrationPayload};

/// Server's answer to a challenge request: opaque bytes to sign plus the
/// login salt the client needs to re-derive its signing key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeResponse {
    /// Opaque random bytes, base64. Single use, expires server-side.
    pub challenge: String,
    pub login_salt: String,
    pub expires_at: DateTime<Utc>,
}

/// The server-visible user record. Salts and the public key are not
/// secret; everything that matters is derived from the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub public_key: String,
    pub encryption_salt: String,
    pub hmac_salt: String,
    pub hmac_type: MacAlgorithm,
    pub login_salt: String,
    pub encryption_type: CipherMode,
}

impl UserProfile {
    /// The crypto configuration a client needs to work on this user's blocks.
    pub fn crypto_config(&self) -> nl_crypto::CryptoConfig {
        nl_crypto::CryptoConfig {
            login_salt: self.login_salt.clone(),
            encryption_salt: self.encryption_salt.clone(),
            hmac_salt: self.hmac_salt.clone(),
            encryption_type: self.encryption_type,
            hmac_type: self.hmac_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_round_trips_and_yields_config() {
        let json = r#"{
            "id": 7,
            "name": "Ada",
            "email": "ada@example.com",
            "public_key": "cGs=",
            "encryption_salt": "ZW5j",
            "hmac_salt": "bWFj",
            "hmac_type": "hmac-sha512",
            "login_salt": "bG9naW4=",
            "encryption_type": "aes-128-ctr"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        let config = profile.crypto_config();
        assert_eq!(config.hmac_type, MacAlgorithm::HmacSha512);
        assert_eq!(config.encryption_type, CipherMode::Aes128Ctr);
        assert_eq!(config.login_salt, "bG9naW4=");
    }
}

//! Registration and login-challenge signing
//!
//! Registration generates the user's entire server-visible crypto state:
//! three independent 32-byte salts (login, encryption, HMAC), the chosen
//! cipher suite, and the Ed25519 public key derived from password + login
//! salt. The password itself never leaves the client.
//!
//! Login is challenge-response: the server issues opaque challenge bytes,
//! the client signs them with the password-derived key, and the server
//! verifies against the registered public key. Challenge transport and
//! expiry are server concerns; only the signing happens here.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::config::{CipherMode, MacAlgorithm};
use crate::error::CryptoError;
use crate::identity::IdentityKeyPair;
use crate::kdf;

/// Everything the server stores about a new user. All byte fields base64;
/// none of it is secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationPayload {
    pub name: String,
    pub email: String,
    pub hmac_type: MacAlgorithm,
    pub encryption_type: CipherMode,
    pub login_salt: String,
    pub encryption_salt: String,
    pub hmac_salt: String,
    pub public_key: String,
}

/// Client's answer to a login challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginProof {
    pub email: String,
    /// The challenge echoed back, still base64, so the server can match it.
    pub challenge: String,
    /// Ed25519 signature over the raw challenge bytes, base64.
    pub signature: String,
}

/// Build the registration payload for a new user: fresh salts plus the
/// deterministic public key.
pub fn register_user(
    name: &str,
    email: &str,
    password: &str,
    hmac_type: MacAlgorithm,
    encryption_type: CipherMode,
) -> Result<RegistrationPayload, CryptoError> {
    let login_salt = kdf::generate_salt_b64();
    let encryption_salt = kdf::generate_salt_b64();
    let hmac_salt = kdf::generate_salt_b64();

    let identity = IdentityKeyPair::derive(password, &login_salt)?;

    Ok(RegistrationPayload {
        name: name.to_string(),
        email: email.to_string(),
        hmac_type,
        encryption_type,
        login_salt,
        encryption_salt,
        hmac_salt,
        public_key: identity.public_b64(),
    })
}

/// Sign a server-issued login challenge with the password-derived key.
pub fn sign_login_challenge(
    email: &str,
    password: &str,
    challenge_b64: &str,
    login_salt_b64: &str,
) -> Result<LoginProof, CryptoError> {
    let identity = IdentityKeyPair::derive(password, login_salt_b64)?;
    let challenge = STANDARD.decode(challenge_b64)?;
    let signature = identity.sign(&challenge);

    Ok(LoginProof {
        email: email.to_string(),
        challenge: challenge_b64.to_string(),
        signature: STANDARD.encode(signature),
    })
}

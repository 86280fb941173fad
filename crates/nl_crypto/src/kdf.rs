//! Key derivation functions
//!
//! All secret material is PBKDF2 output over (password, salt) at a fixed
//! 100,000 rounds. Determinism is the entire basis of authentication here:
//! there is no server-side secret and no stored private key, so identical
//! inputs MUST yield identical keys forever. Changing `PBKDF2_ROUNDS`
//! breaks every previously registered user.
//!
//! Derived keys per purpose:
//! - login key      — 32 bytes, PBKDF2-HMAC-SHA256, seeds the Ed25519 keypair
//! - encryption key — 16 bytes, PBKDF2-HMAC-SHA256, AES-128 key
//! - MAC key        — 32 or 64 bytes, PRF matches the configured HMAC width
//!
//! Keys are ephemeral: derived per operation, zeroized on drop.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::{Sha256, Sha512};
use zeroize::ZeroizeOnDrop;

use crate::config::{CryptoConfig, MacAlgorithm};
use crate::error::CryptoError;

/// Fixed for the lifetime of the protocol — see module docs.
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Salt length in bytes, one salt per purpose (login, encryption, HMAC).
pub const SALT_LEN: usize = 32;

/// 32-byte seed for the deterministic Ed25519 identity. Zeroized on drop.
#[derive(Debug, ZeroizeOnDrop)]
pub struct LoginKey(pub [u8; 32]);

/// 16-byte AES-128 key. Zeroized on drop.
#[derive(ZeroizeOnDrop)]
pub struct EncryptionKey(pub [u8; 16]);

/// HMAC key, 32 or 64 bytes depending on the configured width. Zeroized on drop.
#[derive(ZeroizeOnDrop)]
pub struct MacKey(pub Vec<u8>);

fn decode_salt(salt_b64: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(salt_b64)
        .map_err(|e| CryptoError::KeyDerivation(format!("invalid salt encoding: {e}")))
}

/// Derive the 32-byte Ed25519 seed from the password and base64 login salt.
pub fn derive_login_key(password: &str, login_salt_b64: &str) -> Result<LoginKey, CryptoError> {
    let salt = decode_salt(login_salt_b64)?;
    let mut out = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ROUNDS, &mut out);
    Ok(LoginKey(out))
}

/// Derive the 16-byte AES-128 key from the password and base64 encryption salt.
pub fn derive_encryption_key(
    password: &str,
    encryption_salt_b64: &str,
) -> Result<EncryptionKey, CryptoError> {
    let salt = decode_salt(encryption_salt_b64)?;
    let mut out = [0u8; 16];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ROUNDS, &mut out);
    Ok(EncryptionKey(out))
}

/// Derive the HMAC key from the password and base64 HMAC salt.
///
/// The PRF follows the configured width: HMAC-SHA256 keys are 32 bytes of
/// PBKDF2-HMAC-SHA256 output, HMAC-SHA512 keys are 64 bytes of
/// PBKDF2-HMAC-SHA512 output.
pub fn derive_mac_key(
    password: &str,
    hmac_salt_b64: &str,
    algorithm: MacAlgorithm,
) -> Result<MacKey, CryptoError> {
    let salt = decode_salt(hmac_salt_b64)?;
    let mut out = vec![0u8; algorithm.key_len()];
    match algorithm {
        MacAlgorithm::HmacSha256 => {
            pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ROUNDS, &mut out)
        }
        MacAlgorithm::HmacSha512 => {
            pbkdf2_hmac::<Sha512>(password.as_bytes(), &salt, PBKDF2_ROUNDS, &mut out)
        }
    }
    Ok(MacKey(out))
}

/// Derive the encryption and MAC keys a block operation needs in one call.
pub fn session_keys(
    password: &str,
    config: &CryptoConfig,
) -> Result<(EncryptionKey, MacKey), CryptoError> {
    let encryption_key = derive_encryption_key(password, &config.encryption_salt)?;
    let mac_key = derive_mac_key(password, &config.hmac_salt, config.hmac_type)?;
    Ok((encryption_key, mac_key))
}

/// Generate a fresh random 32-byte salt (one per purpose, at registration).
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

/// Generate a salt already base64-encoded for server storage.
pub fn generate_salt_b64() -> String {
    STANDARD.encode(generate_salt())
}

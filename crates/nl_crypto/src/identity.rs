//! Deterministic Ed25519 identity
//!
//! There is no stored private key and no random keygen: the signing key IS
//! the login-purpose derived key, a pure function of (password, login salt).
//! Recovering the key is exactly as hard as recalling the password, which
//! is the point — the server authenticates users by challenge signature
//! without ever holding a secret.
//!
//! Verification returns `Ok(false)` for a bad signature. A failed check is
//! a first-class outcome the caller decides policy for (reject the block,
//! flag tampering), not an exception; only malformed key or signature
//! material is an `Err`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier as _, VerifyingKey};
use zeroize::ZeroizeOnDrop;

use crate::error::CryptoError;
use crate::kdf::{self, LoginKey};

/// 32-byte Ed25519 public key, standard base64 on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyBytes(pub [u8; 32]);

impl PublicKeyBytes {
    pub fn to_b64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn from_b64(s: &str) -> Result<Self, CryptoError> {
        let bytes = STANDARD.decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| {
                CryptoError::InvalidKey(format!("public key must be 32 bytes, got {}", b.len()))
            })?;
        Ok(Self(arr))
    }
}

/// The user's signing identity. Drop clears the secret via ZeroizeOnDrop.
#[derive(ZeroizeOnDrop)]
pub struct IdentityKeyPair {
    #[zeroize(skip)]
    pub public: PublicKeyBytes,
    secret_bytes: [u8; 32],
}

impl IdentityKeyPair {
    /// Build the keypair from an already-derived login key.
    pub fn from_login_key(login_key: &LoginKey) -> Self {
        let signing_key = SigningKey::from_bytes(&login_key.0);
        Self {
            public: PublicKeyBytes(signing_key.verifying_key().to_bytes()),
            secret_bytes: login_key.0,
        }
    }

    /// Derive the keypair straight from password + base64 login salt.
    pub fn derive(password: &str, login_salt_b64: &str) -> Result<Self, CryptoError> {
        let login_key = kdf::derive_login_key(password, login_salt_b64)?;
        Ok(Self::from_login_key(&login_key))
    }

    /// Sign arbitrary bytes; returns the 64-byte raw Ed25519 signature.
    pub fn sign(&self, msg: &[u8]) -> Vec<u8> {
        SigningKey::from_bytes(&self.secret_bytes)
            .sign(msg)
            .to_bytes()
            .to_vec()
    }

    /// Public key in base64 form for server upload.
    pub fn public_b64(&self) -> String {
        self.public.to_b64()
    }
}

/// Verify a signature made by any Ed25519 public key.
///
/// `Err` only for structurally invalid inputs (wrong lengths, non-canonical
/// key); a well-formed but wrong signature is `Ok(false)`.
pub fn verify(public_key: &[u8], msg: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
    let key_arr: &[u8; 32] = public_key
        .try_into()
        .map_err(|_| CryptoError::InvalidKey(format!("public key must be 32 bytes, got {}", public_key.len())))?;
    let vk = VerifyingKey::from_bytes(key_arr)
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
    let sig_arr: &[u8; 64] = signature
        .try_into()
        .map_err(|_| CryptoError::InvalidKey(format!("signature must be 64 bytes, got {}", signature.len())))?;
    let sig = Signature::from_bytes(sig_arr);
    Ok(vk.verify(msg, &sig).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_SALT: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

    #[test]
    fn keypair_is_deterministic() {
        let a = IdentityKeyPair::derive("correct horse", ZERO_SALT).unwrap();
        let b = IdentityKeyPair::derive("correct horse", ZERO_SALT).unwrap();
        assert_eq!(a.public, b.public);

        let c = IdentityKeyPair::derive("other password", ZERO_SALT).unwrap();
        assert_ne!(a.public, c.public);
    }

    // Public key for ("correct horse", zero salt) cross-checked with an
    // independent PBKDF2 + Ed25519 implementation: wrong key derivation or
    // a non-deterministic keypair would both show up here.
    #[test]
    fn derived_public_key_matches_reference_vector() {
        let id = IdentityKeyPair::derive("correct horse", ZERO_SALT).unwrap();
        assert_eq!(
            hex::encode(id.public.0),
            "9aee4618dfc3aff72bf53fbc6b8135a0b50ae4ea2d3065e808734c38e41eabc6"
        );
        assert_eq!(id.public_b64(), "mu5GGN/Dr/cr9T+8a4E1oLUK5OotMGXoCHNMOOQeq8Y=");
    }

    #[test]
    fn sign_and_verify_round_trip() {
        let id = IdentityKeyPair::derive("correct horse", ZERO_SALT).unwrap();
        let sig = id.sign(b"challenge bytes");
        assert_eq!(sig.len(), 64);
        assert!(verify(&id.public.0, b"challenge bytes", &sig).unwrap());
    }

    #[test]
    fn tampered_message_fails_verification() {
        let id = IdentityKeyPair::derive("correct horse", ZERO_SALT).unwrap();
        let sig = id.sign(b"challenge bytes");
        assert!(!verify(&id.public.0, b"challenge bytez", &sig).unwrap());
    }

    #[test]
    fn wrong_signer_fails_verification() {
        let alice = IdentityKeyPair::derive("alice pw", ZERO_SALT).unwrap();
        let mallory = IdentityKeyPair::derive("mallory pw", ZERO_SALT).unwrap();
        let sig = mallory.sign(b"msg");
        assert!(!verify(&alice.public.0, b"msg", &sig).unwrap());
    }

    #[test]
    fn malformed_material_is_an_error() {
        let id = IdentityKeyPair::derive("pw", ZERO_SALT).unwrap();
        let sig = id.sign(b"msg");
        assert!(matches!(
            verify(&id.public.0[..31], b"msg", &sig),
            Err(CryptoError::InvalidKey(_))
        ));
        assert!(matches!(
            verify(&id.public.0, b"msg", &sig[..63]),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn public_key_b64_round_trip() {
        let id = IdentityKeyPair::derive("pw", ZERO_SALT).unwrap();
        let b64 = id.public_b64();
        assert_eq!(PublicKeyBytes::from_b64(&b64).unwrap(), id.public);
    }
}

//! Block assembly and decryption — the protocol orchestrator
//!
//! A `Block` is one encrypted, authenticated, signed revision of a note.
//! Blocks are immutable once signed: mutating any field invalidates both
//! the MAC and the signature, and editing a note means appending a new
//! block whose `prev_hash` is the content hash of its predecessor
//! (see `chain`).
//!
//! Canonical byte strings (wire-compatibility critical):
//! - signature pre-image: UTF-8 of
//!   `prev_hash + iv + iv_title + cipher_title + ciphertext + mac + timestamp`
//!   (every field except the signature itself, timestamps RFC3339 whole
//!   seconds UTC)
//! - content hash pre-image (in `chain`): compact JSON of ALL fields
//!   including the signature, in declaration order
//!
//! Decryption is decrypt-and-report: the MAC verdict is captured but never
//! short-circuits, both plaintexts are recovered regardless, and the caller
//! gets content plus a trust flag. Signature verification is a separate,
//! explicit call — listing screens decrypt titles without it.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cipher;
use crate::config::{CipherMode, CryptoConfig};
use crate::error::CryptoError;
use crate::identity::{self, IdentityKeyPair, PublicKeyBytes};
use crate::kdf;
use crate::mac;

/// `prev_hash` of a chain's first block: base64 of 32 zero bytes.
pub const GENESIS_PREV_HASH: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

/// One signed note revision. All byte fields are standard base64.
///
/// Field declaration order is the canonical JSON order for content hashing
/// — do not reorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Content hash of the previous block, or [`GENESIS_PREV_HASH`].
    pub prev_hash: String,
    /// IV for the body ciphertext.
    pub iv: String,
    /// IV for the title ciphertext.
    pub iv_title: String,
    /// Encrypted title.
    pub cipher_title: String,
    /// Encrypted body.
    pub ciphertext: String,
    /// HMAC tag over `cipher_title ‖ ciphertext` (as base64 text).
    pub mac: String,
    /// Ed25519 signature over every other field.
    pub signature: String,
    /// Creation time, RFC3339 UTC, whole seconds.
    #[serde(with = "rfc3339_secs")]
    pub timestamp: DateTime<Utc>,
}

/// Result of decrypting a block: content plus the integrity verdict.
/// A `false` verdict means the content may be tampered — show it with a
/// warning, or reject it; that policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct DecryptedBlock {
    pub title: String,
    pub body: String,
    pub integrity_valid: bool,
}

/// Assemble a fully encrypted, authenticated, signed block.
pub fn create_block(
    title: &str,
    body: &str,
    password: &str,
    config: &CryptoConfig,
    prev_hash: &str,
) -> Result<Block, CryptoError> {
    let (encryption_key, mac_key) = kdf::session_keys(password, config)?;

    // Independent IVs for title and body; same key, never the same stream.
    let iv_title = cipher::generate_iv();
    let iv_body = cipher::generate_iv();

    let mode = config.encryption_type;
    let cipher_title = STANDARD.encode(cipher::encrypt(
        mode,
        &encryption_key.0,
        &iv_title,
        title.as_bytes(),
    ));
    let ciphertext = STANDARD.encode(cipher::encrypt(
        mode,
        &encryption_key.0,
        &iv_body,
        body.as_bytes(),
    ));

    let tag = mac::compute_mac(config.hmac_type, &mac_key, &cipher_title, &ciphertext);

    let timestamp = now_secs();

    let mut block = Block {
        prev_hash: prev_hash.to_string(),
        iv: STANDARD.encode(iv_body),
        iv_title: STANDARD.encode(iv_title),
        cipher_title,
        ciphertext,
        mac: STANDARD.encode(tag),
        signature: String::new(),
        timestamp,
    };

    let id = IdentityKeyPair::derive(password, &config.login_salt)?;
    block.signature = STANDARD.encode(id.sign(&signing_input(&block)));

    Ok(block)
}

/// Decrypt a block's title and body and report the MAC verdict.
///
/// The verdict never short-circuits decryption. Signature verification is
/// not performed here — call [`verify_block_signature`] explicitly.
pub fn decrypt_block(
    block: &Block,
    password: &str,
    config: &CryptoConfig,
) -> Result<DecryptedBlock, CryptoError> {
    let (encryption_key, mac_key) = kdf::session_keys(password, config)?;

    let stored_tag = STANDARD.decode(&block.mac)?;
    let integrity_valid = mac::verify_mac(
        config.hmac_type,
        &mac_key,
        &block.cipher_title,
        &block.ciphertext,
        &stored_tag,
    );

    let mode = config.encryption_type;
    let title = decrypt_field(mode, &encryption_key.0, &block.iv_title, &block.cipher_title)?;
    let body = decrypt_field(mode, &encryption_key.0, &block.iv, &block.ciphertext)?;

    Ok(DecryptedBlock {
        title,
        body,
        integrity_valid,
    })
}

/// Decrypt only a title, skipping MAC and signature checks.
///
/// The fast path for note listings: integrity is deferred to the full
/// [`decrypt_block`] when the note is opened.
pub fn decrypt_title(
    cipher_title_b64: &str,
    iv_title_b64: &str,
    password: &str,
    encryption_salt_b64: &str,
    mode: CipherMode,
) -> Result<String, CryptoError> {
    let encryption_key = kdf::derive_encryption_key(password, encryption_salt_b64)?;
    decrypt_field(mode, &encryption_key.0, iv_title_b64, cipher_title_b64)
}

/// Verify a block's signature against a base64 Ed25519 public key.
///
/// `Ok(false)` is the tampered/forged outcome; `Err` only for malformed
/// key or signature encoding.
pub fn verify_block_signature(public_key_b64: &str, block: &Block) -> Result<bool, CryptoError> {
    let public_key = PublicKeyBytes::from_b64(public_key_b64)?;
    let signature = STANDARD.decode(&block.signature)?;
    identity::verify(&public_key.0, &signing_input(block), &signature)
}

/// Canonical pre-signature concatenation: every field except the signature,
/// in wire order, as one UTF-8 string.
fn signing_input(block: &Block) -> Vec<u8> {
    let mut input = String::with_capacity(
        block.prev_hash.len()
            + block.iv.len()
            + block.iv_title.len()
            + block.cipher_title.len()
            + block.ciphertext.len()
            + block.mac.len()
            + 20,
    );
    input.push_str(&block.prev_hash);
    input.push_str(&block.iv);
    input.push_str(&block.iv_title);
    input.push_str(&block.cipher_title);
    input.push_str(&block.ciphertext);
    input.push_str(&block.mac);
    input.push_str(&format_timestamp(&block.timestamp));
    input.into_bytes()
}

fn decrypt_field(
    mode: CipherMode,
    key: &[u8; 16],
    iv_b64: &str,
    ciphertext_b64: &str,
) -> Result<String, CryptoError> {
    let iv_bytes = STANDARD.decode(iv_b64)?;
    let iv: [u8; 16] = iv_bytes.try_into().map_err(|b: Vec<u8>| {
        CryptoError::InvalidKey(format!("IV must be 16 bytes, got {}", b.len()))
    })?;
    let ciphertext = STANDARD.decode(ciphertext_b64)?;
    let plaintext = cipher::decrypt(mode, key, &iv, &ciphertext)?;
    // Lossy on purpose: tampered content must still be displayable next to
    // its false verdict.
    Ok(String::from_utf8_lossy(&plaintext).into_owned())
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn now_secs() -> DateTime<Utc> {
    use chrono::Timelike;
    let now = Utc::now();
    now.with_nanosecond(0).unwrap_or(now)
}

/// RFC3339, UTC, no fractional seconds — the only timestamp form on the wire.
mod rfc3339_secs {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(de)?;
        let dt = DateTime::parse_from_rfc3339(&s).map_err(serde::de::Error::custom)?;
        // Sub-second precision or a non-UTC offset would re-serialize to a
        // different string than the sender signed and hashed — reject both
        // rather than silently normalising.
        if dt.timestamp_subsec_nanos() != 0 {
            return Err(serde::de::Error::custom(
                "timestamp must not carry fractional seconds",
            ));
        }
        if dt.offset().local_minus_utc() != 0 {
            return Err(serde::de::Error::custom("timestamp must be UTC"));
        }
        Ok(dt.with_timezone(&Utc))
    }
}

//! nl_crypto — Notelock client-side cryptographic core
//!
//! Zero-knowledge note protocol: the server stores salts, a public key, and
//! opaque encrypted blocks. Every secret — the login signing key, the AES
//! key, the HMAC key — is re-derived from the user's password on each
//! operation and discarded afterwards. Nothing here persists state, touches
//! the network, or reads ambient configuration; callers supply all inputs.
//!
//! # Design principles
//! - NO custom crypto; all primitives come from audited RustCrypto crates.
//! - Zeroize all secret material on drop.
//! - Deterministic keys: identical (password, salt) always yields identical
//!   key material. There is no server-side secret and no stored private key.
//! - Integrity is data, not an error: decryption always runs to completion
//!   and returns a boolean verdict next to the plaintext, so a client can
//!   show possibly-tampered content with a warning instead of nothing.
//!
//! # Module layout
//! - `config`   — per-user cipher suite (AES mode + HMAC width) and salts
//! - `kdf`      — PBKDF2 derivation of login / encryption / MAC keys
//! - `cipher`   — AES-128-CBC (PKCS#7) and AES-128-CTR
//! - `mac`      — HMAC tag over a block's encrypted fields
//! - `identity` — deterministic Ed25519 keypair, sign, verify
//! - `auth`     — registration payload assembly + login-challenge signing
//! - `block`    — block assembly/decryption (the orchestrator)
//! - `chain`    — content hashing and prev-hash chain verification
//! - `error`    — unified error type

pub mod auth;
pub mod block;
pub mod chain;
pub mod cipher;
pub mod config;
pub mod error;
pub mod identity;
pub mod kdf;
pub mod mac;

pub use block::{Block, DecryptedBlock, GENESIS_PREV_HASH};
pub use chain::ChainError;
pub use config::{CipherMode, CryptoConfig, MacAlgorithm};
pub use error::CryptoError;

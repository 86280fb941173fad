//! Note containers: blocks, chains, and title listings
//!
//! A note is an append-only chain of `Block` revisions; the server stores
//! blocks keyed by note id and serves two read shapes: the full chain, and
//! a cheap title listing (`EncryptedTitle`) for the notes overview that
//! clients decrypt without MAC checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nl_crypto::block::{self, Block};
use nl_crypto::chain::{self, ChainError};
use nl_crypto::config::CipherMode;
use nl_crypto::error::CryptoError;

/// One stored block with its owning note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteBlock {
    pub note_id: Option<u32>,
    pub block: Block,
}

/// A note's full revision history, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteBlockChain {
    pub note_id: u32,
    pub blocks: Vec<Block>,
}

impl NoteBlockChain {
    /// Check genesis sentinel and every prev-hash link.
    pub fn verify(&self) -> Result<(), ChainError> {
        chain::verify_chain(&self.blocks)
    }

    /// The newest revision, if any.
    pub fn head(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Content hash the next appended revision must reference.
    pub fn next_prev_hash(&self) -> Result<String, ChainError> {
        match self.head() {
            Some(block) => Ok(chain::block_hash(block)?),
            None => Ok(block::GENESIS_PREV_HASH.to_string()),
        }
    }
}

/// Title listing entry as stored server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedTitle {
    pub note_id: u32,
    pub cipher_title: String,
    pub timestamp: DateTime<Utc>,
    pub iv_title: String,
}

impl EncryptedTitle {
    /// Decrypt for the overview screen. No MAC or signature check here —
    /// integrity is verified when the full note is opened.
    pub fn decrypt(
        &self,
        password: &str,
        encryption_salt_b64: &str,
        mode: CipherMode,
    ) -> Result<NoteTitle, CryptoError> {
        let title = block::decrypt_title(
            &self.cipher_title,
            &self.iv_title,
            password,
            encryption_salt_b64,
            mode,
        )?;
        Ok(NoteTitle {
            note_id: self.note_id,
            title,
            timestamp: self.timestamp,
        })
    }
}

/// Decrypted title listing entry, ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteTitle {
    pub note_id: u32,
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

/// A fully decrypted note as rendered by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub note_id: u32,
    pub title: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    /// Content hash of the head block — the note's fingerprint.
    pub hash: String,
    pub integrity_valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use nl_crypto::block::{create_block, GENESIS_PREV_HASH};
    use nl_crypto::config::{CryptoConfig, MacAlgorithm};

    const ZERO_SALT: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

    fn config() -> CryptoConfig {
        CryptoConfig {
            login_salt: ZERO_SALT.into(),
            encryption_salt: ZERO_SALT.into(),
            hmac_salt: ZERO_SALT.into(),
            encryption_type: CipherMode::Aes128Ctr,
            hmac_type: MacAlgorithm::HmacSha256,
        }
    }

    #[test]
    fn chain_append_flow_verifies() {
        let cfg = config();
        let mut chain = NoteBlockChain {
            note_id: 1,
            blocks: vec![],
        };

        assert_eq!(chain.next_prev_hash().unwrap(), GENESIS_PREV_HASH);
        let first = create_block("t", "v1", "pw", &cfg, GENESIS_PREV_HASH).unwrap();
        chain.blocks.push(first);

        let prev = chain.next_prev_hash().unwrap();
        let second = create_block("t", "v2", "pw", &cfg, &prev).unwrap();
        chain.blocks.push(second);

        assert!(chain.verify().is_ok());
        assert_eq!(chain.head().unwrap().prev_hash, prev);
    }

    #[test]
    fn title_listing_decrypts_without_full_block() {
        let cfg = config();
        let block = create_block("Shopping", "milk", "pw", &cfg, GENESIS_PREV_HASH).unwrap();

        let listing = EncryptedTitle {
            note_id: 9,
            cipher_title: block.cipher_title.clone(),
            timestamp: block.timestamp,
            iv_title: block.iv_title.clone(),
        };

        let title = listing
            .decrypt("pw", &cfg.encryption_salt, cfg.encryption_type)
            .unwrap();
        assert_eq!(title.title, "Shopping");
        assert_eq!(title.note_id, 9);
    }
}

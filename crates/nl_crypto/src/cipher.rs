//! AES-128 symmetric encryption, CBC and CTR modes
//!
//! Wire rules (shared with every other client implementation):
//! - CBC pads with PKCS#7 and ALWAYS adds padding — a plaintext that is
//!   already block-aligned still gains a full 16-byte padding block.
//! - CBC unpadding reads the final byte as the pad count N and trims N
//!   bytes. N outside 1..=16 or larger than the buffer is a `Padding`
//!   error; the filler bytes themselves are not inspected, so tampering
//!   that garbles a non-final block still yields (garbled) plaintext for
//!   the MAC verdict to flag rather than an error.
//! - CTR adds no padding; ciphertext length equals plaintext length.
//!
//! IVs are 16 random bytes, fresh per encryption call. Title and body of
//! one block are encrypted under the same key but independent IVs.

use aes::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit, StreamCipher};
use aes::Aes128;
use rand::RngCore;

use crate::config::CipherMode;
use crate::error::CryptoError;

type CbcEnc = cbc::Encryptor<Aes128>;
type CbcDec = cbc::Decryptor<Aes128>;
type Ctr = ctr::Ctr128BE<Aes128>;

const BLOCK: usize = 16;

/// Generate a fresh random 16-byte IV.
pub fn generate_iv() -> [u8; 16] {
    let mut iv = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut iv);
    iv
}

/// Encrypt `plaintext` under a 16-byte key and 16-byte IV.
pub fn encrypt(mode: CipherMode, key: &[u8; 16], iv: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
    match mode {
        CipherMode::Aes128Cbc => {
            let padded = pad_pkcs7(plaintext);
            CbcEnc::new(key.into(), iv.into()).encrypt_padded_vec_mut::<NoPadding>(&padded)
        }
        CipherMode::Aes128Ctr => {
            let mut buf = plaintext.to_vec();
            Ctr::new(key.into(), iv.into()).apply_keystream(&mut buf);
            buf
        }
    }
}

/// Decrypt `ciphertext` under a 16-byte key and 16-byte IV.
///
/// A failure here is a format error (misaligned CBC input, impossible pad
/// count), never an authenticity statement — that is the MAC's job.
pub fn decrypt(
    mode: CipherMode,
    key: &[u8; 16],
    iv: &[u8; 16],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    match mode {
        CipherMode::Aes128Cbc => {
            let padded = CbcDec::new(key.into(), iv.into())
                .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
                .map_err(|_| {
                    CryptoError::Padding("ciphertext length is not a multiple of 16".into())
                })?;
            unpad_pkcs7(padded)
        }
        CipherMode::Aes128Ctr => {
            let mut buf = ciphertext.to_vec();
            Ctr::new(key.into(), iv.into()).apply_keystream(&mut buf);
            Ok(buf)
        }
    }
}

/// PKCS#7: N = 16 - (len mod 16), append N bytes of value N. N is never 0,
/// so aligned input gains a full padding block.
fn pad_pkcs7(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK - data.len() % BLOCK;
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Trim PKCS#7 padding, validating only the count byte. An out-of-range
/// count must surface as an error, never silently truncate to empty.
fn unpad_pkcs7(mut data: Vec<u8>) -> Result<Vec<u8>, CryptoError> {
    let pad_len = match data.last() {
        Some(&n) => n as usize,
        None => return Err(CryptoError::Padding("empty plaintext".into())),
    };
    if pad_len == 0 || pad_len > BLOCK {
        return Err(CryptoError::Padding(format!(
            "pad count {pad_len} out of range"
        )));
    }
    if pad_len > data.len() {
        return Err(CryptoError::Padding(format!(
            "pad count {pad_len} exceeds plaintext length {}",
            data.len()
        )));
    }
    data.truncate(data.len() - pad_len);
    Ok(data)
}

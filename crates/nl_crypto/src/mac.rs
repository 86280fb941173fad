//! Block integrity tags
//!
//! The tag is HMAC-SHA256 or HMAC-SHA512 over the UTF-8 bytes of the
//! base64 `cipher_title` string followed by the base64 `ciphertext` string.
//! The inputs are concatenated as TEXT, not as decoded binary — every
//! client must preserve this exact framing or tags stop interoperating.
//!
//! Verification is constant time in the tag content: lengths are compared
//! first (mismatched lengths fail immediately and leak nothing useful,
//! since tag length is public), then every byte is XOR-accumulated with no
//! early exit. A mismatch is a verdict, not an error — decryption proceeds
//! regardless and the caller surfaces the distrust.

use hmac::{Hmac, Mac as _};
use sha2::{Sha256, Sha512};

use crate::config::MacAlgorithm;
use crate::kdf::MacKey;

/// Compute the integrity tag over a block's encrypted fields.
pub fn compute_mac(
    algorithm: MacAlgorithm,
    key: &MacKey,
    cipher_title: &str,
    ciphertext: &str,
) -> Vec<u8> {
    match algorithm {
        MacAlgorithm::HmacSha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(&key.0)
                .expect("HMAC accepts keys of any length");
            mac.update(cipher_title.as_bytes());
            mac.update(ciphertext.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
        MacAlgorithm::HmacSha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(&key.0)
                .expect("HMAC accepts keys of any length");
            mac.update(cipher_title.as_bytes());
            mac.update(ciphertext.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
    }
}

/// Recompute the tag and compare against the stored one. Returns a verdict.
pub fn verify_mac(
    algorithm: MacAlgorithm,
    key: &MacKey,
    cipher_title: &str,
    ciphertext: &str,
    tag: &[u8],
) -> bool {
    let expected = compute_mac(algorithm, key, cipher_title, ciphertext);
    constant_time_eq(&expected, tag)
}

/// Constant-time comparison to prevent timing side channels.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

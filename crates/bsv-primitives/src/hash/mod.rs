//! Hash function primitives.
//!
//! SHA-256 and SHA-256d for body hashes and message digests, Hash160 for
//! extended-key fingerprints, and the HMAC variants used by BIP32 derivation
//! (HMAC-SHA512) and one-time codes (HMAC-SHA1).

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

/// Compute SHA-256 hash of the input data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute double SHA-256 (SHA-256d) hash of the input data.
///
/// Computes SHA-256(SHA-256(data)); this is the digest signed by
/// Bitcoin Signed Message.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute RIPEMD-160 hash of the input data.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute Hash160: RIPEMD-160(SHA-256(data)).
///
/// The first four bytes of the Hash160 of a parent public key form the
/// parent fingerprint of a BIP32 child.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// Compute HMAC-SHA512 of `data` keyed with `key`.
///
/// # Arguments
/// * `key` - The HMAC key bytes (a chain code, or `"Bitcoin seed"` for a master key).
/// * `data` - The message bytes to authenticate.
///
/// # Returns
/// A 64-byte tag; BIP32 splits it into a 32-byte tweak and a 32-byte chain code.
pub fn sha512_hmac(key: &[u8], data: &[u8]) -> [u8; 64] {
    type HmacSha512 = Hmac<Sha512>;
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    let mut output = [0u8; 64];
    output.copy_from_slice(&mac.finalize().into_bytes());
    output
}

/// Compute HMAC-SHA1 of `data` keyed with `key`.
///
/// RFC 4226 one-time codes truncate this 20-byte tag.
pub fn sha1_hmac(key: &[u8], data: &[u8]) -> [u8; 20] {
    type HmacSha1 = Hmac<Sha1>;
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

//! Bitcoin Signed Message (BSM).
//!
//! The signed digest is
//! `sha256d(varint(len(MAGIC)) || MAGIC || varint(len(message)) || message)`
//! and the signature is the 65-byte compact form flagged for a compressed
//! key. On the wire it travels as standard padded base64.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use bsv_primitives::ec::{PrivateKey, PublicKey, Signature};
use bsv_primitives::hash::sha256d;
use bsv_primitives::util::VarInt;

use crate::MessageError;

/// Prefix mixed into every signed message digest.
pub const MAGIC: &str = "Bitcoin Signed Message:\n";

/// Compute the digest a BSM signature covers.
pub fn magic_hash(message: &[u8]) -> [u8; 32] {
    let mut buf = Vec::with_capacity(MAGIC.len() + message.len() + 10);
    buf.extend_from_slice(&VarInt::from(MAGIC.len()).to_bytes());
    buf.extend_from_slice(MAGIC.as_bytes());
    buf.extend_from_slice(&VarInt::from(message.len()).to_bytes());
    buf.extend_from_slice(message);
    sha256d(&buf)
}

/// Sign a message, returning the 65-byte compact signature.
pub fn sign(message: &[u8], signer: &PrivateKey) -> Result<[u8; 65], MessageError> {
    let sig = signer.sign(&magic_hash(message))?;
    Ok(sig.to_compact(true))
}

/// Sign a message, returning the base64-encoded compact signature.
pub fn sign_base64(message: &[u8], signer: &PrivateKey) -> Result<String, MessageError> {
    Ok(BASE64.encode(sign(message, signer)?))
}

/// Recover the public key that produced a compact signature over `message`.
pub fn recover_public_key(message: &[u8], sig: &[u8]) -> Result<PublicKey, MessageError> {
    let (sig, compressed) = Signature::from_compact(sig)?;
    if !compressed {
        return Err(MessageError::UncompressedKey);
    }
    Ok(sig.recover_public_key(&magic_hash(message))?)
}

/// Check that a compact signature over `message` was made by `expected`.
///
/// A well-formed signature from a different key yields `Ok(false)`;
/// a malformed one is an error.
pub fn verify(message: &[u8], sig: &[u8], expected: &PublicKey) -> Result<bool, MessageError> {
    Ok(recover_public_key(message, sig)? == *expected)
}

/// [`verify`] over a base64-encoded signature.
pub fn verify_base64(message: &[u8], sig: &str, expected: &PublicKey) -> Result<bool, MessageError> {
    let bytes = BASE64.decode(sig)?;
    verify(message, &bytes, expected)
}

//! Recoverable ECDSA signatures with RFC6979 deterministic nonces.
//!
//! Supports the 65-byte compact form used by Bitcoin Signed Message:
//! `<header> <32-byte R> <32-byte S>` where `header = 27 + recovery_id`
//! plus 4 when the signer's key is serialized compressed.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{self, RecoveryId, VerifyingKey};

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// Length of a compact signature in bytes.
pub const COMPACT_LEN: usize = 65;

/// Base value of the compact signature header byte.
const COMPACT_HEADER_BASE: u8 = 27;

/// Header offset marking a compressed signer key.
const COMPACT_COMPRESSED_FLAG: u8 = 4;

/// An ECDSA signature with R and S components and its recovery id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
    recovery_id: u8,
}

impl Signature {
    /// Sign a 32-byte digest with a deterministic nonce.
    ///
    /// k256 produces a low-S signature and a recovery id consistent with it.
    pub fn sign(hash: &[u8; 32], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        let (sig, recovery_id) = priv_key
            .signing_key()
            .sign_prehash_recoverable(hash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        let (r_bytes, s_bytes) = sig.split_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&r_bytes);
        s.copy_from_slice(&s_bytes);

        Ok(Signature {
            r,
            s,
            recovery_id: recovery_id.to_byte(),
        })
    }

    /// The R component (32 bytes, big-endian).
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// The S component (32 bytes, big-endian).
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// The recovery id (0..=3).
    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Serialize in 65-byte compact form.
    ///
    /// # Arguments
    /// * `compressed` - Whether the signer's public key is serialized compressed;
    ///   sets the +4 header flag.
    pub fn to_compact(&self, compressed: bool) -> [u8; COMPACT_LEN] {
        let mut out = [0u8; COMPACT_LEN];
        out[0] = COMPACT_HEADER_BASE
            + self.recovery_id
            + if compressed { COMPACT_COMPRESSED_FLAG } else { 0 };
        out[1..33].copy_from_slice(&self.r);
        out[33..65].copy_from_slice(&self.s);
        out
    }

    /// Parse a 65-byte compact signature.
    ///
    /// # Returns
    /// The signature and whether the header marks a compressed signer key.
    pub fn from_compact(bytes: &[u8]) -> Result<(Self, bool), PrimitivesError> {
        if bytes.len() != COMPACT_LEN {
            return Err(PrimitivesError::InvalidSignature(format!(
                "invalid compact signature size: {}",
                bytes.len()
            )));
        }
        let header = bytes[0];
        if !(COMPACT_HEADER_BASE..COMPACT_HEADER_BASE + 8).contains(&header) {
            return Err(PrimitivesError::InvalidSignature(format!(
                "invalid compact signature header: {header}"
            )));
        }
        let flags = header - COMPACT_HEADER_BASE;

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[1..33]);
        s.copy_from_slice(&bytes[33..65]);

        let sig = Signature {
            r,
            s,
            recovery_id: flags & 0x03,
        };
        Ok((sig, flags & COMPACT_COMPRESSED_FLAG != 0))
    }

    /// Verify this signature against a 32-byte digest and public key.
    pub fn verify(&self, hash: &[u8; 32], pub_key: &PublicKey) -> bool {
        let Ok(sig) = self.to_k256() else {
            return false;
        };
        pub_key.verifying_key().verify_prehash(hash, &sig).is_ok()
    }

    /// Recover the signer's public key from the digest that was signed.
    pub fn recover_public_key(&self, hash: &[u8; 32]) -> Result<PublicKey, PrimitivesError> {
        let recovery_id = RecoveryId::from_byte(self.recovery_id)
            .ok_or_else(|| PrimitivesError::InvalidSignature("invalid recovery id".to_string()))?;
        let sig = self.to_k256()?;
        let recovered = VerifyingKey::recover_from_prehash(hash, &sig, recovery_id)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        Ok(PublicKey::from_k256_verifying_key(&recovered))
    }

    fn to_k256(&self) -> Result<ecdsa::Signature, PrimitivesError> {
        ecdsa::Signature::from_scalars(k256::FieldBytes::from(self.r), k256::FieldBytes::from(self.s))
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))
    }
}

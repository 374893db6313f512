//! secp256k1 private key.
//!
//! Wraps a k256 signing key and adds hex parsing, scalar tweaking for BIP32
//! child derivation, ECDH shared secrets, and recoverable signing.

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, NonZeroScalar, ProjectivePoint, Scalar};
use rand::{CryptoRng, RngCore};

use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
pub const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// A secp256k1 private key for signing and key agreement.
#[derive(Clone, Debug)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a new private key from the supplied cryptographic RNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        PrivateKey {
            inner: SigningKey::random(rng),
        }
    }

    /// Generate a new random private key using the OS random number generator.
    pub fn new() -> Self {
        Self::generate(&mut rand::rngs::OsRng)
    }

    /// Create a private key from a raw 32-byte big-endian scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the bytes represent a valid non-zero scalar below the
    /// curve order, or `InvalidPrivateKey` otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let inner = SigningKey::from_slice(bytes)
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner })
    }

    /// Create a private key from a 64-character hexadecimal string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".to_string(),
            ));
        }
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize the private key as a 32-byte big-endian array.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes().into()
    }

    /// Serialize the private key as a lowercase hexadecimal string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Derive the corresponding public key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_k256_verifying_key(self.inner.verifying_key())
    }

    /// Sign a 32-byte message digest with a deterministic RFC6979 nonce.
    ///
    /// The signature is low-S normalized and carries the recovery id needed
    /// for the 65-byte compact form.
    pub fn sign(&self, hash: &[u8; 32]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self)
    }

    /// Return the x-coordinate of the ECDH shared point as 32 big-endian bytes.
    pub fn shared_secret_x(&self, pub_key: &PublicKey) -> Result<[u8; 32], PrimitivesError> {
        let shared = (pub_key.to_projective_point() * self.to_scalar()).to_affine();
        let encoded = shared.to_encoded_point(false);
        let x = encoded.x().ok_or(PrimitivesError::PointNotOnCurve)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(x);
        Ok(out)
    }

    /// Add a 32-byte tweak to this key's scalar, modulo the curve order.
    ///
    /// Used by BIP32 private child derivation. Fails if the tweak is not below
    /// the curve order or if the sum is zero.
    pub fn add_tweak(&self, tweak: &[u8; 32]) -> Result<PrivateKey, PrimitivesError> {
        let tweak = scalar_from_canonical_bytes(tweak)?;
        let sum = self.to_scalar() + tweak;
        let non_zero = Option::<NonZeroScalar>::from(NonZeroScalar::new(sum)).ok_or_else(|| {
            PrimitivesError::InvalidPrivateKey("tweaked scalar is zero".to_string())
        })?;
        Ok(PrivateKey {
            inner: SigningKey::from(non_zero),
        })
    }

    /// Access the underlying k256 `SigningKey`.
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }

    /// Convert the private key to a k256 `Scalar` for arithmetic operations.
    pub(crate) fn to_scalar(&self) -> Scalar {
        *self.inner.as_nonzero_scalar().as_ref()
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

/// Interpret 32 big-endian bytes as a scalar, rejecting values >= the curve order.
pub(crate) fn scalar_from_canonical_bytes(bytes: &[u8; 32]) -> Result<Scalar, PrimitivesError> {
    Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*bytes))).ok_or_else(|| {
        PrimitivesError::InvalidPrivateKey("scalar is not below the curve order".to_string())
    })
}

/// Multiply the generator by a canonical scalar.
pub(crate) fn generator_times(bytes: &[u8; 32]) -> Result<ProjectivePoint, PrimitivesError> {
    Ok(ProjectivePoint::GENERATOR * scalar_from_canonical_bytes(bytes)?)
}

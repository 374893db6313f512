/// Unified error type for all primitives operations.
///
/// Covers errors from EC operations, encoding, and extended-key handling.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("point not on curve")]
    PointNotOnCurve,

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("invalid extended key: {0}")]
    InvalidExtendedKey(String),

    #[error("cannot derive a hardened child from a public extended key")]
    HardenedFromPublic,

    #[error("extended key is public and holds no private key")]
    NotPrivate,

    #[error("derived child key is invalid at index {0}")]
    InvalidChild(u32),

    #[error("maximum derivation depth exceeded")]
    DepthExceeded,

    #[error("derivation path chunk is not valid hex: {0}")]
    DerivationHex(String),

    #[error("derivation index out of range: {0}")]
    DerivationIndexOutOfRange(i64),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}

/// Error types for message operations.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The underlying EC operation failed.
    #[error("{0}")]
    Primitives(#[from] bsv_primitives::PrimitivesError),
    /// The signature is not valid base64.
    #[error("signature is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The compact signature was produced for an uncompressed key.
    #[error("signature does not reference a compressed public key")]
    UncompressedKey,
}

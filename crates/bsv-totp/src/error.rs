use bsv_primitives::PrimitivesError;

/// Error types for contact one-time codes.
#[derive(Debug, thiserror::Error)]
pub enum TotpError {
    /// The contact's public key could not be parsed, whatever the cause.
    #[error("invalid contact public key")]
    InvalidContactPubKey(#[source] PrimitivesError),

    /// The local key could not produce the pairing key.
    #[error("failed to derive pairing key: {0}")]
    Derivation(#[from] PrimitivesError),

    /// The TOTP secret is not valid base32.
    #[error("invalid totp secret: {0}")]
    InvalidSecret(String),

    /// More digits than a 31-bit truncated HMAC can fill.
    #[error("unsupported number of digits: {0}")]
    InvalidDigits(u32),
}

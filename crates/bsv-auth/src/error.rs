use bsv_message::MessageError;
use bsv_primitives::PrimitivesError;
use reqwest::header::{InvalidHeaderName, InvalidHeaderValue};

/// Error types for request authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// An xpriv authenticator was given an empty key string.
    #[error("xpriv is empty")]
    EmptyXpriv,

    /// An xpub authenticator was given an empty key string.
    #[error("xpub is empty")]
    EmptyXpub,

    /// An access key authenticator was given an empty key string.
    #[error("access key is empty")]
    EmptyAccessKey,

    /// The extended key could not be parsed or has the wrong flavor.
    #[error("invalid extended key: {0}")]
    KeyParse(#[source] PrimitivesError),

    /// The access key is not a valid private key.
    #[error("invalid access key: {0}")]
    InvalidPrivateKey(#[source] PrimitivesError),

    /// The per-request key could not be derived from the nonce.
    #[error("failed to derive signing key: {0}")]
    Derivation(#[source] PrimitivesError),

    /// Signing or signature decoding failed.
    #[error("signature error: {0}")]
    Signing(#[from] MessageError),

    /// The request body is a stream and its bytes are not available.
    #[error("request body cannot be read for hashing")]
    UnreadableBody,

    /// A configured header name is not a valid HTTP header name.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] InvalidHeaderName),

    /// A computed value is not a valid HTTP header value.
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),

    /// A required header is absent or not visible ASCII.
    #[error("missing header: {0}")]
    MissingHeader(String),

    /// Both the xpub and the access key identity headers are present.
    #[error("request carries both xpub and access key identities")]
    AmbiguousIdentity,

    /// The time header is not a decimal millisecond timestamp.
    #[error("invalid time header: {0}")]
    InvalidTime(String),

    /// The body hash header does not match the received body.
    #[error("body hash mismatch")]
    BodyHashMismatch,

    /// The request time is too far from the verifier's clock.
    #[error("request time {time_ms} is more than {max_skew_ms}ms away from {now_ms}")]
    TimeSkew {
        /// Time carried by the request.
        time_ms: i64,
        /// Verifier's clock.
        now_ms: i64,
        /// Allowed distance between the two.
        max_skew_ms: i64,
    },

    /// The signature was not produced by the claimed identity.
    #[error("signature does not match identity")]
    SignatureMismatch,
}

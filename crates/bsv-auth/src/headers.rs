//! Names of the authentication headers.

use reqwest::header::HeaderName;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Header carrying the caller's serialized xpub.
pub const HEADER_XPUB: &str = "x-auth-xpub";
/// Header carrying the caller's access key identity (compressed public key hex).
pub const HEADER_ACCESS_KEY: &str = "x-auth-key";
/// Header carrying the hex SHA-256 of the request body.
pub const HEADER_HASH: &str = "x-auth-hash";
/// Header carrying the per-request nonce.
pub const HEADER_NONCE: &str = "x-auth-nonce";
/// Header carrying the signing time in Unix milliseconds.
pub const HEADER_TIME: &str = "x-auth-time";
/// Header carrying the base64 Bitcoin Signed Message signature.
pub const HEADER_SIGNATURE: &str = "x-auth-signature";

/// The set of header names used on the wire.
///
/// Defaults to the names the wallet server expects. Deployments behind a
/// proxy that renames headers can override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthHeaders {
    /// Xpub identity header.
    pub xpub: String,
    /// Access key identity header.
    pub access_key: String,
    /// Body hash header.
    pub hash: String,
    /// Nonce header.
    pub nonce: String,
    /// Time header.
    pub time: String,
    /// Signature header.
    pub signature: String,
}

impl Default for AuthHeaders {
    fn default() -> Self {
        Self {
            xpub: HEADER_XPUB.to_string(),
            access_key: HEADER_ACCESS_KEY.to_string(),
            hash: HEADER_HASH.to_string(),
            nonce: HEADER_NONCE.to_string(),
            time: HEADER_TIME.to_string(),
            signature: HEADER_SIGNATURE.to_string(),
        }
    }
}

impl AuthHeaders {
    pub(crate) fn name(value: &str) -> Result<HeaderName, AuthError> {
        Ok(HeaderName::from_bytes(value.as_bytes())?)
    }
}

//! The signed payload carried by the authentication headers.
//!
//! A payload binds an identity to one request body at one point in time:
//! the signature covers `identity || body_hash || nonce || time_ms`, all as
//! they appear on the wire. Xpub identities sign with the child key derived
//! from the root xpriv along the nonce's hex path, so the server can rebuild
//! the public child from the xpub alone. Access key identities sign with the
//! access key itself.

use std::fmt;

use bsv_primitives::bip32::{derive_child_from_hex, ExtendedKey};
use bsv_primitives::ec::{PrivateKey, PublicKey};
use rand::RngCore;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::error::AuthError;
use crate::headers::AuthHeaders;
use crate::utils::{body_hash, random_nonce};

/// Default tolerance between the request time and the verifier's clock.
pub const DEFAULT_MAX_SKEW_MS: i64 = 30_000;

/// Who is signing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Serialized extended public key.
    Xpub(String),
    /// Compressed public key hex of an access key.
    AccessKey(String),
}

impl Identity {
    /// The identity string as it appears in its header.
    pub fn as_str(&self) -> &str {
        match self {
            Identity::Xpub(s) | Identity::AccessKey(s) => s,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Identity::Xpub(_) => "xpub",
            Identity::AccessKey(_) => "access_key",
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete set of authentication values for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    /// The signing identity.
    pub identity: Identity,
    /// Lowercase hex SHA-256 of the body.
    pub body_hash: String,
    /// 64 hex characters of fresh randomness.
    pub nonce: String,
    /// Signing time in Unix milliseconds.
    pub time_ms: i64,
    /// Base64 compact Bitcoin Signed Message signature.
    pub signature: String,
}

impl AuthPayload {
    /// Sign `body` on behalf of the xpub of `xpriv`.
    pub fn sign_with_xpriv(
        xpriv: &ExtendedKey,
        body: &[u8],
        rng: &mut dyn RngCore,
        time_ms: i64,
    ) -> Result<Self, AuthError> {
        let nonce = random_nonce(rng);
        let child = derive_child_from_hex(xpriv, &nonce).map_err(AuthError::Derivation)?;
        let key = child.private_key().map_err(AuthError::KeyParse)?;
        let identity = Identity::Xpub(xpriv.neuter().to_string());
        Self::sign(identity, key, body, nonce, time_ms)
    }

    /// Sign `body` with an access key.
    pub fn sign_with_access_key(
        key: &PrivateKey,
        body: &[u8],
        rng: &mut dyn RngCore,
        time_ms: i64,
    ) -> Result<Self, AuthError> {
        let nonce = random_nonce(rng);
        let identity = Identity::AccessKey(key.pub_key().to_hex());
        Self::sign(identity, key, body, nonce, time_ms)
    }

    fn sign(
        identity: Identity,
        key: &PrivateKey,
        body: &[u8],
        nonce: String,
        time_ms: i64,
    ) -> Result<Self, AuthError> {
        let mut payload = AuthPayload {
            identity,
            body_hash: body_hash(body),
            nonce,
            time_ms,
            signature: String::new(),
        };
        payload.signature = bsv_message::sign_base64(payload.signing_message().as_bytes(), key)?;
        Ok(payload)
    }

    /// The exact string the signature covers.
    pub fn signing_message(&self) -> String {
        format!(
            "{}{}{}{}",
            self.identity.as_str(),
            self.body_hash,
            self.nonce,
            self.time_ms
        )
    }

    /// Write the payload into `headers`.
    ///
    /// Every name and value is validated before the map is touched, so on
    /// error `headers` is left as it was. A stale header for the other
    /// identity kind is removed.
    pub fn write_headers(&self, headers: &mut HeaderMap, names: &AuthHeaders) -> Result<(), AuthError> {
        let (identity_name, other_name) = match self.identity {
            Identity::Xpub(_) => (&names.xpub, &names.access_key),
            Identity::AccessKey(_) => (&names.access_key, &names.xpub),
        };
        let time = self.time_ms.to_string();
        let entries: [(HeaderName, HeaderValue); 5] = [
            (AuthHeaders::name(identity_name)?, HeaderValue::from_str(self.identity.as_str())?),
            (AuthHeaders::name(&names.hash)?, HeaderValue::from_str(&self.body_hash)?),
            (AuthHeaders::name(&names.nonce)?, HeaderValue::from_str(&self.nonce)?),
            (AuthHeaders::name(&names.time)?, HeaderValue::from_str(&time)?),
            (AuthHeaders::name(&names.signature)?, HeaderValue::from_str(&self.signature)?),
        ];
        let other = AuthHeaders::name(other_name)?;

        headers.remove(other);
        for (name, value) in entries {
            headers.insert(name, value);
        }
        Ok(())
    }

    /// Read a payload back out of request headers.
    pub fn from_headers(headers: &HeaderMap, names: &AuthHeaders) -> Result<Self, AuthError> {
        let xpub = header_str(headers, &names.xpub);
        let access_key = header_str(headers, &names.access_key);
        let identity = match (xpub, access_key) {
            (Some(_), Some(_)) => return Err(AuthError::AmbiguousIdentity),
            (Some(x), None) => Identity::Xpub(x.to_string()),
            (None, Some(k)) => Identity::AccessKey(k.to_string()),
            (None, None) => return Err(AuthError::MissingHeader(names.xpub.clone())),
        };

        let time = required(headers, &names.time)?;
        let time_ms = time
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidTime(time.to_string()))?;

        Ok(AuthPayload {
            identity,
            body_hash: required(headers, &names.hash)?.to_string(),
            nonce: required(headers, &names.nonce)?.to_string(),
            time_ms,
            signature: required(headers, &names.signature)?.to_string(),
        })
    }

    /// Check the payload against the received `body` and the verifier's clock.
    pub fn verify(&self, body: &[u8], now_ms: i64, max_skew_ms: i64) -> Result<(), AuthError> {
        if body_hash(body) != self.body_hash {
            debug!(identity = self.identity.kind(), "body hash mismatch");
            return Err(AuthError::BodyHashMismatch);
        }

        if self.time_ms.abs_diff(now_ms) > max_skew_ms.unsigned_abs() {
            debug!(
                identity = self.identity.kind(),
                time_ms = self.time_ms,
                now_ms,
                "request time outside window"
            );
            return Err(AuthError::TimeSkew {
                time_ms: self.time_ms,
                now_ms,
                max_skew_ms,
            });
        }

        let expected = self.expected_signer()?;
        let matches = bsv_message::verify_base64(
            self.signing_message().as_bytes(),
            &self.signature,
            &expected,
        )?;
        if !matches {
            debug!(identity = self.identity.kind(), "signature mismatch");
            return Err(AuthError::SignatureMismatch);
        }
        Ok(())
    }

    fn expected_signer(&self) -> Result<PublicKey, AuthError> {
        match &self.identity {
            Identity::Xpub(xpub) => {
                let root = ExtendedKey::from_string(xpub).map_err(AuthError::KeyParse)?;
                let child = derive_child_from_hex(&root.neuter(), &self.nonce)
                    .map_err(AuthError::Derivation)?;
                Ok(child.public_key())
            }
            Identity::AccessKey(hex) => PublicKey::from_hex(hex).map_err(AuthError::KeyParse),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).filter(|v| !v.is_empty())
}

fn required<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AuthError> {
    header_str(headers, name).ok_or_else(|| AuthError::MissingHeader(name.to_string()))
}

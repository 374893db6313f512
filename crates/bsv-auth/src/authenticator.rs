//! Request authenticators.
//!
//! Each authenticator turns a prepared request into an authenticated one by
//! writing the identity and, when it holds a signing key, the signed payload
//! headers. A failed call leaves the request headers as they were.

use std::fmt;

use bsv_primitives::bip32::ExtendedKey;
use bsv_primitives::ec::PrivateKey;
use bsv_primitives::PrimitivesError;
use rand::rngs::OsRng;
use rand::RngCore;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::AuthError;
use crate::headers::AuthHeaders;
use crate::payload::AuthPayload;
use crate::utils::{now_ms, request_body};

/// Something that can authenticate outgoing wallet requests.
pub trait Authenticator: fmt::Debug + Send + Sync {
    /// Write the authentication headers for a request whose final body is `body`.
    ///
    /// `rng` supplies the nonce; callers pass a cryptographically secure
    /// source outside of tests.
    fn sign_headers(
        &self,
        headers: &mut HeaderMap,
        body: &[u8],
        rng: &mut dyn RngCore,
    ) -> Result<(), AuthError>;

    /// Authenticate a built request in place, reading its body and using
    /// the operating system's random source.
    fn authenticate(&self, request: &mut reqwest::Request) -> Result<(), AuthError> {
        let body = request_body(request)?;
        self.sign_headers(request.headers_mut(), &body, &mut OsRng)
    }
}

/// Identifies the caller by xpub only. Requests carry no signature.
#[derive(Debug, Clone)]
pub struct XpubOnlyAuthenticator {
    xpub: String,
    headers: AuthHeaders,
}

impl XpubOnlyAuthenticator {
    /// Create an authenticator from a serialized xpub.
    ///
    /// The key must parse as a public extended key.
    pub fn new(xpub: &str) -> Result<Self, AuthError> {
        if xpub.is_empty() {
            return Err(AuthError::EmptyXpub);
        }
        let key = ExtendedKey::from_string(xpub).map_err(AuthError::KeyParse)?;
        if key.is_private() {
            return Err(AuthError::KeyParse(PrimitivesError::InvalidExtendedKey(
                "expected a public extended key".into(),
            )));
        }
        Ok(Self::from_key(&key))
    }

    /// Create an authenticator from an already parsed key of either flavor.
    pub fn from_key(key: &ExtendedKey) -> Self {
        Self {
            xpub: key.neuter().to_string(),
            headers: AuthHeaders::default(),
        }
    }

    /// Use custom header names.
    pub fn with_headers(mut self, headers: AuthHeaders) -> Self {
        self.headers = headers;
        self
    }

    /// The serialized xpub sent with every request.
    pub fn xpub(&self) -> &str {
        &self.xpub
    }
}

impl Authenticator for XpubOnlyAuthenticator {
    fn sign_headers(
        &self,
        headers: &mut HeaderMap,
        _body: &[u8],
        _rng: &mut dyn RngCore,
    ) -> Result<(), AuthError> {
        let name = AuthHeaders::name(&self.headers.xpub)?;
        let value = HeaderValue::from_str(&self.xpub)?;
        // Leftovers from a signed identity would make the request ambiguous.
        let stale = [
            AuthHeaders::name(&self.headers.access_key)?,
            AuthHeaders::name(&self.headers.hash)?,
            AuthHeaders::name(&self.headers.nonce)?,
            AuthHeaders::name(&self.headers.time)?,
            AuthHeaders::name(&self.headers.signature)?,
        ];

        for stale_name in stale {
            headers.remove(stale_name);
        }
        headers.insert(name, value);
        trace!("set xpub identity header");
        Ok(())
    }
}

/// Signs every request with a child of the root xpriv chosen by its nonce.
pub struct XprivAuthenticator {
    identity: XpubOnlyAuthenticator,
    xpriv: ExtendedKey,
}

impl XprivAuthenticator {
    /// Create an authenticator from a serialized xpriv.
    pub fn new(xpriv: &str) -> Result<Self, AuthError> {
        if xpriv.is_empty() {
            return Err(AuthError::EmptyXpriv);
        }
        let key = ExtendedKey::from_string(xpriv).map_err(AuthError::KeyParse)?;
        Self::from_key(key)
    }

    /// Create an authenticator from a parsed private extended key.
    pub fn from_key(xpriv: ExtendedKey) -> Result<Self, AuthError> {
        if !xpriv.is_private() {
            return Err(AuthError::KeyParse(PrimitivesError::NotPrivate));
        }
        Ok(Self {
            identity: XpubOnlyAuthenticator::from_key(&xpriv),
            xpriv,
        })
    }

    /// Use custom header names.
    pub fn with_headers(mut self, headers: AuthHeaders) -> Self {
        self.identity = self.identity.with_headers(headers);
        self
    }

    /// The serialized xpub matching the signing key.
    pub fn xpub(&self) -> &str {
        self.identity.xpub()
    }
}

impl fmt::Debug for XprivAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XprivAuthenticator")
            .field("xpub", &self.identity.xpub())
            .finish_non_exhaustive()
    }
}

impl Authenticator for XprivAuthenticator {
    fn sign_headers(
        &self,
        headers: &mut HeaderMap,
        body: &[u8],
        rng: &mut dyn RngCore,
    ) -> Result<(), AuthError> {
        let payload = AuthPayload::sign_with_xpriv(&self.xpriv, body, rng, now_ms())?;
        payload.write_headers(headers, &self.identity.headers)?;
        debug!(
            identity = "xpub",
            time_ms = payload.time_ms,
            body_len = body.len(),
            "signed request"
        );
        Ok(())
    }
}

/// Signs every request directly with an access key.
pub struct AccessKeyAuthenticator {
    key: PrivateKey,
    pub_key_hex: String,
    headers: AuthHeaders,
}

impl AccessKeyAuthenticator {
    /// Create an authenticator from a hex-encoded private key.
    pub fn new(access_key: &str) -> Result<Self, AuthError> {
        if access_key.is_empty() {
            return Err(AuthError::EmptyAccessKey);
        }
        let key = PrivateKey::from_hex(access_key).map_err(AuthError::InvalidPrivateKey)?;
        Ok(Self::from_key(key))
    }

    /// Create an authenticator from a parsed key.
    pub fn from_key(key: PrivateKey) -> Self {
        let pub_key_hex = key.pub_key().to_hex();
        Self {
            key,
            pub_key_hex,
            headers: AuthHeaders::default(),
        }
    }

    /// Use custom header names.
    pub fn with_headers(mut self, headers: AuthHeaders) -> Self {
        self.headers = headers;
        self
    }

    /// Compressed public key hex sent as the identity.
    pub fn pub_key_hex(&self) -> &str {
        &self.pub_key_hex
    }
}

impl fmt::Debug for AccessKeyAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeyAuthenticator")
            .field("pub_key", &self.pub_key_hex)
            .finish_non_exhaustive()
    }
}

impl Authenticator for AccessKeyAuthenticator {
    fn sign_headers(
        &self,
        headers: &mut HeaderMap,
        body: &[u8],
        rng: &mut dyn RngCore,
    ) -> Result<(), AuthError> {
        let payload = AuthPayload::sign_with_access_key(&self.key, body, rng, now_ms())?;
        payload.write_headers(headers, &self.headers)?;
        debug!(
            identity = "access_key",
            time_ms = payload.time_ms,
            body_len = body.len(),
            "signed request"
        );
        Ok(())
    }
}

/// Credentials a wallet client can be configured with.
///
/// Serialized as `{"xpriv": "..."}`, `{"xpub": "..."}` or `{"accessKey": "..."}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Credentials {
    /// Read-only identity.
    Xpub(String),
    /// Root private key; requests are signed with derived children.
    Xpriv(String),
    /// Hex-encoded access key.
    AccessKey(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Xpub(xpub) => f.debug_tuple("Xpub").field(xpub).finish(),
            Credentials::Xpriv(_) => f.write_str("Xpriv(..)"),
            Credentials::AccessKey(_) => f.write_str("AccessKey(..)"),
        }
    }
}

/// One of the three authenticators, chosen from [`Credentials`].
#[derive(Debug)]
pub enum ClientAuthenticator {
    /// Xpub only.
    Xpub(XpubOnlyAuthenticator),
    /// Xpriv signing.
    Xpriv(XprivAuthenticator),
    /// Access key signing.
    AccessKey(AccessKeyAuthenticator),
}

impl ClientAuthenticator {
    /// Build the authenticator matching `credentials`.
    pub fn new(credentials: &Credentials) -> Result<Self, AuthError> {
        let auth = match credentials {
            Credentials::Xpub(xpub) => Self::Xpub(XpubOnlyAuthenticator::new(xpub)?),
            Credentials::Xpriv(xpriv) => Self::Xpriv(XprivAuthenticator::new(xpriv)?),
            Credentials::AccessKey(key) => Self::AccessKey(AccessKeyAuthenticator::new(key)?),
        };
        debug!(kind = auth.kind(), "created client authenticator");
        Ok(auth)
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Xpub(_) => "xpub",
            Self::Xpriv(_) => "xpriv",
            Self::AccessKey(_) => "access_key",
        }
    }

    /// Use custom header names.
    pub fn with_headers(self, headers: AuthHeaders) -> Self {
        match self {
            Self::Xpub(a) => Self::Xpub(a.with_headers(headers)),
            Self::Xpriv(a) => Self::Xpriv(a.with_headers(headers)),
            Self::AccessKey(a) => Self::AccessKey(a.with_headers(headers)),
        }
    }
}

impl Authenticator for ClientAuthenticator {
    fn sign_headers(
        &self,
        headers: &mut HeaderMap,
        body: &[u8],
        rng: &mut dyn RngCore,
    ) -> Result<(), AuthError> {
        match self {
            Self::Xpub(a) => a.sign_headers(headers, body, rng),
            Self::Xpriv(a) => a.sign_headers(headers, body, rng),
            Self::AccessKey(a) => a.sign_headers(headers, body, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const XPRIV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
    const XPUB: &str = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";

    #[test]
    fn test_empty_keys_rejected() {
        assert!(matches!(XpubOnlyAuthenticator::new(""), Err(AuthError::EmptyXpub)));
        assert!(matches!(XprivAuthenticator::new(""), Err(AuthError::EmptyXpriv)));
        assert!(matches!(AccessKeyAuthenticator::new(""), Err(AuthError::EmptyAccessKey)));
    }

    #[test]
    fn test_flavor_mismatch_rejected() {
        assert!(matches!(XprivAuthenticator::new(XPUB), Err(AuthError::KeyParse(_))));
        assert!(matches!(XpubOnlyAuthenticator::new(XPRIV), Err(AuthError::KeyParse(_))));
    }

    #[test]
    fn test_bad_access_key_rejected() {
        assert!(matches!(
            AccessKeyAuthenticator::new("zz"),
            Err(AuthError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_xpriv_exposes_matching_xpub() {
        let a = XprivAuthenticator::new(XPRIV).unwrap();
        assert_eq!(a.xpub(), XPUB);
    }

    #[test]
    fn test_xpub_only_sets_single_header() {
        let a = XpubOnlyAuthenticator::new(XPUB).unwrap();
        let mut headers = HeaderMap::new();
        a.sign_headers(&mut headers, b"ignored", &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-auth-xpub").unwrap(), XPUB);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let a = XprivAuthenticator::new(XPRIV).unwrap();
        assert!(!format!("{a:?}").contains(XPRIV));
        let creds = Credentials::Xpriv(XPRIV.to_string());
        assert!(!format!("{creds:?}").contains(XPRIV));
    }

    #[test]
    fn test_credentials_serde_shape() {
        let creds: Credentials = serde_json::from_str(r#"{"accessKey":"abcd"}"#).unwrap();
        assert_eq!(creds, Credentials::AccessKey("abcd".into()));
        let json = serde_json::to_string(&Credentials::Xpub(XPUB.into())).unwrap();
        assert_eq!(json, format!(r#"{{"xpub":"{XPUB}"}}"#));
    }

    #[test]
    fn test_client_authenticator_dispatch() {
        let a = ClientAuthenticator::new(&Credentials::Xpriv(XPRIV.into())).unwrap();
        assert!(matches!(a, ClientAuthenticator::Xpriv(_)));
        let a = ClientAuthenticator::new(&Credentials::Xpub(XPUB.into())).unwrap();
        assert!(matches!(a, ClientAuthenticator::Xpub(_)));
    }
}

//! Request authentication for the SPV wallet HTTP API.
//!
//! A client authenticates as an xpub (identity only), an xpriv (each request
//! signed with a child key selected by the request nonce) or an access key
//! (each request signed with the key itself). Signed requests carry the
//! identity, body hash, nonce, time and a Bitcoin Signed Message signature
//! in `x-auth-*` headers; [`AuthPayload`] reads and verifies them back.

pub mod authenticator;
pub mod error;
pub mod headers;
pub mod payload;
pub mod utils;

pub use authenticator::{
    AccessKeyAuthenticator, Authenticator, ClientAuthenticator, Credentials, XprivAuthenticator,
    XpubOnlyAuthenticator,
};
pub use error::AuthError;
pub use headers::AuthHeaders;
pub use payload::{AuthPayload, Identity, DEFAULT_MAX_SKEW_MS};

#![deny(missing_docs)]

//! SPV wallet client core.
//!
//! Re-exports the component crates for convenient single-crate usage.

pub use bsv_primitives as primitives;
pub use bsv_message as message;
pub use bsv_auth as auth;
pub use bsv_totp as totp;

/// The types most callers need.
pub mod prelude {
    pub use bsv_auth::{
        AuthError, AuthHeaders, Authenticator, ClientAuthenticator, Credentials,
    };
    pub use bsv_primitives::bip32::{ExtendedKey, Network};
    pub use bsv_totp::{Contact, TotpError, TotpOptions};
}

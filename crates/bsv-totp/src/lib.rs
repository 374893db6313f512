//! Pairwise one-time codes for SPV wallet contacts.
//!
//! Two contacts who know each other's pairing public key share an ECDH
//! secret. Mixing in a directing paymail makes the code one-directional, and
//! a standard TOTP over the result gives a short code one side can read out
//! and the other can check.

pub mod contact;
pub mod error;
pub mod secret;
pub mod totp;
pub mod types;

pub use contact::{
    generate_totp_for_contact, generate_totp_for_contact_at, validate_totp_for_contact,
    validate_totp_for_contact_at,
};
pub use error::TotpError;
pub use secret::{directed_secret, shared_secret};
pub use types::{Contact, TotpOptions, DEFAULT_DIGITS, DEFAULT_PERIOD};

#![deny(missing_docs)]

//! BSV Blockchain SDK - Bitcoin Signed Message.
//!
//! Signs and verifies arbitrary messages with the compact, recoverable
//! signature format wallets use to prove key ownership. Request
//! authentication signs its canonical payload this way.

mod error;
pub mod signed;

pub use error::MessageError;
pub use signed::{magic_hash, recover_public_key, sign, sign_base64, verify, verify_base64};

//! Contact and code configuration types.

use serde::{Deserialize, Serialize};

/// Default code lifetime in seconds.
pub const DEFAULT_PERIOD: u64 = 30;
/// Default number of digits in a code.
pub const DEFAULT_DIGITS: u32 = 2;
/// Largest supported number of digits.
pub const MAX_DIGITS: u32 = 10;

/// The other side of a pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Compressed or uncompressed public key hex of the contact's pairing key.
    pub pub_key: String,
    /// The contact's paymail address.
    pub paymail: String,
}

impl Contact {
    /// Create a contact.
    pub fn new(pub_key: impl Into<String>, paymail: impl Into<String>) -> Self {
        Self {
            pub_key: pub_key.into(),
            paymail: paymail.into(),
        }
    }
}

/// Code window and length.
///
/// A zero field means "use the default", so partially filled configs behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TotpOptions {
    /// Window length in seconds.
    pub period: u64,
    /// Code length.
    pub digits: u32,
}

impl Default for TotpOptions {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            digits: DEFAULT_DIGITS,
        }
    }
}

impl TotpOptions {
    /// Options with the given window and length.
    pub fn new(period: u64, digits: u32) -> Self {
        Self { period, digits }
    }

    /// Effective window length.
    pub fn period(&self) -> u64 {
        if self.period == 0 {
            DEFAULT_PERIOD
        } else {
            self.period
        }
    }

    /// Effective code length.
    pub fn digits(&self) -> u32 {
        if self.digits == 0 {
            DEFAULT_DIGITS
        } else {
            self.digits
        }
    }
}

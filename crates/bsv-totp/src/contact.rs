//! One-time codes between two paired contacts.
//!
//! The generator directs its secret with `contact.paymail`; the validator
//! passes the directing paymail explicitly. Both sides must use the same
//! string, which by convention is the paymail of the party that does not
//! hold the root key in the call: Alice generates for Bob with Bob's
//! paymail, and Bob validates Alice's code with his own.

use bsv_primitives::bip32::ExtendedKey;
use tracing::debug;

use crate::error::TotpError;
use crate::secret::{directed_secret, shared_secret};
use crate::totp::{generate_at, now_secs, validate_at};
use crate::types::{Contact, TotpOptions};

/// Generate the current code `xpriv` presents to `contact`.
pub fn generate_totp_for_contact(
    xpriv: &ExtendedKey,
    contact: &Contact,
    opts: &TotpOptions,
) -> Result<String, TotpError> {
    generate_totp_for_contact_at(xpriv, contact, opts, now_secs())
}

/// [`generate_totp_for_contact`] at a given Unix time.
pub fn generate_totp_for_contact_at(
    xpriv: &ExtendedKey,
    contact: &Contact,
    opts: &TotpOptions,
    unix_secs: u64,
) -> Result<String, TotpError> {
    let shared = shared_secret(xpriv, &contact.pub_key)?;
    let code = generate_at(&directed_secret(&shared, &contact.paymail), unix_secs, opts)?;
    debug!(
        paymail = %contact.paymail,
        period = opts.period(),
        digits = opts.digits(),
        "generated contact code"
    );
    Ok(code)
}

/// Check a code received from `contact`, directed by `directing_paymail`.
pub fn validate_totp_for_contact(
    xpriv: &ExtendedKey,
    contact: &Contact,
    code: &str,
    directing_paymail: &str,
    opts: &TotpOptions,
) -> Result<bool, TotpError> {
    validate_totp_for_contact_at(xpriv, contact, code, directing_paymail, opts, now_secs())
}

/// [`validate_totp_for_contact`] at a given Unix time.
pub fn validate_totp_for_contact_at(
    xpriv: &ExtendedKey,
    contact: &Contact,
    code: &str,
    directing_paymail: &str,
    opts: &TotpOptions,
    unix_secs: u64,
) -> Result<bool, TotpError> {
    let shared = shared_secret(xpriv, &contact.pub_key)?;
    let valid = validate_at(code, &directed_secret(&shared, directing_paymail), unix_secs, opts)?;
    debug!(
        contact = %contact.paymail,
        directing = %directing_paymail,
        valid,
        "validated contact code"
    );
    Ok(valid)
}

//! Pairwise shared secrets.
//!
//! Both parties derive their pairing key at the PKI path of their root key
//! and run ECDH against the other's pairing public key. The secret is the
//! x-coordinate of the shared point as a minimal big-endian integer, i.e.
//! with leading zero bytes dropped, which is how other wallet clients
//! serialize it.

use bsv_primitives::bip32::{derive_pki_key, ExtendedKey};
use bsv_primitives::ec::PublicKey;
use data_encoding::BASE32;

use crate::error::TotpError;

/// ECDH secret between the pairing key of `xpriv` and `contact_pub_key`.
pub fn shared_secret(xpriv: &ExtendedKey, contact_pub_key: &str) -> Result<Vec<u8>, TotpError> {
    let pki = derive_pki_key(xpriv)?;
    let local = pki.private_key()?;
    let remote = PublicKey::from_hex(contact_pub_key).map_err(TotpError::InvalidContactPubKey)?;
    let x = local.shared_secret_x(&remote)?;
    Ok(strip_leading_zeros(&x).to_vec())
}

/// The TOTP secret for one direction of a pairing: `base32(secret || paymail)`.
pub fn directed_secret(shared: &[u8], directing_paymail: &str) -> String {
    let mut buf = Vec::with_capacity(shared.len() + directing_paymail.len());
    buf.extend_from_slice(shared);
    buf.extend_from_slice(directing_paymail.as_bytes());
    BASE32.encode(&buf)
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}

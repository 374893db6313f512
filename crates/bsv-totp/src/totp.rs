//! RFC 6238 time-based one-time passwords over HMAC-SHA1.

use bsv_primitives::hash::sha1_hmac;
use data_encoding::BASE32;
use subtle::ConstantTimeEq;

use crate::error::TotpError;
use crate::types::{TotpOptions, MAX_DIGITS};

/// Seconds since the Unix epoch.
pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// The code for a base32 `secret` at `unix_secs`.
pub fn generate_at(secret: &str, unix_secs: u64, opts: &TotpOptions) -> Result<String, TotpError> {
    let key = decode_secret(secret)?;
    let digits = opts.digits();
    if digits > MAX_DIGITS {
        return Err(TotpError::InvalidDigits(digits));
    }
    Ok(hotp(&key, unix_secs / opts.period(), digits))
}

/// Whether `code` is the code for `secret` in the window containing `unix_secs`.
///
/// Codes of the wrong length are rejected before any comparison.
pub fn validate_at(
    code: &str,
    secret: &str,
    unix_secs: u64,
    opts: &TotpOptions,
) -> Result<bool, TotpError> {
    if code.len() != opts.digits() as usize {
        return Ok(false);
    }
    let expected = generate_at(secret, unix_secs, opts)?;
    Ok(expected.as_bytes().ct_eq(code.as_bytes()).into())
}

fn decode_secret(secret: &str) -> Result<Vec<u8>, TotpError> {
    let mut normalized = secret.trim().to_ascii_uppercase();
    // Accept unpadded input.
    while normalized.len() % 8 != 0 {
        normalized.push('=');
    }
    BASE32
        .decode(normalized.as_bytes())
        .map_err(|e| TotpError::InvalidSecret(e.to_string()))
}

// RFC 4226 HOTP with dynamic truncation.
fn hotp(key: &[u8], counter: u64, digits: u32) -> String {
    let mac = sha1_hmac(key, &counter.to_be_bytes());
    let offset = (mac[19] & 0x0f) as usize;
    let bin = u32::from_be_bytes([
        mac[offset] & 0x7f,
        mac[offset + 1],
        mac[offset + 2],
        mac[offset + 3],
    ]);
    let code = u64::from(bin) % 10u64.pow(digits);
    format!("{:0width$}", code, width = digits as usize)
}

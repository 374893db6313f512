//! Deterministic derivation paths from hex strings.
//!
//! A hex string is cut into 8-character chunks; each chunk is read as a
//! signed base-16 integer, reduced modulo `2^31 - 1` and used as a
//! non-hardened child index. Request signing derives a per-request key from
//! the request nonce this way, so the same root and hex always give the same
//! child.

use crate::PrimitivesError;

use super::{ExtendedKey, CHAIN_EXTERNAL};

/// Number of hex characters consumed per derivation step.
const CHUNK_LEN: usize = 8;

/// Chunk values are reduced modulo this to stay below the hardened range.
const INDEX_MODULUS: i64 = (1 << 31) - 1;

/// Path of the key used for contact pairing, relative to the wallet root.
///
/// Shared by every wallet client; changing it breaks interoperability.
pub const PKI_PATH: [u32; 2] = [CHAIN_EXTERNAL, 0];

/// Convert a hex string into the child indices it encodes.
///
/// # Returns
/// The derivation path, `DerivationHex` for a chunk that does not parse as
/// base-16, or `DerivationIndexOutOfRange` for a chunk whose reduced value
/// falls outside `0..=u32::MAX` (only reachable with a leading `-`).
pub fn hex_to_path(hex_str: &str) -> Result<Vec<u32>, PrimitivesError> {
    hex_str
        .as_bytes()
        .chunks(CHUNK_LEN)
        .map(|chunk| {
            let chunk = std::str::from_utf8(chunk)
                .map_err(|_| PrimitivesError::DerivationHex(String::from_utf8_lossy(chunk).into_owned()))?;
            let num = i64::from_str_radix(chunk, 16)
                .map_err(|e| PrimitivesError::DerivationHex(format!("{chunk}: {e}")))?;
            let reduced = num % INDEX_MODULUS;
            u32::try_from(reduced).map_err(|_| PrimitivesError::DerivationIndexOutOfRange(reduced))
        })
        .collect()
}

/// Derive the child of `root` addressed by `hex_str`.
///
/// Works on both flavors: a private root gives the private child, a public
/// root the matching public child. An empty string returns `root` unchanged.
pub fn derive_child_from_hex(root: &ExtendedKey, hex_str: &str) -> Result<ExtendedKey, PrimitivesError> {
    root.derive_path(&hex_to_path(hex_str)?)
}

/// Derive the contact-pairing key at [`PKI_PATH`] below `root`.
pub fn derive_pki_key(root: &ExtendedKey) -> Result<ExtendedKey, PrimitivesError> {
    root.derive_path(&PKI_PATH)
}

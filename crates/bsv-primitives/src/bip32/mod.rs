//! BIP32 hierarchical deterministic keys.
//!
//! [`ExtendedKey`] is a node in the key tree: key material plus chain code,
//! in a private flavor (derives private and public children, can sign) or a
//! public flavor (derives non-hardened public children only).
//!
//! [`derive_child_from_hex`] and [`derive_pki_key`] map an arbitrary hex
//! string, or the fixed contact-pairing path, onto a non-hardened derivation
//! path below a root key.

mod derivation;
mod extended_key;

pub use derivation::{derive_child_from_hex, derive_pki_key, hex_to_path, PKI_PATH};
pub use extended_key::{ExtendedKey, Network};

/// First hardened child index.
pub const HARDENED_KEY_START: u32 = 0x8000_0000;

/// Index of the external (receiving) chain.
pub const CHAIN_EXTERNAL: u32 = 0;

/// BSV Blockchain SDK - Cryptographic primitives for the SPV wallet client.
///
/// This crate provides the building blocks the request-authentication and
/// contact-pairing layers sit on:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160, HMAC)
/// - Base58Check encoding for extended keys
/// - Variable-length integer encoding
/// - Elliptic curve cryptography (secp256k1 keys, recoverable signatures, ECDH)
/// - BIP32 extended keys and deterministic hex-path derivation

pub mod hash;
pub mod util;
pub mod base58;
pub mod ec;
pub mod bip32;

mod error;
pub use error::PrimitivesError;

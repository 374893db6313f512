//! Base58Check encoding used for serialized extended keys.
//!
//! A Base58Check string is `base58(payload || sha256d(payload)[..4])` over
//! Bitcoin's alphabet. Extended keys are the only Base58 strings this client
//! reads or writes.

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Length of the trailing checksum in bytes.
const CHECKSUM_LEN: usize = 4;

/// Encode `data` with a 4-byte double-SHA-256 checksum appended.
pub fn check_encode(data: &[u8]) -> String {
    let checksum = sha256d(data);
    let mut payload = Vec::with_capacity(data.len() + CHECKSUM_LEN);
    payload.extend_from_slice(data);
    payload.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    bs58::encode(payload)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_string()
}

/// Decode a Base58Check string and verify its checksum.
///
/// # Returns
/// The payload without its checksum, `InvalidBase58` for bad characters or a
/// string too short to carry a checksum, or `ChecksumMismatch`.
pub fn check_decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    let mut decoded = bs58::decode(s)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| PrimitivesError::InvalidBase58(e.to_string()))?;
    if decoded.len() < CHECKSUM_LEN {
        return Err(PrimitivesError::InvalidBase58(
            "data too short for checksum".to_string(),
        ));
    }
    let checksum = decoded.split_off(decoded.len() - CHECKSUM_LEN);
    if checksum[..] != sha256d(&decoded)[..CHECKSUM_LEN] {
        return Err(PrimitivesError::ChecksumMismatch);
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_encode_known_address() {
        // Version byte 0x00 followed by a Hash160 encodes to a P2PKH address.
        let payload = hex::decode("00010966776006953d5567439e5e39f86a0d273bee").unwrap();
        assert_eq!(check_encode(&payload), "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM");
        assert_eq!(check_decode("16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM").unwrap(), payload);
    }

    #[test]
    fn test_check_decode_bad_checksum() {
        let mut encoded = check_encode(&[0x80, 0x01, 0x02, 0x03]);
        let last = encoded.pop().unwrap();
        encoded.push(if last == '1' { '2' } else { '1' });
        assert!(matches!(
            check_decode(&encoded),
            Err(PrimitivesError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_check_decode_invalid_characters() {
        assert!(matches!(
            check_decode("0OIl"),
            Err(PrimitivesError::InvalidBase58(_))
        ));
        assert!(check_decode("").is_err());
    }
}

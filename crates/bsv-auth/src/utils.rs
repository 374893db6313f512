//! Utility functions: nonces, clock, body hashing.

use bsv_primitives::hash::sha256;
use rand::RngCore;

use crate::error::AuthError;

/// Number of random bytes behind each request nonce.
pub const NONCE_LEN: usize = 32;

/// Generate `length` random bytes and return them as lowercase hex.
pub fn random_hex(rng: &mut dyn RngCore, length: usize) -> String {
    let mut bytes = vec![0u8; length];
    rng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Fresh request nonce: [`NONCE_LEN`] random bytes as 64 hex characters.
pub fn random_nonce(rng: &mut dyn RngCore) -> String {
    random_hex(rng, NONCE_LEN)
}

/// Lowercase hex SHA-256 of a request body.
pub fn body_hash(body: &[u8]) -> String {
    hex::encode(sha256(body))
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// The bytes of a request body as they will be sent.
///
/// A request without a body hashes as the empty byte string. Streaming
/// bodies have no bytes to hash yet and are rejected.
pub fn request_body(request: &reqwest::Request) -> Result<Vec<u8>, AuthError> {
    match request.body() {
        None => Ok(Vec::new()),
        Some(body) => body
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or(AuthError::UnreadableBody),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_nonce_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = random_nonce(&mut rng);
        let b = random_nonce(&mut rng);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_nonce_is_seed_deterministic() {
        let a = random_nonce(&mut StdRng::seed_from_u64(7));
        let b = random_nonce(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_body_hash_empty() {
        assert_eq!(
            body_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_request_body_absent_is_empty() {
        let url = reqwest::Url::parse("http://localhost/v1/xpub").unwrap();
        let request = reqwest::Request::new(reqwest::Method::GET, url);
        assert!(request_body(&request).unwrap().is_empty());
    }

    #[test]
    fn test_request_body_bytes() {
        let request = reqwest::Client::new()
            .post("http://localhost/v1/transaction")
            .body(r#"{"a":1}"#)
            .build()
            .unwrap();
        assert_eq!(request_body(&request).unwrap(), br#"{"a":1}"#);
    }

    #[test]
    fn test_now_ms_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(now_ms() > 1_577_836_800_000);
    }
}

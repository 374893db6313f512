use bsv_auth::{AuthError, AuthPayload, DEFAULT_MAX_SKEW_MS};
use bsv_primitives::bip32::{ExtendedKey, Network};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const T: i64 = 1_700_000_000_000;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn signed_body_verifies(seed in any::<u64>(), body in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut rng = StdRng::seed_from_u64(seed);
        let root = ExtendedKey::generate(&mut rng, Network::Mainnet).unwrap();
        let payload = AuthPayload::sign_with_xpriv(&root, &body, &mut rng, T).unwrap();
        prop_assert!(payload.verify(&body, T, DEFAULT_MAX_SKEW_MS).is_ok());
    }

    #[test]
    fn flipped_body_byte_rejected(
        seed in any::<u64>(),
        body in proptest::collection::vec(any::<u8>(), 1..128),
        idx in any::<prop::sample::Index>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let root = ExtendedKey::generate(&mut rng, Network::Mainnet).unwrap();
        let payload = AuthPayload::sign_with_xpriv(&root, &body, &mut rng, T).unwrap();
        let mut tampered = body.clone();
        let i = idx.index(tampered.len());
        tampered[i] ^= 0x01;
        prop_assert!(matches!(
            payload.verify(&tampered, T, DEFAULT_MAX_SKEW_MS),
            Err(AuthError::BodyHashMismatch)
        ));
    }
}

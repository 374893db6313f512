use bsv_primitives::bip32::{derive_pki_key, ExtendedKey, Network};
use bsv_totp::{generate_totp_for_contact_at, validate_totp_for_contact_at, Contact, TotpOptions};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn contact_of(root: &ExtendedKey, paymail: &str) -> Contact {
    Contact::new(derive_pki_key(root).unwrap().public_key().to_hex(), paymail)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn generated_code_validates_within_window(
        seed in any::<u64>(),
        t in 0u64..4_000_000_000,
        period in 1u64..7200,
        digits in 1u32..=8,
        offset_frac in 0.0f64..1.0,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let alice = ExtendedKey::generate(&mut rng, Network::Mainnet).unwrap();
        let bob = ExtendedKey::generate(&mut rng, Network::Mainnet).unwrap();
        let opts = TotpOptions::new(period, digits);

        let start = t - t % period;
        let code = generate_totp_for_contact_at(&alice, &contact_of(&bob, "bob@example.com"), &opts, start).unwrap();
        prop_assert_eq!(code.len(), digits as usize);

        let later = start + ((period - 1) as f64 * offset_frac) as u64;
        let ok = validate_totp_for_contact_at(
            &bob,
            &contact_of(&alice, "alice@example.com"),
            &code,
            "bob@example.com",
            &opts,
            later,
        )
        .unwrap();
        prop_assert!(ok);
    }
}

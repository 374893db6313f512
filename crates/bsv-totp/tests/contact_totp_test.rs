//! Two-party pairing scenarios.

use bsv_primitives::bip32::{derive_pki_key, ExtendedKey, Network};
use bsv_totp::{
    generate_totp_for_contact, generate_totp_for_contact_at, validate_totp_for_contact,
    validate_totp_for_contact_at, Contact, TotpError, TotpOptions,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const ALICE_PAYMAIL: &str = "alice@example.com";
const BOB_PAYMAIL: &str = "bob@example.com";
const T: u64 = 1_700_000_000;

struct Party {
    root: ExtendedKey,
    contact: Contact,
}

fn party(seed: u64, paymail: &str) -> Party {
    let root = ExtendedKey::generate(&mut StdRng::seed_from_u64(seed), Network::Mainnet).unwrap();
    let pub_key = derive_pki_key(&root).unwrap().public_key().to_hex();
    Party {
        root,
        contact: Contact::new(pub_key, paymail),
    }
}

#[test]
fn test_round_trip_hour_window() {
    let alice = party(1, ALICE_PAYMAIL);
    let bob = party(2, BOB_PAYMAIL);
    let opts = TotpOptions::new(3600, 6);

    let code = generate_totp_for_contact_at(&alice.root, &bob.contact, &opts, T).unwrap();
    assert_eq!(code.len(), 6);
    assert!(validate_totp_for_contact_at(&bob.root, &alice.contact, &code, BOB_PAYMAIL, &opts, T + 10).unwrap());
}

#[test]
fn test_round_trip_with_clock() {
    let alice = party(3, ALICE_PAYMAIL);
    let bob = party(4, BOB_PAYMAIL);
    let opts = TotpOptions::new(3600, 6);

    // An hour-long window makes a boundary crossing between the two calls
    // vanishingly unlikely.
    let code = generate_totp_for_contact(&alice.root, &bob.contact, &opts).unwrap();
    assert!(validate_totp_for_contact(&bob.root, &alice.contact, &code, BOB_PAYMAIL, &opts).unwrap());
}

#[test]
fn test_code_expires_after_window() {
    let alice = party(5, ALICE_PAYMAIL);
    let bob = party(6, BOB_PAYMAIL);
    let opts = TotpOptions::new(30, 6);
    let t = T - T % 30;

    let code = generate_totp_for_contact_at(&alice.root, &bob.contact, &opts, t).unwrap();
    assert!(validate_totp_for_contact_at(&bob.root, &alice.contact, &code, BOB_PAYMAIL, &opts, t).unwrap());
    assert!(!validate_totp_for_contact_at(
        &bob.root,
        &alice.contact,
        &code,
        BOB_PAYMAIL,
        &opts,
        t + opts.period() + 1
    )
    .unwrap());
}

#[test]
fn test_direction_matters() {
    let alice = party(7, ALICE_PAYMAIL);
    let bob = party(8, BOB_PAYMAIL);
    let opts = TotpOptions::new(3600, 8);

    let alice_to_bob = generate_totp_for_contact_at(&alice.root, &bob.contact, &opts, T).unwrap();
    let bob_to_alice = generate_totp_for_contact_at(&bob.root, &alice.contact, &opts, T).unwrap();
    assert_ne!(alice_to_bob, bob_to_alice);

    // Directing with the wrong paymail does not validate.
    assert!(!validate_totp_for_contact_at(&bob.root, &alice.contact, &alice_to_bob, ALICE_PAYMAIL, &opts, T).unwrap());
    assert!(validate_totp_for_contact_at(&alice.root, &bob.contact, &bob_to_alice, ALICE_PAYMAIL, &opts, T).unwrap());
}

#[test]
fn test_third_party_cannot_validate() {
    let alice = party(9, ALICE_PAYMAIL);
    let bob = party(10, BOB_PAYMAIL);
    let mallory = party(11, "mallory@example.com");
    let opts = TotpOptions::new(3600, 8);

    let code = generate_totp_for_contact_at(&alice.root, &bob.contact, &opts, T).unwrap();
    assert!(!validate_totp_for_contact_at(&mallory.root, &alice.contact, &code, BOB_PAYMAIL, &opts, T).unwrap());
}

#[test]
fn test_invalid_contact_key_rejected() {
    let alice = party(12, ALICE_PAYMAIL);
    let bogus = Contact::new("invalid-pk-format", BOB_PAYMAIL);
    let opts = TotpOptions::default();

    assert!(matches!(
        generate_totp_for_contact_at(&alice.root, &bogus, &opts, T),
        Err(TotpError::InvalidContactPubKey(_))
    ));
    assert!(matches!(
        validate_totp_for_contact_at(&alice.root, &bogus, "00", BOB_PAYMAIL, &opts, T),
        Err(TotpError::InvalidContactPubKey(_))
    ));
}

#[test]
fn test_default_options_give_two_digits() {
    let alice = party(13, ALICE_PAYMAIL);
    let bob = party(14, BOB_PAYMAIL);
    let code = generate_totp_for_contact_at(&alice.root, &bob.contact, &TotpOptions::default(), T).unwrap();
    assert_eq!(code.len(), 2);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
}

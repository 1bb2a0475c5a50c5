//! End-to-end roundtrip behavior for a single unit.

use fieldvault::{EncryptableUnit, FieldvaultError, Vault};

fn key(byte: &str) -> String {
    byte.repeat(32)
}

#[test]
fn test_single_key_roundtrip() {
    // The reference scenario: one key group holding one key.

    let vault = Vault::new();
    vault.set_key_group("internal", vec![key("a1")]).unwrap();

    let mut unit = EncryptableUnit::new("hello");

    // 1. Encrypt: level reaches 1, body is rewritten.
    vault.encrypt(&mut unit).unwrap();
    assert_eq!(unit.level("internal"), 1);
    assert_ne!(unit.body, "hello");

    // The body is hex-encoded nonce || ciphertext.
    assert!(hex::decode(&unit.body).is_ok());

    // 2. Not upgradeable: configured key count (1) == level (1).
    assert!(!vault.upgradeable(&mut unit).unwrap());

    // 3. Decrypt: plaintext is restored exactly.
    vault.decrypt(&mut unit).unwrap();
    assert_eq!(unit.body, "hello");

    // 4. Still not upgradeable after decryption — the level stays recorded.
    assert!(!vault.upgradeable(&mut unit).unwrap());
}

#[test]
fn test_multi_key_roundtrip() {
    let vault = Vault::new();
    vault
        .set_key_group("internal", vec![key("a1"), key("b2"), key("c3")])
        .unwrap();

    let mut unit = EncryptableUnit::new("padded payload with some length to it");
    vault.encrypt(&mut unit).unwrap();
    assert_eq!(unit.level("internal"), 3);

    vault.decrypt(&mut unit).unwrap();
    assert_eq!(unit.body, "padded payload with some length to it");
}

#[test]
fn test_two_groups_apply_and_peel_in_order() {
    // Two independent layers: "internal" seals first, "external" seals on
    // top. Decryption must peel external before internal.

    let vault = Vault::with_groups(
        [
            ("internal".to_string(), vec![key("a1")]),
            ("external".to_string(), vec![key("b2"), key("c3")]),
        ],
        None,
        None,
    )
    .unwrap();

    let mut unit = EncryptableUnit::new("layered");
    vault.encrypt(&mut unit).unwrap();
    assert_eq!(unit.level("internal"), 1);
    assert_eq!(unit.level("external"), 2);

    vault.decrypt(&mut unit).unwrap();
    assert_eq!(unit.body, "layered");
}

#[test]
fn test_tampered_body_aborts_with_authentication_error() {
    let vault = Vault::new();
    vault.set_key_group("internal", vec![key("a1")]).unwrap();

    let mut unit = EncryptableUnit::new("hello");
    vault.encrypt(&mut unit).unwrap();

    // Flip one hex digit of the sealed payload.
    let mut tampered: Vec<char> = unit.body.chars().collect();
    let last = tampered.len() - 1;
    tampered[last] = if tampered[last] == '0' { '1' } else { '0' };
    unit.body = tampered.into_iter().collect();

    assert!(matches!(
        vault.decrypt(&mut unit),
        Err(FieldvaultError::AuthenticationFailed)
    ));
}

#[test]
fn test_non_hex_body_is_malformed() {
    let vault = Vault::new();
    vault.set_key_group("internal", vec![key("a1")]).unwrap();

    let mut unit = EncryptableUnit::new("was never encrypted");
    unit.set_level("internal", 1);

    assert!(matches!(
        vault.decrypt(&mut unit),
        Err(FieldvaultError::MalformedCiphertext)
    ));
}

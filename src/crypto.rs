//! Low-level symmetric operations.
//!
//! This module is the only place in the crate that imports `ring`. All other
//! modules perform authenticated encryption exclusively through the
//! functions exposed here.
//!
//! Primitive choices:
//! - **Cipher**: AES-256-GCM (authenticated encryption)
//! - **Nonce**: 96-bit (12 bytes), generated fresh per operation via `SystemRandom`
//! - **Key size**: 256 bits (32 bytes)

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::FieldvaultError;

/// The AEAD algorithm used throughout fieldvault.
const ALGORITHM: &ring::aead::Algorithm = &AES_256_GCM;

/// Size of the nonce in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Size of a symmetric or derived key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Generate a fresh random nonce for a single seal operation.
///
/// Uses `ring::rand::SystemRandom` — the only source of symmetric randomness
/// in the crate. There is no nonce caching or counter-based generation.
fn generate_nonce() -> Result<[u8; NONCE_LEN], FieldvaultError> {
    let rng = SystemRandom::new();
    let mut buf = [0u8; NONCE_LEN];
    rng.fill(&mut buf)
        .map_err(|_| FieldvaultError::NonceGenerationFailed)?;
    Ok(buf)
}

/// Encrypt a plaintext payload using AES-256-GCM.
///
/// Returns the nonce prepended to the ciphertext. The caller does not need
/// to manage the nonce separately — it is bundled with the output and
/// extracted automatically during [`open`].
///
/// # Layout of returned bytes
/// ```text
/// [ nonce (12 bytes) ][ ciphertext + GCM tag ]
/// ```
pub fn seal(key_bytes: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>, FieldvaultError> {
    let unbound =
        UnboundKey::new(ALGORITHM, key_bytes).map_err(|_| FieldvaultError::InvalidKeySize)?;
    let key = LessSafeKey::new(unbound);

    let nonce_bytes = generate_nonce()?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| FieldvaultError::EncryptionFailed)?;

    let mut output = Vec::with_capacity(NONCE_LEN + in_out.len());
    output.extend_from_slice(&nonce_bytes);
    output.extend_from_slice(&in_out);
    Ok(output)
}

/// Decrypt a ciphertext payload using AES-256-GCM.
///
/// Expects the input to be in the layout produced by [`seal`]: nonce
/// (12 bytes) followed by ciphertext and GCM tag.
///
/// If the key is wrong or the ciphertext has been tampered with, the GCM
/// authentication check fails and this function returns an error. The caller
/// receives no partial plaintext.
pub fn open(key_bytes: &[u8; KEY_LEN], ciphertext: &[u8]) -> Result<Vec<u8>, FieldvaultError> {
    if ciphertext.len() < NONCE_LEN {
        return Err(FieldvaultError::MalformedCiphertext);
    }

    let nonce_bytes: [u8; NONCE_LEN] = ciphertext[..NONCE_LEN]
        .try_into()
        .map_err(|_| FieldvaultError::MalformedCiphertext)?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let unbound =
        UnboundKey::new(ALGORITHM, key_bytes).map_err(|_| FieldvaultError::InvalidKeySize)?;
    let key = LessSafeKey::new(unbound);

    let mut payload = ciphertext[NONCE_LEN..].to_vec();
    let plaintext = key
        .open_in_place(nonce, Aad::empty(), &mut payload)
        .map_err(|_| FieldvaultError::AuthenticationFailed)?;

    Ok(plaintext.to_vec())
}

/// Generate a cryptographically secure random key.
///
/// This is the only function in the crate that produces raw symmetric key
/// material from scratch. It backs `generate_symmetric_key()` in the public
/// API.
pub fn generate_random_key() -> Result<[u8; KEY_LEN], FieldvaultError> {
    let rng = SystemRandom::new();
    let mut key = [0u8; KEY_LEN];
    rng.fill(&mut key)
        .map_err(|_| FieldvaultError::NonceGenerationFailed)?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_roundtrip() {
        let key = [7u8; KEY_LEN];
        let sealed = seal(&key, b"field data").unwrap();
        assert_eq!(open(&key, &sealed).unwrap(), b"field data");
    }

    #[test]
    fn test_nonce_prefix_makes_output_unique() {
        let key = [7u8; KEY_LEN];
        let a = seal(&key, b"same input").unwrap();
        let b = seal(&key, b"same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let sealed = seal(&[1u8; KEY_LEN], b"secret").unwrap();
        assert!(matches!(
            open(&[2u8; KEY_LEN], &sealed),
            Err(FieldvaultError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let key = [9u8; KEY_LEN];
        let mut sealed = seal(&key, b"secret").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xff;
        assert!(matches!(
            open(&key, &sealed),
            Err(FieldvaultError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_truncated_input_rejected() {
        let key = [3u8; KEY_LEN];
        assert!(matches!(
            open(&key, &[0u8; NONCE_LEN - 1]),
            Err(FieldvaultError::MalformedCiphertext)
        ));
    }
}

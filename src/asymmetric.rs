//! Optional asymmetric pre-encryption layer.
//!
//! Units can be wrapped with a caller-supplied RSA public key before the
//! symmetric layers are applied, so plaintext recovery additionally requires
//! the matching private key. Padding is OAEP with SHA-256.
//!
//! This module is the only place in the crate that imports `rsa`. The engine
//! applies [`wrap`] before sealing and [`unwrap`] after opening, and only
//! when the corresponding half of the key pair is configured.

use rand::rngs::OsRng;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::error::FieldvaultError;

/// Encrypt a plaintext payload under an RSA public key (OAEP, SHA-256).
///
/// The output is raw padded ciphertext; the engine hex-encodes it before
/// storing it in a unit body.
pub fn wrap(public_key: &RsaPublicKey, plaintext: &[u8]) -> Result<Vec<u8>, FieldvaultError> {
    public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext)
        .map_err(|_| FieldvaultError::EncryptionFailed)
}

/// Decrypt an OAEP ciphertext under the matching RSA private key.
///
/// Fails with [`FieldvaultError::DecryptionFailed`] if the padding does not
/// validate — wrong key or corrupted input.
pub fn unwrap(private_key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>, FieldvaultError> {
    private_key
        .decrypt(Oaep::new::<Sha256>(), ciphertext)
        .map_err(|_| FieldvaultError::DecryptionFailed)
}

/// Generate an RSA key pair of the given modulus size in bits.
///
/// Key pairs are caller-owned: the crate never persists them. 2048 bits is a
/// reasonable floor for new deployments.
pub fn generate_key_pair(
    bits: usize,
) -> Result<(RsaPrivateKey, RsaPublicKey), FieldvaultError> {
    let private = RsaPrivateKey::new(&mut OsRng, bits)
        .map_err(|_| FieldvaultError::EncryptionFailed)?;
    let public = RsaPublicKey::from(&private);
    Ok((private, public))
}

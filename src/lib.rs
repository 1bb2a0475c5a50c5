//! # fieldvault
//!
//! Transparent field-level layered encryption for nested application data.
//!
//! A record marks its protected content as [`EncryptableUnit`] fields —
//! direct, nested, or inside keyed collections — and implements
//! [`Encryptable`] to expose them. A [`Vault`] then encrypts, decrypts, and
//! inspects those units in place, tracking per unit how many keys of each
//! named group were folded into the key protecting it (its *level*), so
//! content stays decryptable across key rotation and can be flagged as
//! stale when new keys arrive.
//!
//! Layers, inside-out: optional RSA-OAEP wrapping under a caller-supplied
//! public key, then one AES-256-GCM pass per key group, each under that
//! group's XOR-folded derived key.
//!
//! ## Public API
//!
//! The public surface of this crate is intentionally narrow. Only the types
//! and functions listed here are intended for use by callers. Everything
//! else is `pub(crate)` at most.
//!
//! ```
//! use fieldvault::{EncryptableUnit, Vault};
//!
//! # fn main() -> Result<(), fieldvault::FieldvaultError> {
//! let vault = Vault::new();
//! vault.set_key_group("internal", vec![fieldvault::generate_symmetric_key()?])?;
//!
//! let mut email = EncryptableUnit::new("user@example.com");
//! vault.encrypt(&mut email)?;
//! assert_eq!(email.level("internal"), 1);
//!
//! vault.decrypt(&mut email)?;
//! assert_eq!(email.body, "user@example.com");
//! # Ok(())
//! # }
//! ```

// Module declarations.
pub(crate) mod asymmetric;
pub mod combine;
pub(crate) mod crypto;
pub mod engine;
pub mod error;
pub mod keys;
pub mod traverse;
pub mod unit;

pub use engine::Vault;
pub use error::FieldvaultError;
pub use keys::KeyGroup;
pub use traverse::{Encryptable, UnitVisitor};
pub use unit::EncryptableUnit;

// Key pairs are caller-owned; the `rsa` types are part of the public API.
pub use rsa::{RsaPrivateKey, RsaPublicKey};

/// Generate a cryptographically secure symmetric key in the crate's key
/// format: 32 random bytes, hex-encoded to 64 characters.
///
/// This is the only entry point for producing symmetric key material. In
/// production, callers should source keys from a dedicated KMS rather than
/// generating them locally.
pub fn generate_symmetric_key() -> Result<String, FieldvaultError> {
    let bytes = crypto::generate_random_key()?;
    Ok(hex::encode(bytes))
}

/// Generate an RSA key pair for the asymmetric layer.
///
/// The private key stays with the party allowed to decrypt; the public key
/// can be handed to any encrypting party.
pub fn generate_key_pair(
    bits: usize,
) -> Result<(RsaPrivateKey, RsaPublicKey), FieldvaultError> {
    asymmetric::generate_key_pair(bits)
}

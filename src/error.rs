//! Error types for fieldvault.
//!
//! Every error variant is a distinct failure mode in the encryption engine.
//! Error messages are intentionally minimal — they signal *what* failed
//! without revealing *why* in ways that could leak cryptographic state.

use std::fmt;

/// The single error type for all fieldvault operations.
#[derive(Debug)]
pub enum FieldvaultError {
    /// A key list was empty where at least one key is required.
    InvalidKeyCount,

    /// A requested derivation level was zero or exceeded the number of
    /// keys in the group.
    InvalidLevel,

    /// A key was malformed: not valid hex, or its length did not match the
    /// other keys in the group / the cipher's expected key size.
    InvalidKeySize,

    /// Key combination produced output of the wrong length. Guards against
    /// silently deriving a weak key from malformed input.
    InvalidDerivedKeyLength,

    /// Exclusive access to a walk target could not be obtained (e.g. a
    /// poisoned lock guarding the record or the engine's key state).
    InvalidTarget,

    /// Encryption failed. The underlying cipher operation returned an error.
    EncryptionFailed,

    /// Symmetric decryption failed authentication. This includes: wrong key,
    /// tampered ciphertext, or a corrupted GCM tag.
    AuthenticationFailed,

    /// A ciphertext was not in the expected layout: too short to hold a
    /// nonce, not valid hex, or decrypted bytes that are not valid UTF-8.
    MalformedCiphertext,

    /// The system's random number generator failed to produce bytes.
    NonceGenerationFailed,

    /// Asymmetric decryption failed (padding or validation error).
    DecryptionFailed,

    /// A key group was rejected at assignment time: blank key, non-hex key,
    /// unequal key lengths, or an empty group name.
    InvalidKeyGroup(String),
}

impl fmt::Display for FieldvaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKeyCount => write!(f, "invalid number of keys: 0"),
            Self::InvalidLevel => write!(f, "invalid encryption level"),
            Self::InvalidKeySize => write!(f, "invalid key size"),
            Self::InvalidDerivedKeyLength => write!(f, "derived key has invalid length"),
            Self::InvalidTarget => write!(f, "cannot obtain exclusive access to target"),
            Self::EncryptionFailed => write!(f, "encryption failed"),
            Self::AuthenticationFailed => write!(f, "ciphertext authentication failed"),
            Self::MalformedCiphertext => write!(f, "malformed ciphertext"),
            Self::NonceGenerationFailed => write!(f, "randomness source failed"),
            Self::DecryptionFailed => write!(f, "asymmetric decryption failed"),
            Self::InvalidKeyGroup(name) => write!(f, "invalid key group: {}", name),
        }
    }
}

impl std::error::Error for FieldvaultError {}

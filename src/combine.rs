//! Key combination.
//!
//! Folds an ordered list of symmetric keys into a single derived key by
//! XOR-ing their raw bytes, up to a requested level. The level is the
//! number of keys folded in, which makes the scheme rotation-friendly:
//!
//! - Appending a new key to the list and keeping the level unchanged
//!   reproduces the old derived key exactly.
//! - Raising the level to include the new key produces a new derived key.
//!
//! Combination is a pure function of the key-list prefix: for any list
//! extended past index `level - 1`, `combine(&keys[..level], level)` and
//! `combine(keys, level)` are identical. Content encrypted under an older,
//! shorter key list stays decryptable by re-deriving at its recorded level.

use crate::crypto::KEY_LEN;
use crate::error::FieldvaultError;

/// Length of a hex-encoded key: 32 raw bytes, 64 hex characters.
pub const HEX_KEY_LEN: usize = KEY_LEN * 2;

/// Fold the first `level` keys of an ordered list into one derived key.
///
/// Keys are hex-encoded strings of identical length. The first key seeds the
/// accumulator; each subsequent key up to `level` is XOR-ed in byte-wise.
/// Returns the derived key hex-encoded.
///
/// # Errors
/// - [`FieldvaultError::InvalidKeyCount`] if `keys` is empty.
/// - [`FieldvaultError::InvalidLevel`] if `level` is zero or exceeds the
///   number of keys.
/// - [`FieldvaultError::InvalidKeySize`] if any key is not valid hex or the
///   key lengths disagree.
/// - [`FieldvaultError::InvalidDerivedKeyLength`] if the output is not
///   exactly [`HEX_KEY_LEN`] characters.
pub fn combine(keys: &[String], level: usize) -> Result<String, FieldvaultError> {
    if keys.is_empty() {
        return Err(FieldvaultError::InvalidKeyCount);
    }
    if level == 0 || level > keys.len() {
        return Err(FieldvaultError::InvalidLevel);
    }

    // Degenerate case: a single key at level 1 needs no fold.
    if keys.len() == 1 && level == 1 {
        return check_length(keys[0].clone());
    }

    let mut accumulator =
        hex::decode(&keys[0]).map_err(|_| FieldvaultError::InvalidKeySize)?;

    for key in &keys[1..level] {
        let raw = hex::decode(key).map_err(|_| FieldvaultError::InvalidKeySize)?;
        if raw.len() != accumulator.len() {
            return Err(FieldvaultError::InvalidKeySize);
        }
        for (acc, byte) in accumulator.iter_mut().zip(raw.iter()) {
            *acc ^= byte;
        }
    }

    check_length(hex::encode(accumulator))
}

/// Reject derived keys that do not match the fixed key length.
fn check_length(derived: String) -> Result<String, FieldvaultError> {
    if derived.len() != HEX_KEY_LEN {
        return Err(FieldvaultError::InvalidDerivedKeyLength);
    }
    Ok(derived)
}

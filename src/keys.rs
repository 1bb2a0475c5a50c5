//! Key groups and derived-key ownership.
//!
//! A [`KeyGroup`] is a named, ordered list of equal-length symmetric keys.
//! The group's working key — all keys folded together — is computed once at
//! assignment time and cached until the group is replaced. Historical keys
//! (for content encrypted under a shorter, earlier key list) are re-derived
//! on demand from the recorded level.
//!
//! Validation happens up front: a group containing a blank or malformed key
//! is rejected whole rather than silently compacted.
//!
//! Raw derived key bytes never leave the crate. They are held in a
//! [`DerivedKey`] that is zeroised on drop.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::combine;
use crate::crypto::KEY_LEN;
use crate::error::FieldvaultError;

/// Raw bytes of a derived key, overwritten before deallocation.
///
/// Not `Clone`. Each value is scoped to the group (or the single decrypt
/// operation) that derived it.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    fn from_hex(hex_key: &str) -> Result<Self, FieldvaultError> {
        let raw = hex::decode(hex_key).map_err(|_| FieldvaultError::InvalidKeySize)?;
        let bytes: [u8; KEY_LEN] = raw
            .try_into()
            .map_err(|_| FieldvaultError::InvalidDerivedKeyLength)?;
        Ok(Self { bytes })
    }

    /// Borrow the raw key bytes for use in seal/open operations.
    ///
    /// `pub(crate)` — raw bytes never leave the crate.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// A named, ordered set of symmetric keys with a cached derived key.
pub struct KeyGroup {
    name: String,
    keys: Vec<String>,
    derived_hex: Option<String>,
    derived: Option<DerivedKey>,
}

impl KeyGroup {
    /// Validate a key list and build a group with its derived key cached.
    ///
    /// An empty key list is valid and means "no keys currently held" — the
    /// engine then skips this group's layer during decryption rather than
    /// failing. A list containing a blank, non-hex, or odd-length key is
    /// rejected whole with [`FieldvaultError::InvalidKeyGroup`]; key
    /// combination failures surface as the underlying error.
    pub fn new(name: impl Into<String>, keys: Vec<String>) -> Result<Self, FieldvaultError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FieldvaultError::InvalidKeyGroup(name));
        }
        for key in &keys {
            if key.trim().is_empty() || hex::decode(key).is_err() {
                return Err(FieldvaultError::InvalidKeyGroup(name));
            }
        }
        if keys.windows(2).any(|pair| pair[0].len() != pair[1].len()) {
            return Err(FieldvaultError::InvalidKeyGroup(name));
        }

        let (derived_hex, derived) = if keys.is_empty() {
            (None, None)
        } else {
            let hex_key = combine::combine(&keys, keys.len())?;
            let raw = DerivedKey::from_hex(&hex_key)?;
            (Some(hex_key), Some(raw))
        };

        Ok(Self {
            name,
            keys,
            derived_hex,
            derived,
        })
    }

    /// The group's logical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configured keys, in combination order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The cached fully-combined derived key, hex-encoded. `None` when the
    /// group holds no keys.
    pub fn derived_hex(&self) -> Option<&str> {
        self.derived_hex.as_deref()
    }

    /// The cached fully-combined derived key bytes.
    pub(crate) fn derived(&self) -> Option<&DerivedKey> {
        self.derived.as_ref()
    }

    /// Derive the key that protected content at a recorded level.
    ///
    /// The full-level key comes from the cache; shorter prefixes are
    /// re-combined on demand.
    pub(crate) fn key_at_level(&self, level: u32) -> Result<DerivedKey, FieldvaultError> {
        let level = level as usize;
        if level == self.keys.len() {
            if let Some(cached) = &self.derived_hex {
                return DerivedKey::from_hex(cached);
            }
        }
        let hex_key = combine::combine(&self.keys, level)?;
        DerivedKey::from_hex(&hex_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::HEX_KEY_LEN;

    fn key(byte: &str) -> String {
        byte.repeat(KEY_LEN)
    }

    #[test]
    fn test_blank_key_rejects_whole_group() {
        let result = KeyGroup::new("internal", vec![key("a1"), "   ".to_string()]);
        assert!(matches!(result, Err(FieldvaultError::InvalidKeyGroup(_))));
    }

    #[test]
    fn test_non_hex_key_rejected() {
        let result = KeyGroup::new("internal", vec!["zz".repeat(KEY_LEN)]);
        assert!(matches!(result, Err(FieldvaultError::InvalidKeyGroup(_))));
    }

    #[test]
    fn test_unequal_lengths_rejected() {
        let result = KeyGroup::new("internal", vec![key("a1"), "b2b2".to_string()]);
        assert!(matches!(result, Err(FieldvaultError::InvalidKeyGroup(_))));
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = KeyGroup::new("  ", vec![key("a1")]);
        assert!(matches!(result, Err(FieldvaultError::InvalidKeyGroup(_))));
    }

    #[test]
    fn test_empty_group_holds_no_derived_key() {
        let group = KeyGroup::new("external", Vec::new()).unwrap();
        assert!(group.derived_hex().is_none());
        assert!(group.keys().is_empty());
    }

    #[test]
    fn test_derived_key_cached_at_full_level() {
        let group = KeyGroup::new("internal", vec![key("a1"), key("b2")]).unwrap();
        let cached = group.derived_hex().unwrap().to_string();
        assert_eq!(cached.len(), HEX_KEY_LEN);
        assert_eq!(cached, key("13"));

        let rederived = group.key_at_level(2).unwrap();
        assert_eq!(hex::encode(rederived.as_bytes()), cached);
    }

    #[test]
    fn test_historical_level_rederived() {
        let group = KeyGroup::new("internal", vec![key("a1"), key("b2")]).unwrap();
        let level_one = group.key_at_level(1).unwrap();
        assert_eq!(hex::encode(level_one.as_bytes()), key("a1"));
    }
}

//! The protected-content data model.
//!
//! An [`EncryptableUnit`] is the atomic piece of content the engine looks
//! for while walking a record: an opaque body plus the metadata needed to
//! reverse whatever layers protect its stored form.
//!
//! A freshly created unit holds plaintext with every group level at zero
//! and the asymmetric flag clear. Encryption rewrites the body to
//! hex-encoded ciphertext and records, per key group, the level reached.
//! The levels survive an in-place decrypt — they describe the protection
//! the stored form carries and feed the upgrade check — and are reset only
//! by the zero-metadata operation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One piece of protected content embedded in a caller record.
///
/// `levels` maps key-group name to the number of keys folded into the
/// derived key that currently protects the body under that group. An absent
/// entry is level 0. Entries are removed when reset to zero so serialized
/// metadata stays minimal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptableUnit {
    /// Plaintext when unencrypted, hex-encoded ciphertext when encrypted.
    pub body: String,

    /// Per-group encryption level.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub levels: BTreeMap<String, u32>,

    /// Whether the body was additionally wrapped by the asymmetric layer.
    #[serde(default)]
    pub asymmetric_encrypted: bool,
}

impl EncryptableUnit {
    /// Create an unencrypted unit holding `body` as plaintext.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            levels: BTreeMap::new(),
            asymmetric_encrypted: false,
        }
    }

    /// The recorded level for a key group. Absent entries are level 0.
    pub fn level(&self, group: &str) -> u32 {
        self.levels.get(group).copied().unwrap_or(0)
    }

    /// Record the level reached for a key group. Setting level 0 removes
    /// the entry.
    pub fn set_level(&mut self, group: &str, level: u32) {
        if level == 0 {
            self.levels.remove(group);
        } else {
            self.levels.insert(group.to_string(), level);
        }
    }

    /// Reset every group level to zero. The body is left untouched.
    pub fn clear_levels(&mut self) {
        self.levels.clear();
    }
}

impl From<&str> for EncryptableUnit {
    fn from(body: &str) -> Self {
        Self::new(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_unit_is_unprotected() {
        let unit = EncryptableUnit::new("hello");
        assert!(unit.levels.is_empty());
        assert!(!unit.asymmetric_encrypted);
        assert_eq!(unit.level("internal"), 0);
    }

    #[test]
    fn test_level_zero_removes_entry() {
        let mut unit = EncryptableUnit::new("hello");
        unit.set_level("internal", 2);
        assert_eq!(unit.level("internal"), 2);
        unit.set_level("internal", 0);
        assert!(unit.levels.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let mut unit = EncryptableUnit::new("deadbeef");
        unit.set_level("internal", 1);
        unit.asymmetric_encrypted = true;

        let json = serde_json::to_value(&unit).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "body": "deadbeef",
                "levels": { "internal": 1 },
                "asymmetric_encrypted": true,
            })
        );
    }

    #[test]
    fn test_deserialize_defaults() {
        // Records persisted before encryption carry only the body.
        let unit: EncryptableUnit = serde_json::from_str(r#"{"body":"hello"}"#).unwrap();
        assert_eq!(unit, EncryptableUnit::new("hello"));
    }
}

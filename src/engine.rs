//! The engine facade.
//!
//! [`Vault`] owns the key configuration — an ordered list of key groups and
//! an optional RSA key pair — and drives the generic walk, dispatching one
//! of the per-unit transforms (encrypt, decrypt, upgrade-check, zero) to
//! every unit the walk discovers.
//!
//! Group order is assignment order and is significant: encryption applies
//! groups first-to-last, decryption peels them last-to-first. Key state sits
//! behind a read-write lock so that many records can be transformed
//! concurrently against a stable configuration while `set_key_group`
//! replaces a group exclusively.
//!
//! Transforms are not transactional: an error on a nested unit aborts the
//! walk, and sibling units already rewritten stay rewritten.

use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::sync::RwLock;

use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::asymmetric;
use crate::crypto;
use crate::error::FieldvaultError;
use crate::keys::KeyGroup;
use crate::traverse::Encryptable;
use crate::unit::EncryptableUnit;

/// Field-level encryption engine.
///
/// Holds no persistent state: keys live in memory for the lifetime of the
/// value and are supplied by the caller at construction or via
/// [`Vault::set_key_group`].
pub struct Vault {
    groups: RwLock<Vec<KeyGroup>>,
    public_key: Option<RsaPublicKey>,
    private_key: Option<RsaPrivateKey>,
}

impl Default for Vault {
    fn default() -> Self {
        Self::new()
    }
}

impl Vault {
    /// An engine with no keys configured. Walk operations are no-ops on
    /// unit bodies until a key group or key pair is supplied.
    pub fn new() -> Self {
        Self::with_key_pair(None, None)
    }

    /// An engine with an optional asymmetric key pair and no key groups.
    ///
    /// Either half may be supplied alone: a holder of only the public key
    /// can encrypt, a holder of only the private key can decrypt.
    pub fn with_key_pair(
        public_key: Option<RsaPublicKey>,
        private_key: Option<RsaPrivateKey>,
    ) -> Self {
        Self {
            groups: RwLock::new(Vec::new()),
            public_key,
            private_key,
        }
    }

    /// An engine with key groups assigned up front, in encryption order.
    ///
    /// Fails with [`FieldvaultError::InvalidKeyGroup`] (or a key-combination
    /// error) if any group is rejected by validation.
    pub fn with_groups(
        groups: impl IntoIterator<Item = (String, Vec<String>)>,
        public_key: Option<RsaPublicKey>,
        private_key: Option<RsaPrivateKey>,
    ) -> Result<Self, FieldvaultError> {
        let vault = Self::with_key_pair(public_key, private_key);
        for (name, keys) in groups {
            vault.set_key_group(&name, keys)?;
        }
        Ok(vault)
    }

    /// Assign or replace a key group.
    ///
    /// The whole list is validated before anything changes; a blank or
    /// malformed key rejects the assignment with
    /// [`FieldvaultError::InvalidKeyGroup`] rather than being dropped. The
    /// group's fully-combined derived key is recomputed and cached. A group
    /// reassigned under an existing name keeps its position in the
    /// encryption order; a new name appends.
    ///
    /// An empty key list is accepted and means "no keys currently held":
    /// the group's layer is skipped during both encryption and decryption.
    pub fn set_key_group(&self, name: &str, keys: Vec<String>) -> Result<(), FieldvaultError> {
        let group = KeyGroup::new(name, keys)?;
        let mut groups = self
            .groups
            .write()
            .map_err(|_| FieldvaultError::InvalidTarget)?;
        match groups.iter_mut().find(|existing| existing.name() == name) {
            Some(slot) => *slot = group,
            None => groups.push(group),
        }
        Ok(())
    }

    /// The keys and cached derived key of a group, if the group exists.
    pub fn key_group(&self, name: &str) -> Option<(Vec<String>, Option<String>)> {
        let groups = self.groups.read().ok()?;
        let group = groups.iter().find(|group| group.name() == name)?;
        Some((
            group.keys().to_vec(),
            group.derived_hex().map(str::to_string),
        ))
    }

    /// Encrypt every unit reachable inside `root`, in place.
    ///
    /// Per unit: an empty body is left untouched; otherwise the body is
    /// OAEP-wrapped first when a public key is configured, then sealed once
    /// per key group (in group order) under that group's fully-combined
    /// derived key, recording the level reached.
    pub fn encrypt<T: Encryptable + ?Sized>(&self, root: &mut T) -> Result<(), FieldvaultError> {
        let groups = self
            .groups
            .read()
            .map_err(|_| FieldvaultError::InvalidTarget)?;
        root.walk_units(&mut |unit| {
            self.encrypt_unit(&groups, unit)?;
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(())
    }

    /// Decrypt every unit reachable inside `root`, in place.
    ///
    /// Layers peel in reverse: key groups last-to-first, each at the unit's
    /// *recorded* level (so content sealed under an earlier, shorter key
    /// list still opens), then the asymmetric layer when the flag is set
    /// and a private key is configured.
    ///
    /// Level counters are left as recorded — they describe the protection
    /// the unit's stored form carries and feed the upgrade check. Use
    /// [`Vault::zero_metadata`] to reset them.
    ///
    /// A group with zero configured keys is skipped even when the unit
    /// records a nonzero level for it — you cannot decrypt what you hold no
    /// key for, and that is not an error. The unit's body and level for
    /// that layer are left untouched.
    pub fn decrypt<T: Encryptable + ?Sized>(&self, root: &mut T) -> Result<(), FieldvaultError> {
        let groups = self
            .groups
            .read()
            .map_err(|_| FieldvaultError::InvalidTarget)?;
        root.walk_units(&mut |unit| {
            self.decrypt_unit(&groups, unit)?;
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(())
    }

    /// Whether any unit inside `root` could benefit from re-encryption.
    ///
    /// True iff some unit has a non-empty body and some configured group
    /// now holds more keys than the unit's recorded level for that group.
    /// Short-circuits on the first stale unit found.
    pub fn upgradeable<T: Encryptable + ?Sized>(
        &self,
        root: &mut T,
    ) -> Result<bool, FieldvaultError> {
        let groups = self
            .groups
            .read()
            .map_err(|_| FieldvaultError::InvalidTarget)?;
        let flow = root.walk_units(&mut |unit| {
            let stale = !unit.body.is_empty()
                && groups
                    .iter()
                    .any(|group| group.keys().len() as u32 > unit.level(group.name()));
            if stale {
                Ok(ControlFlow::Break(()))
            } else {
                Ok(ControlFlow::Continue(()))
            }
        })?;
        Ok(flow.is_break())
    }

    /// Reset the level counters of every unit inside `root` to zero.
    ///
    /// Bodies are not touched and no cryptographic operation runs: the
    /// units are simply marked as not decryptable under the current policy.
    pub fn zero_metadata<T: Encryptable + ?Sized>(
        &self,
        root: &mut T,
    ) -> Result<(), FieldvaultError> {
        root.walk_units(&mut |unit| {
            unit.clear_levels();
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(())
    }

    /// The maximum recorded level per key group across all units in `root`.
    ///
    /// Groups that appear on units but are no longer configured are still
    /// reported; units with no levels contribute nothing.
    pub fn encryption_level<T: Encryptable + ?Sized>(
        &self,
        root: &mut T,
    ) -> Result<BTreeMap<String, u32>, FieldvaultError> {
        let mut levels: BTreeMap<String, u32> = BTreeMap::new();
        root.walk_units(&mut |unit| {
            for (group, level) in &unit.levels {
                let entry = levels.entry(group.clone()).or_insert(0);
                *entry = (*entry).max(*level);
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(levels)
    }

    fn encrypt_unit(
        &self,
        groups: &[KeyGroup],
        unit: &mut EncryptableUnit,
    ) -> Result<(), FieldvaultError> {
        if unit.body.is_empty() {
            return Ok(());
        }

        if let Some(public_key) = &self.public_key {
            let wrapped = asymmetric::wrap(public_key, unit.body.as_bytes())?;
            unit.body = hex::encode(wrapped);
            unit.asymmetric_encrypted = true;
        }

        for group in groups {
            let Some(derived) = group.derived() else {
                continue;
            };
            let sealed = crypto::seal(derived.as_bytes(), unit.body.as_bytes())?;
            unit.body = hex::encode(sealed);
            unit.set_level(group.name(), group.keys().len() as u32);
        }
        Ok(())
    }

    fn decrypt_unit(
        &self,
        groups: &[KeyGroup],
        unit: &mut EncryptableUnit,
    ) -> Result<(), FieldvaultError> {
        for group in groups.iter().rev() {
            // Zero configured keys: leave this layer sealed.
            if group.keys().is_empty() {
                continue;
            }
            let level = unit.level(group.name());
            if unit.body.is_empty() || level == 0 {
                continue;
            }
            let key = group.key_at_level(level)?;
            let ciphertext =
                hex::decode(&unit.body).map_err(|_| FieldvaultError::MalformedCiphertext)?;
            let plaintext = crypto::open(key.as_bytes(), &ciphertext)?;
            unit.body =
                String::from_utf8(plaintext).map_err(|_| FieldvaultError::MalformedCiphertext)?;
        }

        if unit.asymmetric_encrypted && !unit.body.is_empty() {
            if let Some(private_key) = &self.private_key {
                let ciphertext =
                    hex::decode(&unit.body).map_err(|_| FieldvaultError::MalformedCiphertext)?;
                let plaintext = asymmetric::unwrap(private_key, &ciphertext)?;
                unit.body = String::from_utf8(plaintext)
                    .map_err(|_| FieldvaultError::DecryptionFailed)?;
                unit.asymmetric_encrypted = false;
            }
        }
        Ok(())
    }
}

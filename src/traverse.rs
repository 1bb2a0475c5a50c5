//! Generic record traversal.
//!
//! The engine never inspects caller types at runtime. Instead, a record
//! opts in to traversal by implementing [`Encryptable`]: a walk over every
//! [`EncryptableUnit`] reachable through its fields, nested records, and
//! keyed collections. The facade drives the walk with a visitor that
//! encrypts, decrypts, or inspects each unit it is handed.
//!
//! Implementations should visit fields in declaration order, depth-first.
//! Units are independent, so order carries no semantics, but a fixed order
//! keeps walks reproducible.
//!
//! The walk holds an exclusive borrow of the root for its whole duration
//! and retains nothing afterwards. Cyclic graphs are out of scope: owned
//! tree-shaped data cannot alias under `&mut`, and the walker performs no
//! cycle detection.
//!
//! # Implementing for a record type
//!
//! ```
//! use std::ops::ControlFlow;
//! use fieldvault::{Encryptable, EncryptableUnit, FieldvaultError, UnitVisitor};
//!
//! struct Profile {
//!     name: String,
//!     email: EncryptableUnit,
//!     phone: Option<EncryptableUnit>,
//! }
//!
//! impl Encryptable for Profile {
//!     fn walk_units(
//!         &mut self,
//!         visit: &mut UnitVisitor<'_>,
//!     ) -> Result<ControlFlow<()>, FieldvaultError> {
//!         if self.email.walk_units(visit)?.is_break() {
//!             return Ok(ControlFlow::Break(()));
//!         }
//!         self.phone.walk_units(visit)
//!     }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::ops::ControlFlow;
use std::sync::Mutex;

use crate::error::FieldvaultError;
use crate::unit::EncryptableUnit;

/// The visitor applied to every unit found during a walk.
///
/// Returning `ControlFlow::Break` stops the walk early (read-only queries
/// short-circuit on their first hit). Returning an error aborts the walk;
/// updates already written to earlier units are not rolled back.
pub type UnitVisitor<'a> =
    dyn FnMut(&mut EncryptableUnit) -> Result<ControlFlow<()>, FieldvaultError> + 'a;

/// A value that can expose the encryptable units nested inside it.
pub trait Encryptable {
    /// Apply `visit` to every reachable [`EncryptableUnit`], depth-first.
    fn walk_units(
        &mut self,
        visit: &mut UnitVisitor<'_>,
    ) -> Result<ControlFlow<()>, FieldvaultError>;
}

impl Encryptable for EncryptableUnit {
    fn walk_units(
        &mut self,
        visit: &mut UnitVisitor<'_>,
    ) -> Result<ControlFlow<()>, FieldvaultError> {
        visit(self)
    }
}

impl<T: Encryptable> Encryptable for Option<T> {
    fn walk_units(
        &mut self,
        visit: &mut UnitVisitor<'_>,
    ) -> Result<ControlFlow<()>, FieldvaultError> {
        match self {
            Some(inner) => inner.walk_units(visit),
            None => Ok(ControlFlow::Continue(())),
        }
    }
}

impl<T: Encryptable + ?Sized> Encryptable for Box<T> {
    fn walk_units(
        &mut self,
        visit: &mut UnitVisitor<'_>,
    ) -> Result<ControlFlow<()>, FieldvaultError> {
        (**self).walk_units(visit)
    }
}

impl<T: Encryptable> Encryptable for Vec<T> {
    fn walk_units(
        &mut self,
        visit: &mut UnitVisitor<'_>,
    ) -> Result<ControlFlow<()>, FieldvaultError> {
        for item in self.iter_mut() {
            if item.walk_units(visit)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}

/// Keyed collection with a deterministic walk order (sorted by key).
impl<K, V: Encryptable> Encryptable for BTreeMap<K, V> {
    fn walk_units(
        &mut self,
        visit: &mut UnitVisitor<'_>,
    ) -> Result<ControlFlow<()>, FieldvaultError> {
        for value in self.values_mut() {
            if value.walk_units(visit)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}

/// Keyed collection with unspecified walk order. Units are transformed
/// independently, so the result does not depend on order; prefer
/// [`BTreeMap`] where reproducible walk order matters.
impl<K, V: Encryptable> Encryptable for HashMap<K, V> {
    fn walk_units(
        &mut self,
        visit: &mut UnitVisitor<'_>,
    ) -> Result<ControlFlow<()>, FieldvaultError> {
        for value in self.values_mut() {
            if value.walk_units(visit)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}

/// Walks the guarded value. A poisoned lock means exclusive access cannot
/// be obtained, surfaced as [`FieldvaultError::InvalidTarget`].
impl<T: Encryptable> Encryptable for Mutex<T> {
    fn walk_units(
        &mut self,
        visit: &mut UnitVisitor<'_>,
    ) -> Result<ControlFlow<()>, FieldvaultError> {
        self.get_mut()
            .map_err(|_| FieldvaultError::InvalidTarget)?
            .walk_units(visit)
    }
}

//! Minimal example: fieldvault protecting a user profile.
//!
//! Demonstrates nested traversal, key rotation, and the upgrade check.
//! Run with: `cargo run --example profile_demo`

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use fieldvault::{
    generate_symmetric_key, Encryptable, EncryptableUnit, FieldvaultError, UnitVisitor, Vault,
};

struct Profile {
    display_name: String,
    email: EncryptableUnit,
    notes: BTreeMap<String, EncryptableUnit>,
}

impl Encryptable for Profile {
    fn walk_units(
        &mut self,
        visit: &mut UnitVisitor<'_>,
    ) -> Result<ControlFlow<()>, FieldvaultError> {
        if self.email.walk_units(visit)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }
        self.notes.walk_units(visit)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Setup: one key group with a single key.
    let vault = Vault::new();
    let first_key = generate_symmetric_key()?;
    vault.set_key_group("internal", vec![first_key.clone()])?;

    let mut profile = Profile {
        display_name: "ada".to_string(),
        email: EncryptableUnit::new("ada@example.com"),
        notes: BTreeMap::from([(
            "medical".to_string(),
            EncryptableUnit::new("allergic to penicillin"),
        )]),
    };

    // 2. Encrypt every unit in place. The display name is not a unit and
    // stays readable.
    vault.encrypt(&mut profile)?;
    println!("display_name: {}", profile.display_name);
    println!("email (sealed): {}...", &profile.email.body[..24]);
    println!("email level: {}", profile.email.level("internal"));

    // 3. Rotate: add a second key. Existing ciphertext is now stale.
    vault.set_key_group("internal", vec![first_key, generate_symmetric_key()?])?;
    println!("upgradeable: {}", vault.upgradeable(&mut profile)?);

    // 4. Upgrade: decrypt at the recorded level, re-encrypt at the new one.
    vault.decrypt(&mut profile)?;
    vault.encrypt(&mut profile)?;
    println!("email level after upgrade: {}", profile.email.level("internal"));
    println!("upgradeable: {}", vault.upgradeable(&mut profile)?);

    // 5. Decrypt for use.
    vault.decrypt(&mut profile)?;
    println!("email: {}", profile.email.body);
    println!("note: {}", profile.notes["medical"].body);

    Ok(())
}

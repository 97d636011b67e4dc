//! Load-time unit registration and the process-wide bootstrap.
//!
//! # Responsibility
//! - Collect units submitted with `inventory::submit!` into one registry.
//! - Build the process-wide behavior tables exactly once.
//!
//! # Invariants
//! - Registration order is `(order, name)` ascending, independent of link order.
//! - Units run at most once per process; later `bootstrap` calls return the
//!   first outcome.
//! - After bootstrap the tables are read-only.
//!
//! # Preconditions
//! - `bootstrap()` completes before the first augmented-method call. Calls
//!   made earlier fail with `OperationError::NotInstalled`.

use crate::extension::registry::{ExtensionRegistry, RegistryError};
use crate::extension::table::HostTables;
use crate::extension::unit::ExtensionUnit;
use log::info;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Load-time registration entry for one extension unit.
///
/// Submit one per unit:
///
/// ```ignore
/// inventory::submit! {
///     UnitRegistration { order: 40, build: build_unit }
/// }
/// ```
pub struct UnitRegistration {
    /// Activation rank; ties are broken by unit name.
    pub order: u16,
    pub build: fn() -> Arc<dyn ExtensionUnit>,
}

inventory::collect!(UnitRegistration);

static INSTALLED: OnceCell<Result<HostTables, RegistryError>> = OnceCell::new();

/// Builds a registry from every submitted `UnitRegistration`.
pub fn registered_units() -> Result<ExtensionRegistry, RegistryError> {
    let mut entries: Vec<(u16, Arc<dyn ExtensionUnit>)> = inventory::iter::<UnitRegistration>
        .into_iter()
        .map(|registration| (registration.order, (registration.build)()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.name().cmp(b.1.name())));

    let mut registry = ExtensionRegistry::new();
    for (_, unit) in entries {
        registry.register(unit)?;
    }
    Ok(registry)
}

/// Activates every registered unit once for the whole process.
///
/// An `Err` leaves the augmented surface unusable and must abort startup.
pub fn bootstrap() -> Result<(), RegistryError> {
    let outcome = INSTALLED.get_or_init(|| -> Result<HostTables, RegistryError> {
        let registry = registered_units()?;
        let mut tables = HostTables::new();
        registry.activate_all(&mut tables)?;
        info!(
            "event=bootstrap module=extension status=ok units={} methods={}",
            registry.len(),
            tables.len()
        );
        Ok(tables)
    });
    outcome.as_ref().map(|_| ()).map_err(Clone::clone)
}

/// Process-wide tables, once bootstrap has succeeded.
pub fn installed_tables() -> Option<&'static HostTables> {
    INSTALLED.get().and_then(|outcome| outcome.as_ref().ok())
}

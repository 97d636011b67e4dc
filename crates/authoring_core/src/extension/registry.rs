//! Extension registry: ordered unit collection and activation.

use crate::extension::table::{check_method_name, HostTables};
use crate::extension::unit::ExtensionUnit;
use crate::model::handle::HostKind;
use log::{debug, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Ordered set of extension units.
///
/// Populate with `register`, then `activate_all` once. Registration order is
/// activation order.
#[derive(Default)]
pub struct ExtensionRegistry {
    units: Vec<Arc<dyn ExtensionUnit>>,
    /// Declared method name → owning unit, per host kind.
    declared: BTreeMap<HostKind, BTreeMap<&'static str, &'static str>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit after checking its name and declared methods.
    ///
    /// Rejects duplicate unit names and any declared pair already owned by
    /// another unit or by the native handle type.
    pub fn register(&mut self, unit: Arc<dyn ExtensionUnit>) -> Result<(), RegistryError> {
        let name = unit.name();
        if !is_valid_unit_name(name) {
            return Err(RegistryError::InvalidUnitName(name.to_string()));
        }
        if self.get(name).is_some() {
            return Err(RegistryError::DuplicateUnit(name.to_string()));
        }

        let mut claimed = Vec::with_capacity(unit.methods().len());
        for spec in unit.methods() {
            check_method_name(name, spec)?;
            let key = (spec.kind, spec.name);
            let owner = self
                .owner_of(spec.kind, spec.name)
                .or_else(|| claimed.contains(&key).then_some(name));
            if let Some(existing) = owner {
                return Err(RegistryError::MethodCollision {
                    kind: spec.kind,
                    method: spec.name.to_string(),
                    existing: existing.to_string(),
                    incoming: name.to_string(),
                });
            }
            claimed.push(key);
        }

        for (kind, method) in claimed {
            self.declared.entry(kind).or_default().insert(method, name);
        }
        debug!(
            "event=unit_registered module=extension status=ok unit={} methods={}",
            name,
            unit.methods().len()
        );
        self.units.push(unit);
        Ok(())
    }

    /// Runs `initialize` on every unit in registration order.
    ///
    /// Stops at the first failure and returns it; later units stay
    /// un-activated. Calling this again on the same tables is a no-op.
    pub fn activate_all(&self, tables: &mut HostTables) -> Result<(), RegistryError> {
        for unit in &self.units {
            unit.initialize(tables)?;
            debug!(
                "event=unit_activated module=extension status=ok unit={}",
                unit.name()
            );
        }
        info!(
            "event=extensions_activated module=extension status=ok units={} methods={}",
            self.units.len(),
            tables.len()
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ExtensionUnit>> {
        self.units.iter().find(|unit| unit.name() == name).cloned()
    }

    /// Unit names in registration order.
    pub fn unit_names(&self) -> Vec<&'static str> {
        self.units.iter().map(|unit| unit.name()).collect()
    }

    /// Unit that declared `(kind, method)`, if any.
    pub fn owner_of(&self, kind: HostKind, method: &str) -> Option<&'static str> {
        self.declared.get(&kind)?.get(method).copied()
    }
}

fn is_valid_unit_name(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
        return false;
    }

    let mut prev_separator = false;
    for c in chars {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            prev_separator = false;
        } else if matches!(c, '.' | '_' | '-') && !prev_separator {
            prev_separator = true;
        } else {
            return false;
        }
    }
    !prev_separator
}

/// Registration and activation errors. All of them are fatal to startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidUnitName(String),
    DuplicateUnit(String),
    InvalidMethodName {
        unit: String,
        kind: HostKind,
        method: String,
    },
    NativeMethodCollision {
        unit: String,
        kind: HostKind,
        method: String,
    },
    MethodCollision {
        kind: HostKind,
        method: String,
        existing: String,
        incoming: String,
    },
    InitializeFailed {
        unit: String,
        message: String,
    },
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUnitName(value) => write!(f, "extension unit name is invalid: {value}"),
            Self::DuplicateUnit(value) => {
                write!(f, "extension unit already registered: {value}")
            }
            Self::InvalidMethodName { unit, kind, method } => {
                write!(f, "unit `{unit}` declares invalid {kind} method name `{method}`")
            }
            Self::NativeMethodCollision { unit, kind, method } => write!(
                f,
                "unit `{unit}` would overwrite native {kind} method `{method}`"
            ),
            Self::MethodCollision {
                kind,
                method,
                existing,
                incoming,
            } => write!(
                f,
                "{kind} method `{method}` is owned by `{existing}`; `{incoming}` cannot install it"
            ),
            Self::InitializeFailed { unit, message } => {
                write!(f, "unit `{unit}` failed to initialize: {message}")
            }
        }
    }
}

impl Error for RegistryError {}

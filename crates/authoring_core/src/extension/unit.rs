//! Extension unit contract.

use crate::contract::MethodSpec;
use crate::extension::registry::RegistryError;
use crate::extension::table::HostTables;

/// One cohesive feature that augments host kinds with new methods.
///
/// Units are stateless. `methods` is the fixed set of `(HostKind, method)`
/// pairs the unit owns; the registry checks it for collisions at
/// registration time. `initialize` installs those pairs and must be safe to
/// call more than once.
pub trait ExtensionUnit: Send + Sync {
    /// Stable unit id, e.g. `builtin.properties`.
    fn name(&self) -> &'static str;

    fn methods(&self) -> &'static [MethodSpec];

    fn initialize(&self, tables: &mut HostTables) -> Result<(), RegistryError> {
        for spec in self.methods() {
            tables.install(self.name(), *spec)?;
        }
        Ok(())
    }
}

//! Remote authoring extensions for an embedded report object model.
//!
//! Extension units add async operations (visual lifecycle, data roles,
//! property access, capability discovery) to report, page and visual handles.
//! Call [`bootstrap`] once at startup, then bring the typed surface into
//! scope with `use authoring_core::prelude::*`.

pub mod channel;
pub mod contract;
pub mod extension;
pub mod logging;
pub mod model;
pub mod units;

pub use channel::{RemoteChannel, RemoteReply, RemoteRequest, TransportError, TransportErrorKind};
pub use contract::{
    ChangeOutcome, ErrorMode, MethodSpec, OperationError, OperationResult, Payload, RemoteError,
    ValidationError,
};
pub use extension::bootstrap::{bootstrap, registered_units, UnitRegistration};
pub use extension::registry::{ExtensionRegistry, RegistryError};
pub use extension::table::{HostTables, InstallStatus, InstalledMethod};
pub use extension::unit::ExtensionUnit;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::descriptors::{
    CreatedVisual, FieldTarget, PropertySelector, PropertyValue, VisualCapabilities,
    VisualDescriptor, VisualLayout,
};
pub use model::handle::{HostHandle, HostKind, HostTarget, Page, Report, Visual};

/// Handle types plus every augmented-method trait.
pub mod prelude {
    pub use crate::model::handle::{HostHandle, Page, Report, Visual};
    pub use crate::units::capabilities::{ReportCapabilitiesExt, VisualCapabilitiesExt};
    pub use crate::units::data_roles::VisualDataRolesExt;
    pub use crate::units::properties::VisualPropertiesExt;
    pub use crate::units::visual_lifecycle::{PageVisualsExt, VisualTypeExt};
}

/// Returns the crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Built-in extension units.
//!
//! # Responsibility
//! - Declare the augmented methods of each feature as `MethodSpec` tables.
//! - Expose each feature to callers as a typed extension trait on the
//!   native handle types.
//!
//! # Invariants
//! - Every unit self-registers with `inventory::submit!`; no unit depends on
//!   another unit having been registered or activated.
//! - Typed trait methods go through `HostHandle::invoke`, so local
//!   validation and error mapping live in one place.
//!
//! # See also
//! - `crate::extension::bootstrap`

pub mod capabilities;
pub mod data_roles;
pub mod properties;
pub mod visual_lifecycle;

use crate::contract::{require_non_blank, Payload, ValidationError};
use serde::{Deserialize, Serialize};

/// Payload naming one visual type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VisualTypePayload {
    pub visual_type: String,
}

impl Payload for VisualTypePayload {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.visual_type, "visualType")
    }
}

/// Payload of operations that take no arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct NoArguments {}

impl Payload for NoArguments {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

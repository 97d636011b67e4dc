//! Property access unit: get, set and reset visual properties.

use crate::contract::{
    decode, encode, validate_as, MethodSpec, OperationResult, Payload, ValidationError,
};
use crate::extension::bootstrap::UnitRegistration;
use crate::extension::unit::ExtensionUnit;
use crate::model::descriptors::{PropertySelector, PropertyValue};
use crate::model::handle::{HostHandle, HostKind, Visual};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const GET_PROPERTY: &str = "getProperty";
pub const SET_PROPERTY: &str = "setProperty";
pub const RESET_PROPERTY: &str = "resetProperty";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SelectorPayload {
    selector: PropertySelector,
}

impl Payload for SelectorPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        self.selector.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SetPropertyPayload {
    selector: PropertySelector,
    value: PropertyValue,
}

impl Payload for SetPropertyPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        self.selector.validate()
    }
}

const METHODS: &[MethodSpec] = &[
    MethodSpec::rejecting(HostKind::Visual, GET_PROPERTY, validate_as::<SelectorPayload>),
    MethodSpec::rejecting(
        HostKind::Visual,
        SET_PROPERTY,
        validate_as::<SetPropertyPayload>,
    ),
    MethodSpec::rejecting(HostKind::Visual, RESET_PROPERTY, validate_as::<SelectorPayload>),
];

pub struct PropertiesUnit;

impl ExtensionUnit for PropertiesUnit {
    fn name(&self) -> &'static str {
        "builtin.properties"
    }

    fn methods(&self) -> &'static [MethodSpec] {
        METHODS
    }
}

fn build_unit() -> Arc<dyn ExtensionUnit> {
    Arc::new(PropertiesUnit)
}

inventory::submit! {
    UnitRegistration { order: 40, build: build_unit }
}

/// Property get/set/reset on visuals.
#[async_trait]
pub trait VisualPropertiesExt {
    async fn get_property(&self, selector: &PropertySelector) -> OperationResult<PropertyValue>;

    async fn set_property(
        &self,
        selector: &PropertySelector,
        value: PropertyValue,
    ) -> OperationResult<()>;

    /// Restores the property to its default.
    async fn reset_property(&self, selector: &PropertySelector) -> OperationResult<()>;
}

#[async_trait]
impl VisualPropertiesExt for Visual {
    async fn get_property(&self, selector: &PropertySelector) -> OperationResult<PropertyValue> {
        let payload = encode(&SelectorPayload {
            selector: selector.clone(),
        })?;
        let reply = self.invoke(GET_PROPERTY, payload).await?;
        decode(GET_PROPERTY, reply.into_result()?)
    }

    async fn set_property(
        &self,
        selector: &PropertySelector,
        value: PropertyValue,
    ) -> OperationResult<()> {
        let payload = encode(&SetPropertyPayload {
            selector: selector.clone(),
            value,
        })?;
        self.invoke(SET_PROPERTY, payload).await?.into_result()?;
        Ok(())
    }

    async fn reset_property(&self, selector: &PropertySelector) -> OperationResult<()> {
        let payload = encode(&SelectorPayload {
            selector: selector.clone(),
        })?;
        self.invoke(RESET_PROPERTY, payload).await?.into_result()?;
        Ok(())
    }
}

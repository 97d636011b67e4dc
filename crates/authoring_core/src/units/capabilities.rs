//! Capability discovery unit.
//!
//! Adds `getVisualCapabilities` and `getAvailableVisuals` to reports and
//! `getCapabilities` to visuals.

use crate::contract::{decode, encode, validate_as, MethodSpec, OperationResult};
use crate::extension::bootstrap::UnitRegistration;
use crate::extension::unit::ExtensionUnit;
use crate::model::descriptors::VisualCapabilities;
use crate::model::handle::{HostHandle, HostKind, Report, Visual};
use crate::units::{NoArguments, VisualTypePayload};
use async_trait::async_trait;
use std::sync::Arc;

pub const GET_VISUAL_CAPABILITIES: &str = "getVisualCapabilities";
pub const GET_AVAILABLE_VISUALS: &str = "getAvailableVisuals";
pub const GET_CAPABILITIES: &str = "getCapabilities";

const METHODS: &[MethodSpec] = &[
    MethodSpec::rejecting(
        HostKind::Report,
        GET_VISUAL_CAPABILITIES,
        validate_as::<VisualTypePayload>,
    ),
    MethodSpec::rejecting(
        HostKind::Report,
        GET_AVAILABLE_VISUALS,
        validate_as::<NoArguments>,
    ),
    MethodSpec::rejecting(HostKind::Visual, GET_CAPABILITIES, validate_as::<NoArguments>),
];

pub struct CapabilitiesUnit;

impl ExtensionUnit for CapabilitiesUnit {
    fn name(&self) -> &'static str {
        "builtin.capabilities"
    }

    fn methods(&self) -> &'static [MethodSpec] {
        METHODS
    }
}

fn build_unit() -> Arc<dyn ExtensionUnit> {
    Arc::new(CapabilitiesUnit)
}

inventory::submit! {
    UnitRegistration { order: 10, build: build_unit }
}

/// Capability discovery on reports.
#[async_trait]
pub trait ReportCapabilitiesExt {
    /// Capability descriptor of `visual_type`.
    async fn get_visual_capabilities(
        &self,
        visual_type: &str,
    ) -> OperationResult<VisualCapabilities>;

    /// Visual types available to this report, in remote order. Empty when no
    /// custom visuals are installed.
    async fn get_available_visuals(&self) -> OperationResult<Vec<String>>;
}

#[async_trait]
impl ReportCapabilitiesExt for Report {
    async fn get_visual_capabilities(
        &self,
        visual_type: &str,
    ) -> OperationResult<VisualCapabilities> {
        let payload = encode(&VisualTypePayload {
            visual_type: visual_type.to_string(),
        })?;
        let reply = self.invoke(GET_VISUAL_CAPABILITIES, payload).await?;
        decode(GET_VISUAL_CAPABILITIES, reply.into_result()?)
    }

    async fn get_available_visuals(&self) -> OperationResult<Vec<String>> {
        let reply = self
            .invoke(GET_AVAILABLE_VISUALS, encode(&NoArguments::default())?)
            .await?;
        decode(GET_AVAILABLE_VISUALS, reply.into_result()?)
    }
}

/// Capability discovery on visuals.
#[async_trait]
pub trait VisualCapabilitiesExt {
    async fn get_capabilities(&self) -> OperationResult<VisualCapabilities>;
}

#[async_trait]
impl VisualCapabilitiesExt for Visual {
    async fn get_capabilities(&self) -> OperationResult<VisualCapabilities> {
        let reply = self
            .invoke(GET_CAPABILITIES, encode(&NoArguments::default())?)
            .await?;
        decode(GET_CAPABILITIES, reply.into_result()?)
    }
}

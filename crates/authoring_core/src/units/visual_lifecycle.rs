//! Visual lifecycle unit: create/delete visuals on pages, change visual type.

use crate::contract::{
    decode, encode, require_non_blank, validate_as, MethodSpec, OperationResult, Payload,
    ValidationError,
};
use crate::extension::bootstrap::UnitRegistration;
use crate::extension::unit::ExtensionUnit;
use crate::model::descriptors::{CreatedVisual, VisualLayout};
use crate::model::handle::{HostHandle, HostKind, Page, Visual};
use crate::units::VisualTypePayload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const CREATE_VISUAL: &str = "createVisual";
pub const DELETE_VISUAL: &str = "deleteVisual";
pub const CHANGE_TYPE: &str = "changeType";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateVisualPayload {
    visual_type: String,
    /// Absent means the remote side picks the placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layout: Option<VisualLayout>,
}

impl Payload for CreateVisualPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.visual_type, "visualType")?;
        match &self.layout {
            Some(layout) => layout.validate(),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteVisualPayload {
    visual_name: String,
}

impl Payload for DeleteVisualPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.visual_name, "visualName")
    }
}

const METHODS: &[MethodSpec] = &[
    MethodSpec::rejecting(
        HostKind::Page,
        CREATE_VISUAL,
        validate_as::<CreateVisualPayload>,
    ),
    MethodSpec::rejecting(
        HostKind::Page,
        DELETE_VISUAL,
        validate_as::<DeleteVisualPayload>,
    ),
    MethodSpec::rejecting(HostKind::Visual, CHANGE_TYPE, validate_as::<VisualTypePayload>),
];

pub struct VisualLifecycleUnit;

impl ExtensionUnit for VisualLifecycleUnit {
    fn name(&self) -> &'static str {
        "builtin.visual-lifecycle"
    }

    fn methods(&self) -> &'static [MethodSpec] {
        METHODS
    }
}

fn build_unit() -> Arc<dyn ExtensionUnit> {
    Arc::new(VisualLifecycleUnit)
}

inventory::submit! {
    UnitRegistration { order: 20, build: build_unit }
}

/// Visual creation and deletion on pages.
#[async_trait]
pub trait PageVisualsExt {
    /// Creates a visual of `visual_type`.
    ///
    /// With `layout = None` the remote side chooses a placement.
    async fn create_visual(
        &self,
        visual_type: &str,
        layout: Option<VisualLayout>,
    ) -> OperationResult<CreatedVisual>;

    async fn delete_visual(&self, visual_name: &str) -> OperationResult<()>;
}

#[async_trait]
impl PageVisualsExt for Page {
    async fn create_visual(
        &self,
        visual_type: &str,
        layout: Option<VisualLayout>,
    ) -> OperationResult<CreatedVisual> {
        let payload = encode(&CreateVisualPayload {
            visual_type: visual_type.to_string(),
            layout,
        })?;
        let reply = self.invoke(CREATE_VISUAL, payload).await?;
        decode(CREATE_VISUAL, reply.into_result()?)
    }

    async fn delete_visual(&self, visual_name: &str) -> OperationResult<()> {
        let payload = encode(&DeleteVisualPayload {
            visual_name: visual_name.to_string(),
        })?;
        self.invoke(DELETE_VISUAL, payload).await?.into_result()?;
        Ok(())
    }
}

/// Visual type changes.
#[async_trait]
pub trait VisualTypeExt {
    async fn change_type(&self, visual_type: &str) -> OperationResult<()>;
}

#[async_trait]
impl VisualTypeExt for Visual {
    async fn change_type(&self, visual_type: &str) -> OperationResult<()> {
        let payload = encode(&VisualTypePayload {
            visual_type: visual_type.to_string(),
        })?;
        self.invoke(CHANGE_TYPE, payload).await?.into_result()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CreateVisualPayload;
    use crate::contract::{encode, validate_as, OperationError, ValidationError};
    use crate::model::descriptors::VisualLayout;
    use serde_json::json;

    #[test]
    fn create_payload_omits_absent_layout() {
        let encoded = serde_json::to_value(CreateVisualPayload {
            visual_type: "barChart".to_string(),
            layout: None,
        })
        .expect("payload should serialize");
        assert_eq!(encoded, json!({"visualType": "barChart"}));
        validate_as::<CreateVisualPayload>(&encoded).expect("layout is optional");
    }

    #[test]
    fn create_payload_validates_layout() {
        let encoded = serde_json::to_value(CreateVisualPayload {
            visual_type: "barChart".to_string(),
            layout: Some(VisualLayout::at(0.0, 0.0).with_size(100.0, -5.0)),
        })
        .expect("payload should serialize");
        assert_eq!(
            validate_as::<CreateVisualPayload>(&encoded),
            Err(ValidationError::InvalidNumber("layout.height"))
        );
    }

    #[test]
    fn encode_rejects_non_finite_layout() {
        let err = encode(&CreateVisualPayload {
            visual_type: "barChart".to_string(),
            layout: Some(VisualLayout::at(0.0, f64::NAN)),
        })
        .expect_err("NaN must not serialize as null");
        assert_eq!(
            err,
            OperationError::Validation(ValidationError::InvalidNumber("layout.y"))
        );
    }
}

//! Structured values exchanged verbatim with the remote document.
//!
//! # Responsibility
//! - Give opaque remote values a typed home without reinterpreting them.
//! - Hold the local validation rules for caller-supplied descriptors.
//!
//! # Invariants
//! - Capability descriptors and field targets round-trip unchanged.
//! - Validation never depends on remote state (e.g. field counts).

use crate::contract::{require_non_blank, ValidationError};
use crate::model::handle::{Page, Visual};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Schema tag for a plain column field target.
pub const FIELD_SCHEMA_COLUMN: &str = "http://powerbi.com/product/schema#column";
/// Schema tag for a measure field target.
pub const FIELD_SCHEMA_MEASURE: &str = "http://powerbi.com/product/schema#measure";
/// Schema tag for an aggregated column field target.
pub const FIELD_SCHEMA_COLUMN_AGGR: &str = "http://powerbi.com/product/schema#columnAggr";
/// Schema tag for a hierarchy level field target.
pub const FIELD_SCHEMA_HIERARCHY_LEVEL: &str = "http://powerbi.com/product/schema#hierarchyLevel";

/// What a visual type supports: data roles, objects, property schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisualCapabilities(pub Value);

impl VisualCapabilities {
    /// Declared data-role names, in descriptor order.
    pub fn data_roles(&self) -> Vec<&str> {
        self.0
            .get("dataRoles")
            .and_then(Value::as_array)
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(|role| role.get("name").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Data item that can occupy a data-role slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTarget(pub Value);

impl FieldTarget {
    pub fn column(table: &str, column: &str) -> Self {
        Self(json!({
            "$schema": FIELD_SCHEMA_COLUMN,
            "table": table,
            "column": column,
        }))
    }

    pub fn measure(table: &str, measure: &str) -> Self {
        Self(json!({
            "$schema": FIELD_SCHEMA_MEASURE,
            "table": table,
            "measure": measure,
        }))
    }

    pub fn aggregated_column(table: &str, column: &str, aggregation_function: &str) -> Self {
        Self(json!({
            "$schema": FIELD_SCHEMA_COLUMN_AGGR,
            "table": table,
            "column": column,
            "aggregationFunction": aggregation_function,
        }))
    }

    pub fn hierarchy_level(table: &str, hierarchy: &str, level: &str) -> Self {
        Self(json!({
            "$schema": FIELD_SCHEMA_HIERARCHY_LEVEL,
            "table": table,
            "hierarchy": hierarchy,
            "hierarchyLevel": level,
        }))
    }

    /// `$schema` tag, when present.
    pub fn schema(&self) -> Option<&str> {
        self.0.get("$schema").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.0 {
            Value::Object(map) if !map.is_empty() => Ok(()),
            _ => Err(ValidationError::NotAnObject("dataField")),
        }
    }
}

/// Identifies one property of one object on a visual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySelector {
    pub object_name: String,
    pub property_name: String,
    /// Optional data-bound selector, forwarded verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<Value>,
}

impl PropertySelector {
    pub fn new(object_name: impl Into<String>, property_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            property_name: property_name.into(),
            selector: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.object_name, "selector.objectName")?;
        require_non_blank(&self.property_name, "selector.propertyName")
    }
}

/// Value of a visual property as the remote side reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub value: Value,
}

impl PropertyValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            schema: None,
            value: value.into(),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// Placement of a visual on its page.
///
/// All fields are optional; the remote side fills in what is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_state: Option<Value>,
}

impl VisualLayout {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("layout.x", self.x), ("layout.y", self.y), ("layout.z", self.z)] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(ValidationError::InvalidNumber(field));
            }
        }
        for (field, value) in [("layout.width", self.width), ("layout.height", self.height)] {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                return Err(ValidationError::InvalidNumber(field));
            }
        }
        Ok(())
    }
}

/// Identity and placement of a visual as reported by the remote side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub visual_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<VisualLayout>,
}

/// Response of a successful visual creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedVisual {
    pub visual: VisualDescriptor,
    /// Extra response members, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreatedVisual {
    /// Handle to the created visual on `page`.
    pub fn handle(&self, page: &Page) -> Visual {
        page.visual(self.visual.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CreatedVisual, FieldTarget, PropertySelector, VisualCapabilities, VisualLayout,
        FIELD_SCHEMA_MEASURE,
    };
    use crate::contract::ValidationError;
    use serde_json::json;

    #[test]
    fn capabilities_expose_data_role_names() {
        let caps = VisualCapabilities(json!({
            "dataRoles": [
                {"name": "Category", "kind": 0},
                {"name": "Y", "kind": 1},
                {"kind": 2}
            ],
            "objects": {}
        }));
        assert_eq!(caps.data_roles(), vec!["Category", "Y"]);
        assert!(VisualCapabilities(json!({})).data_roles().is_empty());
    }

    #[test]
    fn field_target_constructors_tag_schema() {
        let measure = FieldTarget::measure("Sales", "Total");
        assert_eq!(measure.schema(), Some(FIELD_SCHEMA_MEASURE));
        assert_eq!(measure.as_value()["measure"], "Total");

        let aggr = FieldTarget::aggregated_column("Sales", "Amount", "Sum");
        assert_eq!(aggr.as_value()["aggregationFunction"], "Sum");
    }

    #[test]
    fn field_target_must_be_non_empty_object() {
        assert!(FieldTarget::column("Store", "City").validate().is_ok());
        assert_eq!(
            FieldTarget(json!("Store.City")).validate(),
            Err(ValidationError::NotAnObject("dataField"))
        );
        assert!(FieldTarget(json!({})).validate().is_err());
    }

    #[test]
    fn selector_requires_object_and_property_names() {
        assert!(PropertySelector::new("title", "visible").validate().is_ok());
        assert_eq!(
            PropertySelector::new(" ", "visible").validate(),
            Err(ValidationError::Blank("selector.objectName"))
        );
        assert_eq!(
            PropertySelector::new("title", "").validate(),
            Err(ValidationError::Blank("selector.propertyName"))
        );
    }

    #[test]
    fn selector_serializes_camel_case_without_absent_members() {
        let encoded = serde_json::to_value(PropertySelector::new("legend", "position"))
            .expect("selector should serialize");
        assert_eq!(encoded, json!({"objectName": "legend", "propertyName": "position"}));
    }

    #[test]
    fn layout_rejects_negative_size_and_non_finite_position() {
        assert!(VisualLayout::at(10.0, 20.0)
            .with_size(300.0, 200.0)
            .validate()
            .is_ok());
        assert_eq!(
            VisualLayout::at(0.0, 0.0).with_size(-1.0, 10.0).validate(),
            Err(ValidationError::InvalidNumber("layout.width"))
        );
        assert_eq!(
            VisualLayout::at(f64::NAN, 0.0).validate(),
            Err(ValidationError::InvalidNumber("layout.x"))
        );
    }

    #[test]
    fn created_visual_keeps_extra_members() {
        let created: CreatedVisual = serde_json::from_value(json!({
            "visual": {"name": "v42", "type": "barChart", "layout": {"x": 0.0, "y": 0.0}},
            "placement": "auto"
        }))
        .expect("created visual should decode");
        assert_eq!(created.visual.name, "v42");
        assert_eq!(created.visual.visual_type, "barChart");
        assert_eq!(created.extra["placement"], "auto");
    }
}

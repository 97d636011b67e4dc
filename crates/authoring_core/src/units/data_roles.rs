//! Data-role unit: add, list and remove fields in a visual's data roles.
//!
//! `addDataField` and `removeDataField` resolve remote errors as
//! `ChangeOutcome::Rejected`; an out-of-range index is one of them, since
//! only the remote side knows the current field count.

use crate::contract::{
    decode, encode, require_non_blank, validate_as, ChangeOutcome, MethodSpec, OperationResult,
    Payload, ValidationError,
};
use crate::extension::bootstrap::UnitRegistration;
use crate::extension::unit::ExtensionUnit;
use crate::model::descriptors::FieldTarget;
use crate::model::handle::{HostHandle, HostKind, Visual};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ADD_DATA_FIELD: &str = "addDataField";
pub const GET_DATA_FIELDS: &str = "getDataFields";
pub const REMOVE_DATA_FIELD: &str = "removeDataField";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddDataFieldPayload {
    data_role: String,
    data_field: FieldTarget,
}

impl Payload for AddDataFieldPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.data_role, "dataRole")?;
        self.data_field.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataRolePayload {
    data_role: String,
}

impl Payload for DataRolePayload {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.data_role, "dataRole")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoveDataFieldPayload {
    data_role: String,
    index: u64,
}

impl Payload for RemoveDataFieldPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.data_role, "dataRole")
    }
}

const METHODS: &[MethodSpec] = &[
    MethodSpec::resolving(
        HostKind::Visual,
        ADD_DATA_FIELD,
        validate_as::<AddDataFieldPayload>,
    ),
    MethodSpec::rejecting(
        HostKind::Visual,
        GET_DATA_FIELDS,
        validate_as::<DataRolePayload>,
    ),
    MethodSpec::resolving(
        HostKind::Visual,
        REMOVE_DATA_FIELD,
        validate_as::<RemoveDataFieldPayload>,
    ),
];

pub struct DataRolesUnit;

impl ExtensionUnit for DataRolesUnit {
    fn name(&self) -> &'static str {
        "builtin.data-roles"
    }

    fn methods(&self) -> &'static [MethodSpec] {
        METHODS
    }
}

fn build_unit() -> Arc<dyn ExtensionUnit> {
    Arc::new(DataRolesUnit)
}

inventory::submit! {
    UnitRegistration { order: 30, build: build_unit }
}

/// Data-role field manipulation on visuals.
#[async_trait]
pub trait VisualDataRolesExt {
    /// Adds `field` to `data_role`. Remote refusals resolve as `Rejected`.
    async fn add_data_field(
        &self,
        data_role: &str,
        field: FieldTarget,
    ) -> OperationResult<ChangeOutcome>;

    /// Fields currently in `data_role`, in slot order.
    async fn get_data_fields(&self, data_role: &str) -> OperationResult<Vec<FieldTarget>>;

    /// Removes the field at `index` of `data_role`. The index is checked
    /// remotely; out of range resolves as `Rejected`.
    async fn remove_data_field(
        &self,
        data_role: &str,
        index: usize,
    ) -> OperationResult<ChangeOutcome>;
}

#[async_trait]
impl VisualDataRolesExt for Visual {
    async fn add_data_field(
        &self,
        data_role: &str,
        field: FieldTarget,
    ) -> OperationResult<ChangeOutcome> {
        let payload = encode(&AddDataFieldPayload {
            data_role: data_role.to_string(),
            data_field: field,
        })?;
        let reply = self.invoke(ADD_DATA_FIELD, payload).await?;
        Ok(ChangeOutcome::from(reply))
    }

    async fn get_data_fields(&self, data_role: &str) -> OperationResult<Vec<FieldTarget>> {
        let payload = encode(&DataRolePayload {
            data_role: data_role.to_string(),
        })?;
        let reply = self.invoke(GET_DATA_FIELDS, payload).await?;
        decode(GET_DATA_FIELDS, reply.into_result()?)
    }

    async fn remove_data_field(
        &self,
        data_role: &str,
        index: usize,
    ) -> OperationResult<ChangeOutcome> {
        let payload = encode(&RemoveDataFieldPayload {
            data_role: data_role.to_string(),
            index: index as u64,
        })?;
        let reply = self.invoke(REMOVE_DATA_FIELD, payload).await?;
        Ok(ChangeOutcome::from(reply))
    }
}

mod support;

use authoring_core::prelude::*;
use authoring_core::{
    bootstrap, ChangeOutcome, FieldTarget, OperationError, RemoteError, RemoteReply,
    TransportError,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use support::StubChannel;

/// Remote side that keeps per-role field lists and enforces index ranges.
fn data_role_remote(initial: &[(&str, Vec<FieldTarget>)]) -> Arc<StubChannel> {
    let roles: HashMap<String, Vec<Value>> = initial
        .iter()
        .map(|(role, fields)| {
            (
                role.to_string(),
                fields.iter().map(|f| f.as_value().clone()).collect(),
            )
        })
        .collect();
    let roles = Mutex::new(roles);

    StubChannel::new(move |request| {
        let mut roles = roles.lock().expect("role state lock");
        let role = request.payload["dataRole"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        match request.operation.as_str() {
            "getDataFields" => Ok(RemoteReply::Success(json!(roles
                .get(&role)
                .cloned()
                .unwrap_or_default()))),
            "addDataField" => {
                if role == "Tooltips" {
                    return Ok(RemoteReply::Failure(
                        RemoteError::new("field is incompatible with role")
                            .with_code("IncompatibleField"),
                    ));
                }
                roles
                    .entry(role)
                    .or_default()
                    .push(request.payload["dataField"].clone());
                Ok(RemoteReply::empty())
            }
            "removeDataField" => {
                let index = request.payload["index"].as_u64().unwrap_or(u64::MAX) as usize;
                let fields = roles.entry(role).or_default();
                if index >= fields.len() {
                    return Ok(RemoteReply::Failure(
                        RemoteError::new("index out of range").with_code("IndexOutOfRange"),
                    ));
                }
                fields.remove(index);
                Ok(RemoteReply::empty())
            }
            other => Err(TransportError::closed(format!("unexpected {other}"))),
        }
    })
}

fn visual(channel: Arc<StubChannel>) -> Visual {
    bootstrap().expect("bootstrap");
    Report::new("r1", channel).page("p1").visual("v1")
}

#[tokio::test]
async fn remove_out_of_range_index_resolves_with_error_value() {
    let channel = data_role_remote(&[(
        "Y",
        vec![
            FieldTarget::measure("Sales", "Total"),
            FieldTarget::measure("Sales", "Margin"),
        ],
    )]);
    let visual = visual(channel.clone());

    let outcome = visual
        .remove_data_field("Y", 5)
        .await
        .expect("out of range must resolve, not reject");
    let error = outcome.error().expect("error value should be populated");
    assert_eq!(error.error_code.as_deref(), Some("IndexOutOfRange"));

    let fields = visual.get_data_fields("Y").await.expect("fields");
    assert_eq!(fields.len(), 2, "failed removal must not change the role");
    assert_eq!(channel.requests()[0].payload, json!({"dataRole": "Y", "index": 5}));
}

#[tokio::test]
async fn add_then_get_keeps_slot_order() {
    let visual = visual(data_role_remote(&[]));
    let city = FieldTarget::column("Store", "City");
    let total = FieldTarget::aggregated_column("Sales", "Amount", "Sum");

    for field in [city.clone(), total.clone()] {
        let outcome = visual
            .add_data_field("Category", field)
            .await
            .expect("add field");
        assert_eq!(outcome, ChangeOutcome::Applied);
    }

    let fields = visual.get_data_fields("Category").await.expect("fields");
    assert_eq!(fields, vec![city, total]);
}

#[tokio::test]
async fn remove_valid_index_applies() {
    let visual = visual(data_role_remote(&[(
        "Category",
        vec![
            FieldTarget::column("Store", "City"),
            FieldTarget::column("Store", "Region"),
        ],
    )]));

    let outcome = visual
        .remove_data_field("Category", 0)
        .await
        .expect("remove");
    assert!(outcome.is_applied());
    assert_eq!(
        visual.get_data_fields("Category").await.expect("fields"),
        vec![FieldTarget::column("Store", "Region")]
    );
}

#[tokio::test]
async fn incompatible_field_resolves_with_error_value() {
    let visual = visual(data_role_remote(&[]));
    let outcome = visual
        .add_data_field("Tooltips", FieldTarget::measure("Sales", "Total"))
        .await
        .expect("remote refusal resolves");
    assert!(matches!(outcome, ChangeOutcome::Rejected(ref err) if err.message.contains("incompatible")));
}

#[tokio::test]
async fn empty_role_lists_no_fields() {
    let visual = visual(data_role_remote(&[]));
    let fields = visual.get_data_fields("Legend").await.expect("fields");
    assert!(fields.is_empty());
}

#[tokio::test]
async fn non_object_field_target_fails_locally() {
    let channel = data_role_remote(&[]);
    let visual = visual(channel.clone());
    let err = visual
        .add_data_field("Category", FieldTarget(json!(42)))
        .await
        .expect_err("field target must be an object");
    assert!(matches!(err, OperationError::Validation(_)));
    assert!(channel.requests().is_empty());
}

#[tokio::test]
async fn get_data_fields_rejects_remote_errors() {
    let channel = StubChannel::new(|_| Ok(RemoteReply::Failure(RemoteError::new("no such role"))));
    let visual = visual(channel);
    let err = visual
        .get_data_fields("Nope")
        .await
        .expect_err("non error-carrying operation rejects");
    assert!(matches!(err, OperationError::Remote(_)));
}

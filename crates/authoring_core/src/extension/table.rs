//! Per-kind behavior tables for augmented methods.
//!
//! # Responsibility
//! - Record which unit installed which `(HostKind, method)` pair.
//! - Resolve and run an augmented method for a concrete handle.
//!
//! # Invariants
//! - A pair is installed at most once; re-installing from the same unit is a no-op.
//! - A pair owned by another unit or by the native type is a collision error.
//! - Invocation never mutates the tables.

use crate::channel::{RemoteReply, RemoteRequest};
use crate::contract::{ErrorMode, MethodSpec, OperationError, OperationResult};
use crate::extension::registry::RegistryError;
use crate::model::handle::{HostHandle, HostKind};
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

/// One installed method and the unit that owns it.
#[derive(Debug, Clone, Copy)]
pub struct InstalledMethod {
    pub unit: &'static str,
    pub spec: MethodSpec,
}

/// Result of one `install` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    Installed,
    AlreadyInstalled,
}

/// Behavior tables for every host kind.
#[derive(Debug, Default)]
pub struct HostTables {
    tables: BTreeMap<HostKind, BTreeMap<&'static str, InstalledMethod>>,
}

impl HostTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs one method on behalf of `unit`.
    pub fn install(
        &mut self,
        unit: &'static str,
        spec: MethodSpec,
    ) -> Result<InstallStatus, RegistryError> {
        check_method_name(unit, &spec)?;

        let table = self.tables.entry(spec.kind).or_default();
        if let Some(existing) = table.get(spec.name) {
            if existing.unit == unit {
                return Ok(InstallStatus::AlreadyInstalled);
            }
            return Err(RegistryError::MethodCollision {
                kind: spec.kind,
                method: spec.name.to_string(),
                existing: existing.unit.to_string(),
                incoming: unit.to_string(),
            });
        }

        table.insert(spec.name, InstalledMethod { unit, spec });
        debug!(
            "event=method_installed module=extension status=ok unit={} kind={} method={}",
            unit, spec.kind, spec.name
        );
        Ok(InstallStatus::Installed)
    }

    pub fn get(&self, kind: HostKind, method: &str) -> Option<&InstalledMethod> {
        self.tables.get(&kind)?.get(method)
    }

    pub fn contains(&self, kind: HostKind, method: &str) -> bool {
        self.get(kind, method).is_some()
    }

    /// Installed method names for `kind`, sorted.
    pub fn methods(&self, kind: HostKind) -> Vec<&'static str> {
        self.tables
            .get(&kind)
            .map(|table| table.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs an installed method against `handle`.
    ///
    /// Validates locally, sends one request over the handle's channel and
    /// maps the reply by the method's `ErrorMode`. Remote failures come back
    /// as `Ok(RemoteReply::Failure)` only for `ErrorMode::Resolve` methods.
    pub async fn invoke<H>(
        &self,
        handle: &H,
        method: &str,
        payload: Value,
    ) -> OperationResult<RemoteReply>
    where
        H: HostHandle + ?Sized,
    {
        let kind = handle.kind();
        let entry = self
            .get(kind, method)
            .ok_or_else(|| OperationError::NotInstalled {
                kind,
                method: method.to_string(),
            })?;

        (entry.spec.validate)(&payload)?;

        let request = RemoteRequest::new(handle.target(), entry.spec.name, payload);
        debug!(
            "event=remote_call module=extension status=start request_id={} target={} op={}",
            request.id, request.target, request.operation
        );
        let reply = handle.channel().send(request).await?;

        match (reply, entry.spec.errors) {
            (RemoteReply::Failure(error), ErrorMode::Reject) => Err(OperationError::Remote(error)),
            (reply, _) => Ok(reply),
        }
    }
}

pub(crate) fn check_method_name(
    unit: &'static str,
    spec: &MethodSpec,
) -> Result<(), RegistryError> {
    if spec.name.trim().is_empty() || spec.name.trim() != spec.name {
        return Err(RegistryError::InvalidMethodName {
            unit: unit.to_string(),
            kind: spec.kind,
            method: spec.name.to_string(),
        });
    }
    if spec.kind.is_native_method(spec.name) {
        return Err(RegistryError::NativeMethodCollision {
            unit: unit.to_string(),
            kind: spec.kind,
            method: spec.name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{HostTables, InstallStatus};
    use crate::channel::{RemoteChannel, RemoteReply, RemoteRequest, TransportError};
    use crate::contract::{
        require_non_blank, validate_as, MethodSpec, OperationError, Payload, RemoteError,
        ValidationError,
    };
    use crate::extension::registry::RegistryError;
    use crate::model::handle::{HostKind, Report};
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Deserialize)]
    struct NamedPayload {
        name: String,
    }

    impl Payload for NamedPayload {
        fn validate(&self) -> Result<(), ValidationError> {
            require_non_blank(&self.name, "name")
        }
    }

    const ECHO: MethodSpec =
        MethodSpec::rejecting(HostKind::Report, "echoName", validate_as::<NamedPayload>);
    const SOFT: MethodSpec =
        MethodSpec::resolving(HostKind::Report, "softName", validate_as::<NamedPayload>);

    struct ScriptedChannel {
        reply: Result<RemoteReply, TransportError>,
        calls: AtomicUsize,
    }

    impl ScriptedChannel {
        fn new(reply: Result<RemoteReply, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RemoteChannel for ScriptedChannel {
        async fn send(&self, _request: RemoteRequest) -> Result<RemoteReply, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn tables() -> HostTables {
        let mut tables = HostTables::new();
        tables.install("test.unit", ECHO).expect("echo install");
        tables.install("test.unit", SOFT).expect("soft install");
        tables
    }

    #[test]
    fn reinstall_from_same_unit_is_noop() {
        let mut tables = tables();
        let status = tables.install("test.unit", ECHO).expect("reinstall");
        assert_eq!(status, InstallStatus::AlreadyInstalled);
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn install_from_other_unit_collides() {
        let mut tables = tables();
        let err = tables.install("other.unit", ECHO).unwrap_err();
        assert_eq!(
            err,
            RegistryError::MethodCollision {
                kind: HostKind::Report,
                method: "echoName".to_string(),
                existing: "test.unit".to_string(),
                incoming: "other.unit".to_string(),
            }
        );
    }

    #[test]
    fn native_method_names_cannot_be_installed() {
        let mut tables = HostTables::new();
        let spec = MethodSpec::rejecting(HostKind::Report, "page", validate_as::<NamedPayload>);
        let err = tables.install("test.unit", spec).unwrap_err();
        assert!(matches!(err, RegistryError::NativeMethodCollision { .. }));
        assert!(tables.is_empty());
    }

    #[test]
    fn same_name_on_different_kinds_does_not_collide() {
        let mut tables = tables();
        let visual_echo =
            MethodSpec::rejecting(HostKind::Visual, "echoName", validate_as::<NamedPayload>);
        tables
            .install("other.unit", visual_echo)
            .expect("different kind should install");
        assert!(tables.contains(HostKind::Visual, "echoName"));
        assert_eq!(tables.methods(HostKind::Report), vec!["echoName", "softName"]);
    }

    #[tokio::test]
    async fn invalid_payload_fails_before_remote_call() {
        let channel = ScriptedChannel::new(Ok(RemoteReply::empty()));
        let report = Report::new("r1", channel.clone());
        let err = tables()
            .invoke(&report, "echoName", json!({"name": ""}))
            .await
            .expect_err("blank name must fail locally");
        assert_eq!(err, OperationError::Validation(ValidationError::Blank("name")));
        assert_eq!(channel.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn remote_failure_rejects_or_resolves_by_mode() {
        let channel = ScriptedChannel::new(Ok(RemoteReply::Failure(RemoteError::new("refused"))));
        let report = Report::new("r1", channel.clone());
        let tables = tables();

        let rejected = tables
            .invoke(&report, "echoName", json!({"name": "a"}))
            .await
            .expect_err("reject mode");
        assert!(matches!(rejected, OperationError::Remote(_)));

        let resolved = tables
            .invoke(&report, "softName", json!({"name": "a"}))
            .await
            .expect("resolve mode");
        assert_eq!(resolved, RemoteReply::Failure(RemoteError::new("refused")));
    }

    #[tokio::test]
    async fn transport_failure_always_rejects() {
        let channel = ScriptedChannel::new(Err(TransportError::unreachable("gone")));
        let report = Report::new("r1", channel);
        let tables = tables();
        for method in ["echoName", "softName"] {
            let err = tables
                .invoke(&report, method, json!({"name": "a"}))
                .await
                .expect_err("transport failure must reject");
            assert!(err.is_transport());
        }
    }

    #[tokio::test]
    async fn unknown_method_is_not_installed() {
        let channel = ScriptedChannel::new(Ok(RemoteReply::Success(Value::Null)));
        let report = Report::new("r1", channel);
        let err = tables()
            .invoke(&report, "missing", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, OperationError::NotInstalled { .. }));
    }
}

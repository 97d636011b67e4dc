//! Request/response and error contract shared by every extension unit.
//!
//! # Responsibility
//! - Declare installable methods (`MethodSpec`) and how their remote errors surface.
//! - Validate payloads locally before any remote round trip.
//! - Map channel outcomes into one `OperationError` type.
//!
//! # Invariants
//! - Local validation runs before the channel is touched.
//! - A transport failure is always `Err`, never a success-shaped value.
//! - A remote error resolves only for `ErrorMode::Resolve` methods.
//! - A reply that does not decode into the declared result is `MalformedReply`.

use crate::channel::{RemoteReply, TransportError};
use crate::model::handle::HostKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type OperationResult<T> = Result<T, OperationError>;

/// How a remote-reported error reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorMode {
    /// Remote error becomes `Err(OperationError::Remote)`.
    Reject,
    /// Remote error is a resolved value the caller inspects.
    Resolve,
}

/// One installable async method on a host kind.
#[derive(Clone, Copy)]
pub struct MethodSpec {
    pub kind: HostKind,
    /// Method name, also used as the wire operation name.
    pub name: &'static str,
    pub errors: ErrorMode,
    /// Local argument check applied to the outgoing payload.
    pub validate: fn(&Value) -> Result<(), ValidationError>,
}

impl std::fmt::Debug for MethodSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodSpec")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl MethodSpec {
    pub const fn rejecting(
        kind: HostKind,
        name: &'static str,
        validate: fn(&Value) -> Result<(), ValidationError>,
    ) -> Self {
        Self {
            kind,
            name,
            errors: ErrorMode::Reject,
            validate,
        }
    }

    pub const fn resolving(
        kind: HostKind,
        name: &'static str,
        validate: fn(&Value) -> Result<(), ValidationError>,
    ) -> Self {
        Self {
            kind,
            name,
            errors: ErrorMode::Resolve,
            validate,
        }
    }
}

/// Typed operation payload with locally-checkable invariants.
pub trait Payload: DeserializeOwned {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Validates a raw payload by decoding it as `P` and running `P::validate`.
///
/// Used as the `validate` entry of a `MethodSpec`.
pub fn validate_as<P: Payload>(payload: &Value) -> Result<(), ValidationError> {
    let parsed =
        P::deserialize(payload).map_err(|err| ValidationError::InvalidPayload(err.to_string()))?;
    parsed.validate()
}

/// Rejects blank (empty or whitespace-only) string arguments.
pub fn require_non_blank(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank(field));
    }
    Ok(())
}

/// Error Value reported by the remote document process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_details: Option<Value>,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detailed_message: None,
            error_code: None,
            technical_details: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detailed_message = Some(detail.into());
        self
    }
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.error_code {
            Some(code) => write!(f, "{} [{code}]", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for RemoteError {}

/// Resolved result of operations whose declared result carries an Error Value.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOutcome {
    Applied,
    Rejected(RemoteError),
}

impl ChangeOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn error(&self) -> Option<&RemoteError> {
        match self {
            Self::Applied => None,
            Self::Rejected(error) => Some(error),
        }
    }
}

impl From<RemoteReply> for ChangeOutcome {
    fn from(value: RemoteReply) -> Self {
        match value {
            RemoteReply::Success(_) => Self::Applied,
            RemoteReply::Failure(error) => Self::Rejected(error),
        }
    }
}

/// Argument rejected before any remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Blank(&'static str),
    NotAnObject(&'static str),
    InvalidNumber(&'static str),
    InvalidPayload(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank(field) => write!(f, "`{field}` must not be blank"),
            Self::NotAnObject(field) => write!(f, "`{field}` must be a JSON object"),
            Self::InvalidNumber(field) => {
                write!(f, "`{field}` must be a finite, non-negative number")
            }
            Self::InvalidPayload(message) => write!(f, "payload is invalid: {message}"),
        }
    }
}

impl Error for ValidationError {}

/// Failure of one augmented-method invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationError {
    Validation(ValidationError),
    Transport(TransportError),
    Remote(RemoteError),
    MalformedReply { operation: String, message: String },
    /// Method is not in the behavior table; bootstrap has not run or failed.
    NotInstalled { kind: HostKind, method: String },
}

impl OperationError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn remote_error(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for OperationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid argument: {err}"),
            Self::Transport(err) => write!(f, "{err}"),
            Self::Remote(err) => write!(f, "remote error: {err}"),
            Self::MalformedReply { operation, message } => {
                write!(f, "malformed reply for `{operation}`: {message}")
            }
            Self::NotInstalled { kind, method } => {
                write!(f, "method `{method}` is not installed on {kind}")
            }
        }
    }
}

impl Error for OperationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Transport(err) => Some(err),
            Self::Remote(err) => Some(err),
            Self::MalformedReply { .. } => None,
            Self::NotInstalled { .. } => None,
        }
    }
}

impl From<ValidationError> for OperationError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<TransportError> for OperationError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<RemoteError> for OperationError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

/// Checks a typed payload, then serializes it for the channel.
///
/// Checks run on the typed value: serde_json writes non-finite floats as
/// `null`, so they cannot be caught after serialization.
pub(crate) fn encode<P: Payload + Serialize>(payload: &P) -> OperationResult<Value> {
    payload.validate()?;
    serde_json::to_value(payload)
        .map_err(|err| OperationError::Validation(ValidationError::InvalidPayload(err.to_string())))
}

/// Decodes a success value into the declared result type.
pub(crate) fn decode<T: DeserializeOwned>(operation: &str, value: Value) -> OperationResult<T> {
    serde_json::from_value(value).map_err(|err| OperationError::MalformedReply {
        operation: operation.to_string(),
        message: err.to_string(),
    })
}

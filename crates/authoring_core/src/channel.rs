//! Remote operation channel contract.
//!
//! # Responsibility
//! - Describe the only runtime boundary the core crosses: one request to the
//!   remote document process, one reply back.
//! - Keep transport failures apart from remote-reported domain errors.
//!
//! # Invariants
//! - `Err(TransportError)` means the remote never produced a reply.
//! - `RemoteReply::Failure` means the remote executed the request and refused it.
//! - Operations without a result reply with `RemoteReply::Success(Value::Null)`.

use crate::contract::RemoteError;
use crate::model::handle::HostTarget;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Asynchronous request/response transport to the remote document process.
///
/// Implemented by the embedding layer. Retry, timeout and reconnect policy
/// live behind this trait; the core never retries.
#[async_trait]
pub trait RemoteChannel: Send + Sync {
    async fn send(&self, request: RemoteRequest) -> Result<RemoteReply, TransportError>;
}

/// One operation addressed to one handle inside the remote document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRequest {
    /// Correlation id, unique per request.
    pub id: Uuid,
    pub target: HostTarget,
    /// Wire operation name, equal to the installed method name.
    pub operation: String,
    /// Operation-specific payload, forwarded verbatim.
    pub payload: Value,
}

impl RemoteRequest {
    pub fn new(target: HostTarget, operation: impl Into<String>, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            operation: operation.into(),
            payload,
        }
    }
}

/// Outcome of a request the remote side actually executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "body", rename_all = "snake_case")]
pub enum RemoteReply {
    Success(Value),
    Failure(RemoteError),
}

impl RemoteReply {
    /// Success reply without a value.
    pub fn empty() -> Self {
        Self::Success(Value::Null)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn into_result(self) -> Result<Value, RemoteError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }
}

/// Transport failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// Remote process could not be reached.
    Unreachable,
    /// Channel was torn down while the request was pending.
    Closed,
    /// Transport-level timeout.
    TimedOut,
    Other,
}

impl TransportErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unreachable => "unreachable",
            Self::Closed => "closed",
            Self::TimedOut => "timed_out",
            Self::Other => "other",
        }
    }
}

/// The channel could not deliver a request or receive its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Unreachable, message)
    }

    pub fn closed(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Closed, message)
    }

    pub fn timed_out(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::TimedOut, message)
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "transport failure ({}): {}",
            self.kind.as_str(),
            self.message
        )
    }
}

impl Error for TransportError {}

//! Host handles for the remotely-hosted report document.
//!
//! # Responsibility
//! - Represent report, page and visual nodes as cheap local handles.
//! - Provide native navigation plus the dynamic `invoke` entry point that
//!   resolves augmented methods in the process-wide behavior tables.
//!
//! # Invariants
//! - Handles never create or destroy remote nodes by themselves.
//! - A handle's `HostTarget` is fixed for its whole lifetime.
//! - Augmented methods are resolved per call, so handles built before
//!   bootstrap see every method installed by it.
//!
//! # Preconditions
//! - `bootstrap()` must complete before any augmented method is used.

use crate::channel::{RemoteChannel, RemoteReply};
use crate::contract::{OperationError, OperationResult};
use crate::extension::bootstrap::installed_tables;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Kind of a node in the report containment hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKind {
    Report,
    Page,
    Visual,
}

const SHARED_NATIVE_METHODS: &[&str] = &["kind", "target", "channel", "invoke"];
const REPORT_NATIVE_METHODS: &[&str] = &["id", "page"];
const PAGE_NATIVE_METHODS: &[&str] = &["name", "report_id", "visual"];
const VISUAL_NATIVE_METHODS: &[&str] = &["name", "page_name", "report_id", "page"];

impl HostKind {
    pub const ALL: [HostKind; 3] = [HostKind::Report, HostKind::Page, HostKind::Visual];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Page => "page",
            Self::Visual => "visual",
        }
    }

    /// Method names owned by the native handle type for this kind.
    pub fn native_methods(self) -> Vec<&'static str> {
        let own = match self {
            Self::Report => REPORT_NATIVE_METHODS,
            Self::Page => PAGE_NATIVE_METHODS,
            Self::Visual => VISUAL_NATIVE_METHODS,
        };
        SHARED_NATIVE_METHODS
            .iter()
            .chain(own.iter())
            .copied()
            .collect()
    }

    pub fn is_native_method(self, method: &str) -> bool {
        self.native_methods().contains(&method)
    }
}

impl Display for HostKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a handle inside the remote document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostTarget {
    Report {
        report_id: String,
    },
    Page {
        report_id: String,
        page_name: String,
    },
    Visual {
        report_id: String,
        page_name: String,
        visual_name: String,
    },
}

impl HostTarget {
    pub fn kind(&self) -> HostKind {
        match self {
            Self::Report { .. } => HostKind::Report,
            Self::Page { .. } => HostKind::Page,
            Self::Visual { .. } => HostKind::Visual,
        }
    }

    /// Stable address path, e.g. `/report/r1/pages/p1/visuals/v1`.
    pub fn path(&self) -> String {
        match self {
            Self::Report { report_id } => format!("/report/{report_id}"),
            Self::Page {
                report_id,
                page_name,
            } => format!("/report/{report_id}/pages/{page_name}"),
            Self::Visual {
                report_id,
                page_name,
                visual_name,
            } => format!("/report/{report_id}/pages/{page_name}/visuals/{visual_name}"),
        }
    }
}

impl Display for HostTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Behavior shared by every host handle kind.
///
/// `invoke` is the dynamic entry point behind every augmented method: it
/// looks `method` up in the behavior table of `self.kind()`, validates the
/// payload and delegates to the handle's channel.
#[async_trait]
pub trait HostHandle: Send + Sync {
    fn kind(&self) -> HostKind;
    fn target(&self) -> HostTarget;
    fn channel(&self) -> &Arc<dyn RemoteChannel>;

    async fn invoke(&self, method: &str, payload: Value) -> OperationResult<RemoteReply> {
        match installed_tables() {
            Some(tables) => tables.invoke(self, method, payload).await,
            None => Err(OperationError::NotInstalled {
                kind: self.kind(),
                method: method.to_string(),
            }),
        }
    }
}

/// Handle to an embedded report.
#[derive(Clone)]
pub struct Report {
    id: String,
    channel: Arc<dyn RemoteChannel>,
}

impl Report {
    pub fn new(id: impl Into<String>, channel: Arc<dyn RemoteChannel>) -> Self {
        Self {
            id: id.into(),
            channel,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Handle to a page of this report; no remote call is made.
    pub fn page(&self, name: impl Into<String>) -> Page {
        Page {
            report_id: self.id.clone(),
            name: name.into(),
            channel: Arc::clone(&self.channel),
        }
    }
}

impl HostHandle for Report {
    fn kind(&self) -> HostKind {
        HostKind::Report
    }

    fn target(&self) -> HostTarget {
        HostTarget::Report {
            report_id: self.id.clone(),
        }
    }

    fn channel(&self) -> &Arc<dyn RemoteChannel> {
        &self.channel
    }
}

impl Debug for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Report")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Handle to one page of a report.
#[derive(Clone)]
pub struct Page {
    report_id: String,
    name: String,
    channel: Arc<dyn RemoteChannel>,
}

impl Page {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    /// Handle to a visual on this page; no remote call is made.
    pub fn visual(&self, name: impl Into<String>) -> Visual {
        Visual {
            report_id: self.report_id.clone(),
            page_name: self.name.clone(),
            name: name.into(),
            channel: Arc::clone(&self.channel),
        }
    }
}

impl HostHandle for Page {
    fn kind(&self) -> HostKind {
        HostKind::Page
    }

    fn target(&self) -> HostTarget {
        HostTarget::Page {
            report_id: self.report_id.clone(),
            page_name: self.name.clone(),
        }
    }

    fn channel(&self) -> &Arc<dyn RemoteChannel> {
        &self.channel
    }
}

impl Debug for Page {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("report_id", &self.report_id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Handle to one visual on a page.
#[derive(Clone)]
pub struct Visual {
    report_id: String,
    page_name: String,
    name: String,
    channel: Arc<dyn RemoteChannel>,
}

impl Visual {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    /// Handle to the containing page.
    pub fn page(&self) -> Page {
        Page {
            report_id: self.report_id.clone(),
            name: self.page_name.clone(),
            channel: Arc::clone(&self.channel),
        }
    }
}

impl HostHandle for Visual {
    fn kind(&self) -> HostKind {
        HostKind::Visual
    }

    fn target(&self) -> HostTarget {
        HostTarget::Visual {
            report_id: self.report_id.clone(),
            page_name: self.page_name.clone(),
            visual_name: self.name.clone(),
        }
    }

    fn channel(&self) -> &Arc<dyn RemoteChannel> {
        &self.channel
    }
}

impl Debug for Visual {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visual")
            .field("report_id", &self.report_id)
            .field("page_name", &self.page_name)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

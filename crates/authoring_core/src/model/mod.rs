//! Host object model and the structured values it exchanges.
//!
//! # Responsibility
//! - Define the report/page/visual handles the core augments.
//! - Define the descriptor types passed through to the remote document.
//!
//! # Invariants
//! - The core never creates or destroys remote nodes through handles alone.
//! - Opaque remote values are carried unchanged.

pub mod descriptors;
pub mod handle;

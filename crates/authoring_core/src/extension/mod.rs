//! Extension augmentation mechanism.
//!
//! Units declare new async methods for report, page and visual handles.
//! The registry activates them into per-kind behavior tables once per
//! process; handles resolve augmented methods through those tables.

pub mod bootstrap;
pub mod registry;
pub mod table;
pub mod unit;

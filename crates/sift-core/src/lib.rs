//! # sift-core
//!
//! Core types for the sift similarity engine: the `Record` shape every input is
//! converted into, the scored `Match` / `Report` / `GapReport` outputs, and the
//! shared error type used by every other crate in the workspace.

pub mod error;
pub mod record;
pub mod report;

pub use error::{Result, SiftError};
pub use record::{AttributeKey, Attributes, Record, records_from_json};
pub use report::*;

//! # sift-config
//!
//! Configuration for the sift engine. Reads from `sift.toml`, then applies
//! environment variable overrides.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::SiftConfig;
pub use schema::{
    ConfigWarning, GapConfig, LoggingConfig, MappingKind, MethodKind, ReportConfig, ReportFormat,
    ScoringConfig, Thresholds, WarningSeverity, Weights,
};

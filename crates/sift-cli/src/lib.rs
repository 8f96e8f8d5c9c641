//! # sift-cli
//!
//! Command-line interface for the sift engine.
//!
//! ## Commands
//!
//! - `sift check` — Rank a new bug (or several) against existing ones
//! - `sift gap` — Map test cases onto requirements and report coverage
//! - `sift impact` — List modules touched by a diff and the tests to run
//! - `sift config` — Show the effective configuration
//! - `sift doctor` — Audit the configuration

pub mod commands;
pub mod render;

pub use commands::Cli;

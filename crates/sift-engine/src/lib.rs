//! # sift-engine
//!
//! Text-similarity duplicate detection and requirement gap analysis.
//!
//! All scoring is pure and synchronous: an [`Engine`] holds only its
//! configuration, so the same engine can rank any number of queries
//! concurrently and always produces the same report for the same inputs.
//!
//! ## Scoring
//!
//! ```text
//! score = (0.4·sim(title) + 0.4·sim(body) + 0.1·match(component) + 0.1·sim(steps))
//!         / (sum of weights of the fields present on either side)
//! ```
//!
//! `sim` is a pluggable [`TextSimilarity`] strategy (jaccard by default).
//! Scores above `thresholds.high` are duplicates, scores between
//! `thresholds.possible` and `thresholds.high` need review.

pub mod engine;
pub mod gap;
pub mod impact;
pub mod mapping;
pub mod scorer;
pub mod similarity;
pub mod source;
pub mod text;

pub use engine::Engine;
pub use impact::{ImpactReport, impact_report, impacted_modules, select_impacted};
pub use mapping::{AttributeMapping, MappingExtractor, PatternMapping};
pub use scorer::Scorer;
pub use similarity::{Cosine, Hybrid, Jaccard, Sequence, TextSimilarity};
pub use source::{CandidateSource, JsonFileSource, StaticSource};

use regex::Regex;
use std::collections::BTreeSet;

use sift_config::{GapConfig, MappingKind};
use sift_core::{AttributeKey, Record, Result, SiftError};

/// Extracts the requirement ids a test case claims to cover.
pub trait MappingExtractor: Send + Sync {
    fn extract(&self, test_case: &Record) -> BTreeSet<String>;
}

impl<F> MappingExtractor for F
where
    F: Fn(&Record) -> BTreeSet<String> + Send + Sync,
{
    fn extract(&self, test_case: &Record) -> BTreeSet<String> {
        self(test_case)
    }
}

/// Reads ids from the `covers` attribute, separated by commas, semicolons,
/// or whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeMapping;

impl MappingExtractor for AttributeMapping {
    fn extract(&self, test_case: &Record) -> BTreeSet<String> {
        test_case
            .attr(AttributeKey::Covers)
            .map(|raw| {
                raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Finds ids matching a regex in the title, body, and `covers` attribute.
#[derive(Debug, Clone)]
pub struct PatternMapping {
    pattern: Regex,
}

impl PatternMapping {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| SiftError::InvalidPattern(format!("{pattern}: {e}")))?;
        Ok(Self { pattern })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl MappingExtractor for PatternMapping {
    fn extract(&self, test_case: &Record) -> BTreeSet<String> {
        let covers = test_case.attr(AttributeKey::Covers).unwrap_or_default();
        [test_case.title.as_str(), test_case.body.as_str(), covers]
            .into_iter()
            .flat_map(|text| self.pattern.find_iter(text))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Build the extractor selected by `[gap]` in the config.
pub fn from_config(config: &GapConfig) -> Result<Box<dyn MappingExtractor>> {
    match config.mapping {
        MappingKind::Attribute => Ok(Box::new(AttributeMapping)),
        MappingKind::Pattern => Ok(Box::new(PatternMapping::new(&config.pattern)?)),
    }
}

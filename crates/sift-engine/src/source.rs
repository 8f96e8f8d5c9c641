use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use sift_core::{Record, Result, SiftError, records_from_json};

use crate::text::{normalize, token_set};

/// Anything that can supply candidate records for a search query:
/// an issue tracker, a spreadsheet export, a fixture file.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Records relevant to `query`. An empty query returns everything.
    async fn search(&self, query: &str) -> Result<Vec<Record>>;
}

/// Keyword prefilter: keep records sharing at least one normalized word with the query.
fn keyword_filter(query: &str, records: Vec<Record>) -> Vec<Record> {
    let normalized = normalize(query);
    let wanted = token_set(&normalized);
    if wanted.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| {
            let text = normalize(&format!("{} {}", r.title, r.body));
            token_set(&text).iter().any(|t| wanted.contains(t))
        })
        .collect()
}

/// Records held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: String,
    records: Vec<Record>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

#[async_trait]
impl CandidateSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Result<Vec<Record>> {
        Ok(keyword_filter(query, self.records.clone()))
    }
}

/// Records read from a JSON file (one object or an array) on every search.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record in the file, in file order.
    pub async fn load(&self) -> Result<Vec<Record>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.error(format!("failed to read: {e}")))?;
        let records = records_from_json(&raw).map_err(|e| self.error(e.to_string()))?;
        debug!(path = ?self.path, count = records.len(), "loaded records");
        Ok(records)
    }

    fn error(&self, reason: String) -> SiftError {
        SiftError::Source {
            source_name: self.path.display().to_string(),
            reason,
        }
    }
}

#[async_trait]
impl CandidateSource for JsonFileSource {
    fn name(&self) -> &str {
        self.path.to_str().unwrap_or("<json file>")
    }

    async fn search(&self, query: &str) -> Result<Vec<Record>> {
        Ok(keyword_filter(query, self.load().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Record> {
        vec![
            Record::new("BUG-1", "Login failure on iOS", ""),
            Record::new("BUG-2", "Checkout total wrong", "coupon applied twice"),
            Record::new("BUG-3", "", "LOGIN spinner never stops"),
        ]
    }

    #[tokio::test]
    async fn static_source_filters_by_keyword() {
        let source = StaticSource::new("fixtures", corpus());
        assert_eq!(source.records().len(), 3);
        let hits = source.search("login").await.unwrap();
        let ids: Vec<_> = hits.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["BUG-1", "BUG-3"]);
    }

    #[tokio::test]
    async fn empty_query_returns_everything() {
        let source = StaticSource::new("fixtures", corpus());
        assert_eq!(source.search("  ").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn json_file_source_reads_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bugs.json");
        std::fs::write(
            &path,
            r#"[{"key":"BUG-9","summary":"Crash on save"},{"key":"BUG-10","summary":"Slow search"}]"#,
        )
        .unwrap();

        let source = JsonFileSource::new(&path);
        assert_eq!(source.load().await.unwrap().len(), 2);
        let hits = source.search("crash").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "BUG-9");
    }

    #[tokio::test]
    async fn json_file_source_reports_missing_file() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        let err = source.search("").await.unwrap_err();
        assert!(matches!(err, SiftError::Source { .. }));
        assert!(err.to_string().contains("not/here.json"));
    }
}

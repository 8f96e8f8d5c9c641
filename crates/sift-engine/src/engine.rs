use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info};

use sift_config::{SiftConfig, Thresholds};
use sift_core::{ConfidenceBand, GapReport, Match, Record, Report, Result, SiftError, Verdict};

use crate::gap;
use crate::mapping::MappingExtractor;
use crate::scorer::Scorer;
use crate::source::CandidateSource;

/// Ranks queries against a corpus and maps test cases onto requirements.
///
/// The engine is immutable configuration only; cloning is cheap and every
/// call is independent of the ones before it.
#[derive(Debug, Clone)]
pub struct Engine {
    scorer: Scorer,
    thresholds: Thresholds,
    duplicate_threshold: f64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(&SiftConfig::default())
    }
}

impl Engine {
    pub fn new(scorer: Scorer, thresholds: Thresholds) -> Self {
        Self {
            scorer,
            duplicate_threshold: thresholds.high,
            thresholds,
        }
    }

    pub fn from_config(config: &SiftConfig) -> Self {
        Self {
            scorer: Scorer::from_config(&config.scoring),
            thresholds: config.thresholds,
            duplicate_threshold: config.gap.duplicate_threshold,
        }
    }

    /// Body similarity above which covering test cases count as duplicates.
    pub fn with_duplicate_threshold(mut self, threshold: f64) -> Self {
        self.duplicate_threshold = threshold;
        self
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn score(&self, query: &Record, candidate: &Record) -> f64 {
        self.scorer.score(query, candidate)
    }

    pub fn classify(&self, score: f64) -> ConfidenceBand {
        ConfidenceBand::classify(score, self.thresholds.high, self.thresholds.possible)
    }

    /// Score every corpus record against `query` and rank them.
    ///
    /// All records are kept. Matches are ordered by descending score, and
    /// equal scores keep corpus order.
    pub fn rank(&self, query: &Record, corpus: &[Record]) -> Result<Report> {
        query.validate()?;
        for record in corpus {
            record.validate()?;
        }

        let mut matches: Vec<Match> = corpus
            .iter()
            .map(|candidate| {
                let (score, breakdown) = self.scorer.score_detailed(query, candidate);
                debug!(query = %query.id, candidate = %candidate.id, score, "scored candidate");
                Match {
                    record_id: candidate.id.clone(),
                    title: candidate.title.clone(),
                    url: candidate
                        .attr(sift_core::AttributeKey::Url)
                        .map(String::from),
                    score,
                    band: self.classify(score),
                    breakdown,
                }
            })
            .collect();

        // `sort_by` is stable, which keeps corpus order for ties.
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));

        let verdict = Verdict::from_bands(matches.iter().map(|m| m.band));
        info!(
            query = %query.id,
            candidates = corpus.len(),
            method = self.scorer.method_name(),
            top = matches.first().map(|m| m.score).unwrap_or(0.0),
            %verdict,
            "ranked query"
        );

        Ok(Report {
            query_id: query.id.clone(),
            query_title: query.title.clone(),
            candidates_checked: corpus.len(),
            matches,
            verdict,
        })
    }

    /// Ask `source` for candidates matching the query's title (or body when
    /// the title is blank), then rank them.
    pub async fn check<S>(&self, source: &S, query: &Record) -> Result<Report>
    where
        S: CandidateSource + ?Sized,
    {
        query.validate()?;
        let search = if query.title.trim().is_empty() {
            query.body.as_str()
        } else {
            query.title.as_str()
        };
        let candidates = source.search(search).await?;
        info!(source = source.name(), candidates = candidates.len(), "fetched candidates");
        self.rank(query, &candidates)
    }

    /// Rank many queries against one corpus, each on a blocking worker.
    /// Reports come back in query order.
    pub async fn rank_all(&self, queries: Vec<Record>, corpus: Arc<Vec<Record>>) -> Result<Vec<Report>> {
        let mut set = JoinSet::new();
        for (index, query) in queries.into_iter().enumerate() {
            let engine = self.clone();
            let corpus = Arc::clone(&corpus);
            set.spawn_blocking(move || (index, engine.rank(&query, &corpus)));
        }

        let mut reports = Vec::with_capacity(set.len());
        while let Some(joined) = set.join_next().await {
            let (index, report) = joined
                .map_err(|e| SiftError::Other(anyhow::anyhow!("ranking task failed: {e}")))?;
            reports.push((index, report?));
        }
        reports.sort_by_key(|(index, _)| *index);
        Ok(reports.into_iter().map(|(_, r)| r).collect())
    }

    /// Requirement coverage, duplicate test cases, and coverage percentage.
    pub fn gap_analysis<M>(
        &self,
        requirements: &[Record],
        test_cases: &[Record],
        extractor: &M,
    ) -> Result<GapReport>
    where
        M: MappingExtractor + ?Sized,
    {
        gap::analyze(
            &self.scorer,
            self.duplicate_threshold,
            requirements,
            test_cases,
            extractor,
        )
    }
}

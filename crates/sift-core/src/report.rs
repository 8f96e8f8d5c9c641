use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete confidence derived from a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Possible,
    Low,
}

impl ConfidenceBand {
    /// `score > high` is High, `possible <= score <= high` is Possible,
    /// everything else is Low. Every score lands in exactly one band.
    pub fn classify(score: f64, high: f64, possible: f64) -> Self {
        if score > high {
            ConfidenceBand::High
        } else if score >= possible {
            ConfidenceBand::Possible
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Possible => "possible",
            ConfidenceBand::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall classification of a query against its corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Duplicate,
    Review,
    Unique,
}

impl Verdict {
    /// Duplicate if any band is High, Review if any is Possible, else Unique.
    pub fn from_bands(bands: impl IntoIterator<Item = ConfidenceBand>) -> Self {
        let mut verdict = Verdict::Unique;
        for band in bands {
            match band {
                ConfidenceBand::High => return Verdict::Duplicate,
                ConfidenceBand::Possible => verdict = Verdict::Review,
                ConfidenceBand::Low => {}
            }
        }
        verdict
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Duplicate => "duplicate",
            Verdict::Review => "review",
            Verdict::Unique => "unique",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field similarity. `None` means the field was absent on both sides
/// and did not take part in the weighted score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub title: Option<f64>,
    pub body: Option<f64>,
    pub component: Option<f64>,
    pub steps: Option<f64>,
}

/// A scored association between the query and one corpus record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub record_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub score: f64,
    pub band: ConfidenceBand,
    pub breakdown: ScoreBreakdown,
}

/// Result of ranking a query against a corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub query_id: String,
    pub query_title: String,
    pub candidates_checked: usize,
    /// Sorted by descending score; ties keep corpus order.
    pub matches: Vec<Match>,
    pub verdict: Verdict,
}

impl Report {
    /// Matches scoring at or above `min_score`, in ranked order.
    pub fn above(&self, min_score: f64) -> Vec<&Match> {
        self.matches.iter().filter(|m| m.score >= min_score).collect()
    }

    /// The best match, if any.
    pub fn top(&self) -> Option<&Match> {
        self.matches.first()
    }

    pub fn in_band(&self, band: ConfidenceBand) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.band == band)
    }
}

/// Coverage of a single requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub requirement_id: String,
    pub title: String,
    pub covered: bool,
    /// Test cases claiming this requirement, in test-case order.
    pub test_case_ids: Vec<String>,
}

/// Two test cases covering a common requirement with near-identical bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub first: String,
    pub second: String,
    pub score: f64,
    pub requirement_ids: Vec<String>,
}

/// Result of mapping requirements to test cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub requirements: Vec<Coverage>,
    pub duplicates: Vec<DuplicatePair>,
    /// Test cases that claim no known requirement.
    pub orphans: Vec<String>,
    pub covered: usize,
    pub total: usize,
    /// `covered / total * 100`, or 0 when there are no requirements.
    pub coverage_percent: f64,
}

impl GapReport {
    pub fn uncovered(&self) -> impl Iterator<Item = &Coverage> {
        self.requirements.iter().filter(|c| !c.covered)
    }
}

/// Percentage of `part` in `whole`, defined as 0 for an empty whole.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

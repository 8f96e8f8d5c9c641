use std::fmt;
use std::sync::Arc;

use sift_config::{ScoringConfig, Weights};
use sift_core::{AttributeKey, Record, ScoreBreakdown};

use crate::similarity::{TextSimilarity, strategy_for};

/// Weighted field-by-field similarity between two records.
///
/// A field contributes only when at least one side has content for it, and
/// the result is divided by the total weight of contributing fields. A record
/// therefore always scores `1.0` against itself, whichever fields it carries.
#[derive(Clone)]
pub struct Scorer {
    text: Arc<dyn TextSimilarity>,
    steps: Arc<dyn TextSimilarity>,
    weights: Weights,
}

impl fmt::Debug for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scorer")
            .field("text", &self.text.name())
            .field("steps", &self.steps.name())
            .field("weights", &self.weights)
            .finish()
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

impl Scorer {
    /// Use `text` for every text field, including steps.
    pub fn new(text: Arc<dyn TextSimilarity>, weights: Weights) -> Self {
        Self {
            steps: Arc::clone(&text),
            text,
            weights,
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            text: strategy_for(config.method),
            steps: strategy_for(config.steps_method()),
            weights: config.weights,
        }
    }

    /// Override the strategy used for steps-to-reproduce.
    pub fn with_steps(mut self, steps: Arc<dyn TextSimilarity>) -> Self {
        self.steps = steps;
        self
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn method_name(&self) -> &'static str {
        self.text.name()
    }

    /// Combined similarity in `[0, 1]`.
    pub fn score(&self, a: &Record, b: &Record) -> f64 {
        self.score_detailed(a, b).0
    }

    /// Combined similarity plus the per-field values it was built from.
    ///
    /// A blank record (no title and no body) scores `0.0` against anything.
    pub fn score_detailed(&self, a: &Record, b: &Record) -> (f64, ScoreBreakdown) {
        if a.is_blank() || b.is_blank() {
            return (0.0, ScoreBreakdown::default());
        }

        let breakdown = ScoreBreakdown {
            title: text_field(self.text.as_ref(), &a.title, &b.title),
            body: text_field(self.text.as_ref(), &a.body, &b.body),
            component: component_match(a, b),
            steps: text_field(
                self.steps.as_ref(),
                a.attr(AttributeKey::Steps).unwrap_or_default(),
                b.attr(AttributeKey::Steps).unwrap_or_default(),
            ),
        };

        let w = &self.weights;
        let mut weighted = 0.0;
        let mut total = 0.0;
        for (sim, weight) in [
            (breakdown.title, w.title),
            (breakdown.body, w.body),
            (breakdown.component, w.component),
            (breakdown.steps, w.steps),
        ] {
            if let Some(sim) = sim {
                weighted += sim * weight;
                total += weight;
            }
        }

        let score = if total > 0.0 {
            (weighted / total).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (score, breakdown)
    }

    /// Body-only similarity, used to spot duplicated test cases.
    pub fn body_similarity(&self, a: &Record, b: &Record) -> f64 {
        self.text.similarity(&a.body, &b.body)
    }
}

fn text_field(sim: &dyn TextSimilarity, a: &str, b: &str) -> Option<f64> {
    if a.trim().is_empty() && b.trim().is_empty() {
        None
    } else {
        Some(sim.similarity(a, b))
    }
}

fn component_match(a: &Record, b: &Record) -> Option<f64> {
    match (a.attr(AttributeKey::Component), b.attr(AttributeKey::Component)) {
        (None, None) => None,
        (Some(x), Some(y)) if x.to_lowercase() == y.to_lowercase() => Some(1.0),
        _ => Some(0.0),
    }
}

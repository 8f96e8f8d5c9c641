use std::sync::Arc;

use sift_config::MethodKind;

use crate::text::{normalize, term_counts, token_set};

/// A symmetric text similarity in `[0, 1]`.
///
/// Implementations must return `1.0` for two identical non-empty texts and
/// `0.0` when either text has no tokens.
pub trait TextSimilarity: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Token-set overlap: `|A ∩ B| / |A ∪ B|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jaccard;

impl TextSimilarity for Jaccard {
    fn name(&self) -> &'static str {
        "jaccard"
    }

    fn similarity(&self, a: &str, b: &str) -> f64 {
        let (na, nb) = (normalize(a), normalize(b));
        let (sa, sb) = (token_set(&na), token_set(&nb));
        if sa.is_empty() || sb.is_empty() {
            return 0.0;
        }
        let intersection = sa.intersection(&sb).count();
        let union = sa.len() + sb.len() - intersection;
        intersection as f64 / union as f64
    }
}

/// Cosine similarity over term-frequency vectors.
///
/// Computed on integer counts so identical texts score exactly `1.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl TextSimilarity for Cosine {
    fn name(&self) -> &'static str {
        "cosine"
    }

    fn similarity(&self, a: &str, b: &str) -> f64 {
        let (na, nb) = (normalize(a), normalize(b));
        let (ca, cb) = (term_counts(&na), term_counts(&nb));
        if ca.is_empty() || cb.is_empty() {
            return 0.0;
        }
        let dot: u64 = ca
            .iter()
            .filter_map(|(t, x)| cb.get(t).map(|y| x * y))
            .sum();
        let norm_a: u64 = ca.values().map(|x| x * x).sum();
        let norm_b: u64 = cb.values().map(|x| x * x).sum();
        let denom = ((norm_a as f64) * (norm_b as f64)).sqrt();
        if denom == 0.0 {
            return 0.0;
        }
        (dot as f64 / denom).min(1.0)
    }
}

/// Mean of [`Cosine`] and [`Jaccard`]; rewards both shared vocabulary and
/// repeated key terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hybrid;

impl TextSimilarity for Hybrid {
    fn name(&self) -> &'static str {
        "hybrid"
    }

    fn similarity(&self, a: &str, b: &str) -> f64 {
        (Cosine.similarity(a, b) + Jaccard.similarity(a, b)) / 2.0
    }
}

/// Normalized Levenshtein similarity over the normalized text. Sensitive to
/// word order, which suits numbered reproduction steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequence;

impl TextSimilarity for Sequence {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn similarity(&self, a: &str, b: &str) -> f64 {
        let (na, nb) = (normalize(a), normalize(b));
        if na.is_empty() || nb.is_empty() {
            return 0.0;
        }
        strsim::normalized_levenshtein(&na, &nb)
    }
}

/// The built-in strategy for a configured method.
pub fn strategy_for(method: MethodKind) -> Arc<dyn TextSimilarity> {
    match method {
        MethodKind::Jaccard => Arc::new(Jaccard),
        MethodKind::Cosine => Arc::new(Cosine),
        MethodKind::Hybrid => Arc::new(Hybrid),
        MethodKind::Sequence => Arc::new(Sequence),
    }
}

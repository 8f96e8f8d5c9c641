//! Requirement ↔ test-case coverage.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info};

use sift_core::{Coverage, DuplicatePair, GapReport, Record, Result, SiftError, percent};

use crate::mapping::MappingExtractor;
use crate::scorer::Scorer;

/// Map test cases onto requirements by exact id and flag near-identical
/// test cases that cover the same requirement.
///
/// Two test cases are duplicates when their body similarity is strictly
/// above `duplicate_threshold`. A pair sharing several requirements is
/// reported once, listing every shared requirement id.
pub fn analyze<M>(
    scorer: &Scorer,
    duplicate_threshold: f64,
    requirements: &[Record],
    test_cases: &[Record],
    extractor: &M,
) -> Result<GapReport>
where
    M: MappingExtractor + ?Sized,
{
    let mut known = HashSet::with_capacity(requirements.len());
    for req in requirements {
        req.validate()?;
        if req.id.trim().is_empty() {
            return Err(SiftError::invalid(req.label(), "requirement has no id"));
        }
        if !known.insert(req.id.as_str()) {
            return Err(SiftError::DuplicateId(req.id.clone()));
        }
    }
    for tc in test_cases {
        tc.validate()?;
    }

    let claims: Vec<BTreeSet<String>> = test_cases.iter().map(|tc| extractor.extract(tc)).collect();

    let orphans: Vec<String> = test_cases
        .iter()
        .zip(&claims)
        .filter(|(_, ids)| !ids.iter().any(|id| known.contains(id.as_str())))
        .map(|(tc, _)| tc.label().to_string())
        .collect();

    let mut coverage = Vec::with_capacity(requirements.len());
    // (first index, second index) -> (score, shared requirement ids)
    let mut pairs: BTreeMap<(usize, usize), (f64, Vec<String>)> = BTreeMap::new();
    let mut scored: BTreeMap<(usize, usize), f64> = BTreeMap::new();

    for req in requirements {
        let covering: Vec<usize> = claims
            .iter()
            .enumerate()
            .filter(|(_, ids)| ids.contains(&req.id))
            .map(|(i, _)| i)
            .collect();

        for (pos, &i) in covering.iter().enumerate() {
            for &j in &covering[pos + 1..] {
                let score = *scored
                    .entry((i, j))
                    .or_insert_with(|| scorer.body_similarity(&test_cases[i], &test_cases[j]));
                if score > duplicate_threshold {
                    debug!(
                        first = %test_cases[i].id,
                        second = %test_cases[j].id,
                        requirement = %req.id,
                        score,
                        "duplicate test cases"
                    );
                    pairs
                        .entry((i, j))
                        .or_insert_with(|| (score, Vec::new()))
                        .1
                        .push(req.id.clone());
                }
            }
        }

        coverage.push(Coverage {
            requirement_id: req.id.clone(),
            title: req.title.clone(),
            covered: !covering.is_empty(),
            test_case_ids: covering.iter().map(|&i| test_cases[i].id.clone()).collect(),
        });
    }

    let duplicates = pairs
        .into_iter()
        .map(|((i, j), (score, requirement_ids))| DuplicatePair {
            first: test_cases[i].id.clone(),
            second: test_cases[j].id.clone(),
            score,
            requirement_ids,
        })
        .collect::<Vec<_>>();

    let covered = coverage.iter().filter(|c| c.covered).count();
    let total = requirements.len();
    let report = GapReport {
        requirements: coverage,
        duplicates,
        orphans,
        covered,
        total,
        coverage_percent: percent(covered, total),
    };

    info!(
        covered,
        total,
        coverage = report.coverage_percent,
        duplicates = report.duplicates.len(),
        orphans = report.orphans.len(),
        "gap analysis complete"
    );
    Ok(report)
}

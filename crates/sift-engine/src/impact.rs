//! Map a code change onto the test cases that exercise it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use sift_core::{AttributeKey, Record};

use crate::text::{normalize, token_set};

/// Modules touched by a diff and the test cases selected for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub modules: Vec<String>,
    pub test_case_ids: Vec<String>,
}

/// Module keys touched by a unified git diff, sorted and de-duplicated.
///
/// A key is the first two segments of each `+++ b/<path>` target, or the
/// file name itself for top-level files. Deleted files (`+++ /dev/null`)
/// are skipped.
pub fn impacted_modules(diff: &str) -> Vec<String> {
    diff.lines()
        .filter_map(|line| line.trim_start().strip_prefix("+++ b/"))
        .map(str::trim_end)
        .filter(|path| !path.is_empty())
        .map(|path| {
            let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
            if parts.len() > 1 {
                format!("{}/{}", parts[0], parts[1])
            } else {
                parts.first().copied().unwrap_or(path).to_string()
            }
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The last segment of a module key without any file extension, normalized.
fn module_leaf(module: &str) -> String {
    let leaf = module.rsplit('/').next().unwrap_or(module);
    let stem = leaf.split_once('.').map(|(s, _)| s).unwrap_or(leaf);
    normalize(stem)
}

/// Test cases exercising any of `modules`, in test-case order.
///
/// A test case matches when its `module` attribute equals the module key or
/// its leaf, its `component` equals the leaf, or its title contains the leaf
/// as a word. All comparisons are case-insensitive.
pub fn select_impacted<'a>(modules: &[String], test_cases: &'a [Record]) -> Vec<&'a Record> {
    let targets: Vec<(String, String)> = modules
        .iter()
        .map(|m| (m.to_lowercase(), module_leaf(m)))
        .filter(|(_, leaf)| !leaf.is_empty())
        .collect();
    if targets.is_empty() {
        return Vec::new();
    }

    test_cases
        .iter()
        .filter(|tc| {
            let module = tc.attr(AttributeKey::Module).map(str::to_lowercase);
            let component = tc.attr(AttributeKey::Component).map(normalize);
            let title = normalize(&tc.title);
            let words = token_set(&title);
            targets.iter().any(|(key, leaf)| {
                module.as_deref() == Some(key.as_str())
                    || module.as_deref().map(normalize).as_deref() == Some(leaf.as_str())
                    || component.as_deref() == Some(leaf.as_str())
                    || words.contains(leaf.as_str())
            })
        })
        .collect()
}

/// Convenience: parse the diff and select impacted test cases in one step.
pub fn impact_report(diff: &str, test_cases: &[Record]) -> ImpactReport {
    let modules = impacted_modules(diff);
    let test_case_ids = select_impacted(&modules, test_cases)
        .into_iter()
        .map(|tc| tc.id.clone())
        .collect();
    ImpactReport {
        modules,
        test_case_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIFF: &str = "
    --- a/src/auth/login.py
    +++ b/src/auth/login.py
    @@ -10,3 +10,4 @@
    --- a/src/auth/session.py
    +++ b/src/auth/session.py
    --- a/README.md
    +++ b/README.md
    --- a/src/billing/old.py
    +++ /dev/null
    ";

    #[test]
    fn modules_from_diff() {
        assert_eq!(impacted_modules(DIFF), vec!["README.md", "src/auth"]);
    }

    #[test]
    fn empty_diff_has_no_modules() {
        assert!(impacted_modules("").is_empty());
        assert!(impacted_modules("just some text\n+ added line").is_empty());
    }

    #[test]
    fn selects_by_module_component_or_title() {
        let tests = vec![
            Record::new("TC-1", "Valid login", "").with_attr(AttributeKey::Module, "src/auth"),
            Record::new("TC-2", "Session expiry", "").with_attr(AttributeKey::Component, "Auth"),
            Record::new("TC-3", "Auth token refresh", ""),
            Record::new("TC-4", "Invoice totals", "").with_attr(AttributeKey::Component, "Billing"),
            Record::new("TC-5", "Readme links render", ""),
        ];
        let modules = impacted_modules(DIFF);
        let ids: Vec<_> = select_impacted(&modules, &tests)
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["TC-1", "TC-2", "TC-3", "TC-5"]);
    }

    #[test]
    fn impact_report_collects_ids() {
        let tests = vec![Record::new("TC-1", "auth smoke", "")];
        let report = impact_report("+++ b/src/auth/x.rs\n", &tests);
        assert_eq!(report.modules, vec!["src/auth"]);
        assert_eq!(report.test_case_ids, vec!["TC-1"]);
    }
}

use std::path::Path;

use sift_config::{ConfigWarning, SiftConfig, WarningSeverity};

/// Findings of a configuration audit, already rendered.
#[derive(Debug, Default)]
pub struct Audit {
    pub output: String,
    pub errors: usize,
    pub warnings: usize,
    pub suggestions: usize,
}

/// Doctor-only hints on top of `SiftConfig::audit`.
fn suggestions(config: &SiftConfig) -> Vec<ConfigWarning> {
    let mut hints = Vec::new();
    let t = &config.thresholds;
    if t.possible <= t.high && t.high - t.possible < 0.05 {
        hints.push(ConfigWarning {
            field: "thresholds".into(),
            message: "the possible band is narrower than 0.05, few matches will need review"
                .into(),
            severity: WarningSeverity::Info,
            hint: None,
        });
    }
    if config.scoring.steps_method.is_none() && config.scoring.weights.steps > 0.0 {
        hints.push(ConfigWarning {
            field: "scoring.steps_method".into(),
            message: format!("steps are compared with '{}'", config.scoring.method),
            severity: WarningSeverity::Info,
            hint: Some("'sequence' is order-sensitive and suits numbered steps".into()),
        });
    }
    hints
}

/// Audit `config` (read from `path`) without rejecting it on errors.
pub fn run(config: &SiftConfig, path: &Path) -> Audit {
    let mut audit = Audit::default();
    let mut out = String::from("🩺 Sift Doctor — Configuration Audit\n\n");

    if path.exists() {
        out.push_str(&format!("  📄 config: {}\n", path.display()));
    } else {
        out.push_str(&format!(
            "  📄 config: {} (not found, using defaults)\n",
            path.display()
        ));
    }

    let mut findings = config.audit();
    findings.extend(suggestions(config));
    for w in &findings {
        out.push_str(&format!("  {w}\n"));
        match w.severity {
            WarningSeverity::Error => audit.errors += 1,
            WarningSeverity::Warning => audit.warnings += 1,
            WarningSeverity::Info => audit.suggestions += 1,
        }
    }

    out.push('\n');
    if findings.is_empty() {
        out.push_str("  ✅ No problems found\n");
    } else {
        out.push_str(&format!(
            "  ❌ {} errors, ⚠️  {} warnings, 💡 {} suggestions\n",
            audit.errors, audit.warnings, audit.suggestions
        ));
    }
    audit.output = out;
    audit
}

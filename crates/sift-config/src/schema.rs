use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root configuration — maps to `sift.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    pub scoring: ScoringConfig,
    pub thresholds: Thresholds,
    pub gap: GapConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

// ── Scoring ────────────────────────────────────────────────────

/// Token-similarity method used for text fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    /// Token-set overlap: |A ∩ B| / |A ∪ B|.
    #[default]
    Jaccard,
    /// Cosine over term-frequency vectors.
    Cosine,
    /// Mean of cosine and jaccard.
    Hybrid,
    /// Normalized edit distance over the normalized text.
    Sequence,
}

impl MethodKind {
    pub const ALL: [MethodKind; 4] = [
        MethodKind::Jaccard,
        MethodKind::Cosine,
        MethodKind::Hybrid,
        MethodKind::Sequence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::Jaccard => "jaccard",
            MethodKind::Cosine => "cosine",
            MethodKind::Hybrid => "hybrid",
            MethodKind::Sequence => "sequence",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        MethodKind::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = MethodKind::ALL.iter().map(|m| m.as_str()).collect();
                format!("unknown similarity method '{}' (valid: {})", s, valid.join(", "))
            })
    }
}

/// Relative weight of each field in the combined score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub title: f64,
    pub body: f64,
    pub component: f64,
    pub steps: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            title: 0.4,
            body: 0.4,
            component: 0.1,
            steps: 0.1,
        }
    }
}

impl Weights {
    pub fn total(&self) -> f64 {
        self.title + self.body + self.component + self.steps
    }

    fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("title", self.title),
            ("body", self.body),
            ("component", self.component),
            ("steps", self.steps),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Method for title and body similarity.
    pub method: MethodKind,
    /// Method for steps-to-reproduce. Falls back to `method` when unset.
    pub steps_method: Option<MethodKind>,
    pub weights: Weights,
}

impl ScoringConfig {
    pub fn steps_method(&self) -> MethodKind {
        self.steps_method.unwrap_or(self.method)
    }
}

// ── Thresholds ─────────────────────────────────────────────────

/// Confidence band cut-offs. `score > high` is high confidence,
/// `possible <= score <= high` is a possible match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub high: f64,
    pub possible: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: 0.85,
            possible: 0.70,
        }
    }
}

// ── Gap analysis ───────────────────────────────────────────────

/// How test cases declare the requirements they cover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingKind {
    /// Ids listed in the `covers` attribute.
    #[default]
    Attribute,
    /// Ids matched by `gap.pattern` anywhere in the test case text.
    Pattern,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    pub mapping: MappingKind,
    /// Regex used by the `pattern` mapping.
    pub pattern: String,
    /// Body similarity above which two test cases are flagged as duplicates.
    pub duplicate_threshold: f64,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            mapping: MappingKind::Attribute,
            pattern: r"REQ-\d+".into(),
            duplicate_threshold: 0.85,
        }
    }
}

// ── Report ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!(
                "unknown report format '{other}' (valid: markdown, text, json)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: ReportFormat,
    /// Matches below this score are hidden from rendered reports.
    pub min_score: f64,
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json", "compact".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.severity {
            WarningSeverity::Error => "❌",
            WarningSeverity::Warning => "⚠️ ",
            WarningSeverity::Info => "💡",
        };
        write!(f, "{} {}: {}", icon, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {}", h)?;
        }
        Ok(())
    }
}

fn in_unit_range(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

impl SiftConfig {
    /// Every issue found in the config, errors included.
    pub fn audit(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // ── Weights ───
        let weights = &self.scoring.weights;
        for (name, value) in weights.fields() {
            if !value.is_finite() || value < 0.0 {
                warnings.push(ConfigWarning {
                    field: format!("scoring.weights.{name}"),
                    message: format!("weight {value} must be a non-negative number"),
                    severity: WarningSeverity::Error,
                    hint: Some("Defaults are title 0.4, body 0.4, component 0.1, steps 0.1".into()),
                });
            }
        }
        let total = weights.total();
        if total <= 0.0 {
            warnings.push(ConfigWarning {
                field: "scoring.weights".into(),
                message: "all weights are zero — every score would be 0".into(),
                severity: WarningSeverity::Error,
                hint: Some("Give at least title or body a positive weight".into()),
            });
        } else if (total - 1.0).abs() > 1e-6 {
            warnings.push(ConfigWarning {
                field: "scoring.weights".into(),
                message: format!("weights sum to {total:.3}, not 1.0"),
                severity: WarningSeverity::Info,
                hint: Some("Weights are normalized, so only their ratios matter".into()),
            });
        }

        // ── Thresholds ───
        let t = &self.thresholds;
        for (name, value) in [("high", t.high), ("possible", t.possible)] {
            if !in_unit_range(value) {
                warnings.push(ConfigWarning {
                    field: format!("thresholds.{name}"),
                    message: format!("threshold {value} is outside [0, 1]"),
                    severity: WarningSeverity::Error,
                    hint: Some("Scores are always between 0.0 and 1.0".into()),
                });
            }
        }
        if t.possible > t.high {
            warnings.push(ConfigWarning {
                field: "thresholds.possible".into(),
                message: format!(
                    "possible ({}) is above high ({}) — bands would overlap",
                    t.possible, t.high
                ),
                severity: WarningSeverity::Error,
                hint: Some("Keep possible <= high, e.g. 0.70 and 0.85".into()),
            });
        } else if t.high >= 1.0 {
            warnings.push(ConfigWarning {
                field: "thresholds.high".into(),
                message: "high is 1.0 — nothing can be classified as a duplicate".into(),
                severity: WarningSeverity::Warning,
                hint: Some("A value around 0.85 is typical".into()),
            });
        }

        // ── Gap analysis ───
        if !in_unit_range(self.gap.duplicate_threshold) {
            warnings.push(ConfigWarning {
                field: "gap.duplicate_threshold".into(),
                message: format!(
                    "threshold {} is outside [0, 1]",
                    self.gap.duplicate_threshold
                ),
                severity: WarningSeverity::Error,
                hint: None,
            });
        }
        if self.gap.mapping == MappingKind::Pattern {
            if self.gap.pattern.trim().is_empty() {
                warnings.push(ConfigWarning {
                    field: "gap.pattern".into(),
                    message: "pattern mapping selected but pattern is empty".into(),
                    severity: WarningSeverity::Error,
                    hint: Some(r"Set e.g. 'REQ-\d+'".into()),
                });
            } else if let Err(e) = regex::Regex::new(&self.gap.pattern) {
                warnings.push(ConfigWarning {
                    field: "gap.pattern".into(),
                    message: format!("invalid regex: {e}"),
                    severity: WarningSeverity::Error,
                    hint: None,
                });
            }
        }

        // ── Report ───
        if !in_unit_range(self.report.min_score) {
            warnings.push(ConfigWarning {
                field: "report.min_score".into(),
                message: format!("min_score {} is outside [0, 1]", self.report.min_score),
                severity: WarningSeverity::Warning,
                hint: None,
            });
        }

        // ── Logging format ───
        let valid_formats = ["pretty", "json", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }

        // ── Logging level ───
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_levels.join(", "))),
            });
        }

        warnings
    }

    /// Validate the config and return a list of warnings.
    /// Returns `Err` with all messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let warnings = self.audit();
        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}

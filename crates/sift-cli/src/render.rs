//! Human-readable and JSON renderings of engine output.

use serde_json::{Value, json};

use sift_config::ReportFormat;
use sift_core::{ConfidenceBand, GapReport, Report, Result, Verdict};
use sift_engine::ImpactReport;

const TITLE_WIDTH: usize = 50;

fn pct(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}

/// Shorten to `max` characters, appending "..." if truncated.
fn truncate(s: &str, max: usize) -> String {
    let flat = s.replace('\n', " ");
    if flat.chars().count() <= max {
        flat
    } else {
        format!("{}...", flat.chars().take(max).collect::<String>())
    }
}

fn cell(s: &str) -> String {
    s.replace('|', "\\|")
}

/// One-line advice for a report.
pub fn recommendation(report: &Report) -> String {
    match report.verdict {
        Verdict::Duplicate => match report.top() {
            Some(top) => format!("Review {} before creating a new ticket.", top.record_id),
            None => "Review the high-confidence matches before creating a new ticket.".into(),
        },
        Verdict::Review => {
            "Check possible duplicates or add more details to differentiate.".into()
        }
        Verdict::Unique => "No duplicates found. Proceed with ticket creation.".into(),
    }
}

// ── Duplicate reports ──────────────────────────────────────────

pub fn report_json(report: &Report, min_score: f64) -> Value {
    let shown = report.above(min_score);
    json!({
        "query_id": report.query_id,
        "query_title": report.query_title,
        "candidates_checked": report.candidates_checked,
        "matches_found": shown.len(),
        "verdict": report.verdict,
        "recommendation": recommendation(report),
        "matches": shown,
    })
}

pub fn report_markdown(report: &Report, min_score: f64) -> String {
    let mut out = format!(
        "## Duplicate check: {} ({})\n\n",
        report.query_title, report.query_id
    );
    let shown = report.above(min_score);
    if shown.is_empty() {
        out.push_str(&format!(
            "_No matches at or above {} among {} candidates._\n\n",
            pct(min_score),
            report.candidates_checked
        ));
    } else {
        out.push_str("| Rank | Record | Title | Similarity | Confidence |\n");
        out.push_str("|------|--------|-------|------------|------------|\n");
        for (i, m) in shown.iter().enumerate() {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                i + 1,
                cell(&m.record_id),
                cell(&truncate(&m.title, TITLE_WIDTH)),
                pct(m.score),
                m.band
            ));
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "**Verdict:** {} — {}\n",
        report.verdict,
        recommendation(report)
    ));
    out
}

pub fn report_text(report: &Report, min_score: f64) -> String {
    let shown = report.above(min_score);
    let high: Vec<_> = shown.iter().filter(|m| m.band == ConfidenceBand::High).collect();
    let possible: Vec<_> = shown
        .iter()
        .filter(|m| m.band == ConfidenceBand::Possible)
        .collect();

    if report.verdict == Verdict::Unique {
        return format!(
            "✅ {}: no duplicate found among {} candidates - safe to create a new ticket.\n",
            report.query_id, report.candidates_checked
        );
    }
    let hidden = report
        .matches
        .iter()
        .filter(|m| m.band != ConfidenceBand::Low && m.score < min_score)
        .count();

    let mut lines = vec![
        format!("Duplicate Check Results: {}", report.query_id),
        "=".repeat(50),
    ];
    if !high.is_empty() {
        lines.push("\n🔴 HIGH PROBABILITY DUPLICATES:".into());
        for m in &high {
            lines.push(format!(
                "   • {}: \"{}\" ({} match)",
                m.record_id,
                truncate(&m.title, TITLE_WIDTH),
                pct(m.score)
            ));
            if let Some(url) = &m.url {
                lines.push(format!("     URL: {url}"));
            }
        }
    }
    if !possible.is_empty() {
        lines.push("\n🟡 POSSIBLE DUPLICATES (Review recommended):".into());
        for m in &possible {
            lines.push(format!(
                "   • {}: \"{}\" ({} match)",
                m.record_id,
                truncate(&m.title, TITLE_WIDTH),
                pct(m.score)
            ));
        }
    }
    if hidden > 0 {
        lines.push(format!(
            "\n⚠️  {hidden} possible or likely duplicate(s) hidden below {}",
            pct(min_score)
        ));
    }
    lines.push("\n📋 Recommendation:".into());
    lines.push(format!("   → {}", recommendation(report)));
    lines.join("\n") + "\n"
}

/// Render one or more reports; several reports become a JSON array or
/// consecutive sections.
pub fn reports(reports: &[Report], format: ReportFormat, min_score: f64) -> Result<String> {
    match format {
        ReportFormat::Json => {
            let value = match reports {
                [single] => report_json(single, min_score),
                many => Value::Array(many.iter().map(|r| report_json(r, min_score)).collect()),
            };
            Ok(serde_json::to_string_pretty(&value)? + "\n")
        }
        ReportFormat::Markdown => Ok(reports
            .iter()
            .map(|r| report_markdown(r, min_score))
            .collect::<Vec<_>>()
            .join("\n")),
        ReportFormat::Text => Ok(reports
            .iter()
            .map(|r| report_text(r, min_score))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

// ── Gap reports ────────────────────────────────────────────────

pub fn gap(report: &GapReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
        ReportFormat::Markdown => Ok(gap_markdown(report)),
        ReportFormat::Text => Ok(gap_text(report)),
    }
}

fn gap_markdown(report: &GapReport) -> String {
    let mut out = format!(
        "## Requirement coverage: {}/{} ({:.1}%)\n\n",
        report.covered, report.total, report.coverage_percent
    );
    if !report.requirements.is_empty() {
        out.push_str("| Requirement | Title | Covered | Test cases |\n");
        out.push_str("|-------------|-------|---------|------------|\n");
        for c in &report.requirements {
            let tests = if c.test_case_ids.is_empty() {
                "—".to_string()
            } else {
                c.test_case_ids.join(", ")
            };
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                cell(&c.requirement_id),
                cell(&truncate(&c.title, TITLE_WIDTH)),
                if c.covered { "✅" } else { "❌" },
                cell(&tests)
            ));
        }
        out.push('\n');
    }
    if !report.duplicates.is_empty() {
        out.push_str("### Duplicate test cases\n\n");
        out.push_str("| First | Second | Similarity | Requirements |\n");
        out.push_str("|-------|--------|------------|--------------|\n");
        for d in &report.duplicates {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                cell(&d.first),
                cell(&d.second),
                pct(d.score),
                cell(&d.requirement_ids.join(", "))
            ));
        }
        out.push('\n');
    }
    if !report.orphans.is_empty() {
        out.push_str("### Test cases without a known requirement\n\n");
        for id in &report.orphans {
            out.push_str(&format!("- {id}\n"));
        }
        out.push('\n');
    }
    out
}

fn gap_text(report: &GapReport) -> String {
    let mut lines = vec![format!(
        "Coverage: {}/{} requirements ({:.1}%)",
        report.covered, report.total, report.coverage_percent
    )];
    let uncovered: Vec<_> = report.uncovered().collect();
    if uncovered.is_empty() {
        lines.push("✅ Every requirement has at least one test case.".into());
    } else {
        lines.push("\n❌ GAPS:".into());
        for c in uncovered {
            lines.push(format!("   • {}: {}", c.requirement_id, truncate(&c.title, TITLE_WIDTH)));
        }
    }
    if !report.duplicates.is_empty() {
        lines.push("\n🟡 DUPLICATE TEST CASES:".into());
        for d in &report.duplicates {
            lines.push(format!(
                "   • {} ≈ {} ({} match, {})",
                d.first,
                d.second,
                pct(d.score),
                d.requirement_ids.join(", ")
            ));
        }
    }
    if !report.orphans.is_empty() {
        lines.push(format!("\n💡 Unmapped test cases: {}", report.orphans.join(", ")));
    }
    lines.join("\n") + "\n"
}

// ── Impact reports ─────────────────────────────────────────────

pub fn impact(report: &ImpactReport, format: ReportFormat) -> Result<String> {
    if format == ReportFormat::Json {
        return Ok(serde_json::to_string_pretty(report)? + "\n");
    }
    let bullet = if format == ReportFormat::Markdown { "-" } else { "  •" };
    let mut out = String::new();
    if format == ReportFormat::Markdown {
        out.push_str("## Impacted modules\n\n");
    } else {
        out.push_str("Impacted modules:\n");
    }
    if report.modules.is_empty() {
        out.push_str("(none)\n");
    }
    for m in &report.modules {
        out.push_str(&format!("{bullet} {m}\n"));
    }
    if !report.test_case_ids.is_empty() {
        out.push_str(if format == ReportFormat::Markdown {
            "\n## Test cases to run\n\n"
        } else {
            "\nTest cases to run:\n"
        });
        for id in &report.test_case_ids {
            out.push_str(&format!("{bullet} {id}\n"));
        }
    }
    Ok(out)
}

use clap::Args;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use sift_config::{ReportFormat, SiftConfig};
use sift_core::Result;
use sift_engine::{JsonFileSource, impact_report};

use crate::render;

#[derive(Debug, Args)]
pub struct ImpactArgs {
    /// Unified diff to analyze (`-` reads stdin)
    #[arg(long)]
    pub diff: PathBuf,

    /// JSON file holding the test cases to select from
    #[arg(long)]
    pub tests: Option<PathBuf>,

    /// Output format: markdown, text, json
    #[arg(short, long)]
    pub format: Option<ReportFormat>,
}

pub async fn run(config: &SiftConfig, args: &ImpactArgs) -> Result<String> {
    let diff = if args.diff.as_os_str() == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(&args.diff).await?
    };

    let test_cases = match &args.tests {
        Some(path) => JsonFileSource::new(path).load().await?,
        None => Vec::new(),
    };

    let report = impact_report(&diff, &test_cases);
    tracing::info!(
        modules = report.modules.len(),
        selected = report.test_case_ids.len(),
        "impact analysis complete"
    );
    render::impact(&report, args.format.unwrap_or(config.report.format))
}

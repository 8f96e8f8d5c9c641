use clap::Args;
use std::path::PathBuf;

use sift_config::{MappingKind, ReportFormat, SiftConfig};
use sift_core::Result;
use sift_engine::{Engine, JsonFileSource, mapping};

use crate::render;

#[derive(Debug, Args)]
pub struct GapArgs {
    /// JSON file holding the requirements
    #[arg(long)]
    pub requirements: PathBuf,

    /// JSON file holding the test cases
    #[arg(long)]
    pub tests: PathBuf,

    /// Find requirement ids in test case text with this regex instead of
    /// reading the `covers` attribute
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Output format: markdown, text, json
    #[arg(short, long)]
    pub format: Option<ReportFormat>,
}

pub async fn run(config: &SiftConfig, args: &GapArgs) -> Result<String> {
    let mut gap_config = config.gap.clone();
    if let Some(pattern) = &args.pattern {
        gap_config.mapping = MappingKind::Pattern;
        gap_config.pattern = pattern.clone();
    }
    let extractor = mapping::from_config(&gap_config)?;

    let requirements = JsonFileSource::new(&args.requirements).load().await?;
    let test_cases = JsonFileSource::new(&args.tests).load().await?;

    let report = Engine::from_config(config).gap_analysis(
        &requirements,
        &test_cases,
        extractor.as_ref(),
    )?;

    render::gap(&report, args.format.unwrap_or(config.report.format))
}

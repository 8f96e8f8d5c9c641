use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use sift_config::{MethodKind, ReportFormat, SiftConfig};
use sift_core::{Report, Result, SiftError};
use sift_engine::{Engine, JsonFileSource};

use crate::render;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// JSON file holding the new bug (an object) or several (an array)
    #[arg(long)]
    pub query: PathBuf,

    /// JSON file holding the existing bugs to compare against
    #[arg(long)]
    pub corpus: PathBuf,

    /// Only rank corpus records sharing a keyword with the query title
    #[arg(long)]
    pub search: bool,

    /// Hide matches scoring below this value (0.0 - 1.0)
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Similarity method: jaccard, cosine, hybrid, sequence
    #[arg(short, long)]
    pub method: Option<MethodKind>,

    /// Output format: markdown, text, json
    #[arg(short, long)]
    pub format: Option<ReportFormat>,
}

/// Rank every query record and render the reports.
pub async fn run(config: &SiftConfig, args: &CheckArgs) -> Result<String> {
    let mut config = config.clone();
    if let Some(method) = args.method {
        config.scoring.method = method;
    }
    let engine = Engine::from_config(&config);

    let queries = JsonFileSource::new(&args.query).load().await?;
    if queries.is_empty() {
        return Err(SiftError::invalid(
            args.query.display().to_string(),
            "query file contains no records",
        ));
    }

    let source = JsonFileSource::new(&args.corpus);
    let reports = if args.search {
        let mut reports: Vec<Report> = Vec::with_capacity(queries.len());
        for query in &queries {
            reports.push(engine.check(&source, query).await?);
        }
        reports
    } else {
        let corpus = Arc::new(source.load().await?);
        engine.rank_all(queries, corpus).await?
    };

    info!(
        reports = reports.len(),
        method = %config.scoring.method,
        "duplicate check complete"
    );

    render::reports(
        &reports,
        args.format.unwrap_or(config.report.format),
        args.min_score.unwrap_or(config.report.min_score),
    )
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{NamedTempFile, TempDir};

    use sift_cli::Cli;
    use sift_cli::commands::{CheckArgs, Commands, GapArgs, ImpactArgs, check, gap, impact};
    use sift_config::{MethodKind, ReportFormat, SiftConfig};
    use sift_core::SiftError;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    const CORPUS: &str = r#"[
        {"id": "BUG-245", "title": "Login failure on iOS browsers",
         "url": "https://tracker.example/BUG-245"},
        {"id": "BUG-189", "title": "Button click not registering on mobile"},
        {"id": "BUG-300", "title": "Invoice PDF missing logo"}
    ]"#;

    fn check_args(query: PathBuf, corpus: PathBuf) -> CheckArgs {
        CheckArgs {
            query,
            corpus,
            search: false,
            min_score: None,
            method: None,
            format: Some(ReportFormat::Json),
        }
    }

    // ── Argument parsing ───────────────────────────────────────

    #[test]
    fn test_parse_check_with_overrides() {
        let cli = Cli::try_parse_from([
            "sift", "check", "--query", "q.json", "--corpus", "c.json", "--search",
            "--min-score", "0.5", "-m", "cosine", "-f", "text",
        ])
        .unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.query, PathBuf::from("q.json"));
                assert!(args.search);
                assert_eq!(args.min_score, Some(0.5));
                assert_eq!(args.method, Some(MethodKind::Cosine));
                assert_eq!(args.format, Some(ReportFormat::Text));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_method() {
        let err = Cli::try_parse_from([
            "sift", "check", "--query", "q", "--corpus", "c", "--method", "soundex",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("soundex"));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sift", "doctor", "-v", "--config", "x.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert_eq!(cli.log_level(&SiftConfig::default()), "debug");
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["sift", "version", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        let cli = Cli::try_parse_from(["sift", "version"]).unwrap();
        let mut config = SiftConfig::default();
        config.logging.level = "warn".into();
        assert_eq!(cli.log_level(&config), "warn");

        let cli = Cli::try_parse_from(["sift", "version", "-l", "trace"]).unwrap();
        assert_eq!(cli.log_level(&config), "trace");
    }

    #[test]
    fn test_parse_gap_and_impact() {
        let cli = Cli::try_parse_from([
            "sift", "gap", "--requirements", "r.json", "--tests", "t.json", "-p", "REQ-\\d+",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Gap(GapArgs { pattern: Some(_), .. })));

        let cli = Cli::try_parse_from(["sift", "impact", "--diff", "-"]).unwrap();
        assert!(matches!(cli.command, Commands::Impact(ImpactArgs { tests: None, .. })));
    }

    // ── check ──────────────────────────────────────────────────

    #[tokio::test]
    async fn test_check_json_report() {
        let dir = TempDir::new().unwrap();
        let query = write(
            &dir,
            "query.json",
            r#"{"id": "NEW-1", "title": "Login button unresponsive on iPhone Safari"}"#,
        );
        let corpus = write(&dir, "corpus.json", CORPUS);

        let out = check::run(&SiftConfig::default(), &check_args(query, corpus))
            .await
            .unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["query_id"], "NEW-1");
        assert_eq!(v["candidates_checked"], 3);
        assert_eq!(v["matches"][0]["record_id"], "BUG-245");
        assert_eq!(v["matches"][0]["url"], "https://tracker.example/BUG-245");
    }

    #[tokio::test]
    async fn test_check_search_narrows_candidates() {
        let dir = TempDir::new().unwrap();
        let query = write(&dir, "query.json", r#"{"id": "NEW-1", "title": "Login hangs"}"#);
        let corpus = write(&dir, "corpus.json", CORPUS);
        let mut args = check_args(query, corpus);
        args.search = true;

        let out = check::run(&SiftConfig::default(), &args).await.unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["candidates_checked"], 1);
    }

    #[tokio::test]
    async fn test_check_min_score_hides_weak_matches() {
        let dir = TempDir::new().unwrap();
        let query = write(
            &dir,
            "query.json",
            r#"{"id": "NEW-1", "title": "Login failure on iOS browsers"}"#,
        );
        let corpus = write(&dir, "corpus.json", CORPUS);
        let mut args = check_args(query, corpus);
        args.min_score = Some(0.9);

        let out = check::run(&SiftConfig::default(), &args).await.unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["matches_found"], 1);
        assert_eq!(v["verdict"], "duplicate");
    }

    #[tokio::test]
    async fn test_check_several_queries_markdown() {
        let dir = TempDir::new().unwrap();
        let query = write(
            &dir,
            "query.json",
            r#"[{"id": "NEW-1", "title": "Login failure"}, {"id": "NEW-2", "title": "Invoice logo"}]"#,
        );
        let corpus = write(&dir, "corpus.json", CORPUS);
        let mut args = check_args(query, corpus);
        args.format = Some(ReportFormat::Markdown);

        let out = check::run(&SiftConfig::default(), &args).await.unwrap();
        let first = out.find("NEW-1").unwrap();
        let second = out.find("NEW-2").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_check_empty_query_file_is_error() {
        let dir = TempDir::new().unwrap();
        let query = write(&dir, "query.json", "[]");
        let corpus = write(&dir, "corpus.json", CORPUS);
        let err = check::run(&SiftConfig::default(), &check_args(query, corpus))
            .await
            .unwrap_err();
        assert!(matches!(err, SiftError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_check_missing_corpus_is_source_error() {
        let dir = TempDir::new().unwrap();
        let query = write(&dir, "query.json", r#"{"id": "Q", "title": "x"}"#);
        let err = check::run(
            &SiftConfig::default(),
            &check_args(query, dir.path().join("missing.json")),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SiftError::Source { .. }));
    }

    // ── gap ────────────────────────────────────────────────────

    const REQUIREMENTS: &str = r#"[
        {"id": "REQ-1", "title": "User can log in"},
        {"id": "REQ-2", "title": "User can log out"}
    ]"#;

    #[tokio::test]
    async fn test_gap_reads_covers_attribute() {
        let dir = TempDir::new().unwrap();
        let requirements = write(&dir, "req.json", REQUIREMENTS);
        let tests = write(
            &dir,
            "tests.json",
            r#"[{"id": "TC-1", "title": "Valid login", "covers": ["REQ-1"]}]"#,
        );
        let args = GapArgs {
            requirements,
            tests,
            pattern: None,
            format: Some(ReportFormat::Json),
        };
        let out = gap::run(&SiftConfig::default(), &args).await.unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["covered"], 1);
        assert_eq!(v["total"], 2);
        assert_eq!(v["coverage_percent"], 50.0);
    }

    #[tokio::test]
    async fn test_gap_pattern_override() {
        let dir = TempDir::new().unwrap();
        let requirements = write(&dir, "req.json", REQUIREMENTS);
        let tests = write(
            &dir,
            "tests.json",
            r#"[{"id": "TC-1", "title": "Covers REQ-1 and REQ-2"}]"#,
        );
        let args = GapArgs {
            requirements,
            tests,
            pattern: Some(r"REQ-\d+".into()),
            format: Some(ReportFormat::Text),
        };
        let out = gap::run(&SiftConfig::default(), &args).await.unwrap();
        assert!(out.starts_with("Coverage: 2/2 requirements (100.0%)"));
    }

    #[tokio::test]
    async fn test_gap_invalid_pattern() {
        let dir = TempDir::new().unwrap();
        let args = GapArgs {
            requirements: write(&dir, "req.json", REQUIREMENTS),
            tests: write(&dir, "tests.json", "[]"),
            pattern: Some("REQ-(".into()),
            format: None,
        };
        let err = gap::run(&SiftConfig::default(), &args).await.unwrap_err();
        assert!(matches!(err, SiftError::InvalidPattern(_)));
    }

    // ── impact ─────────────────────────────────────────────────

    #[tokio::test]
    async fn test_impact_selects_tests() {
        let dir = TempDir::new().unwrap();
        let mut diff = NamedTempFile::new_in(dir.path()).unwrap();
        writeln!(diff, "--- a/src/auth/login.rs\n+++ b/src/auth/login.rs\n@@ -1 +1 @@").unwrap();
        let tests = write(
            &dir,
            "tests.json",
            r#"[{"id": "TC-1", "title": "Auth smoke"}, {"id": "TC-2", "title": "Invoice totals"}]"#,
        );
        let args = ImpactArgs {
            diff: diff.path().to_path_buf(),
            tests: Some(tests),
            format: Some(ReportFormat::Json),
        };
        let out = impact::run(&SiftConfig::default(), &args).await.unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["modules"][0], "src/auth");
        assert_eq!(v["test_case_ids"], serde_json::json!(["TC-1"]));
    }

    #[tokio::test]
    async fn test_impact_without_tests_lists_modules() {
        let dir = TempDir::new().unwrap();
        let diff = write(&dir, "change.diff", "+++ b/README.md\n");
        let args = ImpactArgs {
            diff,
            tests: None,
            format: Some(ReportFormat::Text),
        };
        let out = impact::run(&SiftConfig::default(), &args).await.unwrap();
        assert!(out.contains("README.md"));
        assert!(!out.contains("Test cases to run"));
    }
}

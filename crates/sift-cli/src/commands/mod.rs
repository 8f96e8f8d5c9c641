use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use sift_config::{ConfigLoader, SiftConfig};
use sift_core::{Result, SiftError};

pub mod check;
pub mod doctor;
pub mod gap;
pub mod impact;

pub use check::CheckArgs;
pub use gap::GapArgs;
pub use impact::ImpactArgs;

/// 🔎 Sift — duplicate detection and requirement coverage for QA records
#[derive(Debug, Parser)]
#[command(name = "sift", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to sift.toml config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rank a new bug report against existing ones
    Check(CheckArgs),
    /// Map test cases onto requirements and report coverage gaps
    Gap(GapArgs),
    /// List modules touched by a diff and the test cases to run
    Impact(ImpactArgs),
    /// Show current configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Audit configuration for problems
    Doctor,
    /// Show version and build info
    Version,
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Resolve log level: --verbose > --quiet > --log-level > config
    pub fn log_level<'a>(&'a self, config: &'a SiftConfig) -> &'a str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level.as_deref().unwrap_or(&config.logging.level)
        }
    }

    pub async fn run(self) -> Result<()> {
        // Load config first so we can use it for log format. Doctor reports
        // validation errors itself instead of failing on them.
        let config_loader = match self.command {
            Commands::Doctor => ConfigLoader::read(self.config.as_deref())?,
            _ => ConfigLoader::load(self.config.as_deref())?,
        };
        let config = config_loader.get();

        init_tracing(self.log_level(&config), &config.logging.format);

        match self.command {
            Commands::Check(args) => print(check::run(&config, &args).await?),
            Commands::Gap(args) => print(gap::run(&config, &args).await?),
            Commands::Impact(args) => print(impact::run(&config, &args).await?),
            Commands::Config { json } => Self::cmd_config(config, json),
            Commands::Doctor => Self::cmd_doctor(config, &config_loader),
            Commands::Version => Self::cmd_version(),
            Commands::Completions { shell } => Self::cmd_completions(shell),
        }
    }

    fn cmd_config(config: SiftConfig, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config).map_err(|e| SiftError::Config(e.to_string()))?
            );
        }
        Ok(())
    }

    fn cmd_doctor(config: SiftConfig, loader: &ConfigLoader) -> Result<()> {
        let audit = doctor::run(&config, loader.path());
        print!("{}", audit.output);
        if audit.errors > 0 {
            return Err(SiftError::Config(format!(
                "{} configuration error(s) found",
                audit.errors
            )));
        }
        Ok(())
    }

    fn cmd_version() -> Result<()> {
        println!("🔎 Sift v{}", env!("CARGO_PKG_VERSION"));
        println!("   Rust edition: 2024");
        println!("   Target: {}", std::env::consts::ARCH);
        println!("   OS: {}", std::env::consts::OS);
        #[cfg(debug_assertions)]
        println!("   Profile: debug");
        #[cfg(not(debug_assertions))]
        println!("   Profile: release");
        Ok(())
    }

    fn cmd_completions(shell: Shell) -> Result<()> {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "sift", &mut std::io::stdout());
        Ok(())
    }
}

fn print(output: String) -> Result<()> {
    print!("{output}");
    Ok(())
}

/// Install the global subscriber. Logs go to stderr so reports on stdout
/// stay machine-readable.
fn init_tracing(level: &str, format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = match format {
        "json" => builder.json().with_target(true).try_init(),
        "compact" => builder.compact().with_target(false).try_init(),
        _ => builder.with_target(false).try_init(),
    };
}

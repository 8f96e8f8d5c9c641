use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use sift_core::{Result, SiftError};

use crate::schema::SiftConfig;

/// Loads the sift configuration from disk and the environment.
pub struct ConfigLoader {
    config: SiftConfig,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > SIFT_CONFIG env > ./sift.toml > ~/.sift/sift.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("SIFT_CONFIG") {
            return PathBuf::from(p);
        }
        let local = PathBuf::from("sift.toml");
        if local.exists() {
            return local;
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sift")
            .join("sift.toml")
    }

    /// Load the config from disk, falling back to defaults, and reject it
    /// if validation finds any error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let loader = Self::read(path)?;
        match loader.config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => return Err(SiftError::Config(e)),
        }
        Ok(loader)
    }

    /// Parse the config and apply env overrides without validating it.
    pub fn read(path: Option<&Path>) -> Result<Self> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            Self::parse(&raw, &config_path)?
        } else {
            debug!(?config_path, "config file not found, using defaults");
            SiftConfig::default()
        };

        let config = Self::apply_env_overrides(config)?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Parse TOML content. `origin` is only used in error messages.
    pub fn parse(raw: &str, origin: &Path) -> Result<SiftConfig> {
        toml::from_str::<SiftConfig>(raw).map_err(|e| {
            SiftError::Config(format!("failed to parse {}: {}", origin.display(), e))
        })
    }

    /// Get a copy of the loaded config.
    pub fn get(&self) -> SiftConfig {
        self.config.clone()
    }

    /// Path the config was (or would have been) read from.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Apply env var overrides (SIFT_METHOD, SIFT_HIGH_THRESHOLD, etc.)
    ///
    /// Unlike the file, a malformed override is an error: it was set on purpose.
    pub fn apply_env_overrides(mut config: SiftConfig) -> Result<SiftConfig> {
        if let Ok(v) = std::env::var("SIFT_METHOD") {
            config.scoring.method = v.parse().map_err(|e: String| SiftError::ConfigValidation {
                field: "SIFT_METHOD".into(),
                reason: e,
            })?;
        }
        if let Ok(v) = std::env::var("SIFT_HIGH_THRESHOLD") {
            config.thresholds.high = parse_env_f64("SIFT_HIGH_THRESHOLD", &v)?;
        }
        if let Ok(v) = std::env::var("SIFT_POSSIBLE_THRESHOLD") {
            config.thresholds.possible = parse_env_f64("SIFT_POSSIBLE_THRESHOLD", &v)?;
        }
        if let Ok(v) = std::env::var("SIFT_LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Ok(v) = std::env::var("SIFT_REPORT_FORMAT") {
            config.report.format = v.parse().map_err(|e: String| SiftError::ConfigValidation {
                field: "SIFT_REPORT_FORMAT".into(),
                reason: e,
            })?;
        }
        Ok(config)
    }
}

fn parse_env_f64(var: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| SiftError::ConfigValidation {
            field: var.to_string(),
            reason: format!("'{value}' is not a number: {e}"),
        })
}

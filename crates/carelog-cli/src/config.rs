//! CLI configuration loading

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use carelog_context::ContextConfig;
use carelog_extractor::ExtractorConfig;
use carelog_services::DocumentConfig;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned table
    Table,
    /// Pretty-printed JSON
    Json,
    /// IDs only, one per line
    Quiet,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Table
    }
}

/// Presentation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default output format
    pub format: OutputFormat,
    /// Whether to colorize table output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            color: true,
        }
    }
}

/// Aggregate CLI configuration, loaded from a single TOML file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite database file
    pub database_path: PathBuf,
    /// Presentation settings
    pub settings: Settings,
    /// Text extraction caps
    pub extractor: ExtractorConfig,
    /// Context assembly caps
    pub context: ContextConfig,
    /// Document upload limits
    pub documents: DocumentConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("carelog.db"),
            settings: Settings::default(),
            extractor: ExtractorConfig::default(),
            context: ContextConfig::default(),
            documents: DocumentConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the given path, the default location, or
    /// fall back to defaults when no file exists
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        let config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Config::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> anyhow::Result<()> {
        self.extractor.validate().map_err(|e| anyhow!(e))?;
        self.context.validate().map_err(|e| anyhow!(e))?;
        self.documents.validate().map_err(|e| anyhow!(e))?;
        Ok(())
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("carelog").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("carelog.toml"))
}

//! TOML-based configuration for bioagents-ape
//!
//! Registry endpoint, data directories and evaluation settings are read
//! from `bioagents.toml`. Every field has a default, so an absent file or
//! an empty section is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "bioagents.toml";

/// Root configuration structure loaded from bioagents.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            registry: RegistryConfig::default(),
            paths: PathsConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// bio.agents API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    crate::registry::DEFAULT_REGISTRY_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Where annotation files, reports and framework templates live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_tools_dir")]
    pub tools_dir: PathBuf,

    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Directory holding `baseape.configuration`
    #[serde(default = "default_configuration_dir")]
    pub configuration_dir: PathBuf,

    #[serde(default = "default_taxonomy_snapshot")]
    pub taxonomy_snapshot: PathBuf,

    /// File name prefix shared by raw dumps and annotation files
    #[serde(default = "default_tools_prefix")]
    pub tools_prefix: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            tools_dir: default_tools_dir(),
            results_dir: default_results_dir(),
            configuration_dir: default_configuration_dir(),
            taxonomy_snapshot: default_taxonomy_snapshot(),
            tools_prefix: default_tools_prefix(),
        }
    }
}

impl PathsConfig {
    /// `<tools_dir>/<prefix><name>RAW.json`
    pub fn raw_file(&self, name: &str) -> PathBuf {
        self.tools_dir
            .join(format!("{}{}RAW.json", self.tools_prefix, name))
    }

    /// `<tools_dir>/<prefix><name>.json`
    pub fn annotation_file(&self, name: &str) -> PathBuf {
        self.tools_dir
            .join(format!("{}{}.json", self.tools_prefix, name))
    }

    /// Base template for per-run framework configurations
    pub fn base_framework_config(&self) -> PathBuf {
        self.configuration_dir.join("baseape.configuration")
    }
}

fn default_tools_dir() -> PathBuf {
    PathBuf::from("data/tools")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("data/results")
}

fn default_configuration_dir() -> PathBuf {
    PathBuf::from("data/config")
}

fn default_taxonomy_snapshot() -> PathBuf {
    PathBuf::from("data/config/edam_taxonomy.json")
}

fn default_tools_prefix() -> String {
    "agentAnnotation".to_string()
}

/// Evaluation run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Annotation file names evaluated by `evaluate-all`
    #[serde(default = "default_annotation_sets")]
    pub annotation_sets: Vec<String>,

    /// Depth columns of the CSV reports, in order
    #[serde(default = "default_report_columns")]
    pub report_columns: Vec<ReportColumn>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            annotation_sets: default_annotation_sets(),
            report_columns: default_report_columns(),
        }
    }
}

/// One depth column: which dimension it reports and its header text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportColumn {
    /// Dimension key as used in annotation files (`data_0006`) or a full IRI
    pub dimension: String,
    pub header: String,
}

impl ReportColumn {
    pub fn new(dimension: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            header: header.into(),
        }
    }
}

fn default_annotation_sets() -> Vec<String> {
    [
        "agentAnnotationFullBioAgents",
        "agentAnnotationMetabolomics",
        "agentAnnotationProteomics",
        "agentAnnotationOriginal",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_report_columns() -> Vec<ReportColumn> {
    vec![
        ReportColumn::new(ape_taxonomy::DATA_DIMENSION, "Data Depth"),
        ReportColumn::new(ape_taxonomy::FORMAT_DIMENSION, "Format depth"),
    ]
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl AppConfig {
    /// Load configuration from a TOML file that must exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "registry.base_url must not be empty".to_string(),
            ));
        }
        if self.registry.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "registry.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.evaluation.report_columns.is_empty() {
            return Err(ConfigError::ValidationError(
                "evaluation.report_columns must list at least one column".to_string(),
            ));
        }
        if let Some(column) = self
            .evaluation
            .report_columns
            .iter()
            .find(|c| c.dimension.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(format!(
                "report column '{}' has no dimension",
                column.header
            )));
        }
        Ok(())
    }

    /// Render the effective configuration back to TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

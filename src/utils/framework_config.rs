//! Synthesis framework configuration (`baseape.configuration`).
//!
//! The file is a flat JSON object owned by the external framework. We only
//! read a few keys and derive per-run copies with overridden values; the
//! base template on disk is never modified.

use crate::types::{BioAgentsError, Result};
use ape_taxonomy::DimensionResolver;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

pub const AGENT_ANNOTATIONS_PATH: &str = "agent_annotations_path";
pub const STRICT_AGENT_ANNOTATIONS: &str = "strict_agent_annotations";
pub const ONTOLOGY_PREFIX_IRI: &str = "ontologyPrefixIRI";
pub const DATA_DIMENSION_ROOTS: &str = "dataDimensions_taxonomy_roots";

/// An immutable framework configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameworkConfig {
    values: Map<String, Value>,
}

impl FrameworkConfig {
    /// Read a configuration template from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BioAgentsError::Configuration(format!(
                "Cannot read framework configuration {}: {}",
                path.display(),
                e
            ))
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            BioAgentsError::Configuration(format!("{} is not valid JSON: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Framework configuration loaded");
        Self::from_value(value)
    }

    /// Wrap a JSON value; anything but an object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(BioAgentsError::Configuration(format!(
                "Framework configuration must be a JSON object, got {}",
                other
            ))),
        }
    }

    /// Copy of this configuration with `key` set to `value`.
    pub fn with_override(&self, key: &str, value: impl Into<Value>) -> Self {
        let mut values = self.values.clone();
        values.insert(key.to_string(), value.into());
        Self { values }
    }

    /// Per-run configuration pointing at one annotation file, with strict
    /// annotation checking turned off.
    pub fn for_evaluation<P: AsRef<Path>>(&self, annotations_path: P) -> Self {
        self.with_override(
            AGENT_ANNOTATIONS_PATH,
            annotations_path.as_ref().display().to_string(),
        )
        .with_override(STRICT_AGENT_ANNOTATIONS, "false")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn ontology_prefix(&self) -> Option<&str> {
        self.get(ONTOLOGY_PREFIX_IRI).and_then(Value::as_str)
    }

    /// Dimension root keys (e.g. `data_0006`, `format_1915`).
    ///
    /// The framework accepts either a JSON array or a comma separated string.
    pub fn dimension_roots(&self) -> Vec<String> {
        match self.get(DATA_DIMENSION_ROOTS) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(list)) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Dimension key resolver using the configured ontology prefix.
    pub fn resolver(&self) -> DimensionResolver {
        match self.ontology_prefix() {
            Some(prefix) => DimensionResolver::new(prefix),
            None => DimensionResolver::default(),
        }
    }

    /// Write this configuration as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(path, content)?;
        info!(path = %path.display(), "Run configuration saved");
        Ok(())
    }
}

use reqwest::StatusCode;

// ============= Error Types =============

/// Errors that abort a fetch, conversion or evaluation run.
///
/// Per-function validation failures are not errors; they are counted in
/// [`ConversionStats`](crate::annotations::ConversionStats).
#[derive(Debug, thiserror::Error)]
pub enum BioAgentsError {
    #[error("Registry request to {url} failed with status {status}")]
    Network { url: String, status: StatusCode },

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Malformed registry response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] ape_taxonomy::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BioAgentsError {
    /// HTTP status of a failed registry request, if that is what failed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BioAgentsError::Network { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<crate::utils::toml_config::ConfigError> for BioAgentsError {
    fn from(err: crate::utils::toml_config::ConfigError) -> Self {
        BioAgentsError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BioAgentsError>;

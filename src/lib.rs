//! # bioagents-ape
//!
//! Tooling around the bio.agents registry and the APE workflow synthesis
//! framework: fetch tool descriptions, turn them into APE annotation files
//! and measure how specific their EDAM annotations are.
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a CLI** - Run the `bioagents-ape` binary
//! 2. **As a library** - Import the pipeline pieces into your own project
//!
//! ### Fetch and convert
//!
//! ```rust,ignore
//! use bioagents_ape::{convert, NoProgress, RegistryClient, RegistryFilter};
//! use std::time::Duration;
//!
//! let client = RegistryClient::new("https://bio.agents/api", Duration::from_secs(60))?;
//! let records = client
//!     .fetch_by_filter(&RegistryFilter::domain("proteomics"), &NoProgress)
//!     .await?;
//! let (annotations, stats) = convert(&records);
//! println!("{} of {} functions kept", stats.accepted_functions, stats.total_functions);
//! ```
//!
//! ### Evaluate
//!
//! ```rust,ignore
//! use bioagents_ape::{evaluate, AppConfig};
//!
//! let config = AppConfig::load_or_default("bioagents.toml")?;
//! let summary = evaluate(&config, "data/tools/agentAnnotationProteomics.json".as_ref(), "data/results/Proteomics".as_ref())?;
//! println!("{}", summary.reports.inputs.display());
//! ```
//!
//! ### Registry statistics
//!
//! [`statistics::collect`] counts field coverage over a raw dump and, given
//! a taxonomy, how often each EDAM term is used directly or in its branch.
//!
//! The taxonomy model and the depth metric live in the `ape-taxonomy`
//! crate and are re-exported here.

pub mod annotations;
pub mod cli;
pub mod evaluation;
pub mod registry;
pub mod statistics;
pub mod types;
pub mod utils;
pub mod workflows;

// Re-export commonly used types
pub use annotations::{convert, ConversionStats, Rejection};
pub use evaluation::{evaluate, EvaluationSummary, ReportWriter};
pub use registry::{FetchProgress, NoProgress, RawRecord, RegistryClient, RegistryFilter};
pub use statistics::{RegistryStatistics, TermKind};
pub use types::{BioAgentsError, Result};
pub use utils::{AppConfig, ConfigError, FrameworkConfig, ReportColumn};
pub use workflows::{evaluate_all, setup_domain, AgentSource};

pub use ape_taxonomy as taxonomy;
pub use ape_taxonomy::{analyze, DepthReport, DepthRow, Taxonomy, TaxonomyLookup};

//! Domain workflows
//!
//! End-to-end pipelines built from the registry client, the converter and
//! the evaluator:
//!
//! - **setup**: fetch a domain's agents (or reuse a raw dump), keep the
//!   raw JSON, convert it and write the annotation file.
//! - **evaluate-all**: evaluate every configured annotation set, moving on
//!   when one of them fails.
//!
//! # Usage
//!
//! ```ignore
//! let config = AppConfig::load_or_default("bioagents.toml")?;
//! let setup = setup_domain(&config, "Proteomics", &AgentSource::Domain("proteomics".into()), &NoProgress).await?;
//! println!("{} annotations", setup.stats.accepted_functions);
//! ```

use crate::annotations::{self, ConversionStats};
use crate::evaluation::{self, EvaluationSummary};
use crate::registry::{FetchProgress, RawRecord, RegistryClient, RegistryFilter};
use crate::types::Result;
use crate::utils::AppConfig;
use std::path::PathBuf;
use tracing::{error, info, instrument};

/// Where the agents of a domain come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentSource {
    /// JSON array of bio.agents ids
    IdsFile(PathBuf),
    /// bio.agents domain name
    Domain(String),
    /// EDAM topic id
    Topic(String),
    /// Previously fetched raw records; nothing is downloaded
    ExistingRaw(PathBuf),
}

/// Files and counters produced by [`setup_domain`].
#[derive(Debug, Clone)]
pub struct DomainSetup {
    pub raw_file: PathBuf,
    pub annotation_file: PathBuf,
    pub stats: ConversionStats,
}

/// Fetch, dump and convert the agents of one domain.
///
/// Output files are `<prefix><name>RAW.json` and `<prefix><name>.json`
/// under the configured tools directory.
#[instrument(skip(config, progress))]
pub async fn setup_domain(
    config: &AppConfig,
    name: &str,
    source: &AgentSource,
    progress: &dyn FetchProgress,
) -> Result<DomainSetup> {
    let annotation_file = config.paths.annotation_file(name);

    let records = load_records(config, source, progress).await?;
    let raw_file = match source {
        AgentSource::ExistingRaw(path) => path.clone(),
        _ => {
            let raw_file = config.paths.raw_file(name);
            annotations::write_raw(&records, &raw_file)?;
            raw_file
        }
    };

    let (converted, stats) = annotations::convert(&records);
    annotations::write_annotations(&converted, &annotation_file)?;

    info!(
        domain = name,
        agents = records.len(),
        annotations = stats.accepted_functions,
        "Domain set up"
    );

    Ok(DomainSetup {
        raw_file,
        annotation_file,
        stats,
    })
}

async fn load_records(
    config: &AppConfig,
    source: &AgentSource,
    progress: &dyn FetchProgress,
) -> Result<Vec<RawRecord>> {
    match source {
        AgentSource::ExistingRaw(path) => annotations::read_raw(path),
        AgentSource::IdsFile(path) => {
            RegistryClient::from_config(&config.registry)?
                .fetch_from_list_file(path)
                .await
        }
        AgentSource::Domain(domain) => {
            RegistryClient::from_config(&config.registry)?
                .fetch_by_filter(&RegistryFilter::domain(domain.as_str()), progress)
                .await
        }
        AgentSource::Topic(topic) => {
            RegistryClient::from_config(&config.registry)?
                .fetch_by_filter(&RegistryFilter::topic(topic.as_str()), progress)
                .await
        }
    }
}

/// Result of evaluating one annotation set.
#[derive(Debug)]
pub struct SetOutcome {
    pub name: String,
    pub result: Result<EvaluationSummary>,
}

/// Evaluate every configured annotation set in order.
pub fn evaluate_all(config: &AppConfig) -> Vec<SetOutcome> {
    config
        .evaluation
        .annotation_sets
        .iter()
        .map(|name| {
            let result = evaluation::evaluate_set(config, name);
            if let Err(e) = &result {
                error!(set = %name, error = %e, "Evaluation failed, continuing with next set");
            }
            SetOutcome {
                name: name.clone(),
                result,
            }
        })
        .collect()
}

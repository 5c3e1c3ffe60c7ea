//! Descriptive statistics over fetched bio.agents records.
//!
//! - **general**: how many agents fill in each descriptive field, with
//!   value breakdowns (languages, licenses, link types, ...).
//! - **terms**: strict and rolled-up usage of EDAM terms of one kind,
//!   with each term's level and depth in the taxonomy.
//!
//! Both can be limited to agents added to the registry before a date.
//!
//! ```ignore
//! let records = annotations::read_raw("data/tools/agentAnnotationFullBioAgentsRAW.json")?;
//! let taxonomy = Taxonomy::load(&config.paths.taxonomy_snapshot)?;
//! let stats = collect(records, None, Some((TermKind::Format, &taxonomy)))?;
//! println!("{} agents", stats.general.agent_count);
//! ```

pub mod general;
pub mod terms;

pub use general::{general_statistics, FieldCoverage, GeneralStatistics};
pub use terms::{generic_data_with_format, term_statistics, TermKind, TermStatistics, TermUsage};

use crate::registry::RawRecord;
use crate::types::Result;
use ape_taxonomy::Taxonomy;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Everything the `stats` command reports.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStatistics {
    /// Only agents added before this instant were counted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
    pub general: GeneralStatistics,
    /// Agents annotating generic "Data" together with a format.
    pub generic_data_with_format: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<TermStatistics>,
}

impl RegistryStatistics {
    /// Write the statistics as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!(path = %path.display(), "Statistics written");
        Ok(())
    }
}

/// Compute general statistics, and term statistics when a kind and a
/// taxonomy are given, over the agents added before `until`.
pub fn collect(
    records: Vec<RawRecord>,
    until: Option<DateTime<Utc>>,
    terms: Option<(TermKind, &Taxonomy)>,
) -> Result<RegistryStatistics> {
    let records = match until {
        Some(until) => added_before(records, until),
        None => records,
    };

    let terms = match terms {
        Some((kind, taxonomy)) => Some(term_statistics(&records, kind, taxonomy)?),
        None => None,
    };
    let stats = RegistryStatistics {
        until,
        general: general_statistics(&records),
        generic_data_with_format: generic_data_with_format(&records)
            .into_iter()
            .map(String::from)
            .collect(),
        terms,
    };

    info!(agents = stats.general.agent_count, "Registry statistics computed");
    Ok(stats)
}

/// Keep the agents whose `additionDate` lies before `until`. Agents
/// without a readable date are dropped.
pub fn added_before(records: Vec<RawRecord>, until: DateTime<Utc>) -> Vec<RawRecord> {
    let before = records.len();
    let kept: Vec<_> = records
        .into_iter()
        .filter(|r| addition_date(r).is_some_and(|added| added < until))
        .collect();
    debug!(before, kept = kept.len(), %until, "Agents filtered by addition date");
    kept
}

/// Registry `additionDate` of an agent. Timestamps without an offset are
/// taken as UTC.
pub fn addition_date(record: &RawRecord) -> Option<DateTime<Utc>> {
    let raw = record.extra.get("additionDate")?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

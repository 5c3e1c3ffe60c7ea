//! EDAM term usage across agents.
//!
//! Every term an agent uses counts *strictly* for that term and in the
//! *total* of the term and all of its ancestors, so a parent's total is
//! the number of agents annotated anywhere in its branch.

use crate::registry::{RawParameter, RawRecord};
use crate::types::Result;
use ape_taxonomy::{analysis, Taxonomy};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// The generic EDAM data term, "Data".
pub const GENERIC_DATA_IRI: &str = "http://edamontology.org/data_0006";

/// Which EDAM terms of an agent to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    /// `topic` of the agent
    Topic,
    /// `operation` of each function
    Operation,
    /// `data` of each input and output
    Data,
    /// `format` of each input and output
    Format,
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TermKind::Topic => "topic",
            TermKind::Operation => "operation",
            TermKind::Data => "data",
            TermKind::Format => "format",
        };
        f.write_str(name)
    }
}

/// Usage of one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermUsage {
    pub iri: String,
    /// Taxonomy label; `None` if the term is not in the snapshot.
    pub name: Option<String>,
    /// Edges between the term and its root.
    pub level: Option<usize>,
    /// Longest downward path to a leaf.
    pub depth: Option<u32>,
    pub strict_count: usize,
    pub total_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub strict_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub total_ids: Vec<String>,
}

/// Term usage for one [`TermKind`], most used first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermStatistics {
    pub kind: TermKind,
    pub terms: Vec<TermUsage>,
    /// Distinct terms missing from the taxonomy snapshot.
    pub unknown_terms: usize,
}

impl TermStatistics {
    pub fn get(&self, iri: &str) -> Option<&TermUsage> {
        self.terms.iter().find(|t| t.iri == iri)
    }

    /// Drop the per-term agent ids, keeping only the counts.
    pub fn without_ids(mut self) -> Self {
        for term in &mut self.terms {
            term.strict_ids.clear();
            term.total_ids.clear();
        }
        self
    }
}

#[derive(Default)]
struct Tally {
    strict: BTreeSet<String>,
    total: BTreeSet<String>,
}

/// Count strict and rolled-up term usage over `records`.
pub fn term_statistics(
    records: &[RawRecord],
    kind: TermKind,
    taxonomy: &Taxonomy,
) -> Result<TermStatistics> {
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
    let mut unknown = BTreeSet::new();

    for record in records {
        let agent = &record.bioagents_id;
        for iri in record_terms(record, kind) {
            let tally = tallies.entry(iri.to_string()).or_default();
            tally.strict.insert(agent.clone());
            tally.total.insert(agent.clone());

            let Some(node) = taxonomy.find(iri) else {
                unknown.insert(iri);
                continue;
            };
            for ancestor in taxonomy.ancestors(node) {
                if let Some(parent) = taxonomy.get(ancestor) {
                    tallies
                        .entry(parent.iri.clone())
                        .or_default()
                        .total
                        .insert(agent.clone());
                }
            }
        }
    }

    let mut terms = Vec::with_capacity(tallies.len());
    for (iri, tally) in tallies {
        let node = taxonomy.find(&iri);
        let depth = match node {
            Some(node) => Some(analysis::depth(taxonomy, node)?),
            None => None,
        };
        terms.push(TermUsage {
            name: node.and_then(|n| taxonomy.get(n)).map(|n| n.label.clone()),
            level: node.map(|n| taxonomy.level(n)),
            depth,
            strict_count: tally.strict.len(),
            total_count: tally.total.len(),
            strict_ids: tally.strict.into_iter().collect(),
            total_ids: tally.total.into_iter().collect(),
            iri,
        });
    }
    terms.sort_by(|a, b| {
        b.total_count
            .cmp(&a.total_count)
            .then_with(|| b.strict_count.cmp(&a.strict_count))
            .then_with(|| a.iri.cmp(&b.iri))
    });

    debug!(?kind, terms = terms.len(), unknown = unknown.len(), "Term statistics computed");
    Ok(TermStatistics {
        kind,
        terms,
        unknown_terms: unknown.len(),
    })
}

/// Agents with an input or output annotated as generic "Data" while still
/// naming a concrete format.
pub fn generic_data_with_format(records: &[RawRecord]) -> Vec<&str> {
    records
        .iter()
        .filter(|record| {
            record.function.iter().any(|f| {
                f.input
                    .iter()
                    .chain(&f.output)
                    .any(is_generic_data_with_format)
            })
        })
        .map(|record| record.bioagents_id.as_str())
        .collect()
}

fn is_generic_data_with_format(parameter: &RawParameter) -> bool {
    !parameter.format.is_empty()
        && parameter
            .data
            .iter()
            .any(|d| d.uri.eq_ignore_ascii_case(GENERIC_DATA_IRI))
}

fn record_terms(record: &RawRecord, kind: TermKind) -> Vec<&str> {
    match kind {
        TermKind::Topic => record
            .extra
            .get("topic")
            .and_then(|v| v.as_array())
            .map(|topics| {
                topics
                    .iter()
                    .filter_map(|t| t.get("uri").and_then(|u| u.as_str()))
                    .collect()
            })
            .unwrap_or_default(),
        TermKind::Operation => record
            .function
            .iter()
            .flat_map(|f| &f.operation)
            .map(|t| t.uri.as_str())
            .collect(),
        TermKind::Data | TermKind::Format => record
            .function
            .iter()
            .flat_map(|f| f.input.iter().chain(&f.output))
            .flat_map(|p| match kind {
                TermKind::Format => &p.format,
                _ => &p.data,
            })
            .map(|t| t.uri.as_str())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const E: &str = "http://edamontology.org/";

    fn edam(fragment: &str) -> String {
        format!("{}{}", E, fragment)
    }

    /// data_0006 -> data_2603 -> data_0943, format_1915 -> format_3244
    fn taxonomy() -> Taxonomy {
        let mut t = Taxonomy::new();
        let data = t.insert(&edam("data_0006"), "Data", None).unwrap();
        let expression = t.insert(&edam("data_2603"), "Expression data", Some(data)).unwrap();
        t.insert(&edam("data_0943"), "Mass spectrum", Some(expression)).unwrap();
        let format = t.insert(&edam("format_1915"), "Format", None).unwrap();
        t.insert(&edam("format_3244"), "mzML", Some(format)).unwrap();
        t
    }

    fn parameter(data: &str, formats: &[&str]) -> serde_json::Value {
        json!({
            "data": {"uri": edam(data)},
            "format": formats.iter().map(|f| json!({"uri": edam(f)})).collect::<Vec<_>>()
        })
    }

    fn records() -> Vec<RawRecord> {
        serde_json::from_value(json!([
            {
                "bioagentsID": "comet",
                "topic": [{"uri": edam("topic_0121")}],
                "function": [{
                    "operation": [{"uri": edam("operation_3631")}],
                    "input": [parameter("data_0943", &["format_3244"])],
                    "output": [parameter("data_2603", &["format_1915"])]
                }]
            },
            {
                "bioagentsID": "generic",
                "function": [{
                    "input": [parameter("data_0006", &["format_3244"])],
                    "output": [parameter("data_9999", &[])]
                }]
            },
            {"bioagentsID": "bare", "function": []}
        ]))
        .unwrap()
    }

    #[test]
    fn test_strict_and_rolled_up_counts() {
        let stats = term_statistics(&records(), TermKind::Data, &taxonomy()).unwrap();

        let spectrum = stats.get(&edam("data_0943")).unwrap();
        assert_eq!((spectrum.strict_count, spectrum.total_count), (1, 1));
        assert_eq!(spectrum.level, Some(2));
        assert_eq!(spectrum.depth, Some(0));
        assert_eq!(spectrum.name.as_deref(), Some("Mass spectrum"));

        // comet uses data_2603 directly and data_0943 below it: counted once
        let expression = stats.get(&edam("data_2603")).unwrap();
        assert_eq!((expression.strict_count, expression.total_count), (1, 1));
        assert_eq!(expression.total_ids, vec!["comet"]);

        let data = stats.get(&edam("data_0006")).unwrap();
        assert_eq!((data.strict_count, data.total_count), (1, 2));
        assert_eq!(data.level, Some(0));
        assert_eq!(data.depth, Some(2));
        assert_eq!(stats.terms[0].iri, edam("data_0006"));
    }

    #[test]
    fn test_unknown_terms_are_counted_without_rollup() {
        let stats = term_statistics(&records(), TermKind::Data, &taxonomy()).unwrap();
        let unknown = stats.get(&edam("data_9999")).unwrap();
        assert_eq!((unknown.strict_count, unknown.total_count), (1, 1));
        assert_eq!(unknown.name, None);
        assert_eq!(unknown.level, None);
        assert_eq!(stats.unknown_terms, 1);
    }

    #[test]
    fn test_term_kinds() {
        let t = taxonomy();
        let format = term_statistics(&records(), TermKind::Format, &t).unwrap();
        let mzml = format.get(&edam("format_3244")).unwrap();
        assert_eq!(mzml.strict_count, 2);
        assert_eq!(format.get(&edam("format_1915")).unwrap().total_count, 2);

        let topics = term_statistics(&records(), TermKind::Topic, &t).unwrap();
        assert_eq!(topics.terms.len(), 1);
        assert_eq!(topics.terms[0].strict_ids, vec!["comet"]);

        let operations = term_statistics(&records(), TermKind::Operation, &t).unwrap();
        assert_eq!(operations.get(&edam("operation_3631")).unwrap().strict_count, 1);
    }

    #[test]
    fn test_without_ids_keeps_counts() {
        let stats = term_statistics(&records(), TermKind::Data, &taxonomy())
            .unwrap()
            .without_ids();
        let data = stats.get(&edam("data_0006")).unwrap();
        assert_eq!(data.total_count, 2);
        assert!(data.total_ids.is_empty());
    }

    #[test]
    fn test_generic_data_with_format() {
        let records = records();
        assert_eq!(generic_data_with_format(&records), vec!["generic"]);
    }
}

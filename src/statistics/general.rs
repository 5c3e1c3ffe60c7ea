//! How many agents fill in each descriptive registry field.

use crate::registry::RawRecord;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// How values of a tracked field are broken down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Breakdown {
    /// Presence and entry counts only.
    Count,
    /// Count each string value.
    Values,
    /// Count the given key of each listed object (a string or a list).
    ByKey(&'static str),
}

const TRACKED_FIELDS: &[(&str, Breakdown)] = &[
    ("agentType", Breakdown::Values),
    ("topic", Breakdown::Count),
    ("operatingSystem", Breakdown::Values),
    ("language", Breakdown::Values),
    ("license", Breakdown::Values),
    ("maturity", Breakdown::Values),
    ("cost", Breakdown::Values),
    ("collectionID", Breakdown::Count),
    ("accessibility", Breakdown::Values),
    ("iechorPlatform", Breakdown::Values),
    ("iechorNode", Breakdown::Values),
    ("iechorCommunity", Breakdown::Values),
    ("link", Breakdown::ByKey("type")),
    ("download", Breakdown::ByKey("type")),
    ("documentation", Breakdown::ByKey("type")),
    ("publication", Breakdown::ByKey("type")),
    ("credit", Breakdown::ByKey("typeRole")),
    ("relation", Breakdown::ByKey("type")),
    ("community", Breakdown::Count),
];

/// Coverage of one registry field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCoverage {
    pub field: &'static str,
    /// Agents with a non-empty value.
    pub agents: usize,
    /// List entries over those agents; a scalar value counts once.
    pub entries: usize,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, usize>,
}

/// Field coverage over a set of agents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneralStatistics {
    pub agent_count: usize,
    pub agents_with_functions: usize,
    pub function_count: usize,
    pub fields: Vec<FieldCoverage>,
}

impl GeneralStatistics {
    pub fn field(&self, name: &str) -> Option<&FieldCoverage> {
        self.fields.iter().find(|f| f.field == name)
    }
}

/// Count field coverage and value breakdowns over `records`.
///
/// Null, empty strings, empty lists and empty objects count as absent.
pub fn general_statistics(records: &[RawRecord]) -> GeneralStatistics {
    let fields = TRACKED_FIELDS
        .iter()
        .map(|&(field, breakdown)| coverage(records, field, breakdown))
        .collect();

    GeneralStatistics {
        agent_count: records.len(),
        agents_with_functions: records.iter().filter(|r| !r.function.is_empty()).count(),
        function_count: records.iter().map(|r| r.function.len()).sum(),
        fields,
    }
}

fn coverage(records: &[RawRecord], field: &'static str, breakdown: Breakdown) -> FieldCoverage {
    let mut result = FieldCoverage {
        field,
        agents: 0,
        entries: 0,
        values: BTreeMap::new(),
    };

    for value in records.iter().filter_map(|r| r.extra.get(field)) {
        if !is_present(value) {
            continue;
        }
        result.agents += 1;
        result.entries += match value {
            Value::Array(items) => items.iter().filter(|v| is_present(v)).count(),
            _ => 1,
        };

        let key = match breakdown {
            Breakdown::Count => continue,
            Breakdown::Values => None,
            Breakdown::ByKey(key) => Some(key),
        };
        for label in labels(value, key) {
            *result.values.entry(label.to_string()).or_default() += 1;
        }
    }

    result
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(_) => true,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => items.iter().any(is_present),
        Value::Object(map) => map.values().any(is_present),
    }
}

fn labels<'a>(value: &'a Value, key: Option<&str>) -> Vec<&'a str> {
    let mut out = Vec::new();
    collect_labels(value, key, &mut out);
    out
}

fn collect_labels<'a>(value: &'a Value, key: Option<&str>, out: &mut Vec<&'a str>) {
    match (value, key) {
        (Value::String(s), _) if !s.is_empty() => out.push(s),
        (Value::Array(items), _) => {
            for item in items {
                collect_labels(item, key, out);
            }
        }
        (Value::Object(map), Some(key)) => {
            if let Some(inner) = map.get(key) {
                collect_labels(inner, None, out);
            }
        }
        _ => {}
    }
}

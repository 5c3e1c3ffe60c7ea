//! bio.agents -> APE annotation conversion.

use crate::registry::types::{RawFunction, RawParameter, RawRecord, RawTerm};
use ape_taxonomy::annotation::{DATA_DIMENSION, FORMAT_DIMENSION};
use ape_taxonomy::{ApeAnnotations, ApeFunction, ApeParameter};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info};

/// Why a function was left out of the annotation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A parameter group lists no data-type term.
    MissingData { output: bool, position: usize },
    /// A parameter group lists no format term.
    MissingFormat { output: bool, position: usize },
    /// The function ends up without inputs.
    NoInputs,
    /// The function ends up without outputs.
    NoOutputs,
}

impl Rejection {
    fn is_missing_dimension(self) -> bool {
        matches!(
            self,
            Rejection::MissingData { .. } | Rejection::MissingFormat { .. }
        )
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |output: bool| if output { "output" } else { "input" };
        match self {
            Rejection::MissingData { output, position } => {
                write!(f, "{} {} has no data type", side(*output), position)
            }
            Rejection::MissingFormat { output, position } => {
                write!(f, "{} {} has no format", side(*output), position)
            }
            Rejection::NoInputs => write!(f, "no inputs"),
            Rejection::NoOutputs => write!(f, "no outputs"),
        }
    }
}

/// Counters collected while converting. Rejections are expected and
/// only show up here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    /// Records handed to the converter.
    pub provided_records: usize,
    /// Functions examined across all records.
    pub total_functions: usize,
    /// Functions left out (each counted once).
    pub rejected_functions: usize,
    /// Functions written to the annotation file.
    pub accepted_functions: usize,
    /// Records declaring no function at all.
    pub no_function: BTreeSet<String>,
    /// Records with at least one rejected function (or none at all).
    pub rejected_records: BTreeSet<String>,
    /// Records with a parameter group missing data or format terms.
    pub missing_dimension: BTreeSet<String>,
    /// Records contributing at least one annotation.
    pub annotated_records: BTreeSet<String>,
}

impl ConversionStats {
    /// Number of records without functions.
    pub fn no_function_records(&self) -> usize {
        self.no_function.len()
    }
}

/// Convert registry records into APE annotations.
///
/// A function is kept only if every input and output group carries at
/// least one data-type and one format term, and it has at least one input
/// and one output. Multi-function records get `_op<N>` ids.
pub fn convert(records: &[RawRecord]) -> (ApeAnnotations, ConversionStats) {
    let mut stats = ConversionStats {
        provided_records: records.len(),
        ..Default::default()
    };
    let mut functions = Vec::new();

    for record in records {
        let id = &record.bioagents_id;
        if record.function.is_empty() {
            debug!(id = %id, "Agent declares no function");
            stats.no_function.insert(id.clone());
            stats.rejected_records.insert(id.clone());
            continue;
        }

        let multiple = record.function.len() > 1;
        for (index, function) in record.function.iter().enumerate() {
            stats.total_functions += 1;
            let function_id = if multiple {
                format!("{}_op{}", id, index + 1)
            } else {
                id.clone()
            };

            match convert_function(function_id, &record.name, function) {
                Ok(converted) => {
                    stats.accepted_functions += 1;
                    stats.annotated_records.insert(id.clone());
                    functions.push(converted);
                }
                Err(rejection) => {
                    debug!(id = %id, function = index + 1, reason = %rejection, "Function rejected");
                    stats.rejected_functions += 1;
                    stats.rejected_records.insert(id.clone());
                    if rejection.is_missing_dimension() {
                        stats.missing_dimension.insert(id.clone());
                    }
                }
            }
        }
    }

    info!(
        provided = stats.provided_records,
        functions = stats.total_functions,
        rejected = stats.rejected_functions,
        no_function = stats.no_function_records(),
        annotations = stats.accepted_functions,
        "Conversion finished"
    );

    (ApeAnnotations { functions }, stats)
}

fn convert_function(
    id: String,
    label: &str,
    function: &RawFunction,
) -> Result<ApeFunction, Rejection> {
    let taxonomy_operations = uris(&function.operation);
    let inputs = convert_groups(&function.input, false)?;
    let outputs = convert_groups(&function.output, true)?;

    if inputs.is_empty() {
        return Err(Rejection::NoInputs);
    }
    if outputs.is_empty() {
        return Err(Rejection::NoOutputs);
    }

    Ok(ApeFunction {
        id,
        label: label.to_string(),
        taxonomy_operations,
        inputs,
        outputs,
    })
}

fn convert_groups(groups: &[RawParameter], output: bool) -> Result<Vec<ApeParameter>, Rejection> {
    groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let position = index + 1;
            let data = uris(&group.data);
            if data.is_empty() {
                return Err(Rejection::MissingData { output, position });
            }
            let formats = uris(&group.format);
            if formats.is_empty() {
                return Err(Rejection::MissingFormat { output, position });
            }

            let mut parameter = ApeParameter::new();
            parameter.insert(DATA_DIMENSION.to_string(), data);
            parameter.insert(FORMAT_DIMENSION.to_string(), formats);
            Ok(parameter)
        })
        .collect()
}

fn uris(terms: &[RawTerm]) -> Vec<String> {
    terms.iter().map(|t| t.uri.clone()).collect()
}

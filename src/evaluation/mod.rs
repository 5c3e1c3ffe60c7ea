//! Annotation quality evaluation.
//!
//! For one annotation file: derive the run configuration from the base
//! framework template, bind the annotations to the taxonomy snapshot,
//! compute term depths and write the input/output reports.

pub mod report;

pub use report::{ReportPaths, ReportWriter};

use crate::types::Result;
use crate::utils::{AppConfig, FrameworkConfig};
use ape_taxonomy::{analyze, ApeAnnotations, ModuleGraph, Taxonomy};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Outcome of one evaluation run.
#[derive(Debug, Clone)]
pub struct EvaluationSummary {
    pub annotations: PathBuf,
    pub modules: usize,
    pub input_rows: usize,
    pub output_rows: usize,
    pub run_config: PathBuf,
    pub reports: ReportPaths,
}

/// Evaluate the annotation file at `annotations`, writing reports under
/// `result_base`.
#[instrument(skip_all, fields(annotations = %annotations.display()))]
pub fn evaluate(config: &AppConfig, annotations: &Path, result_base: &Path) -> Result<EvaluationSummary> {
    let base = FrameworkConfig::load(config.paths.base_framework_config())?;
    let run = base.for_evaluation(annotations);

    let taxonomy = Taxonomy::load(&config.paths.taxonomy_snapshot)?;
    let resolver = run.resolver();
    for root in run.dimension_roots() {
        if taxonomy.find(&resolver.resolve(&root)).is_none() {
            warn!(dimension = %root, "Dimension root not present in taxonomy snapshot");
        }
    }

    let ape = ApeAnnotations::load(annotations)?;
    let graph = ModuleGraph::from_annotations(&taxonomy, &ape, &resolver)?;
    let report = analyze(graph.modules(), &taxonomy)?;

    let run_config = report::with_suffix(result_base, ".configuration");
    run.save(&run_config)?;

    let writer = ReportWriter::new(&config.evaluation.report_columns, &resolver);
    let reports = writer.write(&report, result_base)?;

    info!(
        modules = graph.len(),
        inputs = report.inputs.len(),
        outputs = report.outputs.len(),
        "Evaluation finished"
    );

    Ok(EvaluationSummary {
        annotations: annotations.to_path_buf(),
        modules: graph.len(),
        input_rows: report.inputs.len(),
        output_rows: report.outputs.len(),
        run_config,
        reports,
    })
}

/// Evaluate a named annotation set from the configured directories.
pub fn evaluate_set(config: &AppConfig, name: &str) -> Result<EvaluationSummary> {
    let annotations = config.paths.tools_dir.join(format!("{}.json", name));
    let result_base = config.paths.results_dir.join(name);
    evaluate(config, &annotations, &result_base)
}

//! Subcommand handlers.

use super::output::Output;
use super::{Cli, Commands, ConfigCommands, SourceArgs};
use crate::annotations::{self, ConversionStats};
use crate::evaluation::{self, EvaluationSummary};
use crate::registry::NoProgress;
use crate::statistics::{self, RegistryStatistics, TermKind};
use crate::types::{BioAgentsError, Result};
use crate::utils::toml_config::DEFAULT_CONFIG_FILE;
use crate::utils::AppConfig;
use crate::workflows::{self, AgentSource};
use ape_taxonomy::{taxonomy::fragment, Taxonomy};
use chrono::{NaiveDate, NaiveTime};
use std::path::{Path, PathBuf};

/// Load the configuration selected on the command line.
///
/// An explicit `--config` must exist; the default file is optional.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_or_default(DEFAULT_CONFIG_FILE)?,
    };
    Ok(config)
}

/// Run the parsed command.
pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Commands::Fetch { name, source } => run_fetch(&config, &output, &name, source).await,
        Commands::Convert { input, output: path } => run_convert(&output, &input, &path),
        Commands::Evaluate {
            annotations,
            output: base,
        } => run_evaluate(&config, &output, &annotations, base),
        Commands::EvaluateAll => run_evaluate_all(&config, &output),
        Commands::Stats {
            input,
            terms,
            until,
            top,
            output: path,
            ids,
        } => {
            let options = StatsOptions {
                terms,
                until,
                top,
                path,
                ids,
            };
            run_stats(&config, &output, &input, options)
        }
        Commands::Config(action) => run_config(&config, &output, cli.config.as_deref(), action),
    }
}

impl SourceArgs {
    fn into_source(self) -> Result<AgentSource> {
        if let Some(path) = self.ids {
            Ok(AgentSource::IdsFile(path))
        } else if let Some(domain) = self.domain {
            Ok(AgentSource::Domain(domain))
        } else if let Some(topic) = self.topic {
            Ok(AgentSource::Topic(topic))
        } else if let Some(path) = self.raw {
            Ok(AgentSource::ExistingRaw(path))
        } else {
            Err(BioAgentsError::Configuration(
                "one of --ids, --domain, --topic or --raw is required".to_string(),
            ))
        }
    }
}

async fn run_fetch(config: &AppConfig, output: &Output, name: &str, args: SourceArgs) -> Result<()> {
    let source = args.into_source()?;
    output.header(&format!("Setting up {}", name));

    let result = match &source {
        AgentSource::Domain(_) | AgentSource::Topic(_) => {
            let spinner = output.spinner("Fetching agents from bio.agents");
            let result = workflows::setup_domain(config, name, &source, &spinner).await;
            if result.is_err() {
                spinner.clear();
            }
            result
        }
        _ => workflows::setup_domain(config, name, &source, &NoProgress).await,
    };
    let setup = result?;

    output.written("raw agents", &setup.raw_file.display().to_string());
    output.written("annotations", &setup.annotation_file.display().to_string());
    print_stats(output, &setup.stats);
    Ok(())
}

fn run_convert(output: &Output, input: &Path, path: &Path) -> Result<()> {
    let records = annotations::read_raw(input)?;
    let (converted, stats) = annotations::convert(&records);
    annotations::write_annotations(&converted, path)?;

    output.written("annotations", &path.display().to_string());
    print_stats(output, &stats);
    Ok(())
}

fn run_evaluate(
    config: &AppConfig,
    output: &Output,
    annotations: &Path,
    base: Option<PathBuf>,
) -> Result<()> {
    let base = match base {
        Some(base) => base,
        None => {
            let stem = annotations.file_stem().ok_or_else(|| {
                BioAgentsError::Configuration(format!(
                    "Cannot derive a report name from {}",
                    annotations.display()
                ))
            })?;
            config.paths.results_dir.join(stem)
        }
    };

    let summary = evaluation::evaluate(config, annotations, &base)?;
    print_summary(output, &summary);
    Ok(())
}

fn run_evaluate_all(config: &AppConfig, output: &Output) -> Result<()> {
    let outcomes = workflows::evaluate_all(config);

    output.header("Annotation quality");
    let mut rows = Vec::new();
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(summary) => rows.push(vec![
                outcome.name.clone(),
                summary.modules.to_string(),
                summary.input_rows.to_string(),
                summary.output_rows.to_string(),
            ]),
            Err(e) => {
                failed += 1;
                output.error(&format!("{}: {}", outcome.name, e));
            }
        }
    }
    output.table(&["Set", "Modules", "Inputs", "Outputs"], &rows);

    if failed == 0 {
        output.success(&format!("{} annotation sets evaluated", outcomes.len()));
    } else {
        output.warning(&format!(
            "{} of {} annotation sets failed",
            failed,
            outcomes.len()
        ));
    }
    Ok(())
}

struct StatsOptions {
    terms: Option<TermKind>,
    until: Option<NaiveDate>,
    top: usize,
    path: Option<PathBuf>,
    ids: bool,
}

fn run_stats(config: &AppConfig, output: &Output, input: &Path, options: StatsOptions) -> Result<()> {
    let records = annotations::read_raw(input)?;
    let taxonomy = match options.terms {
        Some(_) => Some(Taxonomy::load(&config.paths.taxonomy_snapshot)?),
        None => None,
    };
    let until = options.until.map(|date| date.and_time(NaiveTime::MIN).and_utc());
    let terms = options.terms.zip(taxonomy.as_ref());

    let mut stats = statistics::collect(records, until, terms)?;
    print_registry_stats(output, &stats, options.top);

    if let Some(path) = options.path {
        if !options.ids {
            stats.terms = stats.terms.map(|t| t.without_ids());
        }
        stats.save(&path)?;
        output.written("statistics", &path.display().to_string());
    }
    Ok(())
}

fn run_config(
    config: &AppConfig,
    output: &Output,
    path: Option<&Path>,
    action: ConfigCommands,
) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            print!("{}", config.to_toml_string()?);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            let source = path
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| format!("{} (defaults if absent)", DEFAULT_CONFIG_FILE));
            output.success(&format!("Configuration is valid: {}", source));
            output.kv("registry", &config.registry.base_url);
            output.kv(
                "annotation sets",
                &config.evaluation.annotation_sets.len().to_string(),
            );
        }
    }
    Ok(())
}

fn print_stats(output: &Output, stats: &ConversionStats) {
    output.header("Conversion summary");
    output.kv("Provided", &stats.provided_records.to_string());
    output.kv("Total functions", &stats.total_functions.to_string());
    output.kv("Errored functions", &stats.rejected_functions.to_string());
    output.kv("No functions", &stats.no_function_records().to_string());
    output.kv("Created annotations", &stats.accepted_functions.to_string());
    if !stats.missing_dimension.is_empty() {
        output.hint(&format!(
            "{} agents have inputs or outputs without data type or format",
            stats.missing_dimension.len()
        ));
    }
}

fn print_registry_stats(output: &Output, stats: &RegistryStatistics, top: usize) {
    let general = &stats.general;
    output.header("Registry statistics");
    if let Some(until) = stats.until {
        output.kv("Added before", &until.format("%Y-%m-%d").to_string());
    }
    output.kv("Agents", &general.agent_count.to_string());
    output.kv("With functions", &general.agents_with_functions.to_string());
    output.kv("Functions", &general.function_count.to_string());
    output.kv(
        "Generic data with format",
        &stats.generic_data_with_format.len().to_string(),
    );

    let rows: Vec<Vec<String>> = general
        .fields
        .iter()
        .map(|f| vec![f.field.to_string(), f.agents.to_string(), f.entries.to_string()])
        .collect();
    output.table(&["Field", "Agents", "Entries"], &rows);

    let Some(terms) = &stats.terms else {
        return;
    };
    output.header(&format!("EDAM {} terms", terms.kind));
    let rows: Vec<Vec<String>> = terms
        .terms
        .iter()
        .take(top)
        .map(|t| {
            let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
            vec![
                fragment(&t.iri).to_string(),
                or_dash(t.name.clone()),
                or_dash(t.level.map(|l| l.to_string())),
                or_dash(t.depth.map(|d| d.to_string())),
                t.strict_count.to_string(),
                t.total_count.to_string(),
            ]
        })
        .collect();
    output.table(&["Term", "Name", "Level", "Depth", "Strict", "Total"], &rows);
    if terms.unknown_terms > 0 {
        output.hint(&format!(
            "{} terms are not in the taxonomy snapshot",
            terms.unknown_terms
        ));
    }
}

fn print_summary(output: &Output, summary: &EvaluationSummary) {
    output.header("Evaluation");
    output.kv("Annotations", &summary.annotations.display().to_string());
    output.kv("Modules", &summary.modules.to_string());
    output.kv("Input rows", &summary.input_rows.to_string());
    output.kv("Output rows", &summary.output_rows.to_string());
    output.written("run configuration", &summary.run_config.display().to_string());
    output.written("report", &summary.reports.inputs.display().to_string());
    output.written("report", &summary.reports.outputs.display().to_string());
}

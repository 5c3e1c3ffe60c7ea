//! CLI module for bioagents-ape
//!
//! Provides command-line interface parsing for the bioagents-ape binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod commands;
pub mod output;

use crate::statistics::TermKind;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// bioagents-ape - bio.agents annotations for APE
///
/// Fetches tool descriptions from the bio.agents registry, converts them
/// into APE annotation files and measures how specific their EDAM terms are.
#[derive(Parser, Debug)]
#[command(
    name = "bioagents-ape",
    version,
    about = "bio.agents annotation conversion and quality evaluation for APE",
    after_help = "EXAMPLES:\n    \
                  bioagents-ape fetch --domain proteomics --name Proteomics\n    \
                  bioagents-ape convert agents.json annotations.json\n    \
                  bioagents-ape evaluate data/tools/agentAnnotationProteomics.json\n    \
                  bioagents-ape evaluate-all\n    \
                  bioagents-ape stats agents.json --terms format --until 2020-01-01\n    \
                  bioagents-ape config validate --config my.toml"
)]
pub struct Cli {
    /// Path to the configuration file (defaults to bioagents.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a domain's agents, store the raw JSON and convert it
    ///
    /// Writes <tools_dir>/<prefix><name>RAW.json and <prefix><name>.json.
    Fetch {
        /// Domain name used in the output file names
        #[arg(short, long)]
        name: String,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Convert a raw bio.agents JSON dump into an APE annotation file
    Convert {
        /// Raw JSON array of bio.agents records
        input: PathBuf,

        /// Annotation file to write
        output: PathBuf,
    },

    /// Compute term depths for one annotation file
    Evaluate {
        /// APE annotation file
        annotations: PathBuf,

        /// Report base path (defaults to <results_dir>/<file stem>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate every annotation set listed in the configuration
    EvaluateAll,

    /// Descriptive statistics over a raw bio.agents JSON dump
    Stats {
        /// Raw JSON array of bio.agents records
        input: PathBuf,

        /// Also count EDAM terms of this kind against the taxonomy snapshot
        #[arg(long, value_enum)]
        terms: Option<TermKind>,

        /// Only count agents added before this date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        until: Option<NaiveDate>,

        /// Number of terms to list
        #[arg(long, default_value_t = 20)]
        top: usize,

        /// Write the full statistics as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep per-term agent ids in the JSON output
        #[arg(long, requires = "output")]
        ids: bool,
    },

    /// Show or validate the configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Where `fetch` gets its agents from; exactly one is required.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// JSON file holding an array of bio.agents ids
    #[arg(long, value_name = "FILE")]
    pub ids: Option<PathBuf>,

    /// bio.agents domain (e.g. proteomics)
    #[arg(long)]
    pub domain: Option<String>,

    /// EDAM topic id (e.g. topic_3538)
    #[arg(long)]
    pub topic: Option<String>,

    /// Reuse an already fetched raw JSON dump
    #[arg(long, value_name = "FILE")]
    pub raw: Option<PathBuf>,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Check the configuration file for errors
    Validate,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

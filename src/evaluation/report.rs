//! Tab separated depth reports.
//!
//! Each run writes `<base>_inputs.csv` and `<base>_outputs.csv`. Rows are
//! flushed as they are written, so an interrupted run leaves a readable
//! prefix.

use crate::types::Result;
use crate::utils::ReportColumn;
use ape_taxonomy::{DepthReport, DepthRow, DimensionResolver};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Paths of the two reports written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub inputs: PathBuf,
    pub outputs: PathBuf,
}

impl ReportPaths {
    pub fn for_base(base: &Path) -> Self {
        Self {
            inputs: with_suffix(base, "_inputs.csv"),
            outputs: with_suffix(base, "_outputs.csv"),
        }
    }
}

/// `base` with `suffix` appended to its last component.
pub(crate) fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

#[derive(Debug, Clone)]
struct Column {
    dimension: String,
    header: String,
}

/// Writes depth rows with a fixed column layout.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    columns: Vec<Column>,
}

impl ReportWriter {
    /// Columns are matched against row dimensions after resolving their
    /// keys to IRIs.
    pub fn new(columns: &[ReportColumn], resolver: &DimensionResolver) -> Self {
        let columns = columns
            .iter()
            .map(|c| Column {
                dimension: resolver.resolve(&c.dimension),
                header: c.header.clone(),
            })
            .collect();
        Self { columns }
    }

    pub fn header(&self) -> String {
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header.as_str()).collect();
        format!("Name\t OrderNo\t {}\n", headers.join("\t"))
    }

    /// One report line. Commas in the module label become `;`.
    pub fn format_row(&self, row: &DepthRow) -> String {
        let depths: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                row.depth_of(&c.dimension)
                    .map(|d| d.to_string())
                    .unwrap_or_default()
            })
            .collect();

        let extra = row
            .depths
            .iter()
            .filter(|d| !self.columns.iter().any(|c| c.dimension == d.dimension))
            .count();
        if extra > 0 {
            debug!(module = %row.module, extra, "Row has dimensions without a report column");
        }

        format!(
            "{}\t {}\t {}\n",
            row.module.replace(',', ";"),
            row.position,
            depths.join("\t")
        )
    }

    /// Write both reports for `base`, replacing earlier ones.
    pub fn write(&self, report: &DepthReport, base: &Path) -> Result<ReportPaths> {
        let paths = ReportPaths::for_base(base);
        if let Some(parent) = base.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        remove_stale(&paths.inputs);
        remove_stale(&paths.outputs);

        self.write_rows(&report.inputs, &paths.inputs)?;
        self.write_rows(&report.outputs, &paths.outputs)?;

        info!(
            inputs = report.inputs.len(),
            outputs = report.outputs.len(),
            path = %base.display(),
            "Depth reports written"
        );
        Ok(paths)
    }

    /// Append `rows` to `path` under a header, flushing after each line.
    pub fn write_rows(&self, rows: &[DepthRow], path: &Path) -> Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut out = BufWriter::new(file);

        out.write_all(self.header().as_bytes())?;
        out.flush()?;
        for row in rows {
            out.write_all(self.format_row(row).as_bytes())?;
            out.flush()?;
        }
        Ok(())
    }
}

fn remove_stale(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed previous report"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Could not remove previous report"),
    }
}

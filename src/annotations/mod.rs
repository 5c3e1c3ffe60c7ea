//! Conversion of bio.agents records into APE tool annotations.

pub mod converter;

pub use converter::{convert, ConversionStats, Rejection};

use crate::registry::RawRecord;
use crate::types::Result;
use ape_taxonomy::ApeAnnotations;
use std::path::Path;
use tracing::info;

/// Write records exactly as fetched, for later re-processing.
pub fn write_raw<P: AsRef<Path>>(records: &[RawRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    std::fs::write(path, serde_json::to_string_pretty(records)?)?;
    info!(path = %path.display(), count = records.len(), "Raw agents written");
    Ok(())
}

/// Read records previously written with [`write_raw`].
pub fn read_raw<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write an APE annotation file.
pub fn write_annotations<P: AsRef<Path>>(annotations: &ApeAnnotations, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    std::fs::write(path, serde_json::to_string_pretty(annotations)?)?;
    info!(
        path = %path.display(),
        functions = annotations.functions.len(),
        "Annotations written"
    );
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

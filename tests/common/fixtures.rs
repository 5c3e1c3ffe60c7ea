//! Shared test fixtures.
//!
//! Registry records in the shape bio.agents returns them, a small EDAM-like
//! taxonomy snapshot and a ready-to-use workspace layout on disk.

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const EDAM: &str = "http://edamontology.org/";

pub fn edam(fragment: &str) -> String {
    format!("{}{}", EDAM, fragment)
}

/// A registry record with one complete function.
pub fn agent(id: &str, name: &str) -> Value {
    json!({
        "bioagentsID": id,
        "name": name,
        "homepage": format!("https://example.org/{}", id),
        "function": [{
            "operation": [{"uri": edam("operation_3631"), "term": "Peptide identification"}],
            "input": [{
                "data": {"uri": edam("data_0943"), "term": "Mass spectrum"},
                "format": [{"uri": edam("format_3244"), "term": "mzML"}]
            }],
            "output": [{
                "data": {"uri": edam("data_2603"), "term": "Expression data"},
                "format": [{"uri": edam("format_3475"), "term": "TSV"}]
            }]
        }]
    })
}

/// A record whose only function lacks an output format.
pub fn agent_without_output_format(id: &str) -> Value {
    let mut record = agent(id, id);
    record["function"][0]["output"][0]["format"] = json!([]);
    record
}

/// One page of the listing endpoint.
pub fn listing_page(records: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "count": records.len(),
        "next": next,
        "previous": null,
        "list": records
    })
}

/// Snapshot with `data_0006` (depth 2) and `format_1915` (depth 1) trees
/// plus an ignored `APE_label` root.
pub fn taxonomy_snapshot() -> Value {
    json!({"nodes": [
        {"id": edam("data_0006"), "label": "Data"},
        {"id": edam("data_2603"), "label": "Expression data", "parent": edam("data_0006")},
        {"id": edam("data_0943"), "label": "Mass spectrum", "parent": edam("data_2603")},
        {"id": edam("format_1915"), "label": "Format"},
        {"id": edam("format_3244"), "label": "mzML", "parent": edam("format_1915")},
        {"id": edam("format_3475"), "label": "TSV", "parent": edam("format_1915")},
        {"id": "http://www.w3.org/2002/07/owl#APE_label", "label": "APE_label"},
        {"id": edam("operation_0004"), "label": "Operation"},
        {"id": edam("operation_3631"), "label": "Peptide identification", "parent": edam("operation_0004")}
    ]})
}

pub fn base_framework_config() -> Value {
    json!({
        "ontology_path": "edam.owl",
        "ontologyPrefixIRI": EDAM,
        "toolsTaxonomyRoot": "operation_0004",
        "dataDimensions_taxonomy_roots": ["data_0006", "format_1915"],
        "agent_annotations_path": "placeholder.json",
        "strict_agent_annotations": "true"
    })
}

/// Lay out `tools/`, `results/` and `config/` under `root` and return the
/// path of a `bioagents.toml` pointing at them.
pub fn write_workspace(root: &Path, registry_url: &str) -> PathBuf {
    fs::create_dir_all(root.join("tools")).unwrap();
    fs::create_dir_all(root.join("config")).unwrap();
    fs::write(
        root.join("config/baseape.configuration"),
        base_framework_config().to_string(),
    )
    .unwrap();
    fs::write(
        root.join("config/edam_taxonomy.json"),
        taxonomy_snapshot().to_string(),
    )
    .unwrap();

    let config = format!(
        r#"log_level = "warn"

[registry]
base_url = "{url}"
timeout_secs = 5

[paths]
tools_dir = "{root}/tools"
results_dir = "{root}/results"
configuration_dir = "{root}/config"
taxonomy_snapshot = "{root}/config/edam_taxonomy.json"
tools_prefix = "agentAnnotation"

[evaluation]
annotation_sets = ["agentAnnotationProteomics", "agentAnnotationMissing"]
"#,
        url = registry_url,
        root = root.display()
    );
    let path = root.join("bioagents.toml");
    fs::write(&path, config).unwrap();
    path
}

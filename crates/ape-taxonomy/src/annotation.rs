//! APE tool annotation format and its translation into a module graph.
//!
//! The annotation file looks like:
//!
//! ```json
//! {"functions": [
//!   {"id": "comet", "label": "Comet",
//!    "taxonomyOperations": ["http://edamontology.org/operation_3646"],
//!    "inputs":  [{"data_0006": ["..."], "format_1915": ["..."]}],
//!    "outputs": [{"data_0006": ["..."], "format_1915": ["..."]}]}
//! ]}
//! ```

use crate::error::{Error, Result};
use crate::taxonomy::Taxonomy;
use crate::types::{Module, NodeId, Predicate, TypedParameter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, instrument};

/// Key under which converters store data-type terms.
pub const DATA_DIMENSION: &str = "data_0006";
/// Key under which converters store format terms.
pub const FORMAT_DIMENSION: &str = "format_1915";

/// Root of an APE annotation file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApeAnnotations {
    /// Annotated tool functions.
    pub functions: Vec<ApeFunction>,
}

/// A single annotated tool function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApeFunction {
    /// Unique id (`<tool>` or `<tool>_op<N>`).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Operation IRIs.
    #[serde(rename = "taxonomyOperations", default)]
    pub taxonomy_operations: Vec<String>,
    /// Inputs in declaration order.
    #[serde(default)]
    pub inputs: Vec<ApeParameter>,
    /// Outputs in declaration order.
    #[serde(default)]
    pub outputs: Vec<ApeParameter>,
}

/// Dimension key -> term IRIs for one parameter.
pub type ApeParameter = BTreeMap<String, Vec<String>>;

impl ApeAnnotations {
    /// Read an annotation file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Annotation(format!("{}: {}", path.display(), e)))
    }
}

/// Maps dimension keys such as `data_0006` onto taxonomy IRIs.
#[derive(Debug, Clone)]
pub struct DimensionResolver {
    prefix: String,
}

impl DimensionResolver {
    /// Resolver that prepends `prefix` to bare keys.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Full IRI for a key or term. Values that already look like IRIs are
    /// returned unchanged.
    pub fn resolve(&self, key: &str) -> String {
        if key.contains("://") {
            key.to_string()
        } else {
            format!("{}{}", self.prefix, key)
        }
    }
}

impl Default for DimensionResolver {
    fn default() -> Self {
        Self::new("http://edamontology.org/")
    }
}

/// The tools of an annotation file, bound to a taxonomy.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: Vec<Module>,
}

impl ModuleGraph {
    /// Wrap already built modules.
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    /// Resolve every annotation term against `taxonomy`.
    ///
    /// Unknown dimensions or terms are fatal: the depth metric would be
    /// meaningless for them.
    #[instrument(skip_all, fields(functions = annotations.functions.len()))]
    pub fn from_annotations(
        taxonomy: &Taxonomy,
        annotations: &ApeAnnotations,
        resolver: &DimensionResolver,
    ) -> Result<Self> {
        let mut modules = Vec::with_capacity(annotations.functions.len());
        for function in &annotations.functions {
            modules.push(Module {
                id: function.id.clone(),
                label: function.label.clone(),
                operations: function.taxonomy_operations.clone(),
                inputs: bind_parameters(taxonomy, &function.inputs, resolver)?,
                outputs: bind_parameters(taxonomy, &function.outputs, resolver)?,
            });
        }
        debug!(modules = modules.len(), "Module graph built");
        Ok(Self { modules })
    }

    /// All modules in annotation order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Look a module up by id.
    pub fn get(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// Number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether there are no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

fn bind_parameters(
    taxonomy: &Taxonomy,
    parameters: &[ApeParameter],
    resolver: &DimensionResolver,
) -> Result<Vec<TypedParameter>> {
    parameters
        .iter()
        .map(|parameter| {
            let predicates = parameter
                .iter()
                .filter(|(_, terms)| !terms.is_empty())
                .map(|(key, terms)| bind_predicate(taxonomy, key, terms, resolver))
                .collect::<Result<Vec<_>>>()?;
            Ok(TypedParameter { predicates })
        })
        .collect()
}

fn bind_predicate(
    taxonomy: &Taxonomy,
    key: &str,
    terms: &[String],
    resolver: &DimensionResolver,
) -> Result<Predicate> {
    let dimension_iri = resolver.resolve(key);
    let dimension = resolve_node(taxonomy, &dimension_iri)?;

    let terms = terms
        .iter()
        .map(|term| {
            let iri = resolver.resolve(term);
            let node = resolve_node(taxonomy, &iri)?;
            if !taxonomy.is_within(node, dimension) {
                return Err(Error::TermOutsideDimension {
                    term: iri,
                    dimension: dimension_iri.clone(),
                });
            }
            Ok(node)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Predicate { dimension, terms })
}

fn resolve_node(taxonomy: &Taxonomy, iri: &str) -> Result<NodeId> {
    taxonomy
        .find(iri)
        .ok_or_else(|| Error::UnknownTerm(iri.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn edam() -> Taxonomy {
        let mut t = Taxonomy::new();
        let data = t.insert("http://edamontology.org/data_0006", "Data", None).unwrap();
        t.insert("http://edamontology.org/data_2044", "Sequence", Some(data))
            .unwrap();
        let format = t
            .insert("http://edamontology.org/format_1915", "Format", None)
            .unwrap();
        t.insert("http://edamontology.org/format_1929", "FASTA", Some(format))
            .unwrap();
        t
    }

    fn annotations(value: serde_json::Value) -> ApeAnnotations {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_resolver_prefixes_bare_keys() {
        let resolver = DimensionResolver::default();
        assert_eq!(
            resolver.resolve("data_0006"),
            "http://edamontology.org/data_0006"
        );
        assert_eq!(
            resolver.resolve("http://edamontology.org/format_1929"),
            "http://edamontology.org/format_1929"
        );
    }

    #[test]
    fn test_from_annotations_binds_terms() {
        let taxonomy = edam();
        let ann = annotations(json!({"functions": [{
            "id": "seqtool",
            "label": "SeqTool",
            "taxonomyOperations": ["http://edamontology.org/operation_0004"],
            "inputs": [{
                "data_0006": ["http://edamontology.org/data_2044"],
                "format_1915": ["http://edamontology.org/format_1929"]
            }],
            "outputs": [{
                "data_0006": ["http://edamontology.org/data_0006"],
                "format_1915": ["http://edamontology.org/format_1915"]
            }]
        }]}));

        let graph =
            ModuleGraph::from_annotations(&taxonomy, &ann, &DimensionResolver::default()).unwrap();
        let module = graph.get("seqtool").unwrap();

        assert_eq!(module.inputs.len(), 1);
        let predicates = &module.inputs[0].predicates;
        assert_eq!(predicates.len(), 2);
        assert_eq!(
            predicates[0].dimension,
            taxonomy.find("http://edamontology.org/data_0006").unwrap()
        );
        assert_eq!(
            predicates[1].terms,
            vec![taxonomy.find("http://edamontology.org/format_1929").unwrap()]
        );
    }

    #[test]
    fn test_unknown_term_is_fatal() {
        let taxonomy = edam();
        let ann = annotations(json!({"functions": [{
            "id": "x", "label": "X",
            "inputs": [{"data_0006": ["http://edamontology.org/data_9999"]}],
            "outputs": []
        }]}));

        let result = ModuleGraph::from_annotations(&taxonomy, &ann, &DimensionResolver::default());
        assert!(matches!(result, Err(Error::UnknownTerm(t)) if t.ends_with("data_9999")));
    }

    #[test]
    fn test_term_outside_dimension_is_fatal() {
        let taxonomy = edam();
        let ann = annotations(json!({"functions": [{
            "id": "x", "label": "X",
            "inputs": [{"data_0006": ["http://edamontology.org/format_1929"]}],
            "outputs": []
        }]}));

        let result = ModuleGraph::from_annotations(&taxonomy, &ann, &DimensionResolver::default());
        assert!(matches!(result, Err(Error::TermOutsideDimension { .. })));
    }

    #[test]
    fn test_annotation_serialization_shape() {
        let mut input = ApeParameter::new();
        input.insert(DATA_DIMENSION.to_string(), vec!["d".to_string()]);
        input.insert(FORMAT_DIMENSION.to_string(), vec!["f".to_string()]);
        let ann = ApeAnnotations {
            functions: vec![ApeFunction {
                id: "t".to_string(),
                label: "T".to_string(),
                taxonomy_operations: vec!["op".to_string()],
                inputs: vec![input.clone()],
                outputs: vec![input],
            }],
        };

        let value = serde_json::to_value(&ann).unwrap();
        assert_eq!(value["functions"][0]["taxonomyOperations"][0], "op");
        assert_eq!(value["functions"][0]["inputs"][0]["data_0006"][0], "d");
        assert_eq!(value["functions"][0]["outputs"][0]["format_1915"][0], "f");
    }
}

//! Taxonomy depth analysis.
//!
//! The depth of a term is the length, in edges, of the longest downward
//! path from it to a leaf. Shallow annotations (terms close to the leaves)
//! are specific; deep ones are generic.

use crate::error::{Error, Result};
use crate::taxonomy::TaxonomyLookup;
use crate::types::{Module, NodeId, Predicate, TypedParameter, IGNORED_DIMENSION_LABEL};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Depth of one reported dimension of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionDepth {
    /// IRI of the dimension root.
    pub dimension: String,
    /// Label of the dimension root.
    pub label: String,
    /// Deepest depth among the parameter's terms in this dimension.
    pub depth: u32,
}

/// One report line: a module parameter and its per-dimension depths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepthRow {
    /// Module label.
    pub module: String,
    /// 1-based position among the module's inputs (or outputs).
    pub position: usize,
    /// Reported dimensions in annotation order.
    pub depths: Vec<DimensionDepth>,
}

impl DepthRow {
    /// Depth for a dimension IRI, if that dimension was reported.
    pub fn depth_of(&self, dimension: &str) -> Option<u32> {
        self.depths
            .iter()
            .find(|d| d.dimension == dimension)
            .map(|d| d.depth)
    }
}

/// Depth rows for inputs and outputs, kept apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DepthReport {
    /// One row per (module, input position).
    pub inputs: Vec<DepthRow>,
    /// One row per (module, output position).
    pub outputs: Vec<DepthRow>,
}

/// Longest downward path from `node` to a leaf.
///
/// A leaf has depth 0; otherwise `1 + max(depth(child))`. The walk keeps
/// its own stack, so arbitrarily deep taxonomies are fine. Loops in a
/// foreign lookup backend are reported as [`Error::Cycle`].
pub fn depth<L: TaxonomyLookup + ?Sized>(lookup: &L, node: NodeId) -> Result<u32> {
    let mut on_path = HashSet::new();
    let mut stack = vec![enter(lookup, node, &mut on_path)?];
    let mut result = 0;

    while let Some(frame) = stack.last_mut() {
        if let Some(&child) = frame.children.get(frame.next) {
            frame.next += 1;
            let child_frame = enter(lookup, child, &mut on_path)?;
            stack.push(child_frame);
            continue;
        }

        let (finished, below) = (frame.node, frame.deepest);
        stack.pop();
        on_path.remove(&finished);
        match stack.last_mut() {
            Some(parent) => parent.deepest = parent.deepest.max(below + 1),
            None => result = below,
        }
    }

    Ok(result)
}

// A node whose children are being visited, in post-order.
struct Frame<'a> {
    node: NodeId,
    children: &'a [NodeId],
    next: usize,
    deepest: u32,
}

fn enter<'a, L: TaxonomyLookup + ?Sized>(
    lookup: &'a L,
    node: NodeId,
    on_path: &mut HashSet<NodeId>,
) -> Result<Frame<'a>> {
    let view = lookup.lookup(node).ok_or(Error::UnknownNode(node.raw()))?;
    if !on_path.insert(node) {
        return Err(Error::Cycle(view.iri.to_string()));
    }
    Ok(Frame {
        node,
        children: view.children,
        next: 0,
        deepest: 0,
    })
}

/// Compute depth rows for every input and output of every module.
#[instrument(skip_all, fields(modules = modules.len()))]
pub fn analyze<L: TaxonomyLookup + ?Sized>(modules: &[Module], lookup: &L) -> Result<DepthReport> {
    let mut report = DepthReport::default();

    for module in modules {
        report
            .inputs
            .extend(parameter_rows(module, &module.inputs, lookup)?);
        report
            .outputs
            .extend(parameter_rows(module, &module.outputs, lookup)?);
    }

    debug!(
        inputs = report.inputs.len(),
        outputs = report.outputs.len(),
        "Depth analysis finished"
    );
    Ok(report)
}

fn parameter_rows<L: TaxonomyLookup + ?Sized>(
    module: &Module,
    parameters: &[TypedParameter],
    lookup: &L,
) -> Result<Vec<DepthRow>> {
    parameters
        .iter()
        .enumerate()
        .map(|(index, parameter)| {
            let mut depths = Vec::with_capacity(parameter.predicates.len());
            for predicate in &parameter.predicates {
                if let Some(d) = predicate_depth(predicate, lookup)? {
                    depths.push(d);
                }
            }
            Ok(DepthRow {
                module: module.label.clone(),
                position: index + 1,
                depths,
            })
        })
        .collect()
}

fn predicate_depth<L: TaxonomyLookup + ?Sized>(
    predicate: &Predicate,
    lookup: &L,
) -> Result<Option<DimensionDepth>> {
    let dimension = lookup
        .lookup(predicate.dimension)
        .ok_or(Error::UnknownNode(predicate.dimension.raw()))?;
    let root = lookup
        .lookup(dimension.root)
        .ok_or(Error::UnknownNode(dimension.root.raw()))?;
    if root.label == IGNORED_DIMENSION_LABEL {
        return Ok(None);
    }

    let mut deepest = 0;
    for &term in &predicate.terms {
        deepest = deepest.max(depth(lookup, term)?);
    }

    Ok(Some(DimensionDepth {
        dimension: dimension.iri.to_string(),
        label: dimension.label.to_string(),
        depth: deepest,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Taxonomy;
    use crate::types::NodeView;
    use rstest::rstest;

    /// A -> {B -> {D, E}, C}
    fn sample() -> Taxonomy {
        let mut t = Taxonomy::new();
        let a = t.insert("A", "A", None).unwrap();
        let b = t.insert("B", "B", Some(a)).unwrap();
        t.insert("C", "C", Some(a)).unwrap();
        t.insert("D", "D", Some(b)).unwrap();
        t.insert("E", "E", Some(b)).unwrap();
        t
    }

    #[rstest]
    #[case("A", 2)]
    #[case("B", 1)]
    #[case("C", 0)]
    #[case("D", 0)]
    #[case("E", 0)]
    fn test_depth_sample_tree(#[case] iri: &str, #[case] expected: u32) {
        let t = sample();
        assert_eq!(depth(&t, t.find(iri).unwrap()).unwrap(), expected);
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    #[case(25)]
    fn test_depth_of_chain_is_height(#[case] height: u32) {
        let mut t = Taxonomy::new();
        let root = t.insert("n0", "n0", None).unwrap();
        let mut parent = root;
        for i in 1..=height {
            parent = t.insert(&format!("n{i}"), "n", Some(parent)).unwrap();
        }
        assert_eq!(depth(&t, root).unwrap(), height);
        assert_eq!(depth(&t, parent).unwrap(), 0);
    }

    #[test]
    fn test_depth_of_deep_chain_does_not_overflow() {
        let mut t = Taxonomy::new();
        let root = t.insert("n0", "n0", None).unwrap();
        let mut parent = root;
        for i in 1..=200_000u32 {
            parent = t.insert(&format!("n{i}"), "n", Some(parent)).unwrap();
        }
        assert_eq!(depth(&t, root).unwrap(), 200_000);
    }

    #[test]
    fn test_depth_takes_longest_branch() {
        // A -> {B -> C -> D, E}; the shallow sibling comes last
        let mut t = Taxonomy::new();
        let a = t.insert("A", "A", None).unwrap();
        let b = t.insert("B", "B", Some(a)).unwrap();
        let c = t.insert("C", "C", Some(b)).unwrap();
        t.insert("D", "D", Some(c)).unwrap();
        t.insert("E", "E", Some(a)).unwrap();
        assert_eq!(depth(&t, a).unwrap(), 3);
        assert_eq!(depth(&t, b).unwrap(), 2);
    }

    #[test]
    fn test_depth_unknown_node() {
        let t = sample();
        assert!(matches!(
            depth(&t, NodeId::new(99)),
            Err(Error::UnknownNode(99))
        ));
    }

    struct Looping {
        children: Vec<NodeId>,
    }

    impl TaxonomyLookup for Looping {
        fn lookup(&self, node: NodeId) -> Option<NodeView<'_>> {
            (node.index() < 2).then(|| NodeView {
                iri: "loop",
                label: "loop",
                root: NodeId::new(0),
                children: &self.children[node.index()..node.index() + 1],
            })
        }
    }

    #[test]
    fn test_depth_guards_against_cycles() {
        // 0 -> 1 -> 0
        let lookup = Looping {
            children: vec![NodeId::new(1), NodeId::new(0)],
        };
        assert!(matches!(depth(&lookup, NodeId::new(0)), Err(Error::Cycle(_))));
    }

    fn module(t: &Taxonomy, inputs: Vec<Vec<(&str, Vec<&str>)>>) -> Module {
        let param = |preds: Vec<(&str, Vec<&str>)>| TypedParameter {
            predicates: preds
                .into_iter()
                .map(|(dim, terms)| Predicate {
                    dimension: t.find(dim).unwrap(),
                    terms: terms.into_iter().map(|x| t.find(x).unwrap()).collect(),
                })
                .collect(),
        };
        Module {
            id: "m".to_string(),
            label: "Mod, One".to_string(),
            operations: vec![],
            inputs: inputs.clone().into_iter().map(param).collect(),
            outputs: inputs.into_iter().map(param).collect(),
        }
    }

    fn two_dimensions() -> Taxonomy {
        let mut t = Taxonomy::new();
        let data = t.insert("data", "Data", None).unwrap();
        let seq = t.insert("seq", "Sequence", Some(data)).unwrap();
        t.insert("dna", "DNA", Some(seq)).unwrap();
        let format = t.insert("format", "Format", None).unwrap();
        t.insert("fasta", "FASTA", Some(format)).unwrap();
        let label = t.insert("label", IGNORED_DIMENSION_LABEL, None).unwrap();
        t.insert("tag", "tag", Some(label)).unwrap();
        t
    }

    #[test]
    fn test_analyze_skips_ape_label_dimension() {
        let t = two_dimensions();
        let m = module(
            &t,
            vec![vec![
                ("data", vec!["seq"]),
                ("format", vec!["fasta"]),
                ("label", vec!["label"]),
            ]],
        );

        let report = analyze(&[m], &t).unwrap();
        assert_eq!(report.inputs.len(), 1);
        let row = &report.inputs[0];
        assert_eq!(row.position, 1);
        assert_eq!(row.depths.len(), 2);
        assert_eq!(row.depth_of("data"), Some(1));
        assert_eq!(row.depth_of("format"), Some(0));
        assert_eq!(row.depth_of("label"), None);
    }

    #[test]
    fn test_analyze_positions_and_single_dimension() {
        let t = two_dimensions();
        let m = module(
            &t,
            vec![
                vec![("data", vec!["data"])],
                vec![("data", vec!["dna", "seq"]), ("format", vec!["format"])],
            ],
        );

        let report = analyze(&[m], &t).unwrap();
        let positions: Vec<_> = report.inputs.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![1, 2]);
        // A single reported dimension is not an error.
        assert_eq!(report.inputs[0].depths.len(), 1);
        assert_eq!(report.inputs[0].depth_of("data"), Some(2));
        // Several terms in one dimension report the deepest.
        assert_eq!(report.inputs[1].depth_of("data"), Some(1));
        assert_eq!(report.inputs[1].depth_of("format"), Some(1));
        assert_eq!(report.outputs.len(), 2);
        assert_eq!(report.outputs[0].module, "Mod, One");
    }

    #[test]
    fn test_analyze_unknown_dimension_node() {
        let t = two_dimensions();
        let m = Module {
            id: "m".to_string(),
            label: "m".to_string(),
            operations: vec![],
            inputs: vec![TypedParameter {
                predicates: vec![Predicate {
                    dimension: NodeId::new(500),
                    terms: vec![],
                }],
            }],
            outputs: vec![],
        };
        assert!(matches!(analyze(&[m], &t), Err(Error::UnknownNode(500))));
    }
}

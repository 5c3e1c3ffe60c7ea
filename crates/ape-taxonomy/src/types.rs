//! Common types for ape-taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of the dimension APE attaches to every parameter for its own
/// bookkeeping. Depths are never reported for it.
pub const IGNORED_DIMENSION_LABEL: &str = "APE_label";

/// Index of a node inside a [`Taxonomy`](crate::Taxonomy) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Create a node id from a raw arena index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw value, as used in error messages.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One ontology term (data type, format or operation).
#[derive(Debug, Clone)]
pub struct TaxonomyNode {
    /// Term IRI.
    pub iri: String,
    /// Display label.
    pub label: String,
    /// Parent term, `None` for a root.
    pub parent: Option<NodeId>,
    /// Direct sub-terms in declaration order.
    pub children: Vec<NodeId>,
    /// Root of the tree this node belongs to.
    pub root: NodeId,
}

/// Borrowed view of a node, as handed out by a
/// [`TaxonomyLookup`](crate::TaxonomyLookup) backend.
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    /// Term IRI.
    pub iri: &'a str,
    /// Display label.
    pub label: &'a str,
    /// Root of the tree this node belongs to.
    pub root: NodeId,
    /// Direct sub-terms.
    pub children: &'a [NodeId],
}

/// A generalized predicate: the terms a parameter carries in one dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// Root node of the dimension (e.g. EDAM `data_0006`).
    pub dimension: NodeId,
    /// Terms of that dimension; never empty.
    pub terms: Vec<NodeId>,
}

/// A typed input or output of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedParameter {
    /// One predicate per dimension, in annotation order.
    pub predicates: Vec<Predicate>,
}

/// One executable operation (a tool function).
#[derive(Debug, Clone)]
pub struct Module {
    /// Annotation id, e.g. `comet_op2`.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Operation taxonomy IRIs.
    pub operations: Vec<String>,
    /// Inputs in declaration order.
    pub inputs: Vec<TypedParameter>,
    /// Outputs in declaration order.
    pub outputs: Vec<TypedParameter>,
}

/// Serialized node of a taxonomy snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotNode {
    /// Term IRI.
    pub id: String,
    /// Display label; defaults to the IRI fragment.
    #[serde(default)]
    pub label: Option<String>,
    /// Parent IRI, absent for roots.
    #[serde(default)]
    pub parent: Option<String>,
}

/// Taxonomy exported by the planning framework after ontology loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomySnapshot {
    /// Nodes in declaration order; children keep this order.
    pub nodes: Vec<SnapshotNode>,
}

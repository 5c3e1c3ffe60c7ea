//! Arena-backed taxonomy.
//!
//! Nodes live in a single `Vec` and refer to each other through [`NodeId`]
//! indices, so parent and child links never form ownership cycles.

use crate::error::{Error, Result};
use crate::types::{NodeId, NodeView, SnapshotNode, TaxonomyNode, TaxonomySnapshot};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Narrow read-only interface the depth analyzer is written against.
///
/// Any ontology backend that can answer "label, root and children of this
/// node" can be analyzed.
pub trait TaxonomyLookup {
    /// Resolve a node, or `None` if the id is not part of this taxonomy.
    fn lookup(&self, node: NodeId) -> Option<NodeView<'_>>;
}

/// An ontology taxonomy: a forest of terms with single parents.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    nodes: Vec<TaxonomyNode>,
    by_iri: HashMap<String, NodeId>,
}

impl Taxonomy {
    /// Create an empty taxonomy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term under an already declared parent (or as a new root).
    pub fn insert(&mut self, iri: &str, label: &str, parent: Option<NodeId>) -> Result<NodeId> {
        if self.by_iri.contains_key(iri) {
            return Err(Error::DuplicateNode(iri.to_string()));
        }
        let id = NodeId(self.nodes.len() as u32);
        let root = match parent {
            Some(p) => {
                let parent_node = self
                    .nodes
                    .get_mut(p.index())
                    .ok_or(Error::UnknownNode(p.raw()))?;
                parent_node.children.push(id);
                parent_node.root
            }
            None => id,
        };
        self.nodes.push(TaxonomyNode {
            iri: iri.to_string(),
            label: label.to_string(),
            parent,
            children: Vec::new(),
            root,
        });
        self.by_iri.insert(iri.to_string(), id);
        Ok(id)
    }

    /// Build a taxonomy from an exported snapshot.
    ///
    /// Nodes may be listed in any order. Children keep the order in which
    /// they appear in the snapshot.
    #[instrument(skip(snapshot), fields(nodes = snapshot.nodes.len()))]
    pub fn from_snapshot(snapshot: TaxonomySnapshot) -> Result<Self> {
        let mut taxonomy = Self::new();

        for SnapshotNode { id, label, .. } in &snapshot.nodes {
            if taxonomy.by_iri.contains_key(id) {
                return Err(Error::DuplicateNode(id.clone()));
            }
            let node_id = NodeId(taxonomy.nodes.len() as u32);
            let label = label.clone().unwrap_or_else(|| fragment(id).to_string());
            taxonomy.nodes.push(TaxonomyNode {
                iri: id.clone(),
                label,
                parent: None,
                children: Vec::new(),
                root: node_id,
            });
            taxonomy.by_iri.insert(id.clone(), node_id);
        }

        for (index, node) in snapshot.nodes.iter().enumerate() {
            let Some(parent_iri) = node.parent.as_deref() else {
                continue;
            };
            let parent = taxonomy
                .find(parent_iri)
                .ok_or_else(|| Error::UnknownParent {
                    node: node.id.clone(),
                    parent: parent_iri.to_string(),
                })?;
            let child = NodeId(index as u32);
            taxonomy.nodes[index].parent = Some(parent);
            taxonomy.nodes[parent.index()].children.push(child);
        }

        taxonomy.assign_roots()?;
        debug!(roots = taxonomy.roots().count(), "Taxonomy built");
        Ok(taxonomy)
    }

    /// Load a JSON snapshot from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading taxonomy snapshot");
        let content = std::fs::read_to_string(path)?;
        let snapshot: TaxonomySnapshot = serde_json::from_str(&content)
            .map_err(|e| Error::Snapshot(format!("{}: {}", path.display(), e)))?;
        Self::from_snapshot(snapshot)
    }

    /// Find a node by IRI.
    pub fn find(&self, iri: &str) -> Option<NodeId> {
        self.by_iri.get(iri).copied()
    }

    /// Borrow a node.
    pub fn get(&self, id: NodeId) -> Option<&TaxonomyNode> {
        self.nodes.get(id.index())
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| NodeId(i as u32))
    }

    /// Whether `node` is `ancestor` or lies below it.
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|id| id == ancestor)
    }

    /// Parent, grandparent and so on up to the root, excluding `node`.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self.get(node).and_then(|n| n.parent);
        std::iter::successors(first, move |&id| self.get(id).and_then(|n| n.parent))
    }

    /// Number of edges between `node` and its root (a root is level 0).
    pub fn level(&self, node: NodeId) -> usize {
        self.ancestors(node).count()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the taxonomy has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // Walks every parent chain once, memoising roots. A chain longer than
    // the node count can only be a loop.
    fn assign_roots(&mut self) -> Result<()> {
        let mut resolved: Vec<Option<NodeId>> = vec![None; self.nodes.len()];

        for start in 0..self.nodes.len() {
            if resolved[start].is_some() {
                continue;
            }
            let mut chain = Vec::new();
            let mut current = NodeId(start as u32);
            let root = loop {
                if let Some(root) = resolved[current.index()] {
                    break root;
                }
                chain.push(current);
                if chain.len() > self.nodes.len() {
                    return Err(Error::Cycle(self.nodes[start].iri.clone()));
                }
                match self.nodes[current.index()].parent {
                    Some(parent) => current = parent,
                    None => break current,
                }
            };
            for id in chain {
                resolved[id.index()] = Some(root);
            }
        }

        for (node, root) in self.nodes.iter_mut().zip(resolved) {
            if let Some(root) = root {
                node.root = root;
            }
        }
        Ok(())
    }
}

impl TaxonomyLookup for Taxonomy {
    fn lookup(&self, node: NodeId) -> Option<NodeView<'_>> {
        self.get(node).map(|n| NodeView {
            iri: &n.iri,
            label: &n.label,
            root: n.root,
            children: &n.children,
        })
    }
}

/// Last path or fragment segment of an IRI.
pub fn fragment(iri: &str) -> &str {
    iri.rsplit(['/', '#']).next().unwrap_or(iri)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>) -> SnapshotNode {
        SnapshotNode {
            id: id.to_string(),
            label: None,
            parent: parent.map(String::from),
        }
    }

    #[test]
    fn test_insert_tracks_roots_and_children() {
        let mut taxonomy = Taxonomy::new();
        let a = taxonomy.insert("A", "A", None).unwrap();
        let b = taxonomy.insert("B", "B", Some(a)).unwrap();
        let c = taxonomy.insert("C", "C", Some(b)).unwrap();

        assert_eq!(taxonomy.get(a).unwrap().children, vec![b]);
        assert_eq!(taxonomy.get(c).unwrap().root, a);
        assert_eq!(taxonomy.roots().collect::<Vec<_>>(), vec![a]);
        assert!(taxonomy.is_within(c, a));
        assert!(taxonomy.is_within(a, a));
        assert!(!taxonomy.is_within(a, c));
    }

    #[test]
    fn test_ancestors_and_level() {
        let mut taxonomy = Taxonomy::new();
        let a = taxonomy.insert("A", "A", None).unwrap();
        let b = taxonomy.insert("B", "B", Some(a)).unwrap();
        let c = taxonomy.insert("C", "C", Some(b)).unwrap();

        assert_eq!(taxonomy.ancestors(c).collect::<Vec<_>>(), vec![b, a]);
        assert_eq!(taxonomy.ancestors(a).count(), 0);
        assert_eq!(taxonomy.level(c), 2);
        assert_eq!(taxonomy.level(a), 0);
        assert_eq!(taxonomy.level(NodeId::new(42)), 0);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut taxonomy = Taxonomy::new();
        taxonomy.insert("A", "A", None).unwrap();
        let result = taxonomy.insert("A", "again", None);
        assert!(matches!(result, Err(Error::DuplicateNode(_))));
    }

    #[test]
    fn test_snapshot_children_before_parents() {
        let snapshot = TaxonomySnapshot {
            nodes: vec![
                node("http://edamontology.org/format_1929", Some("http://edamontology.org/format_1915")),
                node("http://edamontology.org/format_1915", None),
            ],
        };
        let taxonomy = Taxonomy::from_snapshot(snapshot).unwrap();
        let fasta = taxonomy.find("http://edamontology.org/format_1929").unwrap();
        let format = taxonomy.find("http://edamontology.org/format_1915").unwrap();

        assert_eq!(taxonomy.get(fasta).unwrap().root, format);
        assert_eq!(taxonomy.get(format).unwrap().label, "format_1915");
    }

    #[test]
    fn test_snapshot_unknown_parent() {
        let snapshot = TaxonomySnapshot {
            nodes: vec![node("B", Some("A"))],
        };
        let result = Taxonomy::from_snapshot(snapshot);
        assert!(matches!(result, Err(Error::UnknownParent { .. })));
    }

    #[test]
    fn test_snapshot_cycle_rejected() {
        let snapshot = TaxonomySnapshot {
            nodes: vec![node("A", Some("B")), node("B", Some("A"))],
        };
        let result = Taxonomy::from_snapshot(snapshot);
        assert!(matches!(result, Err(Error::Cycle(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxonomy.json");
        std::fs::write(
            &path,
            r#"{"nodes": [{"id": "A", "label": "Root"}, {"id": "B", "parent": "A"}]}"#,
        )
        .unwrap();

        let taxonomy = Taxonomy::load(&path).unwrap();
        assert_eq!(taxonomy.len(), 2);
        let a = taxonomy.find("A").unwrap();
        assert_eq!(taxonomy.lookup(a).unwrap().label, "Root");
    }

    #[test]
    fn test_load_garbage_is_snapshot_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxonomy.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(Taxonomy::load(&path), Err(Error::Snapshot(_))));
    }

    #[test]
    fn test_fragment() {
        assert_eq!(fragment("http://edamontology.org/data_0006"), "data_0006");
        assert_eq!(fragment("http://example.org/onto#Thing"), "Thing");
        assert_eq!(fragment("plain"), "plain");
    }
}

//! Error types for ape-taxonomy.

use thiserror::Error;

/// Result type for ape-taxonomy operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or traversing a taxonomy.
#[derive(Error, Debug)]
pub enum Error {
    /// A node id does not belong to the taxonomy it was resolved against.
    #[error("Node {0} is not part of the taxonomy")]
    UnknownNode(u32),

    /// An annotation references a term the taxonomy does not contain.
    #[error("Term '{0}' is not defined in the taxonomy")]
    UnknownTerm(String),

    /// An annotation term lies outside the subtree of its dimension.
    #[error("Term '{term}' does not belong to dimension '{dimension}'")]
    TermOutsideDimension {
        /// IRI of the offending term.
        term: String,
        /// IRI of the dimension root.
        dimension: String,
    },

    /// The same IRI was declared twice.
    #[error("Node '{0}' is declared more than once")]
    DuplicateNode(String),

    /// A node names a parent that was never declared.
    #[error("Node '{node}' refers to unknown parent '{parent}'")]
    UnknownParent {
        /// IRI of the child node.
        node: String,
        /// IRI of the missing parent.
        parent: String,
    },

    /// The parent relation loops back on itself.
    #[error("Cycle detected in taxonomy at '{0}'")]
    Cycle(String),

    /// The snapshot file could not be decoded.
    #[error("Invalid taxonomy snapshot: {0}")]
    Snapshot(String),

    /// The annotation file could not be decoded.
    #[error("Invalid annotation file: {0}")]
    Annotation(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

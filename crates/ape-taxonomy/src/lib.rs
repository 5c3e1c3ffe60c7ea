//! # ape-taxonomy
//!
//! Ontology taxonomy and module graph as seen by the APE workflow planner,
//! plus the taxonomy-depth metric used to judge how specific tool
//! annotations are.
//!
//! ## Quick Start
//!
//! ```rust
//! use ape_taxonomy::{analysis, Taxonomy};
//!
//! // A -> {B -> {D, E}, C}
//! let mut taxonomy = Taxonomy::new();
//! let a = taxonomy.insert("A", "A", None)?;
//! let b = taxonomy.insert("B", "B", Some(a))?;
//! taxonomy.insert("C", "C", Some(a))?;
//! taxonomy.insert("D", "D", Some(b))?;
//! taxonomy.insert("E", "E", Some(b))?;
//!
//! assert_eq!(analysis::depth(&taxonomy, a)?, 2);
//! assert_eq!(analysis::depth(&taxonomy, b)?, 1);
//! # Ok::<(), ape_taxonomy::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │ TaxonomySnapshot │──▶│ Taxonomy (arena) │◀──│ ApeAnnotations   │
//! └──────────────────┘   └────────┬─────────┘   └────────┬─────────┘
//!                                 │ TaxonomyLookup       │
//!                                 ▼                      ▼
//!                        ┌──────────────────┐   ┌──────────────────┐
//!                        │ analysis::analyze│◀──│ ModuleGraph      │
//!                        └──────────────────┘   └──────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod annotation;
pub mod error;
pub mod taxonomy;
pub mod types;

// Re-exports for convenience
pub use analysis::{analyze, depth, DepthReport, DepthRow, DimensionDepth};
pub use annotation::{
    ApeAnnotations, ApeFunction, ApeParameter, DimensionResolver, ModuleGraph, DATA_DIMENSION,
    FORMAT_DIMENSION,
};
pub use error::{Error, Result};
pub use taxonomy::{Taxonomy, TaxonomyLookup};
pub use types::{
    Module, NodeId, NodeView, Predicate, SnapshotNode, TaxonomyNode, TaxonomySnapshot,
    TypedParameter, IGNORED_DIMENSION_LABEL,
};

//! Dependency resolution: facts to indexes to catalog.
//!
//! This crate is the algorithmic core of the mapper. It consumes the
//! flat list of [`ClassFact`](cdvue_schemas::ClassFact) records, builds
//! the service/reference indexes, and resolves them into the final
//! node/edge catalog with in/out-degree counts and ghost nodes for
//! references without a known implementer.
//!
//! ## Pipeline
//!
//! ```text
//! Vec<ClassFact> -> DependencyIndexes -> Catalog
//! ```
//!
//! Everything here is a pure function over owned data: no I/O, no
//! shared state, and deterministic output for a fixed fact set.

mod index;
mod resolve;

#[doc(inline)]
pub use crate::index::DependencyIndexes;
#[doc(inline)]
pub use crate::resolve::resolve_catalog;

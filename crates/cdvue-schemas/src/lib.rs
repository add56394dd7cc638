//! Schema definitions for the cdvue pipeline.
//!
//! This crate contains the data structures shared between the stages of
//! the dependency mapper: the source-model descriptors produced by the
//! source scanner, the per-class facts produced by extraction, and the
//! resolved catalog that gets serialized into the rendered graph.
//!
//! Each stage owns its data exclusively and hands immutable results to
//! the next stage, so these types carry no interior mutability and no
//! references back into earlier stages.

mod catalog;
mod class_fact;
mod source_model;
#[cfg(test)]
mod testutil;

#[doc(inline)]
pub use catalog::*;
#[doc(inline)]
pub use class_fact::*;
#[doc(inline)]
pub use source_model::*;

//! Class-fact extraction from annotated Java source trees.
//!
//! This crate scans a directory of Java sources, identifies classes
//! carrying the `Component`/`Service` marker annotations, and produces
//! one normalized [`ClassFact`] per non-abstract class, including
//! inherited reference fields and interfaces.
//!
//! ## Usage
//!
//! ```no_run
//! let facts = cdvue_extract::scan_facts("path/to/sources").unwrap();
//! ```
//!
//! Per-class progress narration is emitted as `debug!` events; enable
//! it with `-v` flags or the `CDVUE_DEBUG` environment variable.

mod error;
mod facts;
mod scanner;

use std::path::Path;

use cdvue_schemas::{ClassDescriptor, ClassFact};

#[doc(inline)]
pub use crate::error::ExtractError;
pub use crate::facts::extract_facts;
pub use crate::scanner::JavaSourceTree;

/// A provider of parsed class descriptors for one source tree.
///
/// The bundled implementation is [`JavaSourceTree`]; anything that can
/// enumerate classes with their annotations, fields, interfaces, and
/// superclass name can stand in for it.
pub trait SourceModel {
    /// Yields every reachable class descriptor.
    fn classes(&self) -> Result<Vec<ClassDescriptor>, ExtractError>;
}

/// Scans the source tree under `path` and extracts one fact per
/// non-abstract class.
///
/// # Errors
///
/// Returns [`ExtractError`] if the tree cannot be traversed at all
/// ([`ExtractError::is_scan`]) or yields no classes
/// ([`ExtractError::is_no_classes`]). Individual unreadable or
/// malformed classes are logged and skipped, not propagated.
pub fn scan_facts(
    path: impl AsRef<Path>,
) -> Result<Vec<ClassFact>, ExtractError> {
    let provider = JavaSourceTree::new(path.as_ref());
    let classes = provider.classes()?;
    if classes.is_empty() {
        return Err(ExtractError::no_classes(provider.root()));
    }
    Ok(extract_facts(&classes))
}

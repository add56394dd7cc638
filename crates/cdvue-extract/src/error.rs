//! Error types for the cdvue-extract crate.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for source scanning and fact extraction.
///
/// Only failures that abort the whole run surface here. Per-class
/// problems (unreadable files, malformed annotation values) are logged
/// and skipped at the class boundary instead of being propagated.
#[derive(Debug)]
pub struct ExtractError {
    kind: ExtractErrorKind,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods
/// instead.
#[derive(Debug)]
pub(crate) enum ExtractErrorKind {
    /// The source tree could not be traversed at all.
    Scan { path: PathBuf, source: io::Error },
    /// Traversal succeeded but yielded no classes.
    NoClasses { path: PathBuf },
}

impl ExtractError {
    pub(crate) fn scan(path: &Path, source: io::Error) -> Self {
        Self {
            kind: ExtractErrorKind::Scan {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub(crate) fn no_classes(path: &Path) -> Self {
        Self {
            kind: ExtractErrorKind::NoClasses {
                path: path.to_path_buf(),
            },
        }
    }

    /// Returns true if this error is due to an untraversable source
    /// tree.
    pub fn is_scan(&self) -> bool {
        matches!(self.kind, ExtractErrorKind::Scan { .. })
    }

    /// Returns true if the scan found no classes to process.
    pub fn is_no_classes(&self) -> bool {
        matches!(self.kind, ExtractErrorKind::NoClasses { .. })
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExtractErrorKind::Scan { path, source } => {
                write!(
                    f,
                    "failed to scan source tree '{}': {source}",
                    path.display()
                )
            }
            ExtractErrorKind::NoClasses { path } => {
                write!(f, "no classes found under '{}'", path.display())
            }
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ExtractErrorKind::Scan { source, .. } => Some(source),
            ExtractErrorKind::NoClasses { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn scan_error_display_and_predicates() {
        let err = ExtractError::scan(
            Path::new("/missing"),
            io::Error::new(io::ErrorKind::NotFound, "no such directory"),
        );
        assert!(err.is_scan());
        assert!(!err.is_no_classes());
        assert!(err.to_string().contains("failed to scan source tree"));
        assert!(err.source().is_some());
    }

    #[test]
    fn no_classes_display_and_predicates() {
        let err = ExtractError::no_classes(Path::new("/empty"));
        assert!(err.is_no_classes());
        assert!(!err.is_scan());
        assert!(err.to_string().contains("no classes found"));
        assert!(err.source().is_none());
    }
}

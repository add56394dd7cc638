//! Error types for the graph emitter.

use std::{fmt, io};

/// Errors that can occur while rendering or writing the graph file.
#[derive(Debug)]
pub struct VizError {
    kind: VizErrorKind,
}

/// The specific category of emitter error.
#[derive(Debug)]
enum VizErrorKind {
    /// Failed to serialize the catalog to JSON.
    Serialize(serde_json::Error),
    /// I/O error writing the output file.
    Io(io::Error),
}

impl VizError {
    pub(crate) fn serialize(err: serde_json::Error) -> Self {
        Self {
            kind: VizErrorKind::Serialize(err),
        }
    }

    pub(crate) fn io(err: io::Error) -> Self {
        Self {
            kind: VizErrorKind::Io(err),
        }
    }

    /// Returns true if this error is due to catalog serialization.
    pub fn is_serialize(&self) -> bool {
        matches!(self.kind, VizErrorKind::Serialize(_))
    }

    /// Returns true if this error is due to I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, VizErrorKind::Io(_))
    }
}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            VizErrorKind::Serialize(e) => {
                write!(f, "failed to serialize catalog: {e}")
            }
            VizErrorKind::Io(e) => write!(f, "failed to write graph: {e}"),
        }
    }
}

impl std::error::Error for VizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            VizErrorKind::Serialize(e) => Some(e),
            VizErrorKind::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for VizError {
    fn from(err: io::Error) -> Self {
        Self::io(err)
    }
}

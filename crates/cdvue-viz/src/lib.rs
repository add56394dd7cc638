//! HTML graph emission for the resolved catalog.
//!
//! The render surface is a self-contained HTML page embedded at compile
//! time. Emission substitutes two literal placeholder tokens in the
//! template text: one with a display title, one with the catalog
//! serialized as an array of node records. The output file is written
//! atomically — rendered fully in memory, written to a temp file in the
//! destination directory, then renamed into place — so a failed run
//! never leaves a partial graph behind.

mod error;

use std::io::Write;
use std::path::Path;

use cdvue_schemas::Catalog;
use tempfile::NamedTempFile;
use tracing::info;

#[doc(inline)]
pub use crate::error::VizError;

/// Token replaced with the display title.
const TITLE_PLACEHOLDER: &str = "TITLE_PLACEHOLDER";

/// Token replaced with the serialized catalog.
const DATA_PLACEHOLDER: &str = "DATA_PLACEHOLDER";

/// The render template, embedded at compile time.
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Renders the catalog into the final HTML text.
pub fn render(catalog: &Catalog, title: &str) -> Result<String, VizError> {
    let data = serde_json::to_string(catalog).map_err(VizError::serialize)?;
    Ok(INDEX_TEMPLATE
        .replace(TITLE_PLACEHOLDER, title)
        .replace(DATA_PLACEHOLDER, &data))
}

/// Renders the catalog and writes it to `path` atomically.
///
/// # Errors
///
/// Returns [`VizError`] if the catalog cannot be serialized
/// ([`VizError::is_serialize`]) or the file cannot be written
/// ([`VizError::is_io`]). On error no output file is created and any
/// existing file at `path` is left untouched.
pub fn write_graph(
    catalog: &Catalog,
    title: &str,
    path: impl AsRef<Path>,
) -> Result<(), VizError> {
    let path = path.as_ref();
    let html = render(catalog, title)?;

    // The temp file must live in the destination directory so the final
    // rename stays on one filesystem.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(VizError::io)?;
    tmp.write_all(html.as_bytes()).map_err(VizError::io)?;
    tmp.persist(path).map_err(|e| VizError::io(e.error))?;

    info!(
        nodes = catalog.len(),
        path = %path.display(),
        "graph written"
    );
    Ok(())
}

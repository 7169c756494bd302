//! Reading the engine's JSON documents from disk.

use crate::error::{Document, ErrorKind, Result};
use exn::ResultExt;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Locations of the three documents an engine is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
    /// Item id → `{title, author, series, labels_by_field}`
    pub items: PathBuf,
    /// Facet → raw labels
    pub vocabulary: PathBuf,
    /// Facet → canonical → variants
    pub parser: PathBuf,
}
impl DocumentPaths {
    pub fn new(items: impl Into<PathBuf>, vocabulary: impl Into<PathBuf>, parser: impl Into<PathBuf>) -> Self {
        Self {
            items: items.into(),
            vocabulary: vocabulary.into(),
            parser: parser.into(),
        }
    }
}

/// Read and parse a whole JSON document.
///
/// A missing file, an unreadable file and a file that doesn't parse into `T`
/// are reported as distinct [`ErrorKind`]s.
#[instrument(level = "debug", skip(path), fields(path = %path.display()))]
pub(crate) fn read_document<T: DeserializeOwned>(document: Document, path: &Path) -> Result<T> {
    let contents = match fs::read_to_string(path) {
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            exn::bail!(ErrorKind::NotFound(document, path.to_path_buf()))
        },
        result => result.or_raise(|| ErrorKind::Unreadable(document, path.to_path_buf()))?,
    };
    tracing::trace!(bytes = contents.len(), "Document read");
    serde_json::from_str(&contents).or_raise(|| ErrorKind::Malformed(document, path.to_path_buf()))
}

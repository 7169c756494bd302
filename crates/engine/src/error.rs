//! Engine Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Every error the engine can raise happens while loading its documents. Once
//! a [`QueryEngine`](crate::QueryEngine) exists, querying it cannot fail.

use derive_more::{Display, Error};
use std::fmt::{Display as FmtDisplay, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// An engine error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Raised when the engine cannot be constructed from its documents.
pub type InitializationError = Error;
/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The three documents an engine is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    /// Item id → title, author, series and labels grouped by facet.
    Items,
    /// Facet → observed raw labels.
    Vocabulary,
    /// Facet → canonical label → variants.
    Parser,
}
impl Document {
    pub fn as_str(&self) -> &'static str {
        match self {
            Document::Items => "item label map",
            Document::Vocabulary => "vocabulary",
            Document::Parser => "vocabulary parser",
        }
    }
}
impl FmtDisplay for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// All of them are fatal for engine construction; callers are expected to
/// degrade to a "no engine available" mode.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document does not exist; check the configured path.
    #[display("{_0} document not found: {}", _1.display())]
    NotFound(#[error(not(source))] Document, PathBuf),
    /// The document exists but could not be read (permissions, I/O).
    #[display("unable to read {_0} document: {}", _1.display())]
    Unreadable(#[error(not(source))] Document, PathBuf),
    /// The document was read but is not in the expected shape; regenerate it.
    #[display("malformed {_0} document: {}", _1.display())]
    Malformed(#[error(not(source))] Document, PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Documents are static inputs; reading them again yields the same outcome.
        false
    }

    /// Which document the error is about.
    pub fn document(&self) -> Document {
        match self {
            Self::NotFound(document, _) | Self::Unreadable(document, _) | Self::Malformed(document, _) => *document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::NotFound(Document::Items, PathBuf::from("items.json")), "item label map document not found: items.json")]
    #[case(ErrorKind::Unreadable(Document::Vocabulary, PathBuf::from("vocab.json")), "unable to read vocabulary document: vocab.json")]
    #[case(ErrorKind::Malformed(Document::Parser, PathBuf::from("parser.json")), "malformed vocabulary parser document: parser.json")]
    fn error_kind_display(#[case] kind: ErrorKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
    }

    #[test]
    fn error_kind_document() {
        let kind = ErrorKind::Malformed(Document::Parser, PathBuf::from("parser.json"));
        assert_eq!(kind.document(), Document::Parser);
        assert!(!kind.is_retryable());
    }
}

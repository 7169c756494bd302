//! Label normalization and faceted refinement queries.
//!
//! The engine is built from three read-only JSON documents:
//! - the **item label map**: each item's raw labels, grouped by facet,
//! - the **vocabulary**: raw labels observed per facet,
//! - the **vocabulary parser**: canonical labels per facet with their variant
//!   spellings.
//!
//! A [`VocabularyIndex`] derives the lookups (variant → canonical, label →
//! facet) once, and a [`QueryEngine`] answers "which items carry all of these
//! labels, and which further labels would narrow the result?" against it.
//! Neither changes after construction.

pub mod error;
mod index;
pub mod label;
mod load;
pub mod models;
mod query;

pub use crate::index::VocabularyIndex;
pub use crate::load::DocumentPaths;
pub use crate::models::{FieldLabels, Item, LabelCount, MatchedBook, QueryResult};
pub use crate::query::QueryEngine;

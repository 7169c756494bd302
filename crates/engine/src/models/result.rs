use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A refinement candidate and the number of groups (series, or standalone
/// items) selecting it would leave.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}
impl LabelCount {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self { label: label.into(), count }
    }
}

/// An item that satisfied the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedBook {
    pub author: String,
    /// Normalized (canonical, folded) labels across all facets of the item
    pub labels: BTreeSet<String>,
    pub series: Option<String>,
}

/// Outcome of [`QueryEngine::query`](crate::QueryEngine::query).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    /// Matching items by id
    pub books: BTreeMap<String, MatchedBook>,
    /// Facet → refinements, sorted by label text
    pub refinable_labels: BTreeMap<String, Vec<LabelCount>>,
    /// The folded selection, sorted
    pub query_labels: Vec<String>,
    /// No label can narrow the result any further
    pub refinement_closed: bool,
}
impl Default for QueryResult {
    /// The result of selecting nothing.
    fn default() -> Self {
        Self {
            books: BTreeMap::new(),
            refinable_labels: BTreeMap::new(),
            query_labels: Vec::new(),
            refinement_closed: true,
        }
    }
}
impl QueryResult {
    /// Look up the refinement count for a (display) label under a facet.
    pub fn refinement(&self, facet: &str, label: &str) -> Option<usize> {
        self.refinable_labels
            .get(facet)?
            .iter()
            .find(|candidate| candidate.label == label)
            .map(|candidate| candidate.count)
    }

    /// Every refinement across all facets as `(facet, label, count)`.
    pub fn refinements(&self) -> impl Iterator<Item = (&str, &str, usize)> {
        self.refinable_labels.iter().flat_map(|(facet, labels)| {
            labels.iter().map(move |candidate| (facet.as_str(), candidate.label.as_str(), candidate.count))
        })
    }
}

/// Labels known for a facet, split by source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldLabels {
    /// Canonical labels declared by the parser
    pub canonical: BTreeSet<String>,
    /// Observed labels from the vocabulary, including the facet's alias key
    pub raw: BTreeSet<String>,
}

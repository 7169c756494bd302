use std::collections::BTreeMap;
use synapse_engine::{LabelCount, MatchedBook, QueryResult};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// A stored query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Facet → refinements, as the query reported them
    pub refinable_labels: BTreeMap<String, Vec<LabelCount>>,
    pub books: BTreeMap<String, BookSnapshot>,
    /// When the entry was stored. RFC 3339 for entries written here; older
    /// entries may carry a local timestamp without an offset.
    pub timestamp: String,
}

/// The attributes of a matched item kept in a [`CacheEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSnapshot {
    pub author: String,
    /// Normalized labels, sorted
    pub labels: Vec<String>,
    pub series: Option<String>,
}

impl From<&MatchedBook> for BookSnapshot {
    fn from(book: &MatchedBook) -> Self {
        Self {
            author: book.author.clone(),
            labels: book.labels.iter().cloned().collect(),
            series: book.series.clone(),
        }
    }
}

impl CacheEntry {
    /// Snapshot a query result, stamped with the current time.
    pub fn new(result: &QueryResult) -> Self {
        Self::with_timestamp(result, now())
    }

    pub fn with_timestamp(result: &QueryResult, timestamp: impl Into<String>) -> Self {
        Self {
            refinable_labels: result.refinable_labels.clone(),
            books: result.books.iter().map(|(id, book)| (id.clone(), book.into())).collect(),
            timestamp: timestamp.into(),
        }
    }

    /// No stored refinement can narrow the result any further.
    pub fn refinement_closed(&self) -> bool {
        self.refinable_labels.values().all(Vec::is_empty)
    }
}

fn now() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Unable to format cache timestamp");
        String::new()
    })
}

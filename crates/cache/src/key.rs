use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use synapse_engine::QueryResult;
use synapse_engine::label::fold;

const SEPARATOR: &str = ",";

/// Canonical key for a selected-label combination: the folded labels,
/// de-duplicated, sorted and joined with commas.
///
/// Two selections that differ only in order, case, surrounding whitespace or
/// repetition share a key.
///
/// ```
/// use synapse_cache::ComboKey;
///
/// assert_eq!(ComboKey::new(["Mystery ", "award", "mystery"]).as_str(), "award,mystery");
/// ```
#[derive(Debug, Display, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComboKey(String);

impl ComboKey {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: BTreeSet<String> = labels.into_iter().map(fold).filter(|label| !label.is_empty()).collect();
        Self(labels.into_iter().collect::<Vec<_>>().join(SEPARATOR))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the key of an empty selection.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The labels the key was built from, in key order.
    ///
    /// A label that itself contains a comma comes back split, so query with
    /// the original selection rather than with these.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|label| !label.is_empty())
    }
}

impl From<&QueryResult> for ComboKey {
    fn from(result: &QueryResult) -> Self {
        Self::new(&result.query_labels)
    }
}

impl AsRef<str> for ComboKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

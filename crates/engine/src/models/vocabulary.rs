use super::OrderedMap;
use crate::label::{alias_key, facet_of_key};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Raw labels observed per facet, in document order.
///
/// The document may carry a facet twice: once under its name and once under
/// the legacy `#`-prefixed alias key. Both always belong to the same facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary(OrderedMap<Vec<String>>);

impl From<OrderedMap<Vec<String>>> for Vocabulary {
    fn from(value: OrderedMap<Vec<String>>) -> Self {
        Self(value)
    }
}
impl<K: Into<String>, V: IntoIterator<Item = L>, L: Into<String>> FromIterator<(K, V)> for Vocabulary {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, labels)| (key, labels.into_iter().map(Into::into).collect::<Vec<String>>()))
                .collect(),
        )
    }
}
impl Vocabulary {
    /// Every `(facet, raw label)` pair in document order, with alias keys
    /// resolved to their facet.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(key, labels)| labels.iter().map(move |label| (facet_of_key(key), label.as_str())))
    }

    /// Facet names, alias keys folded into their facet.
    pub fn facets(&self) -> BTreeSet<&str> {
        self.0.keys().map(facet_of_key).collect()
    }

    /// Raw labels recorded for `facet`, merged with those under its alias key.
    pub fn raw_labels(&self, facet: &str) -> BTreeSet<&str> {
        let alias = alias_key(facet);
        [self.0.get(facet), self.0.get(&alias)]
            .into_iter()
            .flatten()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Every raw label across all facets.
    pub fn all_labels(&self) -> BTreeSet<&str> {
        self.0.values().flatten().map(String::as_str).collect()
    }
}

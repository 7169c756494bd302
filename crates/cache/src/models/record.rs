use super::{BookSnapshot, CacheEntry};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use synapse_engine::LabelCount;

/// A cache entry exactly as it appears in the cache file.
#[derive(Serialize, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct EntryRecord {
    #[serde(default)]
    refinable_labels: BTreeMap<String, Vec<LabelCountProxy>>,
    #[serde(default)]
    books: BTreeMap<String, BookRecord>,
    #[serde(default)]
    timestamp: String,
}
impl From<&CacheEntry> for EntryRecord {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            refinable_labels: entry
                .refinable_labels
                .iter()
                .map(|(facet, labels)| (facet.clone(), labels.iter().map(LabelCountProxy::from).collect()))
                .collect(),
            books: entry.books.iter().map(|(id, book)| (id.clone(), book.into())).collect(),
            timestamp: entry.timestamp.clone(),
        }
    }
}
impl From<EntryRecord> for CacheEntry {
    fn from(record: EntryRecord) -> Self {
        Self {
            refinable_labels: record
                .refinable_labels
                .into_iter()
                .map(|(facet, labels)| (facet, labels.into_iter().map(LabelCount::from).collect()))
                .collect(),
            books: record.books.into_iter().map(|(id, book)| (id, book.into())).collect(),
            timestamp: record.timestamp,
        }
    }
}

/// Entries serialize in their on-disk form wherever they're written.
impl Serialize for CacheEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EntryRecord::from(self).serialize(serializer)
    }
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct BookRecord {
    #[serde(default)]
    author: String,
    #[serde(default, deserialize_with = "deserialize_labels")]
    labels: Vec<String>,
    #[serde(default)]
    series: Option<String>,
}
impl From<&BookSnapshot> for BookRecord {
    fn from(book: &BookSnapshot) -> Self {
        Self {
            author: book.author.clone(),
            labels: book.labels.clone(),
            series: book.series.clone(),
        }
    }
}
impl From<BookRecord> for BookSnapshot {
    fn from(book: BookRecord) -> Self {
        Self {
            author: book.author,
            labels: book.labels,
            series: book.series,
        }
    }
}

/// `(label, count)` as a two-element array: `["Fantasy", 3]`.
#[derive(Serialize, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct LabelCountProxy(String, usize);
impl From<&LabelCount> for LabelCountProxy {
    fn from(label: &LabelCount) -> Self {
        Self(label.label.clone(), label.count)
    }
}
impl From<LabelCountProxy> for LabelCount {
    fn from(proxy: LabelCountProxy) -> Self {
        Self::new(proxy.0, proxy.1)
    }
}

/// Book labels are written as an array, but older cache files hold the
/// string form of a set: `"{'cozy', 'dark'}"` or `"set()"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LabelsRecord {
    List(Vec<String>),
    Coerced(String),
}

fn deserialize_labels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let labels: BTreeSet<String> = match LabelsRecord::deserialize(deserializer)? {
        LabelsRecord::List(labels) => labels.into_iter().collect(),
        LabelsRecord::Coerced(repr) => parse_set_repr(&repr),
    };
    Ok(labels.into_iter().collect())
}

/// Pull every quoted string out of a set's string form. Either quote style
/// may appear, and a backslash escapes the next character.
fn parse_set_repr(repr: &str) -> BTreeSet<String> {
    let mut labels = BTreeSet::new();
    let mut chars = repr.chars();
    while let Some(c) = chars.next() {
        if c != '\'' && c != '"' {
            continue;
        }
        let quote = c;
        let mut label = String::new();
        let mut escaped = false;
        for c in chars.by_ref() {
            match c {
                _ if escaped => {
                    label.push(c);
                    escaped = false;
                },
                '\\' => escaped = true,
                _ if c == quote => break,
                _ => label.push(c),
            }
        }
        labels.insert(label);
    }
    labels
}

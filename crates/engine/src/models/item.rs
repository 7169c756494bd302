use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

const UNKNOWN_AUTHOR: &str = "Unknown";

/// A tagged item (a book) in the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Opaque identifier, taken from the item map's key
    pub id: String,
    pub title: String,
    /// Defaults to "Unknown" when the document omits it
    pub author: String,
    /// Series name; items sharing a series collapse into one group when
    /// counting refinements
    pub series: Option<String>,
    /// Raw labels grouped by the facet they were recorded under
    pub labels_by_field: BTreeMap<String, Vec<String>>,
}
impl Item {
    /// Iterate over every `(facet, raw label)` pair on the item.
    pub fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels_by_field
            .iter()
            .flat_map(|(facet, labels)| labels.iter().map(move |label| (facet.as_str(), label.as_str())))
    }
}

/// Item record exactly as it appears in the item label map document. Any
/// field may be missing or `null`.
#[derive(Debug, Default, Deserialize)]
struct ItemRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    series: Option<String>,
    #[serde(default, alias = "labelsByField")]
    labels_by_field: Option<BTreeMap<String, Vec<String>>>,
}
impl ItemRecord {
    fn into_item(self, id: String) -> Item {
        Item {
            id,
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            // An empty series name groups nothing.
            series: self.series.filter(|series| !series.is_empty()),
            labels_by_field: self.labels_by_field.unwrap_or_default(),
        }
    }
}

/// The full, read-only collection of items the engine queries over.
///
/// Items are kept ordered by id so that every query walks them in the same
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<Item>,
}
impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = BTreeMap::<String, ItemRecord>::deserialize(deserializer)?;
        Ok(Self {
            items: records.into_iter().map(|(id, record)| record.into_item(id)).collect(),
        })
    }
}
impl FromIterator<Item> for Catalog {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        let mut items: Vec<Item> = iter.into_iter().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items.dedup_by(|later, earlier| later.id == earlier.id);
        Self { items }
    }
}
impl Catalog {
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.binary_search_by(|item| item.id.as_str().cmp(id)).ok().map(|index| &self.items[index])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "42": {
                "title": "The Hobbit",
                "author": "J.R.R. Tolkien",
                "series": "Middle-earth",
                "labels_by_field": {"Genre": ["epic fantasy", "Adventure"]}
            }
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let item = catalog.get("42").unwrap();
        assert_eq!(item.title, "The Hobbit");
        assert_eq!(item.author, "J.R.R. Tolkien");
        assert_eq!(item.series.as_deref(), Some("Middle-earth"));
        assert_eq!(item.labels().collect::<Vec<_>>(), vec![("Genre", "epic fantasy"), ("Genre", "Adventure")]);
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let json = r#"{"7": {"series": null, "author": null}}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let item = catalog.get("7").unwrap();
        assert_eq!(item.title, "");
        assert_eq!(item.author, "Unknown");
        assert_eq!(item.series, None);
        assert!(item.labels_by_field.is_empty());
    }

    #[test]
    fn test_deserialize_camel_case_labels() {
        let json = r#"{"1": {"labelsByField": {"Genre": ["mystery"]}}}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.get("1").unwrap().labels().count(), 1);
    }

    #[test]
    fn test_empty_series_is_standalone() {
        let json = r#"{"1": {"series": ""}}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.get("1").unwrap().series, None);
    }

    #[test]
    fn test_catalog_is_ordered_by_id() {
        let json = r#"{"b": {}, "a": {}, "c": {}}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = catalog.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(catalog.len(), 3);
        assert!(catalog.get("d").is_none());
    }

    #[test]
    fn test_reject_non_object_document() {
        assert!(serde_json::from_str::<Catalog>(r#"["not", "a", "map"]"#).is_err());
    }
}

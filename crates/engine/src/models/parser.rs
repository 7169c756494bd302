use super::OrderedMap;
use serde::Deserialize;

/// Canonical label (original casing) → variant spellings, in document order.
pub type CanonicalMap = OrderedMap<Vec<String>>;

/// Canonical spellings and their variants, per facet.
///
/// ```json
/// { "Genre": { "Fantasy": ["epic fantasy", "high fantasy"] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Parser(OrderedMap<CanonicalMap>);

impl From<OrderedMap<CanonicalMap>> for Parser {
    fn from(value: OrderedMap<CanonicalMap>) -> Self {
        Self(value)
    }
}
impl<K: Into<String>> FromIterator<(K, CanonicalMap)> for Parser {
    fn from_iter<T: IntoIterator<Item = (K, CanonicalMap)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
impl Parser {
    pub fn facet(&self, facet: &str) -> Option<&CanonicalMap> {
        self.0.get(facet)
    }

    pub fn facets(&self) -> impl Iterator<Item = &str> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CanonicalMap)> {
        self.0.iter()
    }

    /// Every `(facet, canonical, variants)` triple in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.0.iter().flat_map(|(facet, canonicals)| {
            canonicals.iter().map(move |(canonical, variants)| (facet, canonical, variants.as_slice()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_in_document_order() {
        let parser: Parser = serde_json::from_str(
            r#"{
                "Themes": {"Grief": ["loss"]},
                "Genre": {"Zombie": ["undead"], "Alpha": []}
            }"#,
        )
        .unwrap();
        let entries: Vec<_> = parser.entries().map(|(facet, canonical, _)| (facet, canonical)).collect();
        assert_eq!(entries, vec![("Themes", "Grief"), ("Genre", "Zombie"), ("Genre", "Alpha")]);
        assert_eq!(parser.facets().collect::<Vec<_>>(), vec!["Themes", "Genre"]);
    }

    #[test]
    fn test_facet_lookup() {
        let parser: Parser = [("Genre", [("Fantasy", vec!["epic fantasy".to_string()])].into_iter().collect::<CanonicalMap>())]
            .into_iter()
            .collect();
        assert_eq!(parser.facet("Genre").unwrap().get("Fantasy").unwrap(), &vec!["epic fantasy".to_string()]);
        assert!(parser.facet("Themes").is_none());
    }

    #[test]
    fn test_reject_non_list_variants() {
        assert!(serde_json::from_str::<Parser>(r#"{"Genre": {"A": "one"}}"#).is_err());
    }
}

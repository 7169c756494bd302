//! Vocabulary index and label normalization.
//!
//! The index is built once from the two vocabulary documents and is immutable
//! afterwards. It answers three questions:
//!
//! - **normalize**: what is the canonical spelling of a raw label within a
//!   facet? (variants only, first canonical listing the variant wins)
//! - **facet lookup**: which facet does a label belong to? Built in two
//!   passes, raw vocabulary first and parser second, with later writes
//!   replacing earlier ones. The parser's assignment therefore always wins
//!   for a label known to both.
//! - **listing**: which facets and labels exist at all?

use crate::label::{UNCATEGORIZED, fold};
use crate::models::{FieldLabels, Parser, Vocabulary};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::instrument;

/// Per-facet lookup tables derived from the parser map.
#[derive(Debug, Clone, Default)]
struct FacetTable {
    /// Folded variant → canonical
    variants: HashMap<String, String>,
    /// Folded canonical or variant → canonical
    display: HashMap<String, String>,
}
impl FacetTable {
    fn new<'a>(canonicals: impl Iterator<Item = (&'a str, &'a Vec<String>)>) -> Self {
        let mut table = Self::default();
        for (canonical, variants) in canonicals {
            // First canonical (in document order) to claim a spelling keeps it.
            table.display.entry(fold(canonical)).or_insert_with(|| canonical.to_string());
            for variant in variants {
                table.variants.entry(fold(variant)).or_insert_with(|| canonical.to_string());
                table.display.entry(fold(variant)).or_insert_with(|| canonical.to_string());
            }
        }
        table
    }
}

/// Immutable lookups over the raw vocabulary and the vocabulary parser.
#[derive(Debug, Clone)]
pub struct VocabularyIndex {
    vocabulary: Vocabulary,
    parser: Parser,
    parser_labels: BTreeSet<String>,
    label_to_facet: HashMap<String, String>,
    tables: HashMap<String, FacetTable>,
}

impl VocabularyIndex {
    #[instrument(skip_all)]
    pub fn new(vocabulary: Vocabulary, parser: Parser) -> Self {
        let parser_labels = Self::build_parser_labels(&parser);
        let label_to_facet = Self::build_label_to_facet(&vocabulary, &parser);
        let tables = parser
            .iter()
            .map(|(facet, canonicals)| (facet.to_string(), FacetTable::new(canonicals.iter())))
            .collect::<HashMap<_, _>>();
        tracing::debug!(
            parser_labels = parser_labels.len(),
            known_labels = label_to_facet.len(),
            parser_facets = tables.len(),
            "Vocabulary index built"
        );
        Self { vocabulary, parser, parser_labels, label_to_facet, tables }
    }

    fn build_parser_labels(parser: &Parser) -> BTreeSet<String> {
        parser
            .entries()
            .flat_map(|(_, canonical, variants)| std::iter::once(canonical).chain(variants.iter().map(String::as_str)))
            .map(fold)
            .collect()
    }

    /// Two passes, strictly in this order. Do not merge them: a label in both
    /// documents must end up with the parser's facet.
    ///
    /// Keys are folded (trimmed as well as lowercased) in both passes, so a
    /// vocabulary label with stray whitespace still resolves to its facet.
    fn build_label_to_facet(vocabulary: &Vocabulary, parser: &Parser) -> HashMap<String, String> {
        let mut lookup = HashMap::new();
        for (facet, label) in vocabulary.entries() {
            lookup.insert(fold(label), facet.to_string());
        }
        for (facet, canonical, variants) in parser.entries() {
            lookup.insert(fold(canonical), facet.to_string());
            for variant in variants {
                lookup.insert(fold(variant), facet.to_string());
            }
        }
        lookup
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Whether the parser declares any canonical labels for `facet`.
    pub fn has_parser_entry(&self, facet: &str) -> bool {
        self.tables.contains_key(facet)
    }

    /// Resolve a raw label to its canonical spelling within `facet`.
    ///
    /// Returns the canonical label in its original casing if the folded label
    /// is a declared variant, otherwise returns `label` untouched (not folded).
    /// Unknown facets and unknown labels pass through; neither is an error.
    ///
    /// ```
    /// use synapse_engine::VocabularyIndex;
    /// # let vocabulary = serde_json::from_str(r#"{"Genre": ["epic fantasy"]}"#).unwrap();
    /// # let parser = serde_json::from_str(r#"{"Genre": {"Fantasy": ["epic fantasy"]}}"#).unwrap();
    /// let index = VocabularyIndex::new(vocabulary, parser);
    /// assert_eq!(index.normalize("Genre", " Epic Fantasy "), "Fantasy");
    /// assert_eq!(index.normalize("Genre", "Space Opera"), "Space Opera");
    /// assert_eq!(index.normalize("Themes", "epic fantasy"), "epic fantasy");
    /// ```
    pub fn normalize<'a>(&'a self, facet: &str, label: &'a str) -> &'a str {
        self.tables
            .get(facet)
            .and_then(|table| table.variants.get(&fold(label)))
            .map(String::as_str)
            .unwrap_or(label)
    }

    /// Canonical display spelling of a folded label within `facet`, matching
    /// either a canonical or one of its variants.
    pub(crate) fn display_label<'a>(&'a self, facet: &str, folded: &'a str) -> &'a str {
        self.tables
            .get(facet)
            .and_then(|table| table.display.get(folded))
            .map(String::as_str)
            .unwrap_or(folded)
    }

    /// The facet a label was last assigned to, if the vocabulary knows it.
    pub fn facet_of(&self, label: &str) -> Option<&str> {
        self.label_to_facet.get(&fold(label)).map(String::as_str)
    }

    /// Like [`facet_of`](Self::facet_of), defaulting to `"uncategorized"`.
    pub fn category_of(&self, label: &str) -> &str {
        self.facet_of(label).unwrap_or(UNCATEGORIZED)
    }

    /// Every canonical and variant label across all facets, folded.
    pub fn parser_labels(&self) -> &BTreeSet<String> {
        &self.parser_labels
    }

    pub fn is_parser_label(&self, label: &str) -> bool {
        self.parser_labels.contains(&fold(label))
    }

    /// Parser facets and vocabulary facets (alias keys folded), sorted.
    pub fn fields(&self) -> BTreeSet<String> {
        self.parser
            .facets()
            .chain(self.vocabulary.facets())
            .map(str::to_string)
            .collect()
    }

    /// Canonical labels from the parser and raw labels from the vocabulary
    /// (alias key merged in) for a single facet.
    pub fn labels_for_field(&self, facet: &str) -> FieldLabels {
        FieldLabels {
            canonical: self
                .parser
                .facet(facet)
                .map(|canonicals| canonicals.keys().map(str::to_string).collect())
                .unwrap_or_default(),
            raw: self.vocabulary.raw_labels(facet).into_iter().map(str::to_string).collect(),
        }
    }

    /// Every raw vocabulary label, facet association dropped.
    pub fn all_labels(&self) -> BTreeSet<String> {
        self.vocabulary.all_labels().into_iter().map(str::to_string).collect()
    }

    /// Raw labels listed under more than one facet, with the facets they
    /// appear in. These are the labels whose facet lookup depends on document
    /// order.
    pub fn overlapping_labels(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut facets_by_label: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (facet, label) in self.vocabulary.entries() {
            facets_by_label.entry(label).or_default().insert(facet);
        }
        facets_by_label
            .into_iter()
            .filter(|(_, facets)| facets.len() > 1)
            .map(|(label, facets)| (label.to_string(), facets.into_iter().map(str::to_string).collect()))
            .collect()
    }
}

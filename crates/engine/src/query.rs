use crate::error::{Document, InitializationError};
use crate::index::VocabularyIndex;
use crate::label::fold;
use crate::load::{DocumentPaths, read_document};
use crate::models::{Catalog, FieldLabels, Item, LabelCount, MatchedBook, QueryResult};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::instrument;

/// Items sharing a series count once; standalone items count individually.
#[derive(Debug, PartialEq, Eq, Hash)]
enum GroupKey<'a> {
    Series(String),
    Standalone(&'a str),
}
impl<'a> GroupKey<'a> {
    fn of(item: &'a Item) -> Self {
        match &item.series {
            Some(series) => Self::Series(series.to_lowercase()),
            None => Self::Standalone(&item.id),
        }
    }
}

struct Match<'a> {
    item: &'a Item,
    labels: BTreeSet<String>,
    group: GroupKey<'a>,
}

/// Answers faceted label queries over a catalog.
///
/// Immutable once built; share it between threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    catalog: Catalog,
    index: VocabularyIndex,
}

impl QueryEngine {
    pub fn new(catalog: Catalog, index: VocabularyIndex) -> Self {
        Self { catalog, index }
    }

    /// Read the item map, vocabulary and parser documents and build an engine.
    /// Any document that is missing, unreadable or malformed aborts
    /// construction.
    #[instrument(skip_all, fields(items = %paths.items.display()))]
    pub fn load(paths: &DocumentPaths) -> Result<Self, InitializationError> {
        let catalog: Catalog = read_document(Document::Items, &paths.items)?;
        let vocabulary = read_document(Document::Vocabulary, &paths.vocabulary)?;
        let parser = read_document(Document::Parser, &paths.parser)?;
        let engine = Self::new(catalog, VocabularyIndex::new(vocabulary, parser));
        tracing::info!(items = engine.catalog.len(), "Query engine initialized");
        Ok(engine)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &VocabularyIndex {
        &self.index
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.catalog.get(id)
    }

    pub fn fields(&self) -> BTreeSet<String> {
        self.index.fields()
    }

    pub fn labels_for_field(&self, facet: &str) -> FieldLabels {
        self.index.labels_for_field(facet)
    }

    pub fn all_labels(&self) -> BTreeSet<String> {
        self.index.all_labels()
    }

    pub fn normalize_label<'a>(&'a self, facet: &str, label: &'a str) -> &'a str {
        self.index.normalize(facet, label)
    }

    pub fn overlapping_labels(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.index.overlapping_labels()
    }

    /// Normalized, folded labels of an item across every facet.
    ///
    /// Labels are normalized under the item's own facet key; a `#Facet` key
    /// has no parser table of its own, so its labels pass through unchanged.
    pub(crate) fn normalized_labels(&self, item: &Item) -> BTreeSet<String> {
        item.labels()
            .map(|(facet, label)| fold(self.index.normalize(facet, label)))
            .collect()
    }

    /// Find every item carrying all of `labels`, and the labels that could
    /// narrow that result further.
    ///
    /// Selected labels are folded but not normalized: they must be spelled the
    /// way refinements are reported. A selection that folds to nothing yields
    /// [`QueryResult::default()`].
    ///
    /// A refinement's count is the number of distinct groups (series, or
    /// standalone items) among the matches that also carry it. A label is
    /// offered when that count is above zero and below the number of matched
    /// *items*. Because groups are compared against items, a label shared by
    /// every book of a series can still be offered without narrowing anything.
    #[instrument(skip_all)]
    pub fn query<I, S>(&self, labels: I) -> QueryResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let include: BTreeSet<String> = labels.into_iter().map(fold).filter(|label| !label.is_empty()).collect();
        if include.is_empty() {
            tracing::debug!("Empty selection");
            return QueryResult::default();
        }

        let matched: Vec<Match<'_>> = self
            .catalog
            .iter()
            .filter_map(|item| {
                let labels = self.normalized_labels(item);
                include.is_subset(&labels).then(|| Match {
                    item,
                    labels,
                    group: GroupKey::of(item),
                })
            })
            .collect();

        let candidates: BTreeSet<&str> = matched
            .iter()
            .flat_map(|m| m.labels.iter().map(String::as_str))
            .filter(|label| !include.contains(*label))
            .collect();

        let mut categorized: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        for label in &candidates {
            let groups: HashSet<&GroupKey<'_>> = matched
                .iter()
                .filter(|m| m.labels.contains(*label))
                .map(|m| &m.group)
                .collect();
            let count = groups.len();
            if count == 0 || count >= matched.len() {
                continue;
            }
            let facet = self.index.category_of(label);
            let display = self.index.display_label(facet, label);
            *categorized
                .entry(facet.to_string())
                .or_default()
                .entry(display.to_string())
                .or_default() += count;
        }

        let refinable_labels: BTreeMap<String, Vec<LabelCount>> = categorized
            .into_iter()
            .map(|(facet, labels)| {
                let labels = labels.into_iter().map(|(label, count)| LabelCount::new(label, count)).collect();
                (facet, labels)
            })
            .collect();

        tracing::debug!(
            selected = include.len(),
            matched = matched.len(),
            candidates = candidates.len(),
            facets = refinable_labels.len(),
            "Query evaluated"
        );

        let books = matched
            .into_iter()
            .map(|m| {
                let book = MatchedBook {
                    author: m.item.author.clone(),
                    labels: m.labels,
                    series: m.item.series.clone(),
                };
                (m.item.id.clone(), book)
            })
            .collect();

        QueryResult {
            books,
            refinement_closed: refinable_labels.is_empty(),
            refinable_labels,
            query_labels: include.into_iter().collect(),
        }
    }
}

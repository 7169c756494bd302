use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Arc;
use synapse_cache::backend::{JsonFileBackend, ReadOnlyBackend};
use synapse_cache::{BackendHandle, CacheEntry, ComboKey, ResultCache};
use synapse_config::{CacheConfig, Config};
use synapse_engine::QueryEngine;
use synapse_engine::label::fold;

#[derive(Serialize)]
struct QueryOutput<'a> {
    query_labels: Vec<&'a str>,
    refinement_closed: bool,
    cached: bool,
    entry: &'a CacheEntry,
}

#[derive(Serialize)]
struct NormalizeOutput<'a> {
    facet: &'a str,
    label: &'a str,
    normalized: &'a str,
    category: &'a str,
}

pub(crate) fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    if cli.read_only {
        config.cache.read_only = true;
    }
    let engine = QueryEngine::load(&config.documents.paths()).or_raise(|| ErrorKind::Engine)?;

    match &cli.command {
        Command::Query { labels, no_cache } => {
            let mut cache = (!no_cache).then(|| open_cache(&config.cache));
            query(&engine, cache.as_mut(), labels, out)
        },
        Command::Fields => print(out, &engine.fields()),
        Command::Labels { facet } => print(out, &engine.labels_for_field(facet)),
        Command::Normalize { facet, label } => normalize(&engine, facet, label, out),
        Command::Overlaps => print(out, &engine.overlapping_labels()),
    }
}

fn open_cache(config: &CacheConfig) -> ResultCache {
    let backend: BackendHandle = Arc::new(JsonFileBackend::new(&config.path));
    if config.read_only {
        ResultCache::open(Arc::new(ReadOnlyBackend::new(backend)))
    } else {
        ResultCache::open(backend)
    }
}

/// Answer from the cache when the combination has been seen before, otherwise
/// query the engine and remember the result.
fn query(engine: &QueryEngine, cache: Option<&mut ResultCache>, labels: &[String], out: &mut impl Write) -> Result<()> {
    let selection: BTreeSet<String> = labels.iter().map(fold).filter(|label| !label.is_empty()).collect();
    let query_labels: Vec<&str> = selection.iter().map(String::as_str).collect();
    let key = ComboKey::new(&selection);
    match cache {
        Some(cache) if !key.is_empty() => {
            let lookup = cache.get_or_store_with(key.clone(), || engine.query(&selection));
            let entry = lookup.entry();
            tracing::info!(key = %key, cached = lookup.is_hit(), books = entry.books.len(), "Query answered");
            print(out, &QueryOutput {
                query_labels,
                refinement_closed: entry.refinement_closed(),
                cached: lookup.is_hit(),
                entry,
            })
        },
        _ => {
            let result = engine.query(&selection);
            print(out, &QueryOutput {
                query_labels,
                refinement_closed: result.refinement_closed,
                cached: false,
                entry: &CacheEntry::new(&result),
            })
        },
    }
}

fn normalize(engine: &QueryEngine, facet: &str, label: &str, out: &mut impl Write) -> Result<()> {
    let normalized = engine.normalize_label(facet, label);
    print(out, &NormalizeOutput {
        facet,
        label,
        normalized,
        category: engine.index().category_of(normalized),
    })
}

fn print(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).or_raise(|| ErrorKind::Output)?;
    writeln!(out).or_raise(|| ErrorKind::Output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};
    use synapse_cache::backend::MemoryBackend;
    use synapse_engine::VocabularyIndex;

    #[fixture]
    fn engine() -> QueryEngine {
        let catalog = serde_json::from_str(
            r#"{
                "1": {"title": "One", "author": "A", "series": "Saga",
                      "labels_by_field": {"Genre": ["whodunit"], "Themes": ["award"]}},
                "2": {"title": "Two", "author": "A", "series": "Saga",
                      "labels_by_field": {"Genre": ["mystery"], "Themes": ["award"]}},
                "3": {"title": "Three", "author": "B",
                      "labels_by_field": {"Genre": ["epic fantasy"], "Themes": ["award"]}},
                "4": {"title": "Four", "author": "C",
                      "labels_by_field": {"Mood": ["dark, gritty"]}},
                "5": {"title": "Five", "author": "C",
                      "labels_by_field": {"Mood": ["dark", "gritty"]}}
            }"#,
        )
        .unwrap();
        let vocabulary = serde_json::from_str(r#"{"Genre": ["mystery", "epic fantasy"], "Themes": ["award"]}"#).unwrap();
        let parser = serde_json::from_str(r#"{"Genre": {"Mystery": ["whodunit"], "Fantasy": ["epic fantasy"]}}"#).unwrap();
        QueryEngine::new(catalog, VocabularyIndex::new(vocabulary, parser))
    }

    fn output(write: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> Value {
        let mut out = Vec::new();
        write(&mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    fn labels(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|label| label.to_string()).collect()
    }

    #[rstest]
    fn test_query_without_cache(engine: QueryEngine) {
        let value = output(|out| query(&engine, None, &labels(&["Award"]), out));
        assert_eq!(value["query_labels"], json!(["award"]));
        assert_eq!(value["cached"], json!(false));
        assert_eq!(value["refinement_closed"], json!(false));
        assert_eq!(value["entry"]["refinable_labels"], json!({"Genre": [["Fantasy", 1], ["Mystery", 1]]}));
        assert_eq!(value["entry"]["books"]["3"]["labels"], json!(["award", "fantasy"]));
    }

    #[rstest]
    fn test_query_through_cache(engine: QueryEngine) {
        let backend = Arc::new(MemoryBackend::default());
        let mut cache = ResultCache::open(backend.clone());

        let first = output(|out| query(&engine, Some(&mut cache), &labels(&["award", "Mystery"]), out));
        assert_eq!(first["cached"], json!(false));
        assert_eq!(first["query_labels"], json!(["award", "mystery"]));
        assert_eq!(first["refinement_closed"], json!(true));
        assert_eq!(backend.saves(), 1);

        let second = output(|out| query(&engine, Some(&mut cache), &labels(&["mystery", "award"]), out));
        assert_eq!(second["cached"], json!(true));
        assert_eq!(second["entry"], first["entry"]);
        assert_eq!(backend.saves(), 1);
    }

    #[rstest]
    fn test_label_with_comma_matches_with_and_without_cache(engine: QueryEngine) {
        let selection = labels(&["Dark, Gritty"]);
        let uncached = output(|out| query(&engine, None, &selection, out));
        assert_eq!(uncached["query_labels"], json!(["dark, gritty"]));
        assert_eq!(uncached["entry"]["books"], json!({"4": {"author": "C", "labels": ["dark, gritty"], "series": null}}));

        let mut cache = ResultCache::open(Arc::new(MemoryBackend::default()));
        let miss = output(|out| query(&engine, Some(&mut cache), &selection, out));
        let hit = output(|out| query(&engine, Some(&mut cache), &selection, out));
        for cached in [&miss, &hit] {
            assert_eq!(cached["query_labels"], uncached["query_labels"]);
            assert_eq!(cached["entry"]["books"], uncached["entry"]["books"]);
            assert_eq!(cached["refinement_closed"], uncached["refinement_closed"]);
        }
        assert_eq!(hit["cached"], json!(true));
    }

    #[rstest]
    fn test_blank_query_skips_cache(engine: QueryEngine) {
        let backend = Arc::new(MemoryBackend::default());
        let mut cache = ResultCache::open(backend.clone());
        let value = output(|out| query(&engine, Some(&mut cache), &labels(&[" "]), out));
        assert_eq!(value["query_labels"], json!([]));
        assert_eq!(value["refinement_closed"], json!(true));
        assert!(cache.is_empty());
    }

    #[rstest]
    #[case("Genre", "WHODUNIT", "Mystery", "Genre")]
    #[case("Genre", "space opera", "space opera", "uncategorized")]
    #[case("Themes", "award", "award", "Themes")]
    fn test_normalize(
        engine: QueryEngine,
        #[case] facet: &str,
        #[case] label: &str,
        #[case] normalized: &str,
        #[case] category: &str,
    ) {
        let value = output(|out| normalize(&engine, facet, label, out));
        assert_eq!(value, json!({"facet": facet, "label": label, "normalized": normalized, "category": category}));
    }

    #[rstest]
    fn test_print(engine: QueryEngine) {
        assert_eq!(output(|out| print(out, &engine.fields())), json!(["Genre", "Themes"]));
        assert_eq!(
            output(|out| print(out, &engine.labels_for_field("Genre"))),
            json!({"canonical": ["Fantasy", "Mystery"], "raw": ["epic fantasy", "mystery"]})
        );
    }

    #[test]
    fn test_read_only_cache_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            path: dir.path().join("cache.json"),
            read_only: true,
        };
        let mut cache = open_cache(&config);
        cache.store(ComboKey::new(["award"]), &Default::default());
        assert!(!config.path.exists());
    }

    #[test]
    fn test_cache_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            path: dir.path().join("cache.json"),
            read_only: false,
        };
        open_cache(&config).store(ComboKey::new(["award"]), &Default::default());
        assert_eq!(open_cache(&config).len(), 1);
    }
}

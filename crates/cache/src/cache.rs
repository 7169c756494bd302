use crate::BackendHandle;
use crate::backend::Entries;
use crate::key::ComboKey;
use crate::models::CacheEntry;
use synapse_engine::QueryResult;
use tracing::instrument;

/// Outcome of [`ResultCache::get_or_store_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The entry was already stored.
    Hit(&'a CacheEntry),
    /// The entry was computed and has just been stored.
    Miss(&'a CacheEntry),
}
impl<'a> Lookup<'a> {
    pub fn entry(&self) -> &'a CacheEntry {
        match *self {
            Self::Hit(entry) | Self::Miss(entry) => entry,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// Query results remembered per label combination.
///
/// The whole store is loaded from the backend when the cache is opened and
/// written back in full on every [`store`](Self::store). Failing to do
/// either is logged and otherwise ignored: the cache is an optimization, so
/// it degrades to an in-memory (or empty) cache rather than failing the
/// caller. Entries are never evicted.
pub struct ResultCache {
    backend: BackendHandle,
    entries: Entries,
}

impl ResultCache {
    #[instrument(skip_all, fields(backend = backend.name()))]
    pub fn open(backend: BackendHandle) -> Self {
        let entries = match backend.load() {
            Ok(entries) => {
                tracing::debug!(entries = entries.len(), "Cache loaded");
                entries
            },
            Err(err) => {
                tracing::warn!(error = ?err, "Failed to load cache, starting empty");
                Entries::new()
            },
        };
        Self { backend, entries }
    }

    pub fn get(&self, key: &ComboKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Snapshot `result` under `key`, replacing any previous entry, and write
    /// the whole cache back.
    ///
    /// The entry is kept in memory even when the write fails.
    #[instrument(skip_all, fields(key = %key))]
    pub fn store(&mut self, key: ComboKey, result: &QueryResult) -> &CacheEntry {
        let entry = CacheEntry::new(result);
        self.entries.insert(key.clone(), entry);
        if let Err(err) = self.backend.save(&self.entries, &key) {
            tracing::warn!(backend = self.backend.name(), error = ?err, "Failed to save cache");
        }
        &self.entries[&key]
    }

    /// Return the entry for `key`, computing and storing it with `query` if
    /// there isn't one yet.
    pub fn get_or_store_with<F>(&mut self, key: ComboKey, query: F) -> Lookup<'_>
    where
        F: FnOnce() -> QueryResult,
    {
        if self.entries.contains_key(&key) {
            tracing::debug!(key = %key, "Cache hit");
            return Lookup::Hit(&self.entries[&key]);
        }
        tracing::debug!(key = %key, "Cache miss");
        let result = query();
        Lookup::Miss(self.store(key, &result))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ComboKey, &CacheEntry)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{JsonFileBackend, MemoryBackend};
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Arc;
    use synapse_engine::{LabelCount, MatchedBook};

    fn result() -> QueryResult {
        QueryResult {
            books: BTreeMap::from([
                (
                    "1".to_string(),
                    MatchedBook {
                        author: "A".to_string(),
                        labels: BTreeSet::from(["award".to_string(), "mystery".to_string()]),
                        series: Some("Saga".to_string()),
                    },
                ),
                (
                    "2".to_string(),
                    MatchedBook {
                        author: "A".to_string(),
                        labels: BTreeSet::from(["award".to_string()]),
                        series: Some("Saga".to_string()),
                    },
                ),
            ]),
            refinable_labels: BTreeMap::from([("Genre".to_string(), vec![LabelCount::new("mystery", 1)])]),
            query_labels: vec!["award".to_string()],
            refinement_closed: false,
        }
    }

    #[test]
    fn test_store_then_get() {
        let backend = Arc::new(MemoryBackend::default());
        let mut cache = ResultCache::open(backend.clone());
        let key = ComboKey::from(&result());
        assert!(cache.get(&key).is_none());

        let stored = cache.store(key.clone(), &result()).clone();
        assert_eq!(cache.get(&key), Some(&stored));
        assert_eq!(stored.refinable_labels["Genre"], vec![LabelCount::new("mystery", 1)]);
        assert_eq!(backend.saves(), 1);
        assert_eq!(backend.entries()[&key], stored);
    }

    #[test]
    fn test_store_overwrites() {
        let mut cache = ResultCache::open(Arc::new(MemoryBackend::default()));
        let key = ComboKey::new(["award"]);
        cache.store(key.clone(), &result());
        cache.store(key.clone(), &QueryResult::default());
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key).unwrap().books.is_empty());
    }

    #[test]
    fn test_failed_save_keeps_entry_in_memory() {
        let backend = Arc::new(MemoryBackend::default());
        backend.fail_saves(true);
        let mut cache = ResultCache::open(backend.clone());
        let key = ComboKey::new(["award"]);
        cache.store(key.clone(), &result());
        assert!(cache.get(&key).is_some());
        assert!(backend.entries().is_empty());
    }

    #[test]
    fn test_get_or_store_with() {
        let backend = Arc::new(MemoryBackend::default());
        let mut cache = ResultCache::open(backend.clone());
        let key = ComboKey::new(["award"]);

        let miss = cache.get_or_store_with(key.clone(), result);
        assert!(!miss.is_hit());
        assert_eq!(miss.entry().books.len(), 2);

        let hit = cache.get_or_store_with(key, || panic!("cached entries are not recomputed"));
        assert!(hit.is_hit());
        assert_eq!(hit.entry().books.len(), 2);
        assert_eq!(backend.saves(), 1);
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let mut cache = ResultCache::open(Arc::new(JsonFileBackend::new(&path)));
        assert!(cache.is_empty());

        // The next store replaces the corrupt file.
        cache.store(ComboKey::new(["award"]), &result());
        assert_eq!(ResultCache::open(Arc::new(JsonFileBackend::new(&path))).len(), 1);
    }

    #[test]
    fn test_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let key = ComboKey::new(["award"]);
        let stored = ResultCache::open(Arc::new(JsonFileBackend::new(&path))).store(key.clone(), &result()).clone();

        let reopened = ResultCache::open(Arc::new(JsonFileBackend::new(&path)));
        let entry = reopened.get(&key).unwrap();
        assert_eq!(entry, &stored);
        assert_eq!(entry.books["1"].labels, vec!["award", "mystery"]);
        assert_eq!(entry.books["2"].series.as_deref(), Some("Saga"));
        assert_eq!(reopened.iter().count(), 1);
    }
}

//! In-memory cache backend for testing.

use crate::backend::{CacheBackend, Entries};
use crate::error::{ErrorKind, Result};
use crate::key::ComboKey;
use crate::models::CacheEntry;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

/// In-memory cache backend for testing.
///
/// Entries live behind a [`RwLock`] so the trait methods can operate on
/// `&self`. Saves can be made to fail, to exercise the paths where the cache
/// keeps going without its backing store.
///
/// # Examples
///
/// ```
/// use synapse_cache::{CacheBackend, ComboKey, backend::MemoryBackend};
///
/// let backend = MemoryBackend::default();
/// backend.save(&Default::default(), &ComboKey::new(["dark"])).unwrap();
/// assert_eq!(backend.saves(), 1);
///
/// backend.fail_saves(true);
/// assert!(backend.save(&Default::default(), &ComboKey::new(["dark"])).is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<Entries>,
    failing: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryBackend {
    /// Create a memory backend pre-populated with entries.
    pub fn with_entries(entries: impl IntoIterator<Item = (ComboKey, CacheEntry)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Make every following save fail (or succeed again).
    pub fn fail_saves(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of what was last saved.
    pub fn entries(&self) -> Entries {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl CacheBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self) -> Result<Entries> {
        Ok(self.entries())
    }

    fn save(&self, entries: &Entries, _changed: &ComboKey) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Write(PathBuf::from(self.name())));
        }
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = entries.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

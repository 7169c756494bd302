//! Cache backend trait and implementations.
//!
//! A backend persists the whole set of cache entries. [`ResultCache`] loads
//! it once when opened and hands the full set back on every store, so a
//! backend never has to merge partial state.
//!
//! [`ResultCache`]: crate::ResultCache

mod json;
#[cfg(any(test, feature = "mock"))]
mod memory;
mod ro;

pub use self::json::JsonFileBackend;
#[cfg(any(test, feature = "mock"))]
pub use self::memory::MemoryBackend;
pub use self::ro::ReadOnlyBackend;
use crate::error::Result;
use crate::key::ComboKey;
use crate::models::CacheEntry;
use std::collections::BTreeMap;

/// Every stored entry, by combination key.
pub type Entries = BTreeMap<ComboKey, CacheEntry>;

/// Unified interface for cache persistence.
pub trait CacheBackend: Send + Sync {
    /// Short description of where entries live (used for logging only).
    fn name(&self) -> &str;

    /// Load every persisted entry. A store that doesn't exist yet is empty,
    /// not an error.
    fn load(&self) -> Result<Entries>;

    /// Persist `entries` in full. `changed` names the entry that prompted the
    /// save; backends that rewrite everything may ignore it.
    fn save(&self, entries: &Entries, changed: &ComboKey) -> Result<()>;
}

//! Persistent cache of query results.
//!
//! Results are keyed by the canonical form of the selected labels
//! ([`ComboKey`]) and kept as serializable snapshots ([`CacheEntry`]). The
//! cache is loaded once and rewritten in full on every store, through a
//! [`CacheBackend`]:
//! - [`JsonFileBackend`](backend::JsonFileBackend): the cache file itself,
//! - [`ReadOnlyBackend`](backend::ReadOnlyBackend): loads, but never saves,
//! - `MemoryBackend` (feature `mock`): in memory, for tests.

pub mod backend;
mod cache;
pub mod error;
mod key;
mod models;

pub use crate::backend::CacheBackend;
pub use crate::cache::{Lookup, ResultCache};
pub use crate::key::ComboKey;
pub use crate::models::{BookSnapshot, CacheEntry};
use std::sync::Arc;

pub type BackendHandle = Arc<dyn CacheBackend + Send + Sync>;

//! Read-only cache backend.
//!
//! Wraps another backend and prevents saves from executing, but indicates
//! success on return.

use crate::backend::{CacheBackend, Entries};
use crate::error::Result;
use crate::{BackendHandle, ComboKey};

/// Read-only cache backend.
///
/// Loads pass through to the wrapped backend; saves are dropped with an
/// [`info event`](tracing::Event).
#[derive(Clone)]
pub struct ReadOnlyBackend {
    inner: BackendHandle,
}
impl ReadOnlyBackend {
    pub fn new(inner: BackendHandle) -> Self {
        Self { inner }
    }
}

impl CacheBackend for ReadOnlyBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn load(&self) -> Result<Entries> {
        self.inner.load()
    }

    fn save(&self, entries: &Entries, changed: &ComboKey) -> Result<()> {
        tracing::info!(backend = self.name(), key = %changed, entries = entries.len(), "Skipping cache save during read-only mode");
        Ok(())
    }
}

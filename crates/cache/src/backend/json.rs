//! JSON file cache backend.

use crate::backend::{CacheBackend, Entries};
use crate::error::{ErrorKind, Result};
use crate::key::ComboKey;
use crate::models::EntryRecord;
use exn::ResultExt;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::instrument;

/// Cache entries stored as a single pretty-printed JSON document:
///
/// ```json
/// {
///   "award,mystery": {
///     "refinable_labels": { "Mood": [["cozy", 2]] },
///     "books": { "42": { "author": "…", "labels": ["…"], "series": null } },
///     "timestamp": "2026-01-01T00:00:00Z"
///   }
/// }
/// ```
///
/// Every save rewrites the whole document into a temporary file beside it,
/// then renames that over the original.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
    name: String,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheBackend for JsonFileBackend {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn load(&self) -> Result<Entries> {
        let contents = match fs::read_to_string(&self.path) {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No cache file yet");
                return Ok(Entries::new());
            },
            result => result.or_raise(|| ErrorKind::Read(self.path.clone()))?,
        };
        let records: BTreeMap<ComboKey, EntryRecord> =
            serde_json::from_str(&contents).or_raise(|| ErrorKind::InvalidData)?;
        Ok(records.into_iter().map(|(key, record)| (key, record.into())).collect())
    }

    #[instrument(skip_all, fields(path = %self.path.display(), key = %changed))]
    fn save(&self, entries: &Entries, changed: &ComboKey) -> Result<()> {
        let records: BTreeMap<&ComboKey, EntryRecord> =
            entries.iter().map(|(key, entry)| (key, EntryRecord::from(entry))).collect();

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).or_raise(|| ErrorKind::Write(self.path.clone()))?;
        let file = NamedTempFile::new_in(parent).or_raise(|| ErrorKind::Write(self.path.clone()))?;

        let mut writer = BufWriter::new(&file);
        serde_json::to_writer_pretty(&mut writer, &records).or_raise(|| ErrorKind::InvalidData)?;
        writer.flush().or_raise(|| ErrorKind::Write(self.path.clone()))?;
        drop(writer);

        file.persist(&self.path).or_raise(|| ErrorKind::Write(self.path.clone()))?;
        tracing::debug!(entries = entries.len(), "Cache file written");
        Ok(())
    }
}

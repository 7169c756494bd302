mod entry;
mod record;

pub use self::entry::{BookSnapshot, CacheEntry};
pub(crate) use self::record::EntryRecord;

//! Cache Error Types
//!
//! None of these are fatal to a caller of [`ResultCache`](crate::ResultCache):
//! it logs them and carries on with whatever it holds in memory. They surface
//! directly only when a [`CacheBackend`](crate::CacheBackend) is used on its
//! own.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backing store exists but could not be read.
    #[display("unable to read cache: {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    /// The backing store could not be (re)written.
    #[display("unable to write cache: {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
    /// Serialization/deserialization error.
    #[display("invalid cache data")]
    InvalidData,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Read(_) | Self::Write(_))
    }
}

//! CLI Error Types

use derive_more::{Display, Error};

/// A CLI error with automatic location tracking.
pub(crate) type Error = exn::Exn<ErrorKind>;
/// Result type alias for CLI commands.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub(crate) enum ErrorKind {
    #[display("unable to load configuration")]
    Config,
    #[display("no engine available")]
    Engine,
    #[display("unable to write output")]
    Output,
}

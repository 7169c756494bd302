use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Faceted label queries over a tagged library.
#[derive(Debug, Parser)]
#[command(name = "synapse", version, about)]
pub(crate) struct Cli {
    /// Config file (TOML, YAML or JSON) layered over the defaults
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// More logging on stderr; repeat for more detail
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// Read the cache but never write it back
    #[arg(long, global = true)]
    pub read_only: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub(crate) enum Command {
    /// Find items carrying every label, and the labels that narrow them further
    Query {
        #[arg(required = true, value_name = "LABEL")]
        labels: Vec<String>,
        /// Evaluate the query without reading or writing the cache
        #[arg(long)]
        no_cache: bool,
    },
    /// List every facet
    Fields,
    /// List the canonical and raw labels of a facet
    Labels { facet: String },
    /// Resolve a label to its canonical spelling within a facet
    Normalize { facet: String, label: String },
    /// List labels recorded under more than one facet
    Overlaps,
}

impl Cli {
    /// Default log filter for the requested verbosity, used when `RUST_LOG`
    /// isn't set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

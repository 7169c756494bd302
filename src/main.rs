//! `synapse`: query a tagged library from the command line.
//!
//! Every command prints JSON on stdout; logs go to stderr.

mod cli;
mod commands;
mod error;

use crate::cli::Cli;
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    match commands::run(&cli, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

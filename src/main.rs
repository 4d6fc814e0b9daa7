//! artist-cover - keeps an artist image next to every artist in a music library.
//!
//! Walks the library, works out where each artist's cover belongs according
//! to the library's path templates and fetches missing covers from Last.fm.

pub mod cli;
pub mod config;
pub mod cover;
pub mod enrichment;
pub mod error;
pub mod library;
pub mod metadata;
pub mod paths;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // RUST_LOG wins over the default directive
    let level = if args.verbose { "debug" } else { "info" };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("artist_cover={}", level))?,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run_command(&args)
}

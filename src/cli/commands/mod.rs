//! CLI command definitions and dispatch.

mod fetch;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use fetch::cmd_fetch;

/// Fetch artist cover images into a music library
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: <config dir>/artist-cover/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Library directory, overriding the config file
    #[arg(short, long, global = true)]
    pub library: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch missing artist covers
    Fetch {
        /// Item query, e.g. `artist:Foo` or `singleton:true`
        query: Vec<String>,
        /// Refetch and overwrite existing covers
        #[arg(short, long)]
        force: bool,
        /// Last.fm API key (or set LASTFM_API_KEY env var)
        #[arg(long, env = "LASTFM_API_KEY")]
        api_key: Option<String>,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Fetch {
            query,
            force,
            api_key,
        } => cmd_fetch(
            &rt,
            cli.config.as_deref(),
            cli.library.as_deref(),
            query,
            *force,
            api_key.as_deref(),
        ),
    }
}

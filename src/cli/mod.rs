//! Command-line interface for artist-cover.
//!
//! The CLI only wires configuration, the library and the Last.fm clients
//! together; everything it runs lives in the library modules.

mod commands;

pub use commands::{Cli, Commands, run_command};

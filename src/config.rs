//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\artist-cover\config.toml
//! - macOS: ~/Library/Application Support/artist-cover/config.toml
//! - Linux: ~/.config/artist-cover/config.toml
//!
//! A different file can be passed with `--config`. Every section is optional;
//! missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default template for tracks that belong to a release.
pub const DEFAULT_RELEASE_TEMPLATE: &str = "$albumartist/$album%aunique{}/$track $title";

/// Default template for standalone tracks.
pub const DEFAULT_SINGLETON_TEMPLATE: &str = "Non-Album/$artist/$title";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library location
    pub library: LibraryConfig,

    /// Path templates the library is organized by
    pub paths: PathsConfig,

    /// Cover file naming
    pub cover: CoverConfig,

    /// Last.fm access
    pub lastfm: LastFmConfig,
}

/// Library settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Library root directory ("~" is expanded)
    pub directory: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("~/Music"),
        }
    }
}

/// Path templates, written in the `$field` / `%func{}` syntax
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Template for tracks that are part of a release
    pub default: String,

    /// Template for standalone tracks
    pub singleton: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_RELEASE_TEMPLATE.to_string(),
            singleton: DEFAULT_SINGLETON_TEMPLATE.to_string(),
        }
    }
}

/// Cover naming settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Base filename for covers (empty = artist name)
    pub filename: String,
}

impl CoverConfig {
    /// The configured cover base filename, if one is set.
    pub fn filename(&self) -> Option<&str> {
        let name = self.filename.trim();
        (!name.is_empty()).then_some(name)
    }
}

/// Last.fm settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LastFmConfig {
    /// API key for `artist.getInfo` (empty = derive profile URLs locally)
    pub api_key: String,
}

impl LastFmConfig {
    pub fn api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty()).then_some(key)
    }
}

impl Config {
    /// Library root with a leading `~` expanded to the home directory.
    pub fn library_dir(&self) -> PathBuf {
        expand_home(&self.library.directory)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("artist-cover"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from `path`, or from the default location.
///
/// A missing file yields the default configuration. A file that exists but
/// cannot be read or parsed is an error: running with a guessed library
/// location would write covers to the wrong place.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) => p,
            None => {
                tracing::warn!("Could not determine config directory, using defaults");
                return Ok(Config::default());
            }
        },
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    let contents =
        std::fs::read_to_string(&path).map_err(|e| ConfigError::Read(path.clone(), e))?;
    let config = toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.clone(), e))?;
    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

// ============================================================================
// Tests
// ============================================================================

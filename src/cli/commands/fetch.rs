//! Artist cover fetch command.

use std::path::Path;

use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::config::{self, Config};
use crate::cover::ReconciliationPipeline;
use crate::enrichment::lastfm::{self, LastFmCoverFetcher, LastFmProfiles};
use crate::error::{Result, ResultExt};
use crate::library::{self, Query};
use crate::paths::PathResolver;

/// Fetch covers for every artist of the items matching `query`
pub fn cmd_fetch(
    rt: &Runtime,
    config_path: Option<&Path>,
    library_dir: Option<&Path>,
    query: &[String],
    force: bool,
    api_key: Option<&str>,
) -> anyhow::Result<()> {
    let config = load_config(config_path, library_dir, api_key)?;

    let root = config.library_dir();
    let query = Query::parse(query);
    if query.is_empty() {
        debug!("No query, selecting every item");
    }
    let items = library::load_items(&root, &query)
        .with_context(format!("Failed to read library at {}", root.display()))?;
    info!("{} items selected", items.len());

    let resolver = PathResolver::from_config(&config);
    debug!(
        "Cover folders: release {:?}, singleton {:?}",
        resolver.release_template(),
        resolver.singleton_template()
    );

    let pipeline = ReconciliationPipeline::new(resolver, lastfm_fetcher(&config)?).force(force);

    let reports = rt.block_on(pipeline.run(&items));
    for report in &reports {
        println!("{}", report);
    }

    Ok(())
}

/// Load the config file and apply the command-line overrides.
fn load_config(
    config_path: Option<&Path>,
    library_dir: Option<&Path>,
    api_key: Option<&str>,
) -> Result<Config> {
    let mut config = config::load(config_path)?;
    if let Some(dir) = library_dir {
        config.library.directory = dir.to_path_buf();
    }
    if let Some(key) = api_key {
        config.lastfm.api_key = key.to_string();
    }
    Ok(config)
}

fn lastfm_fetcher(config: &Config) -> Result<LastFmCoverFetcher<LastFmProfiles>> {
    let http_client = lastfm::http_client()?;
    let profiles = LastFmProfiles::new(
        http_client.clone(),
        config.lastfm.api_key().map(str::to_string),
    );
    Ok(LastFmCoverFetcher::new(profiles, http_client))
}

//! Per-artist reconciliation: scan, decide, fetch, write.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, error, info};

use super::{
    ACCEPTED_EXTENSIONS, ArtistRecord, CoverStatus, Decision, ScannedArtist, WriteError, group,
    write_cover,
};
use crate::enrichment::CoverFetcher;
use crate::library::LibraryItem;
use crate::paths::PathResolver;

/// Final state of one artist after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverOutcome {
    /// Covers already on disk, nothing fetched
    HasCover(CoverStatus),
    /// A cover was fetched and written to these paths
    Written(Vec<PathBuf>),
    /// The source has no usable cover for the artist
    NoCover,
    /// A target directory does not exist; nothing was written
    PathNotFound(PathBuf),
    /// Writing failed after the directories were checked
    WriteFailed(String),
    /// The source could not be reached or answered with an error
    FetchError(String),
}

impl CoverOutcome {
    /// Status line text shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::HasCover(_) => "has artist cover",
            Self::Written(_) => "artist cover found",
            Self::NoCover | Self::FetchError(_) => "no artist cover found",
            Self::PathNotFound(_) | Self::WriteFailed(_) => "path not found",
        }
    }
}

impl fmt::Display for CoverOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome for a named artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistReport {
    pub name: String,
    pub outcome: CoverOutcome,
}

impl fmt::Display for ArtistReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.outcome)
    }
}

/// Reconciles the covers of a set of library items.
///
/// Artists are handled one after another in name order. Nothing an artist
/// runs into stops the run; every artist ends up with an [`ArtistReport`].
pub struct ReconciliationPipeline<F> {
    resolver: PathResolver,
    fetcher: F,
    force: bool,
}

impl<F: CoverFetcher> ReconciliationPipeline<F> {
    pub fn new(resolver: PathResolver, fetcher: F) -> Self {
        Self {
            resolver,
            fetcher,
            force: false,
        }
    }

    /// Refetch and overwrite covers that already exist.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Run over `items`, returning one report per artist in name order.
    pub async fn run<'a, I>(&self, items: impl IntoIterator<Item = &'a I>) -> Vec<ArtistReport>
    where
        I: LibraryItem + 'a,
    {
        let records = group(items, &self.resolver);
        info!("Checking covers of {} artists", records.len());

        let mut reports = Vec::with_capacity(records.len());
        for record in records {
            reports.push(self.process(record).await);
        }
        reports
    }

    /// Reconcile a single artist.
    pub async fn process(&self, record: ArtistRecord) -> ArtistReport {
        let artist = ScannedArtist::scan(record, ACCEPTED_EXTENSIONS);
        let name = artist.name().to_string();
        debug!(
            "{}: {} stub(s), {} with a cover",
            name,
            artist.record().stubs.len(),
            artist.report().present.len()
        );

        let outcome = match artist.decide(self.force) {
            Decision::Skip(status) => {
                debug!("{}: covers present ({:?}), skipping", name, status);
                CoverOutcome::HasCover(status)
            }
            Decision::Fetch { targets } => self.fetch_and_write(&name, &targets).await,
        };

        ArtistReport { name, outcome }
    }

    async fn fetch_and_write(&self, name: &str, targets: &[PathBuf]) -> CoverOutcome {
        let cover = match self.fetcher.fetch(name).await {
            Ok(Some(cover)) => cover,
            Ok(None) => {
                info!("{}: no artist cover found", name);
                return CoverOutcome::NoCover;
            }
            Err(e) => {
                error!("{}: cover lookup failed: {}", name, e);
                return CoverOutcome::FetchError(e.to_string());
            }
        };

        debug!("{}: {} cover from {}", name, cover.format, cover.source_url);

        match write_cover(cover, targets).await {
            Ok(written) => {
                info!("{}: wrote {} cover(s)", name, written.len());
                CoverOutcome::Written(written)
            }
            Err(WriteError::MissingDirectory(dir)) => {
                error!("{}: directory {:?} does not exist", name, dir);
                CoverOutcome::PathNotFound(dir)
            }
            Err(WriteError::Stream(e)) => {
                error!("{}: cover download failed: {}", name, e);
                CoverOutcome::FetchError(e.to_string())
            }
            Err(WriteError::Io(path, e)) => {
                error!("{}: I/O error writing {:?}: {}", name, path, e);
                CoverOutcome::WriteFailed(format!("{}: {}", path.display(), e))
            }
        }
    }
}

//! Trait definitions for remote cover sources.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the Last.fm clients, tests substitute the mocks
//! below so the reconciliation logic runs without a network.
//!
//! # Example
//!
//! ```ignore
//! use artist_cover::enrichment::traits::CoverFetcher;
//!
//! async fn first_cover<F: CoverFetcher>(fetcher: &F, names: &[&str]) -> Option<FetchedCover> {
//!     for name in names {
//!         if let Ok(Some(cover)) = fetcher.fetch(name).await {
//!             return Some(cover);
//!         }
//!     }
//!     None
//! }
//! ```

use async_trait::async_trait;

use super::domain::EnrichmentError;
use crate::cover::FetchedCover;

/// Trait for artist profile lookup.
#[async_trait]
pub trait ArtistProfileApi: Send + Sync {
    /// Profile page URL for an artist, `None` if the service has no profile.
    async fn profile_url(&self, artist: &str) -> Result<Option<String>, EnrichmentError>;
}

/// Trait for artist cover retrieval.
///
/// `Ok(None)` means the artist has no usable cover. Errors are reserved for
/// transport and protocol failures.
#[async_trait]
pub trait CoverFetcher: Send + Sync {
    /// Find and start downloading the cover image for an artist.
    async fn fetch(&self, artist: &str) -> Result<Option<FetchedCover>, EnrichmentError>;
}

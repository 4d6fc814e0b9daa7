//! Remote cover sources.
//!
//! # Architecture
//!
//! - **Domain** (`domain.rs`) - the error type every client returns
//! - **Traits** (`traits.rs`) - the seams the pipeline depends on, with mocks
//! - **Last.fm** (`lastfm/`) - profile lookup, page scraping and image download
//!
//! The pipeline only sees [`CoverFetcher`], so another image source can be
//! added without touching reconciliation.

pub mod domain;
pub mod lastfm;
pub mod traits;

pub use domain::EnrichmentError;
pub use lastfm::{LastFmCoverFetcher, LastFmProfiles};
pub use traits::{ArtistProfileApi, CoverFetcher};

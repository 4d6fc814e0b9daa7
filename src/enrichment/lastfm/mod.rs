//! Last.fm integration
//!
//! Artist images are no longer part of the Last.fm API, so the image is
//! scraped from the artist's profile page. The API is only used, when a key
//! is configured, to find that page.
//!
//! API docs: https://www.last.fm/api

pub mod dto;
pub mod scrape;
mod client;

pub use client::{LastFmCoverFetcher, LastFmProfiles, USER_AGENT, http_client};

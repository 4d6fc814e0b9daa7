//! Last.fm HTTP clients
//!
//! [`LastFmProfiles`] resolves an artist name to its profile page,
//! [`LastFmCoverFetcher`] scrapes that page for the artist image and
//! downloads it.
//!
//! Without an API key the profile URL is derived from the artist name, the
//! same way Last.fm builds its own links. With a key, `artist.getInfo` is
//! asked for the canonical URL, which also catches unknown artists before
//! any page is fetched.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE};
use tracing::debug;

use super::dto::{self, ArtistInfoResponse};
use super::scrape;
use crate::cover::{FetchedCover, ImageFormat};
use crate::enrichment::domain::EnrichmentError;
use crate::enrichment::traits::{ArtistProfileApi, CoverFetcher};

/// User agent string sent with every request
pub const USER_AGENT: &str = concat!(
    "artist-cover/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/artist-cover)"
);

/// Profile pages are requested in English so the markup is the same
/// whatever the server would pick for our locale.
const PAGE_LANGUAGE: &str = "en-US, en;q=0.5";

const API_URL: &str = "https://ws.audioscrobbler.com/2.0/";
const WEB_URL: &str = "https://www.last.fm";

/// Build the HTTP client shared by the Last.fm clients.
pub fn http_client() -> Result<reqwest::Client, EnrichmentError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| EnrichmentError::Network(e.to_string()))
}

/// Resolves artist names to Last.fm profile URLs
pub struct LastFmProfiles {
    http_client: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
    web_url: String,
}

impl LastFmProfiles {
    pub fn new(http_client: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            http_client,
            api_key,
            api_url: API_URL.to_string(),
            web_url: WEB_URL.to_string(),
        }
    }

    /// Create a client for testing with custom base URLs
    #[cfg(test)]
    pub fn with_base_urls(
        api_key: Option<String>,
        api_url: impl Into<String>,
        web_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            api_url: api_url.into(),
            web_url: web_url.into(),
        }
    }

    /// Profile URL built from the name alone (`/music/Daft+Punk`).
    pub fn derive_profile_url(&self, artist: &str) -> Option<String> {
        let artist = artist.trim();
        if artist.is_empty() {
            return None;
        }
        let encoded = urlencoding::encode(artist).replace("%20", "+");
        Some(format!("{}/music/{}", self.web_url, encoded))
    }

    async fn lookup_profile_url(
        &self,
        artist: &str,
        api_key: &str,
    ) -> Result<Option<String>, EnrichmentError> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("method", "artist.getinfo"),
                ("artist", artist),
                ("api_key", api_key),
                ("autocorrect", "1"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();

        // Errors come back as JSON, usually with a 4xx status
        let parsed = match response.json::<ArtistInfoResponse>().await {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(EnrichmentError::Http {
                    url: self.api_url.clone(),
                    status: status.as_u16(),
                });
            }
            Err(e) => return Err(EnrichmentError::Parse(e.to_string())),
        };

        match parsed {
            ArtistInfoResponse::Artist { artist } => Ok(artist.url.filter(|u| !u.is_empty())),
            ArtistInfoResponse::Error { error, .. } if error == dto::ERROR_INVALID_PARAMETERS => {
                Ok(None)
            }
            ArtistInfoResponse::Error { error, .. } if error == dto::ERROR_RATE_LIMITED => {
                Err(EnrichmentError::RateLimited)
            }
            ArtistInfoResponse::Error { error, message } => {
                Err(EnrichmentError::ApiError(format!("{} (code {})", message, error)))
            }
        }
    }
}

#[async_trait]
impl ArtistProfileApi for LastFmProfiles {
    async fn profile_url(&self, artist: &str) -> Result<Option<String>, EnrichmentError> {
        match self.api_key.as_deref() {
            Some(key) if !artist.trim().is_empty() => self.lookup_profile_url(artist, key).await,
            _ => Ok(self.derive_profile_url(artist)),
        }
    }
}

/// Fetches artist images from Last.fm profile pages
pub struct LastFmCoverFetcher<P> {
    profiles: P,
    http_client: reqwest::Client,
}

impl<P: ArtistProfileApi> LastFmCoverFetcher<P> {
    pub fn new(profiles: P, http_client: reqwest::Client) -> Self {
        Self {
            profiles,
            http_client,
        }
    }

    /// Download a profile page. A missing page is `None`.
    async fn fetch_page(&self, url: &str) -> Result<Option<String>, EnrichmentError> {
        let response = self
            .http_client
            .get(url)
            .header(ACCEPT_LANGUAGE, PAGE_LANGUAGE)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(EnrichmentError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(Some(response.text().await?))
    }

    /// Start downloading an image. Anything that is not a png or jpeg
    /// (error pages, tracking pixels, other formats) is `None`.
    async fn fetch_image(&self, url: &str) -> Result<Option<FetchedCover>, EnrichmentError> {
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!("Image not found: {}", url);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(EnrichmentError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let Some(format) = ImageFormat::from_content_type(&content_type) else {
            if content_type.is_empty() {
                debug!("Not a supported image: no content type");
            } else {
                debug!("Not a supported image: {}", content_type);
            }
            return Ok(None);
        };

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|b| b.to_vec()).map_err(EnrichmentError::from))
            .boxed();

        Ok(Some(FetchedCover {
            format,
            body,
            source_url: url.to_string(),
        }))
    }
}

#[async_trait]
impl<P: ArtistProfileApi> CoverFetcher for LastFmCoverFetcher<P> {
    async fn fetch(&self, artist: &str) -> Result<Option<FetchedCover>, EnrichmentError> {
        let Some(profile_url) = self.profiles.profile_url(artist).await? else {
            debug!("{}: no profile", artist);
            return Ok(None);
        };

        let Some(page) = self.fetch_page(&profile_url).await? else {
            debug!("{}: profile page not found at {}", artist, profile_url);
            return Ok(None);
        };

        let Some(image_url) = scrape::find_image_url(&page) else {
            debug!("{}: no artist image on {}", artist, profile_url);
            return Ok(None);
        };

        let image_url = scrape::upgrade_image_url(&image_url);
        debug!("{}: fetching {}", artist, image_url);
        self.fetch_image(&image_url).await
    }
}

//! Artist cover reconciliation.
//!
//! Makes sure every artist in the library has a cover image at each location
//! its path templates call for:
//!
//! 1. **Grouping** - items are grouped into [`ArtistRecord`]s, one per artist,
//!    each holding the set of cover path stubs its items resolve to
//! 2. **Existence scan** - each stub is checked for an existing `png`/`jpg`
//! 3. **Decision** - artists with no cover at all (or every artist, when
//!    forced) get a fetch; the rest are skipped
//! 4. **Fetch** - a [`CoverFetcher`](crate::enrichment::CoverFetcher) returns
//!    the image stream and format
//! 5. **Write** - the image is written to every required stub
//!
//! # Design Principles
//!
//! - **Sequential**: artists are processed one at a time, in name order
//! - **Isolated failures**: one artist failing never stops the others
//! - **No partial files**: covers are written through a temporary file and
//!   renamed into place

mod artist;
mod existence;
mod pipeline;
mod writer;

pub use artist::{ArtistRecord, group};
pub use existence::{CoverStatus, Decision, ScanReport, ScannedArtist, scan};
pub use pipeline::{ArtistReport, CoverOutcome, ReconciliationPipeline};
pub use writer::{WriteError, write_cover};

use std::fmt;

use futures::stream::BoxStream;

use crate::enrichment::EnrichmentError;

/// Extensions a cover on disk may have, in lookup order.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg"];

/// Accepted cover image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Map a `Content-Type` header value to a format.
    ///
    /// Parameters (`; charset=...`) are ignored and the match is
    /// case-insensitive. Anything outside the mapping is `None`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// File extension covers of this format are written with.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Image body, delivered in chunks as it arrives.
pub type CoverStream = BoxStream<'static, Result<Vec<u8>, EnrichmentError>>;

/// A cover returned by a fetcher, not yet written anywhere.
pub struct FetchedCover {
    pub format: ImageFormat,
    pub body: CoverStream,
    /// Where the image was downloaded from
    pub source_url: String,
}

impl FetchedCover {
    /// A cover whose whole body is already in memory.
    pub fn from_bytes(format: ImageFormat, data: Vec<u8>, source_url: impl Into<String>) -> Self {
        use futures::StreamExt;

        Self {
            format,
            body: futures::stream::once(async move { Ok(data) }).boxed(),
            source_url: source_url.into(),
        }
    }
}

impl fmt::Debug for FetchedCover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchedCover")
            .field("format", &self.format)
            .field("source_url", &self.source_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(ImageFormat::from_content_type("image/png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_content_type("image/jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(
            ImageFormat::from_content_type("Image/JPEG; charset=binary"),
            Some(ImageFormat::Jpeg)
        );
    }

    #[test]
    fn test_unsupported_content_types() {
        assert_eq!(ImageFormat::from_content_type("text/html; charset=utf-8"), None);
        assert_eq!(ImageFormat::from_content_type("image/webp"), None);
        assert_eq!(ImageFormat::from_content_type("image/gif"), None);
        assert_eq!(ImageFormat::from_content_type(""), None);
    }

    #[test]
    fn test_extensions_are_accepted_extensions() {
        for format in [ImageFormat::Png, ImageFormat::Jpeg] {
            assert!(ACCEPTED_EXTENSIONS.contains(&format.extension()));
        }
    }

    #[tokio::test]
    async fn test_from_bytes_yields_body() {
        use futures::StreamExt;

        let cover = FetchedCover::from_bytes(ImageFormat::Png, vec![1, 2, 3], "http://x/a.png");
        let chunks: Vec<_> = cover.body.collect().await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap(), &vec![1, 2, 3]);
    }
}

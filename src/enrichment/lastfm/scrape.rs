//! Artist image extraction from Last.fm profile pages.
//!
//! Last.fm removed artist images from its API, so the image is taken from
//! the profile page markup: the page header is a `div` with class
//! `header-new-background-image` whose inline style sets the artist image as
//! background. This is tied to the site's current markup and URL scheme and
//! is kept in this one module.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

/// Class of the element carrying the artist image.
pub const IMAGE_MARKER_CLASS: &str = "header-new-background-image";

static MARKER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!("div.{}", IMAGE_MARKER_CLASS)).expect("valid marker selector")
});

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*['"]?([^'")]+?)['"]?\s*\)"#).expect("valid url regex")
});

/// Find the artist image URL in a profile page.
///
/// Only the first marker element counts. Returns `None` if it is missing,
/// has no `style` attribute, or the style holds no `url(...)`.
pub fn find_image_url(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let marker = document.select(&MARKER).next()?;
    let style = marker.value().attr("style")?;
    let url = CSS_URL.captures(style)?.get(1)?.as_str().trim();
    (!url.is_empty()).then(|| url.to_string())
}

/// Ask for a bigger, lossless variant of a Last.fm image URL.
///
/// `/ar0/` is the service's "original aspect ratio" size segment, `770x0`
/// the largest rendition it serves; the image CDN converts on extension.
pub fn upgrade_image_url(url: &str) -> String {
    url.replace("/ar0/", "/770x0/").replace(".jpg", ".png")
}

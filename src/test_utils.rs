//! Test utilities and fixtures for artist-cover tests.
//!
//! This module provides item factories and a resolver with the stock
//! templates. HTTP clients are tested against `wiremock` servers.
//!
//! # Example
//!
//! ```ignore
//! use artist_cover::test_utils::{mock_item, test_resolver};
//!
//! #[test]
//! fn test_something() {
//!     let resolver = test_resolver(Path::new("/music"));
//!     let stub = resolver.resolve(&mock_item("Foo", "Foo", "Bar"));
//!     // ... test logic
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::library::Item;
use crate::paths::PathResolver;

/// Creates a mock Item with sensible defaults.
///
/// An empty `album` makes the item a singleton. Customize further using
/// struct update syntax:
///
/// ```ignore
/// let item = Item {
///     compilation: true,
///     ..mock_item("Foo", "Various Artists", "Hits")
/// };
/// ```
pub fn mock_item(artist: &str, album_artist: &str, album: &str) -> Item {
    Item {
        path: PathBuf::from("/music/test.mp3"),
        title: "Test Track".to_string(),
        artist: artist.to_string(),
        album_artist: album_artist.to_string(),
        album: album.to_string(),
        track_number: Some(1),
        disc_number: None,
        year: Some(2023),
        genre: String::new(),
        compilation: false,
    }
}

/// A resolver rooted at `root` with the stock templates and covers named
/// after the artist.
///
/// Release covers land at `<root>/<albumartist>/<albumartist>`, singleton
/// covers at `<root>/Non-Album/<artist>/<artist>`.
pub fn test_resolver(root: &Path) -> PathResolver {
    PathResolver::new(
        root,
        "$albumartist/$album/$track $title",
        "Non-Album/$artist/$title",
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_item_defaults() {
        let item = mock_item("Foo", "Bar", "Baz");
        assert_eq!(item.title, "Test Track");
        assert_eq!(item.artist, "Foo");
        assert_eq!(item.album_artist, "Bar");
        assert!(!item.compilation);
    }

    #[test]
    fn test_resolver_layout() {
        let resolver = test_resolver(Path::new("/music"));
        assert_eq!(
            resolver.resolve(&mock_item("Foo", "Foo", "Bar")),
            PathBuf::from("/music/Foo/Foo")
        );
        assert_eq!(
            resolver.resolve(&mock_item("Foo", "", "")),
            PathBuf::from("/music/Non-Album/Foo/Foo")
        );
    }
}

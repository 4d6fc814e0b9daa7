//! Library items and the interface the cover pipeline needs from them.
//!
//! The pipeline only depends on [`LibraryItem`]; [`Item`] is the concrete
//! implementation backed by audio file tags, gathered by walking the library
//! directory.

mod query;

pub use query::Query;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::paths::template::{self, FieldSource};
use crate::{metadata, scanner};

/// What the cover pipeline needs to know about a library item.
pub trait LibraryItem {
    /// Track artist.
    fn artist(&self) -> &str;

    /// Release artist.
    fn album_artist(&self) -> &str;

    /// Whether the item is a standalone track rather than part of a release.
    fn is_singleton(&self) -> bool;

    /// Whether the item belongs to a various-artists compilation.
    fn is_compilation(&self) -> bool;

    /// Evaluate a path template against this item's metadata.
    fn evaluate_template(&self, template: &str) -> String;

    /// The artist a cover is fetched for: the release artist for release
    /// tracks, the track artist for singletons.
    fn artist_identity(&self) -> &str {
        if self.is_singleton() {
            self.artist()
        } else {
            self.album_artist()
        }
    }
}

/// A track in the library, as read from its tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    /// Empty when the file has no album artist tag
    pub album_artist: String,
    /// Empty for standalone tracks
    pub album: String,
    pub track_number: Option<u32>,
    pub disc_number: Option<u32>,
    pub year: Option<u32>,
    pub genre: String,
    pub compilation: bool,
}

impl Item {
    /// Value of a named field as used in templates and queries.
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "title" => self.title.clone(),
            "artist" => self.artist.clone(),
            "albumartist" => self.album_artist().to_string(),
            "album" => self.album.clone(),
            "track" => self.track_number.map(|n| format!("{:02}", n)).unwrap_or_default(),
            "disc" => self.disc_number.map(|n| format!("{:02}", n)).unwrap_or_default(),
            "year" => self.year.map(|y| y.to_string()).unwrap_or_default(),
            "genre" => self.genre.clone(),
            "comp" => String::from(if self.compilation { "1" } else { "" }),
            "singleton" => String::from(if self.is_singleton() { "1" } else { "" }),
            "path" => self.path.to_string_lossy().into_owned(),
            _ => return None,
        };
        Some(value)
    }
}

impl FieldSource for Item {
    fn field(&self, name: &str) -> Option<String> {
        Item::field(self, name)
    }
}

impl LibraryItem for Item {
    fn artist(&self) -> &str {
        &self.artist
    }

    /// Falls back to the track artist when no album artist is tagged.
    fn album_artist(&self) -> &str {
        if self.album_artist.is_empty() {
            &self.artist
        } else {
            &self.album_artist
        }
    }

    fn is_singleton(&self) -> bool {
        self.album.is_empty()
    }

    fn is_compilation(&self) -> bool {
        self.compilation
    }

    fn evaluate_template(&self, template: &str) -> String {
        template::evaluate(template, self)
    }
}

/// Read every audio file below `root` and keep the items matching `query`.
///
/// Files whose tags cannot be read are skipped with a warning. Items come
/// back in path order.
pub fn load_items(root: &Path, query: &Query) -> Result<Vec<Item>> {
    if !root.is_dir() {
        return Err(Error::LibraryNotFound(root.to_path_buf()));
    }

    let mut items = Vec::new();
    let mut skipped = 0usize;
    for path in scanner::audio_files(root) {
        match metadata::read(&path) {
            Ok(item) if query.matches(&item) => items.push(item),
            Ok(_) => {}
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                skipped += 1;
            }
        }
    }

    debug!(
        "Loaded {} items from {:?} ({} unreadable)",
        items.len(),
        root,
        skipped
    );
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_item;
    use tempfile::TempDir;

    #[test]
    fn test_identity_for_release_item() {
        let item = mock_item("Feat Artist", "Main Artist", "Album");
        assert!(!item.is_singleton());
        assert_eq!(item.artist_identity(), "Main Artist");
    }

    #[test]
    fn test_identity_for_singleton() {
        let item = mock_item("Solo", "Ignored", "");
        assert!(item.is_singleton());
        assert_eq!(item.artist_identity(), "Solo");
    }

    #[test]
    fn test_album_artist_falls_back_to_artist() {
        let item = mock_item("Foo", "", "Album");
        assert_eq!(item.album_artist(), "Foo");
        assert_eq!(item.field("albumartist").as_deref(), Some("Foo"));
    }

    #[test]
    fn test_template_fields() {
        let item = Item {
            track_number: Some(3),
            year: Some(1999),
            title: "Song".to_string(),
            ..mock_item("Foo", "Foo", "Bar")
        };
        assert_eq!(
            item.evaluate_template("$albumartist/$year - $album/$track $title"),
            "Foo/1999 - Bar/03 Song"
        );
        assert_eq!(item.field("nonexistent"), None);
    }

    #[test]
    fn test_load_items_missing_library() {
        let temp = TempDir::new().unwrap();
        let err = load_items(&temp.path().join("nope"), &Query::default()).unwrap_err();
        assert!(matches!(err, Error::LibraryNotFound(_)));
    }

    #[test]
    fn test_load_items_skips_unreadable_files() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("broken.mp3"), b"not really audio").unwrap();
        std::fs::write(temp.path().join("notes.txt"), b"ignored").unwrap();

        let items = load_items(temp.path(), &Query::default()).unwrap();
        assert!(items.is_empty());
    }
}

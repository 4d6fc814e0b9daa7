//! Audio file tag reading.
//!
//! Uses the lofty crate for format-independent metadata access, turning the
//! tags of MP3, FLAC, OGG, Opus, M4A and WAV files into library [`Item`]s.

use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag};
use std::borrow::Cow;
use std::path::Path;

use crate::error::{Error, Result};
use crate::library::Item;

/// Read the tags of an audio file.
///
/// Missing tags become empty fields; a file without an album tag is a
/// standalone track.
pub fn read(path: &Path) -> Result<Item> {
    // Detect the file format and read its tags
    let tagged_file = Probe::open(path)
        .map_err(|e| Error::metadata(path, format!("failed to open: {}", e)))?
        .read()
        .map_err(|e| Error::metadata(path, format!("failed to read tags: {}", e)))?;

    // Get the primary tag, or fall back to the first available tag
    let Some(tag) = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
    else {
        return Ok(Item {
            path: path.to_path_buf(),
            ..Default::default()
        });
    };

    Ok(item_from_tag(path, tag))
}

fn item_from_tag(path: &Path, tag: &Tag) -> Item {
    let album_artist = tag
        .get_string(&ItemKey::AlbumArtist)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    Item {
        path: path.to_path_buf(),
        title: text(tag.title()),
        artist: text(tag.artist()),
        album_artist,
        album: text(tag.album()),
        track_number: tag.track(),
        disc_number: tag.disk(),
        year: tag.year(),
        genre: text(tag.genre()),
        compilation: tag
            .get_string(&ItemKey::FlagCompilation)
            .is_some_and(is_set_flag),
    }
}

fn text(value: Option<Cow<'_, str>>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn is_set_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

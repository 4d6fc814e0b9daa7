//! Cover path resolution.
//!
//! Turns an item's metadata and the library's path templates into a cover
//! path *stub*: an absolute path without file extension. The extension is
//! only known once a cover has been fetched (or found on disk).
//!
//! # Example
//!
//! With the release template `$albumartist/$album/$track $title`, the stub
//! for a track by "Foo" is `<library>/Foo/Foo`: the template is cut back to
//! the directory that introduces the artist, and the cover is named after the
//! artist unless a cover filename is configured.

pub mod template;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::library::LibraryItem;

/// Marker of the artist level in release templates.
pub const ALBUM_ARTIST_MARKER: &str = "$albumartist";

/// Marker of the artist level in singleton templates.
pub const ARTIST_MARKER: &str = "$artist";

/// Resolves the cover path stub of library items.
///
/// Templates are stripped once at construction; [`resolve`](Self::resolve)
/// is a pure function of the item afterwards.
#[derive(Debug, Clone)]
pub struct PathResolver {
    library_dir: PathBuf,
    release_template: String,
    singleton_template: String,
    cover_name: Option<String>,
}

impl PathResolver {
    pub fn new(
        library_dir: impl Into<PathBuf>,
        release_template: &str,
        singleton_template: &str,
        cover_name: Option<&str>,
    ) -> Self {
        Self {
            library_dir: library_dir.into(),
            release_template: strip_template_suffix(release_template, ALBUM_ARTIST_MARKER),
            singleton_template: strip_template_suffix(singleton_template, ARTIST_MARKER),
            cover_name: cover_name.map(str::to_string),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.library_dir(),
            &config.paths.default,
            &config.paths.singleton,
            config.cover.filename(),
        )
    }

    /// The stripped release template.
    pub fn release_template(&self) -> &str {
        &self.release_template
    }

    /// The stripped singleton template.
    pub fn singleton_template(&self) -> &str {
        &self.singleton_template
    }

    /// Cover path stub for `item`.
    pub fn resolve(&self, item: &impl LibraryItem) -> PathBuf {
        let template = if item.is_singleton() {
            &self.singleton_template
        } else {
            &self.release_template
        };

        let folder = item.evaluate_template(template);
        let cover_name = self
            .cover_name
            .as_deref()
            .unwrap_or_else(|| item.artist_identity());

        let mut stub = self.library_dir.join(sanitize_path(&folder));
        stub.push(sanitize_component(cover_name));
        stub
    }
}

/// Cut a path template back to the directory level that introduces the
/// artist.
///
/// The filename segment is always dropped. If `marker` (or its braced form,
/// `${name}`) occurs in the remaining directory part, everything after the
/// path segment holding its last occurrence is dropped as well.
///
/// ```ignore
/// assert_eq!(
///     strip_template_suffix("A/B/$albumartist/C/$title", "$albumartist"),
///     "A/B/$albumartist",
/// );
/// ```
pub fn strip_template_suffix(template: &str, marker: &str) -> String {
    let folder = match template.rfind('/') {
        Some(i) => &template[..i],
        None => "",
    };

    let braced = format!("${{{}}}", marker.trim_start_matches('$'));
    let index = [folder.rfind(marker), folder.rfind(braced.as_str())]
        .into_iter()
        .flatten()
        .max();

    let Some(index) = index else {
        return folder.to_string();
    };

    match folder[index..].find('/') {
        Some(offset) => folder[..index + offset].to_string(),
        None => folder.to_string(),
    }
}

/// Replace characters that are illegal or troublesome in a single path
/// component.
pub fn sanitize_component(name: &str) -> String {
    let mut out: String = name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect();

    out.truncate(out.trim_end().len());
    if out.starts_with('.') {
        out.replace_range(..1, "_");
    }
    if out.ends_with('.') {
        let last = out.len() - 1;
        out.replace_range(last.., "_");
    }
    out
}

/// Sanitize every `/`-separated component of a relative path.
///
/// Empty components are dropped and the result is always relative, so it
/// cannot escape the directory it is joined to.
pub fn sanitize_path(path: &str) -> PathBuf {
    path.split('/')
        .map(sanitize_component)
        .filter(|c| !c.is_empty())
        .collect()
}

/// `stub` with `.ext` appended.
///
/// Unlike [`Path::with_extension`] this never replaces part of the stub:
/// artist names such as `Mr. Oizo` contain dots.
pub fn with_extension(stub: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(stub.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

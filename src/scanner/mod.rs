use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Audio file extensions picked up by the scan (compared lowercase).
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "opus", "wav", "m4a"];

/// Walks the given root directory recursively for audio files.
///
/// Extensions are matched case-insensitively. Entries are visited in file
/// name order so repeated runs see items in the same order.
pub fn audio_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_audio_file(path))
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

//! Grouping of library items into per-artist cover records.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::trace;

use crate::library::LibraryItem;
use crate::paths::PathResolver;

/// Every cover location known for one artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRecord {
    /// Artist name, compared case-sensitively
    pub name: String,
    /// Extension-less cover paths
    pub stubs: BTreeSet<PathBuf>,
}

impl ArtistRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stubs: BTreeSet::new(),
        }
    }

    pub fn add_stub(&mut self, stub: PathBuf) {
        self.stubs.insert(stub);
    }
}

/// Group items into artist records, sorted by artist name.
///
/// Compilation items are skipped: a various-artists release has no single
/// artist to fetch a cover for.
pub fn group<'a, I>(items: impl IntoIterator<Item = &'a I>, resolver: &PathResolver) -> Vec<ArtistRecord>
where
    I: LibraryItem + 'a,
{
    let mut records: BTreeMap<String, ArtistRecord> = BTreeMap::new();

    for item in items {
        if item.is_compilation() {
            continue;
        }

        let name = item.artist_identity();
        let stub = resolver.resolve(item);
        trace!("{} -> {:?}", name, stub);

        records
            .entry(name.to_string())
            .or_insert_with(|| ArtistRecord::new(name))
            .add_stub(stub);
    }

    records.into_values().collect()
}

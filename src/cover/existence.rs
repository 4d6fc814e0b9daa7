//! Existence checks for cover stubs and the fetch decision built on them.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::warn;

use super::ArtistRecord;
use crate::paths::with_extension;

/// Which stubs already have a cover on disk.
///
/// Every scanned stub is in exactly one of `present` and `missing`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Stub -> every accepted extension with an existing file
    pub present: BTreeMap<PathBuf, Vec<String>>,
    /// Stubs without any cover file
    pub missing: BTreeSet<PathBuf>,
}

/// Classify `stubs` by whether `<stub>.<ext>` is a file for any of
/// `extensions`.
///
/// Only file metadata is consulted; covers are never opened.
pub fn scan<'a>(stubs: impl IntoIterator<Item = &'a PathBuf>, extensions: &[&str]) -> ScanReport {
    let mut report = ScanReport::default();

    for stub in stubs {
        let found: Vec<String> = extensions
            .iter()
            .filter(|ext| with_extension(stub, ext).is_file())
            .map(|ext| ext.to_string())
            .collect();

        if found.is_empty() {
            report.missing.insert(stub.clone());
            continue;
        }

        if found.len() > 1 {
            warn!("Multiple covers at {:?}: {}", stub, found.join(", "));
        }
        report.present.insert(stub.clone(), found);
    }

    report
}

/// Cover state of an artist across all of its stubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverStatus {
    /// No stub has a cover
    Absent,
    /// Every stub has a cover
    Complete,
    /// Some stubs have a cover, some don't
    Partial,
}

/// What to do for an artist after scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Leave the existing covers alone
    Skip(CoverStatus),
    /// Fetch a cover and write it to `targets`
    Fetch { targets: Vec<PathBuf> },
}

/// An artist record together with the result of scanning its stubs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedArtist {
    record: ArtistRecord,
    report: ScanReport,
}

impl ScannedArtist {
    /// Scan the stubs of `record`.
    pub fn scan(record: ArtistRecord, extensions: &[&str]) -> Self {
        let report = scan(&record.stubs, extensions);
        Self { record, report }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn record(&self) -> &ArtistRecord {
        &self.record
    }

    pub fn report(&self) -> &ScanReport {
        &self.report
    }

    /// Stubs with no cover on disk (always a subset of the record's stubs).
    pub fn missing(&self) -> &BTreeSet<PathBuf> {
        &self.report.missing
    }

    pub fn status(&self) -> CoverStatus {
        match (self.report.present.is_empty(), self.report.missing.is_empty()) {
            (true, _) => CoverStatus::Absent,
            (false, true) => CoverStatus::Complete,
            (false, false) => CoverStatus::Partial,
        }
    }

    /// Decide whether a cover must be fetched, and where it goes.
    ///
    /// Forcing rewrites every stub. Otherwise only an artist without any
    /// cover is fetched. A partial set of covers is left as it is; filling in
    /// the gaps would need a decision about which cover is the right one.
    pub fn decide(&self, force: bool) -> Decision {
        if force {
            return Decision::Fetch {
                targets: self.record.stubs.iter().cloned().collect(),
            };
        }

        match self.status() {
            CoverStatus::Absent => Decision::Fetch {
                targets: self.report.missing.iter().cloned().collect(),
            },
            CoverStatus::Partial => {
                warn!(
                    "{}: {} of {} covers missing, leaving existing covers alone",
                    self.name(),
                    self.report.missing.len(),
                    self.record.stubs.len()
                );
                Decision::Skip(CoverStatus::Partial)
            }
            status => Decision::Skip(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cover::ACCEPTED_EXTENSIONS;
    use std::fs;
    use tempfile::TempDir;

    fn record(name: &str, stubs: &[PathBuf]) -> ArtistRecord {
        let mut record = ArtistRecord::new(name);
        for stub in stubs {
            record.add_stub(stub.clone());
        }
        record
    }

    #[test]
    fn test_scan_present_and_missing() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::write(temp.path().join("a.png"), b"png").unwrap();

        let report = scan(&[a.clone(), b.clone()], &["png", "jpg"]);

        assert_eq!(report.present.len(), 1);
        assert_eq!(report.present[&a], vec!["png".to_string()]);
        assert_eq!(report.missing, BTreeSet::from([b]));
    }

    #[test]
    fn test_scan_records_every_matching_extension() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        fs::write(temp.path().join("a.png"), b"png").unwrap();
        fs::write(temp.path().join("a.jpg"), b"jpg").unwrap();

        let report = scan(&[a.clone()], ACCEPTED_EXTENSIONS);
        assert_eq!(report.present[&a], vec!["png".to_string(), "jpg".to_string()]);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_directory_is_not_a_cover() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        fs::create_dir(temp.path().join("a.png")).unwrap();

        let report = scan(&[a.clone()], ACCEPTED_EXTENSIONS);
        assert!(report.missing.contains(&a));
    }

    #[test]
    fn test_status_and_decision_absent() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let scanned = ScannedArtist::scan(record("A", &[a.clone()]), ACCEPTED_EXTENSIONS);

        assert_eq!(scanned.status(), CoverStatus::Absent);
        assert_eq!(scanned.decide(false), Decision::Fetch { targets: vec![a] });
    }

    #[test]
    fn test_status_and_decision_complete() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        fs::write(temp.path().join("a.jpg"), b"jpg").unwrap();
        let scanned = ScannedArtist::scan(record("A", &[a.clone()]), ACCEPTED_EXTENSIONS);

        assert_eq!(scanned.status(), CoverStatus::Complete);
        assert_eq!(scanned.decide(false), Decision::Skip(CoverStatus::Complete));
        assert_eq!(scanned.decide(true), Decision::Fetch { targets: vec![a] });
    }

    #[test]
    fn test_partial_is_skipped_unless_forced() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::write(temp.path().join("a.png"), b"png").unwrap();
        let scanned = ScannedArtist::scan(record("A", &[a.clone(), b.clone()]), ACCEPTED_EXTENSIONS);

        assert_eq!(scanned.status(), CoverStatus::Partial);
        assert_eq!(scanned.missing(), &BTreeSet::from([b.clone()]));
        assert_eq!(scanned.decide(false), Decision::Skip(CoverStatus::Partial));
        assert_eq!(scanned.decide(true), Decision::Fetch { targets: vec![a, b] });
    }
}

/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    proptest! {
        /// Every stub lands in exactly one of present/missing
        #[test]
        fn classification_is_exhaustive_and_exclusive(
            existing in prop::collection::vec((0usize..8, prop::sample::select(vec!["png", "jpg"])), 0..10),
        ) {
            let temp = TempDir::new().unwrap();
            let stubs: Vec<PathBuf> = (0..8).map(|i| temp.path().join(format!("s{}", i))).collect();
            for (i, ext) in &existing {
                std::fs::write(with_extension(&stubs[*i], ext), b"x").unwrap();
            }

            let report = scan(&stubs, &["png", "jpg"]);
            prop_assert_eq!(report.present.len() + report.missing.len(), stubs.len());
            for stub in &stubs {
                prop_assert!(report.present.contains_key(stub) != report.missing.contains(stub));
            }
        }
    }
}

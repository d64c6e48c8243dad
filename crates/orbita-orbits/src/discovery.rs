//! Orbit discovery from search paths.
//!
//! Discovery is a pure read: it scans an ordered list of directories for
//! subdirectories containing `orbit.json`, validates each manifest, and
//! returns `(path, manifest)` pairs. It never touches the registry — the
//! caller registers what it wants explicitly.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::OrbitError;
use crate::manifest::{MANIFEST_FILE_NAME, OrbitManifest};

/// A candidate orbit produced by discovery.
#[derive(Debug, Clone)]
pub struct DiscoveredOrbit {
    /// The orbit's directory (the one containing `orbit.json`).
    pub path: PathBuf,
    /// The validated manifest.
    pub manifest: OrbitManifest,
}

/// A problem encountered during discovery.
///
/// Only the error-collecting variant reports these; the simple variant
/// skips silently.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// A later path or directory carries an id already discovered.
    /// First-found wins; the duplicate is dropped.
    #[error("duplicate orbit id {orbit_id} at {}", path.display())]
    DuplicateId {
        /// The colliding id.
        orbit_id: String,
        /// Where the dropped duplicate lives.
        path: PathBuf,
    },

    /// A manifest failed to load or validate.
    #[error("invalid manifest at {}: {source}", path.display())]
    InvalidManifest {
        /// The orbit directory with the bad manifest.
        path: PathBuf,
        /// The underlying manifest error.
        source: OrbitError,
    },

    /// A search path exists but is not a directory.
    ///
    /// A *missing* search path is fine and skipped; a file where a
    /// directory should be is a configuration mistake worth reporting.
    #[error("search path is not a directory: {}", path.display())]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },
}

/// Discover orbits across the search paths, in order.
///
/// Duplicate ids are deduplicated first-found-wins; problems are skipped
/// silently. Use [`discover_with_errors`] to see what was dropped.
#[must_use]
pub fn discover(search_paths: &[PathBuf]) -> Vec<DiscoveredOrbit> {
    discover_with_errors(search_paths).0
}

/// Discover orbits across the search paths, collecting every problem.
///
/// Behavior per path, in order:
/// - missing path: skipped, not an error
/// - path that is not a directory: [`DiscoveryError::NotADirectory`]
/// - each subdirectory containing `orbit.json` is a candidate; entries are
///   visited in name order for determinism
/// - invalid manifests: [`DiscoveryError::InvalidManifest`], scan continues
/// - colliding ids: first found wins, later ones recorded as
///   [`DiscoveryError::DuplicateId`]
#[must_use]
pub fn discover_with_errors(
    search_paths: &[PathBuf],
) -> (Vec<DiscoveredOrbit>, Vec<DiscoveryError>) {
    let mut discovered = Vec::new();
    let mut errors = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for search_path in search_paths {
        if !search_path.exists() {
            debug!(path = %search_path.display(), "Search path missing, skipping");
            continue;
        }
        if !search_path.is_dir() {
            warn!(path = %search_path.display(), "Search path is not a directory");
            errors.push(DiscoveryError::NotADirectory {
                path: search_path.clone(),
            });
            continue;
        }

        scan_directory(search_path, &mut discovered, &mut errors, &mut seen_ids);
    }

    info!(
        count = discovered.len(),
        errors = errors.len(),
        "Orbit discovery finished"
    );
    (discovered, errors)
}

fn scan_directory(
    dir: &Path,
    discovered: &mut Vec<DiscoveredOrbit>,
    errors: &mut Vec<DiscoveryError>,
    seen_ids: &mut HashSet<String>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Failed to read search path");
            return;
        },
    };

    // Sort by name so discovery order (and therefore dedup outcome within
    // one search path) is deterministic across filesystems.
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    candidates.sort_unstable();

    for orbit_dir in candidates {
        let manifest_path = orbit_dir.join(MANIFEST_FILE_NAME);
        if !manifest_path.exists() {
            continue;
        }

        match OrbitManifest::load(&manifest_path) {
            Ok(manifest) => {
                if seen_ids.contains(&manifest.id) {
                    debug!(
                        orbit_id = %manifest.id,
                        path = %orbit_dir.display(),
                        "Duplicate orbit id, first found wins"
                    );
                    errors.push(DiscoveryError::DuplicateId {
                        orbit_id: manifest.id,
                        path: orbit_dir,
                    });
                    continue;
                }
                debug!(
                    orbit_id = %manifest.id,
                    path = %orbit_dir.display(),
                    "Discovered orbit"
                );
                seen_ids.insert(manifest.id.clone());
                discovered.push(DiscoveredOrbit {
                    path: orbit_dir,
                    manifest,
                });
            },
            Err(e) => {
                warn!(path = %manifest_path.display(), error = %e, "Invalid orbit manifest");
                errors.push(DiscoveryError::InvalidManifest {
                    path: orbit_dir,
                    source: e,
                });
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(dir: &Path, orbit_name: &str, id: &str) -> PathBuf {
        let orbit_dir = dir.join(orbit_name);
        std::fs::create_dir_all(&orbit_dir).unwrap();
        let manifest = format!(
            r#"{{"id": "{id}", "name": "Test", "version": "1.0.0", "type": "orbit"}}"#
        );
        std::fs::write(orbit_dir.join(MANIFEST_FILE_NAME), manifest).unwrap();
        orbit_dir
    }

    #[test]
    fn discovers_orbits_in_subdirectories() {
        let root = tempfile::tempdir().unwrap();
        write_manifest(root.path(), "pomodoro", "acme.pomodoro");
        write_manifest(root.path(), "wellness", "acme.wellness");
        // A subdirectory without a manifest is not a candidate.
        std::fs::create_dir_all(root.path().join("not-an-orbit")).unwrap();

        let (found, errors) = discover_with_errors(&[root.path().to_path_buf()]);
        assert_eq!(found.len(), 2);
        assert!(errors.is_empty());

        let ids: Vec<&str> = found.iter().map(|d| d.manifest.id.as_str()).collect();
        assert_eq!(ids, vec!["acme.pomodoro", "acme.wellness"]);
    }

    #[test]
    fn missing_search_path_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("does-not-exist");

        let (found, errors) = discover_with_errors(&[missing]);
        assert!(found.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn non_directory_search_path_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let file_path = root.path().join("a-file");
        std::fs::write(&file_path, "not a directory").unwrap();

        let (found, errors) = discover_with_errors(&[file_path]);
        assert!(found.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], DiscoveryError::NotADirectory { .. }));
    }

    #[test]
    fn duplicate_id_across_paths_first_path_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let first_dir = write_manifest(first.path(), "pomodoro", "acme.pomodoro");
        write_manifest(second.path(), "pomodoro-fork", "acme.pomodoro");

        let (found, errors) = discover_with_errors(&[
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, first_dir);
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            DiscoveryError::DuplicateId { orbit_id, .. } => {
                assert_eq!(orbit_id, "acme.pomodoro");
            },
            other => panic!("expected DuplicateId, got {other:?}"),
        }
    }

    #[test]
    fn simple_variant_drops_duplicates_silently() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_manifest(first.path(), "pomodoro", "acme.pomodoro");
        write_manifest(second.path(), "pomodoro", "acme.pomodoro");

        let found = discover(&[first.path().to_path_buf(), second.path().to_path_buf()]);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn invalid_manifest_is_reported_and_scan_continues() {
        let root = tempfile::tempdir().unwrap();
        let bad_dir = root.path().join("broken");
        std::fs::create_dir_all(&bad_dir).unwrap();
        std::fs::write(bad_dir.join(MANIFEST_FILE_NAME), "{ nope").unwrap();
        write_manifest(root.path(), "pomodoro", "acme.pomodoro");

        let (found, errors) = discover_with_errors(&[root.path().to_path_buf()]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].manifest.id, "acme.pomodoro");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], DiscoveryError::InvalidManifest { .. }));
    }

    #[test]
    fn directory_order_is_deterministic() {
        let root = tempfile::tempdir().unwrap();
        write_manifest(root.path(), "zz-later", "acme.zz");
        write_manifest(root.path(), "aa-earlier", "acme.aa");

        let found = discover(&[root.path().to_path_buf()]);
        let ids: Vec<&str> = found.iter().map(|d| d.manifest.id.as_str()).collect();
        assert_eq!(ids, vec!["acme.aa", "acme.zz"]);
    }
}

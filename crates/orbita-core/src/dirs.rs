//! Standard orbit search path resolution.
//!
//! Orbits are discovered from an ordered list of directories:
//!
//! 1. Every entry of `$ORBITA_ORBIT_PATH` (when set, prepended in order)
//! 2. `~/.orbita/orbits` (per-user installs)
//! 3. `/usr/local/share/orbita/orbits` (system-wide installs)
//!
//! Earlier paths win when two directories carry the same orbit id.

use std::path::PathBuf;

use directories::BaseDirs;

/// Environment variable holding extra orbit search paths.
///
/// Uses the platform path-list separator (`:` on Unix).
pub const ORBIT_PATH_ENV: &str = "ORBITA_ORBIT_PATH";

/// System-wide orbit install directory.
pub const SYSTEM_ORBITS_DIR: &str = "/usr/local/share/orbita/orbits";

/// The per-user orbit install directory (`~/.orbita/orbits`).
///
/// Returns `None` when no home directory can be resolved (e.g. stripped-down
/// service environments).
#[must_use]
pub fn user_orbits_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".orbita").join("orbits"))
}

/// The default ordered orbit search path list.
///
/// Paths are returned whether or not they exist; discovery skips missing
/// directories.
#[must_use]
pub fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_paths) = std::env::var(ORBIT_PATH_ENV) {
        paths.extend(std::env::split_paths(&env_paths));
    }
    if let Some(user_dir) = user_orbits_dir() {
        paths.push(user_dir);
    }
    paths.push(PathBuf::from(SYSTEM_ORBITS_DIR));

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_dir_is_last() {
        let paths = default_search_paths();
        assert_eq!(
            paths.last().map(PathBuf::as_path),
            Some(std::path::Path::new(SYSTEM_ORBITS_DIR))
        );
    }

    #[test]
    fn user_dir_ends_with_orbits() {
        if let Some(dir) = user_orbits_dir() {
            assert!(dir.ends_with(".orbita/orbits"));
        }
    }
}

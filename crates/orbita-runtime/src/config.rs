//! Runtime configuration.

use std::path::PathBuf;

use orbita_core::dirs::default_search_paths;

/// The host API version orbits compile against.
///
/// Manifests may declare `min_api_version`; discovery refuses orbits that
/// need a newer host.
pub const API_VERSION: &str = "1.0.0";

/// Configuration the host hands the runtime at construction time.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Ordered orbit search paths. Earlier paths win on id collisions.
    pub search_paths: Vec<PathBuf>,
    /// The API version advertised to orbits.
    pub api_version: semver::Version,
}

impl RuntimeConfig {
    /// The default configuration: standard search paths
    /// (`$ORBITA_ORBIT_PATH` → `~/.orbita/orbits` →
    /// `/usr/local/share/orbita/orbits`) and the current API version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            search_paths: default_search_paths(),
            api_version: current_api_version(),
        }
    }

    /// Override the search paths (tests, embedded hosts).
    #[must_use]
    pub fn with_search_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths: paths,
            api_version: current_api_version(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn current_api_version() -> semver::Version {
    semver::Version::parse(API_VERSION).unwrap_or_else(|_| semver::Version::new(1, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_version_constant_parses() {
        assert_eq!(current_api_version().to_string(), API_VERSION);
    }

    #[test]
    fn with_search_paths_overrides() {
        let config = RuntimeConfig::with_search_paths(vec![PathBuf::from("/tmp/orbits")]);
        assert_eq!(config.search_paths, vec![PathBuf::from("/tmp/orbits")]);
    }
}

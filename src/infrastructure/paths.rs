//! Storage locations.
//!
//! The data directory holds `catalog.json` and `favorites.json`. It resolves,
//! in order, to the `NGO_DISCOVERY_DATA_DIR` environment variable, the
//! platform data directory (e.g. `~/.local/share/ngo-discovery` on Linux),
//! and finally `./ngo-discovery-data`.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "NGO_DISCOVERY_DATA_DIR";

const DATA_DIR_FALLBACK: &str = "./ngo-discovery-data";
const CATALOG_FILE: &str = "catalog.json";
const FAVORITES_FILE: &str = "favorites.json";

/// Returns the directory catalog and favorites files live in by default.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(expand_tilde(&dir));
        }
    }

    ProjectDirs::from("org", "ngo-discovery", "ngo-discovery")
        .map_or_else(|| PathBuf::from(DATA_DIR_FALLBACK), |dirs| dirs.data_dir().to_path_buf())
}

#[must_use]
pub fn default_catalog_path() -> PathBuf {
    data_dir().join(CATALOG_FILE)
}

#[must_use]
pub fn default_favorites_path() -> PathBuf {
    data_dir().join(FAVORITES_FILE)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when no home directory can be
/// determined, are returned unchanged.
///
/// ```
/// use ngo_discovery::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// assert_eq!(expand_tilde("relative/~"), "relative/~");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(base) = BaseDirs::new() else {
        return path.to_string();
    };
    let home = base.home_dir().to_string_lossy();

    if path == "~" {
        home.into_owned()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}

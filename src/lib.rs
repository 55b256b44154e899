//! NGO discovery engine.
//!
//! Lets a donor narrow a catalog of non-governmental organizations by free-text
//! query, distance radius, category, verification status and need urgency,
//! ranks the result by distance, and reveals it through an infinite-scroll
//! window. Favorites are toggled optimistically and rolled back when
//! persistence fails.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs) / Runtime (runtime/)                 │  ← Virtual clock
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Reducer
//! │  - Event handling, debounce                         │
//! │  - Action emission                                  │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Discovery     │   │ Worker        │   │ UI            │
//! │ (discovery/)  │   │ (worker/)     │   │ (ui/)         │
//! │ - Filter/rank │   │ - Storage I/O │   │ - View models │
//! │ - Pagination  │   │ - Trace ctx   │   │ - Text render │
//! │ - Favorites   │   └───────────────┘   └───────────────┘
//! └───────────────┘           │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage (storage/), Domain (domain/),              │
//! │  Infrastructure (infrastructure/)                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use ngo_discovery::app::Event;
//! use ngo_discovery::domain::{Category, OrganizationRecord, Radius};
//! use ngo_discovery::runtime::Runtime;
//! use ngo_discovery::storage::MemoryStorage;
//! use ngo_discovery::worker::DiscoveryWorker;
//! use ngo_discovery::{initialize, Config};
//!
//! let storage = MemoryStorage::with_catalog(vec![
//!     OrganizationRecord::new("a", "Harbor Clinic", Category::Healthcare).with_distance(1.2),
//!     OrganizationRecord::new("b", "Hill Clinic", Category::Healthcare).with_distance(12.0),
//! ]);
//! let config = Config::default();
//! let mut runtime = Runtime::new(initialize(&config), DiscoveryWorker::new(storage));
//!
//! runtime.dispatch(Event::Refresh)?;
//! runtime.dispatch(Event::RadiusSelected(Radius::Km(5.0)))?;
//! runtime.settle()?;
//!
//! let names: Vec<_> = runtime.state().window().iter().map(|r| r.name.as_str()).collect();
//! assert_eq!(names, ["Harbor Clinic"]);
//! # Ok::<(), ngo_discovery::DiscoveryError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod discovery;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod runtime;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{DiscoveryError, FilterCriteria, OrganizationRecord, Radius, Result};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Engine configuration.
///
/// Loaded from a TOML file ([`Config::load`]) or a flat string map
/// ([`Config::from_map`]); CLI flags override either.
///
/// ```toml
/// page_size = 6
/// debounce_ms = 300
/// page_load_delay_ms = 1000
/// default_radius_km = 25.0
/// catalog_path = "~/ngo/catalog.json"
/// trace_level = "debug"
/// trace_file = "/tmp/ngo-traces.json"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Records revealed per page. Default: 6
    pub page_size: usize,

    /// Quiet period before a typed query commits. Default: 300
    pub debounce_ms: u64,

    /// Delay before a requested page is delivered. Default: 1000
    pub page_load_delay_ms: u64,

    /// Simulated latency of each worker round trip. Default: 0
    pub worker_latency_ms: u64,

    /// Radius installed at start and restored by clear-all. `None` is unbounded.
    pub default_radius_km: Option<f64>,

    /// Catalog JSON file. Default: `<data dir>/catalog.json`
    pub catalog_path: Option<PathBuf>,

    /// Favorites JSON file. Default: `<data dir>/favorites.json`
    pub favorites_path: Option<PathBuf>,

    /// `trace`, `debug`, `info`, `warn` or `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Enables span export to this file when set.
    pub trace_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: discovery::DEFAULT_PAGE_SIZE,
            debounce_ms: app::DEFAULT_DEBOUNCE_MS,
            page_load_delay_ms: app::state::DEFAULT_PAGE_LOAD_DELAY_MS,
            worker_latency_ms: 0,
            default_radius_km: None,
            catalog_path: None,
            favorites_path: None,
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Parses configuration from a flat key/value map.
    ///
    /// Unparseable numbers fall back to their defaults; unknown keys are
    /// ignored. `default_radius_km` accepts anything [`Radius::parse`] does.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use ngo_discovery::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "10".to_string());
    /// map.insert("debounce_ms".to_string(), "fast".to_string());
    /// map.insert("default_radius_km".to_string(), "25km".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 10);
    /// assert_eq!(config.debounce_ms, 300);
    /// assert_eq!(config.default_radius_km, Some(25.0));
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        fn number<T: std::str::FromStr>(map: &BTreeMap<String, String>, key: &str, default: T) -> T {
            map.get(key).and_then(|s| s.trim().parse().ok()).unwrap_or(default)
        }
        fn text(map: &BTreeMap<String, String>, key: &str) -> Option<String> {
            map.get(key).map(|s| s.trim()).filter(|s| !s.is_empty()).map(String::from)
        }

        let defaults = Self::default();
        let default_radius_km = map.get("default_radius_km").and_then(|s| match Radius::parse(s) {
            Some(Radius::Km(km)) => Some(km),
            _ => None,
        });

        Self {
            page_size: number(map, "page_size", defaults.page_size),
            debounce_ms: number(map, "debounce_ms", defaults.debounce_ms),
            page_load_delay_ms: number(map, "page_load_delay_ms", defaults.page_load_delay_ms),
            worker_latency_ms: number(map, "worker_latency_ms", defaults.worker_latency_ms),
            default_radius_km,
            catalog_path: text(map, "catalog_path").map(PathBuf::from),
            favorites_path: text(map, "favorites_path").map(PathBuf::from),
            trace_level: text(map, "trace_level"),
            trace_file: text(map, "trace_file").map(PathBuf::from),
        }
        .normalized()
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Config`] for malformed TOML, unknown keys or
    /// mistyped values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map(Self::normalized)
            .map_err(|e| DiscoveryError::Config(e.to_string()))
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Io`] if the file cannot be read and
    /// [`DiscoveryError::Config`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Self::from_toml_str(&content)
    }

    /// Clamps out-of-range values and expands `~` in paths.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.page_size = self.page_size.max(1);
        self.default_radius_km = self.default_radius_km.filter(|km| km.is_finite() && *km >= 0.0);
        for path in [&mut self.catalog_path, &mut self.favorites_path, &mut self.trace_file]
            .into_iter()
            .flatten()
        {
            let expanded = infrastructure::expand_tilde(&path.to_string_lossy());
            *path = PathBuf::from(expanded);
        }
        self
    }

    /// Radius restored by clear-all.
    #[must_use]
    pub fn default_radius(&self) -> Radius {
        self.default_radius_km.map_or(Radius::Unbounded, Radius::Km)
    }

    /// Configured catalog path, or the data-directory default.
    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.catalog_path
            .clone()
            .unwrap_or_else(infrastructure::default_catalog_path)
    }

    /// Configured favorites path, or the data-directory default.
    #[must_use]
    pub fn favorites_path(&self) -> PathBuf {
        self.favorites_path
            .clone()
            .unwrap_or_else(infrastructure::default_favorites_path)
    }
}

/// Builds the reducer described by `config`.
///
/// The state starts in its loading phase; dispatch [`Event::Refresh`] to
/// request the first catalog snapshot.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(
        page_size = config.page_size,
        debounce_ms = config.debounce_ms,
        radius = %config.default_radius(),
        "initializing discovery state"
    );

    AppState::new(config.page_size, config.debounce_ms)
        .with_page_load_delay(config.page_load_delay_ms)
        .with_default_criteria(FilterCriteria::default().with_radius(config.default_radius()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_defaults() {
        let config = Config::from_toml_str(
            r#"
            page_size = 0
            default_radius_km = 10.0
            trace_level = "debug"
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.page_size, 1);
        assert_eq!(config.default_radius(), Radius::Km(10.0));
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn toml_rejects_unknown_keys_and_bad_types() {
        assert!(matches!(
            Config::from_toml_str("scan_depth = 4"),
            Err(DiscoveryError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("page_size = \"six\""),
            Err(DiscoveryError::Config(_))
        ));
    }

    #[test]
    fn negative_radius_means_unbounded() {
        let config = Config::from_toml_str("default_radius_km = -3.0").expect("valid toml");
        assert_eq!(config.default_radius(), Radius::Unbounded);

        let mut map = BTreeMap::new();
        map.insert("default_radius_km".to_string(), "all".to_string());
        assert_eq!(Config::from_map(&map).default_radius_km, None);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "page_size = 3\ncatalog_path = \"/srv/catalog.json\"\n").expect("write");

        let config = Config::load(&path).expect("load");
        assert_eq!(config.page_size, 3);
        assert_eq!(config.catalog_path(), PathBuf::from("/srv/catalog.json"));

        assert!(matches!(
            Config::load(&dir.path().join("missing.toml")),
            Err(DiscoveryError::Io(_))
        ));
    }

    #[test]
    fn initialize_installs_default_radius() {
        let config = Config {
            default_radius_km: Some(5.0),
            ..Config::default()
        };
        let state = initialize(&config);
        assert_eq!(state.criteria.radius, Radius::Km(5.0));
        assert!(state.loading);
    }
}

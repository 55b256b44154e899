//! Filesystem and environment helpers.

pub mod paths;

pub use paths::{data_dir, default_catalog_path, default_favorites_path, expand_tilde, DATA_DIR_ENV};

//! Storage layer for the organization catalog and favorite flags.
//!
//! # Modules
//!
//! - `backend`: Provider and persistence traits
//! - `json`: JSON file backend with atomic favorite writes
//! - `memory`: In-memory backend with failure injection
//! - `models`: On-disk record formats

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::{CatalogProvider, FavoritePersistence, Storage};
pub use json::JsonStorage;
pub use memory::MemoryStorage;
pub use models::{CatalogFile, FavoriteRecord, FavoritesData};

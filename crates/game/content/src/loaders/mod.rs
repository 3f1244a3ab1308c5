//! Content loaders for reading puzzle data from files.
//!
//! Composition tables and level catalogs are RON, engine configuration is
//! TOML. Every loader also exposes a `parse` entry point so embedded data
//! goes through the same code path as files on disk.

pub mod compositions;
pub mod config;
pub mod factory;
pub mod levels;

pub use compositions::CompositionLoader;
pub use config::ConfigLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use levels::{LevelCatalog, LevelLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

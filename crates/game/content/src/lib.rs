//! Data-driven puzzle content and loaders.
//!
//! This crate houses the shipped campaign and provides loaders for RON/TOML
//! data files:
//! - Composition tables (data-driven via RON)
//! - Level catalogs (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//!
//! All loaders use glyph-core types directly with serde for RON/TOML
//! deserialization.

#[cfg(feature = "loaders")]
pub mod builtin;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CompositionLoader, ConfigLoader, ContentBundle, ContentFactory, LevelCatalog, LevelLoader,
    LoadResult,
};

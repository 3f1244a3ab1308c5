//! Content factory for loading a full campaign from a data directory.

use std::path::{Path, PathBuf};

use glyph_core::{CompositionTable, EngineConfig};

use crate::loaders::{CompositionLoader, ConfigLoader, LevelCatalog, LevelLoader, LoadResult};

/// Everything a runtime needs to start a campaign.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub table: CompositionTable,
    pub catalog: LevelCatalog,
    pub config: EngineConfig,
}

/// Content factory that loads all puzzle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml        (optional)
/// ├── compositions.ron
/// └── levels.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const COMPOSITIONS_FILE: &'static str = "compositions.ron";
    pub const LEVELS_FILE: &'static str = "levels.ron";
    pub const CONFIG_FILE: &'static str = "config.toml";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        ConfigLoader::load(&self.data_dir.join(Self::CONFIG_FILE))
    }

    /// Load the composition table from `compositions.ron`.
    pub fn load_compositions(&self) -> LoadResult<CompositionTable> {
        CompositionLoader::load(&self.data_dir.join(Self::COMPOSITIONS_FILE))
    }

    /// Load the level catalog from `levels.ron`.
    pub fn load_levels(&self) -> LoadResult<LevelCatalog> {
        LevelLoader::load(&self.data_dir.join(Self::LEVELS_FILE))
    }

    /// Load table, levels and config. A missing `config.toml` falls back to
    /// the default configuration; a malformed one is an error.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let table = self.load_compositions()?;
        let catalog = self.load_levels()?;
        let config = if self.data_dir.join(Self::CONFIG_FILE).exists() {
            self.load_config()?
        } else {
            tracing::debug!(dir = %self.data_dir.display(), "no config.toml, using defaults");
            EngineConfig::default()
        };

        tracing::info!(
            dir = %self.data_dir.display(),
            compositions = table.len(),
            levels = catalog.len(),
            "content loaded"
        );
        Ok(ContentBundle {
            table,
            catalog,
            config,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_bundle_without_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(ContentFactory::COMPOSITIONS_FILE),
            r#"[("明", "日", "月")]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(ContentFactory::LEVELS_FILE),
            r#"(levels: [(name: "one", targets: ["明"], seed: ["日", "月"])])"#,
        )
        .unwrap();

        let bundle = ContentFactory::new(dir.path()).load_bundle().unwrap();

        assert_eq!(bundle.table.len(), 1);
        assert_eq!(bundle.catalog.len(), 1);
        assert_eq!(bundle.config, EngineConfig::default());
    }

    #[test]
    fn malformed_config_fails_bundle() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(ContentFactory::COMPOSITIONS_FILE),
            r#"[("明", "日", "月")]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(ContentFactory::LEVELS_FILE),
            r#"(levels: [(name: "one", targets: ["明"])])"#,
        )
        .unwrap();
        fs::write(dir.path().join(ContentFactory::CONFIG_FILE), "max_selection = \"two\"").unwrap();

        assert!(ContentFactory::new(dir.path()).load_bundle().is_err());
    }
}

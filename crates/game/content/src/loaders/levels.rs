//! Level catalog loader.

use std::path::Path;

use anyhow::Context;
use glyph_core::LevelDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Ordered list of levels making up a campaign.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<LevelDefinition>) -> Self {
        Self { levels }
    }

    pub fn get(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Loader for level catalogs from RON files.
pub struct LevelLoader;

impl LevelLoader {
    /// Load a level catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<LevelCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse a level catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<LevelCatalog> {
        let catalog: LevelCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse levels RON: {}", e))?;

        if catalog.is_empty() {
            anyhow::bail!("Level catalog contains no levels");
        }
        for level in catalog.iter().filter(|level| level.targets.is_empty()) {
            tracing::warn!(level = %level.name, "level has no targets and can never complete");
        }

        Ok(catalog)
    }
}

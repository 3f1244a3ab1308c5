//! Composition table loader.

use std::path::Path;

use anyhow::Context;
use glyph_core::{CompositionEntry, CompositionTable, Token};

use crate::loaders::{LoadResult, read_file};

/// Loader for composition tables stored as RON lists of
/// `(composite, part_a, part_b)` triples.
pub struct CompositionLoader;

impl CompositionLoader {
    /// Load and validate a composition table from a RON file.
    pub fn load(path: &Path) -> LoadResult<CompositionTable> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse and validate a composition table from RON text.
    pub fn parse(content: &str) -> LoadResult<CompositionTable> {
        let triples: Vec<(Token, Token, Token)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse compositions RON: {}", e))?;

        let entries = triples
            .into_iter()
            .map(|(composite, a, b)| CompositionEntry::new(composite, a, b));
        let table = CompositionTable::new(entries)
            .map_err(|e| anyhow::anyhow!("Invalid composition table: {}", e))?;

        tracing::debug!(entries = table.len(), "composition table loaded");
        Ok(table)
    }
}

//! Read-only views of the session a [`crate::RuntimeHandle`] drives.

use glyph_core::{LevelDefinition, PuzzleSnapshot, Token};
use serde::{Deserialize, Serialize};

/// The level currently loaded in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub index: usize,
    pub count: usize,
    pub name: String,
    pub targets: Vec<Token>,
    pub pickups: Vec<Token>,
}

impl LevelInfo {
    pub fn new(index: usize, count: usize, level: &LevelDefinition) -> Self {
        Self {
            index,
            count,
            name: level.name.clone(),
            targets: level.targets.clone(),
            pickups: level.pickups.clone(),
        }
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.count
    }
}

/// Puzzle state plus campaign position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub level: LevelInfo,
    pub campaign_complete: bool,
    pub puzzle: PuzzleSnapshot,
}

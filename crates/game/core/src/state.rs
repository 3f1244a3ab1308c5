//! Mutable puzzle state for one level instance.
//!
//! The engine owns a [`PuzzleState`] and mutates it exclusively through the
//! operation transitions and its own inbound handlers.

use std::collections::BTreeSet;

use crate::completion::CompletionTracker;
use crate::config::EngineConfig;
use crate::level::LevelDefinition;
use crate::pool::{PoolEntry, TokenPool};
use crate::selection::{OpEligibility, SelectionState};
use crate::token::{InstanceId, Token};

/// Whether the engine accepts new commits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnginePhase {
    #[default]
    Idle,
    /// A target-producing combine is waiting for the presentation layer to
    /// call `finalize_reward` with this token.
    RewardPending(Token),
}

impl EnginePhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, EnginePhase::Idle)
    }

    pub fn pending_reward(&self) -> Option<&Token> {
        match self {
            EnginePhase::RewardPending(token) => Some(token),
            EnginePhase::Idle => None,
        }
    }
}

/// Pool, selection, targets and busy flag of a level in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PuzzleState {
    pub pool: TokenPool,
    pub selection: SelectionState,
    pub tracker: CompletionTracker,
    pub phase: EnginePhase,
}

impl PuzzleState {
    /// Fresh state for `level`: seeded pool, empty selection, all targets remaining.
    pub fn from_level(level: &LevelDefinition, config: &EngineConfig) -> Self {
        let capacity = level.max_selection.unwrap_or(config.max_selection);
        Self {
            pool: TokenPool::seeded(&level.seed),
            selection: SelectionState::new(capacity),
            tracker: CompletionTracker::new(level.targets.iter().cloned()),
            phase: EnginePhase::Idle,
        }
    }

    /// Returns the first selected id that is no longer in the pool, if any.
    pub fn stale_selection(&self) -> Option<InstanceId> {
        self.selection
            .selected()
            .iter()
            .copied()
            .find(|&id| !self.pool.contains(id))
    }

    pub fn eligibility(&self) -> OpEligibility {
        self.selection.eligibility()
    }

    pub fn snapshot(&self, level_name: &str) -> PuzzleSnapshot {
        PuzzleSnapshot {
            level: level_name.to_owned(),
            pool: self.pool.entries().to_vec(),
            selected: self.selection.selected().to_vec(),
            max_selection: self.selection.capacity(),
            eligibility: self.selection.eligibility(),
            remaining_targets: self.tracker.remaining().clone(),
            completed_targets: self.tracker.completed().clone(),
            pending_reward: self.phase.pending_reward().cloned(),
            complete: self.tracker.is_complete(),
        }
    }
}

/// Read-only copy of the puzzle state for frontends and logs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PuzzleSnapshot {
    pub level: String,
    pub pool: Vec<PoolEntry>,
    pub selected: Vec<InstanceId>,
    pub max_selection: usize,
    pub eligibility: OpEligibility,
    pub remaining_targets: BTreeSet<Token>,
    pub completed_targets: BTreeSet<Token>,
    pub pending_reward: Option<Token>,
    pub complete: bool,
}

impl PuzzleSnapshot {
    /// Token value of a live instance.
    pub fn token(&self, id: InstanceId) -> Option<&Token> {
        self.pool
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.token)
    }
}

//! Event types for different topics.

use glyph_core::{CombineOutcome, CommitOutcome, InstanceId, PoolEntry, Token};
use serde::{Deserialize, Serialize};

/// Instances entered or left the pool of the level at `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEvent {
    pub level: usize,
    pub added: Vec<PoolEntry>,
    pub removed: Vec<InstanceId>,
}

/// A split or combine commit finished, applied or rejected.
///
/// `generation` identifies the level instance the commit ran against. It
/// changes on every restart and level change, and a reward finalization
/// tagged with an older generation is refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationEvent {
    pub level: usize,
    pub generation: u64,
    pub outcome: CommitOutcome,
}

impl OperationEvent {
    /// Token waiting for `finalize_reward`, if this commit produced a target.
    pub fn pending_reward(&self) -> Option<&Token> {
        match &self.outcome {
            CommitOutcome::Combine(CombineOutcome::Applied(applied))
                if applied.is_target =>
            {
                Some(&applied.result)
            }
            _ => None,
        }
    }
}

/// Target and campaign progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressEvent {
    /// A level was loaded and its seed placed in the pool.
    LevelStarted { index: usize, name: String },
    /// A target token was produced for the first time.
    TargetCompleted { level: usize, token: Token },
    /// Every target of the level has been produced.
    LevelCompleted { level: usize },
    /// The last level of the campaign has been completed.
    CampaignCompleted,
}

//! Split and combine commits.
//!
//! Each commit is an [`OperationTransition`] driven by the engine through
//! `pre_validate → apply → post_validate`. Transitions only touch
//! [`PuzzleState`](crate::state::PuzzleState); events, logging and target
//! bookkeeping for newly added tokens are the engine's job.

mod combine;
mod error;
mod split;
mod transition;

pub use combine::CombineOperation;
pub use error::{OperationError, RejectReason};
pub use split::SplitOperation;
pub use transition::OperationTransition;

use crate::config::EngineConfig;
use crate::pool::PoolEntry;
use crate::state::PuzzleState;
use crate::token::Token;

/// The two commits a player can make.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
    Split,
    Combine,
}

/// Pool mutation performed by an applied split.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitApplied {
    pub consumed: PoolEntry,
    pub produced: [PoolEntry; 2],
}

impl SplitApplied {
    /// Constituents in the table's canonical order.
    pub fn parts(&self) -> (&Token, &Token) {
        (&self.produced[0].token, &self.produced[1].token)
    }
}

/// Pool mutation performed by an applied combine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombineApplied {
    pub consumed: [PoolEntry; 2],
    pub result: Token,
    /// The result belongs to the level's target set. Its pool entry is
    /// deferred until the reward is finalized.
    pub is_target: bool,
    /// The instance added right away; `None` while a reward is pending.
    pub added: Option<PoolEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SplitOutcome {
    Applied(SplitApplied),
    Rejected(RejectReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombineOutcome {
    Applied(CombineApplied),
    Rejected(RejectReason),
}

impl SplitOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SplitOutcome::Applied(_))
    }

    pub fn rejection(&self) -> Option<RejectReason> {
        match self {
            SplitOutcome::Rejected(reason) => Some(*reason),
            SplitOutcome::Applied(_) => None,
        }
    }
}

impl CombineOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CombineOutcome::Applied(_))
    }

    pub fn rejection(&self) -> Option<RejectReason> {
        match self {
            CombineOutcome::Rejected(reason) => Some(*reason),
            CombineOutcome::Applied(_) => None,
        }
    }
}

/// Outcome of any commit, as reported to observers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommitOutcome {
    Split(SplitOutcome),
    Combine(CombineOutcome),
}

impl CommitOutcome {
    pub fn kind(&self) -> OperationKind {
        match self {
            CommitOutcome::Split(_) => OperationKind::Split,
            CommitOutcome::Combine(_) => OperationKind::Combine,
        }
    }

    pub fn is_applied(&self) -> bool {
        match self {
            CommitOutcome::Split(outcome) => outcome.is_applied(),
            CommitOutcome::Combine(outcome) => outcome.is_applied(),
        }
    }

    pub fn rejection(&self) -> Option<RejectReason> {
        match self {
            CommitOutcome::Split(outcome) => outcome.rejection(),
            CommitOutcome::Combine(outcome) => outcome.rejection(),
        }
    }
}

/// Clears the selection and resets its capacity after an applied commit.
fn settle_selection(state: &mut PuzzleState) {
    state.selection.clear();
    state
        .selection
        .set_capacity(EngineConfig::RESET_MAX_SELECTION);
}

/// Post-condition shared by both commits: the selection only names live
/// instances and never exceeds its capacity.
fn check_selection(state: &PuzzleState) -> Result<(), OperationError> {
    if let Some(id) = state.stale_selection() {
        return Err(OperationError::StaleSelection(id));
    }
    let held = state.selection.len();
    let capacity = state.selection.capacity();
    if held > capacity {
        return Err(OperationError::SelectionOverflow { held, capacity });
    }
    Ok(())
}

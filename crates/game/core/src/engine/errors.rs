//! Error types for the engine's command surface.

use crate::error::{ErrorSeverity, GameError};
use crate::operation::OperationError;
use crate::pool::PoolError;
use crate::token::{InstanceId, Token};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase, self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced by [`super::PuzzleEngine`].
///
/// Player mistakes are not errors: they come back as rejected outcomes.
/// Everything here means the caller (or, for `Split`/`Combine`, the engine
/// itself) broke an invariant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    #[error("operation in progress: reward {pending} has not been finalized")]
    OperationInProgress { pending: Token },

    #[error("instance {0} is not in the pool")]
    UnknownInstance(InstanceId),

    #[error("no reward is pending (got {provided})")]
    NoPendingReward { provided: Token },

    #[error("pending reward is {expected}, not {provided}")]
    RewardMismatch { expected: Token, provided: Token },

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("split transition failed: {0}")]
    Split(TransitionPhaseError<OperationError>),

    #[error("combine transition failed: {0}")]
    Combine(TransitionPhaseError<OperationError>),
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::OperationInProgress { .. }
            | EngineError::UnknownInstance(_)
            | EngineError::NoPendingReward { .. }
            | EngineError::RewardMismatch { .. }
            | EngineError::Pool(_) => ErrorSeverity::Contract,
            EngineError::Split(inner) | EngineError::Combine(inner) => inner.error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EngineError::OperationInProgress { .. } => "ENGINE_OPERATION_IN_PROGRESS",
            EngineError::UnknownInstance(_) => "ENGINE_UNKNOWN_INSTANCE",
            EngineError::NoPendingReward { .. } => "ENGINE_NO_PENDING_REWARD",
            EngineError::RewardMismatch { .. } => "ENGINE_REWARD_MISMATCH",
            EngineError::Pool(inner) => inner.error_code(),
            EngineError::Split(inner) | EngineError::Combine(inner) => inner.error.error_code(),
        }
    }
}

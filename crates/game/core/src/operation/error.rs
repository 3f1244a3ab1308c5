//! Operation errors.
//!
//! Rejections the player can cause, plus the internal failures a transition
//! can hit if the state it validated against goes inconsistent.

use crate::error::{ErrorSeverity, GameError};
use crate::pool::PoolError;
use crate::token::InstanceId;

/// Why a split or combine was refused.
///
/// Every reason is an expected player mistake: the engine clears the
/// selection, reports the outcome and carries on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RejectReason {
    /// The selection does not have the shape the operation needs.
    #[error("selection does not match the requested operation")]
    InvalidSelection,

    /// The selected token has no constituents.
    #[error("token cannot be split")]
    NotSplittable,

    /// The two selected tokens do not form any composite.
    #[error("tokens do not combine into anything")]
    NoSuchComposition,
}

impl GameError for RejectReason {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            RejectReason::InvalidSelection => "OP_INVALID_SELECTION",
            RejectReason::NotSplittable => "OP_NOT_SPLITTABLE",
            RejectReason::NoSuchComposition => "OP_NO_SUCH_COMPOSITION",
        }
    }
}

/// Errors a transition can return from any of its phases.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperationError {
    #[error(transparent)]
    Rejected(#[from] RejectReason),

    #[error("pool desync: {0}")]
    Pool(#[from] PoolError),

    #[error("selection still references removed instance {0}")]
    StaleSelection(InstanceId),

    #[error("selection holds {held} ids but capacity is {capacity}")]
    SelectionOverflow { held: usize, capacity: usize },
}

impl OperationError {
    /// Returns the player-facing reason if this is an ordinary rejection.
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            OperationError::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl GameError for OperationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            OperationError::Rejected(reason) => reason.severity(),
            OperationError::Pool(_)
            | OperationError::StaleSelection(_)
            | OperationError::SelectionOverflow { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            OperationError::Rejected(reason) => reason.error_code(),
            OperationError::Pool(_) => "OP_POOL_DESYNC",
            OperationError::StaleSelection(_) => "OP_STALE_SELECTION",
            OperationError::SelectionOverflow { .. } => "OP_SELECTION_OVERFLOW",
        }
    }
}

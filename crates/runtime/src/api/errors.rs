//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and engine contract violations so
//! clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use glyph_core::{EngineError, ErrorSeverity, GameError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a composition table before building")]
    MissingTable,

    #[error("campaign contains no levels")]
    EmptyCampaign,

    #[error("level {level:?} is not complete yet")]
    LevelIncomplete { level: String },

    #[error("campaign already finished")]
    CampaignFinished,

    #[error("reward from session generation {provided} is stale (current {current})")]
    StaleReward { provided: u64, current: u64 },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl RuntimeError {
    /// The engine error behind this failure, if any.
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            RuntimeError::Engine(error) => Some(error),
            _ => None,
        }
    }
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Engine(error) => error.severity(),
            RuntimeError::LevelIncomplete { .. }
            | RuntimeError::CampaignFinished
            | RuntimeError::StaleReward { .. } => ErrorSeverity::Recoverable,
            RuntimeError::MissingTable | RuntimeError::EmptyCampaign => ErrorSeverity::Validation,
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::WorkerJoin(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            RuntimeError::MissingTable => "RUNTIME_MISSING_TABLE",
            RuntimeError::EmptyCampaign => "RUNTIME_EMPTY_CAMPAIGN",
            RuntimeError::LevelIncomplete { .. } => "RUNTIME_LEVEL_INCOMPLETE",
            RuntimeError::CampaignFinished => "RUNTIME_CAMPAIGN_FINISHED",
            RuntimeError::StaleReward { .. } => "RUNTIME_STALE_REWARD",
            RuntimeError::Engine(error) => error.error_code(),
        }
    }
}

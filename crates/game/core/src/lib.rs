//! Token resolution rules for the glyph split/combine puzzle.
//!
//! `glyph-core` owns the canonical puzzle rules (composition table, token
//! pool, selection, target tracking) and exposes pure, synchronous APIs that
//! the runtime and offline tools share. All state mutation flows through
//! [`engine::PuzzleEngine`], and supporting crates depend on the types
//! re-exported here.
pub mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod level;
pub mod operation;
pub mod pool;
pub mod selection;
pub mod state;
pub mod table;
pub mod token;

pub use completion::{CompletionTracker, CompletionUpdate};
pub use config::EngineConfig;
pub use engine::{EngineError, PuzzleEngine, TransitionPhase, TransitionPhaseError};
pub use error::{ErrorSeverity, GameError};
pub use event::{EngineEvent, EngineObserver};
pub use level::LevelDefinition;
pub use operation::{
    CombineApplied, CombineOperation, CombineOutcome, CommitOutcome, OperationError,
    OperationKind, OperationTransition, RejectReason, SplitApplied, SplitOperation, SplitOutcome,
};
pub use pool::{PoolEntry, PoolError, TokenPool};
pub use selection::{OpEligibility, SelectionChange, SelectionState};
pub use state::{EnginePhase, PuzzleSnapshot, PuzzleState};
pub use table::{CompositionEntry, CompositionTable, TableError};
pub use token::{InstanceId, Token};

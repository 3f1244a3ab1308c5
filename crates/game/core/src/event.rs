//! Typed notifications emitted by the engine.
//!
//! The engine buffers events while it runs an operation; callers either drain
//! the buffer or hand it to an [`EngineObserver`]. Presentation, audio and
//! scene collaborators react to these and never reach into engine state.

use crate::operation::CommitOutcome;
use crate::pool::PoolEntry;
use crate::token::{InstanceId, Token};

/// The fixed set of events the engine emits.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineEvent {
    /// Instances entered or left the pool. Consumers apply `removed` before
    /// `added`.
    PoolChanged {
        added: Vec<PoolEntry>,
        removed: Vec<InstanceId>,
    },
    /// A split or combine commit finished, applied or rejected.
    OperationOutcome(CommitOutcome),
    /// A target token was produced for the first time.
    TargetCompleted(Token),
    /// Every target has been produced. Emitted once per level instance.
    LevelCompleted,
}

impl EngineEvent {
    pub fn pool_added(entries: impl IntoIterator<Item = PoolEntry>) -> Self {
        EngineEvent::PoolChanged {
            added: entries.into_iter().collect(),
            removed: Vec::new(),
        }
    }

    pub fn pool_removed(ids: impl IntoIterator<Item = InstanceId>) -> Self {
        EngineEvent::PoolChanged {
            added: Vec::new(),
            removed: ids.into_iter().collect(),
        }
    }
}

/// Receives engine events in emission order.
pub trait EngineObserver {
    fn on_event(&mut self, event: &EngineEvent);
}

impl EngineObserver for Vec<EngineEvent> {
    fn on_event(&mut self, event: &EngineEvent) {
        self.push(event.clone());
    }
}

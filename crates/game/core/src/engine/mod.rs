//! Selection handling, commit resolution and reward finalization.
//!
//! The [`PuzzleEngine`] is the single owner of a level's [`PuzzleState`].
//! Every inbound event (acquire, selection clicks, split/combine buttons,
//! animation callbacks) is a method on it, runs to completion synchronously
//! and leaves the state consistent before returning. Outbound notifications
//! are buffered as [`EngineEvent`]s.
//!
//! Commits move through `Idle → Validating → {Applied, Rejected} → Idle`.
//! A combine that produces a target token parks the engine in
//! [`EnginePhase::RewardPending`] until [`PuzzleEngine::finalize_reward`]
//! is called; new commits are refused meanwhile.

mod errors;
mod transition;

#[cfg(test)]
mod tests;

pub use errors::{EngineError, TransitionPhase, TransitionPhaseError};

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::completion::CompletionTracker;
use crate::config::EngineConfig;
use crate::event::{EngineEvent, EngineObserver};
use crate::level::LevelDefinition;
use crate::operation::{
    CombineOperation, CombineOutcome, CommitOutcome, OperationTransition, RejectReason,
    SplitOperation, SplitOutcome,
};
use crate::pool::{PoolEntry, TokenPool};
use crate::selection::{OpEligibility, SelectionChange, SelectionState};
use crate::state::{EnginePhase, PuzzleSnapshot, PuzzleState};
use crate::table::CompositionTable;
use crate::token::{InstanceId, Token};

use transition::drive_transition;

/// Puzzle engine for one level instance.
///
/// Constructed explicitly and passed to collaborators by reference; there is
/// no process-wide instance. The composition table is shared read-only.
#[derive(Clone, Debug)]
pub struct PuzzleEngine {
    table: Arc<CompositionTable>,
    level: LevelDefinition,
    config: EngineConfig,
    state: PuzzleState,
    events: Vec<EngineEvent>,
}

impl PuzzleEngine {
    /// Creates an engine with the level's seed tokens already in the pool.
    ///
    /// Seed tokens never count towards targets.
    pub fn new(table: Arc<CompositionTable>, level: LevelDefinition, config: EngineConfig) -> Self {
        let state = PuzzleState::from_level(&level, &config);
        debug!(
            level = %level.name,
            seed = state.pool.len(),
            targets = state.tracker.target_count(),
            "puzzle engine initialized"
        );

        Self {
            table,
            level,
            config,
            state,
            events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Inbound: world
    // ------------------------------------------------------------------

    /// Adds a token the player picked up in the world.
    pub fn acquire(&mut self, token: Token) -> InstanceId {
        let id = self.state.pool.add(token.clone());
        debug!(%id, %token, "token acquired");

        self.emit(EngineEvent::pool_added([PoolEntry {
            id,
            token: token.clone(),
        }]));
        self.record_entered(&token);
        id
    }

    /// Removes one instance from the pool, dropping it from the selection too.
    pub fn remove(&mut self, id: InstanceId) -> Result<Token, EngineError> {
        let token = self.state.pool.remove(id)?;
        self.state.selection.deselect(id);
        debug!(%id, %token, "instance removed");

        self.emit(EngineEvent::pool_removed([id]));
        Ok(token)
    }

    // ------------------------------------------------------------------
    // Inbound: selection
    // ------------------------------------------------------------------

    /// Flips the selection of a live instance. Requests beyond capacity are
    /// silently ignored.
    pub fn toggle(&mut self, id: InstanceId) -> Result<SelectionChange, EngineError> {
        self.ensure_live(id)?;
        let change = self.state.selection.toggle(id);
        if change == SelectionChange::CapacityReached {
            debug!(%id, capacity = self.state.selection.capacity(), "selection full, ignored");
        }
        Ok(change)
    }

    pub fn select(&mut self, id: InstanceId) -> Result<SelectionChange, EngineError> {
        self.ensure_live(id)?;
        Ok(self.state.selection.select(id))
    }

    pub fn deselect(&mut self, id: InstanceId) -> Result<SelectionChange, EngineError> {
        self.ensure_live(id)?;
        Ok(if self.state.selection.deselect(id) {
            SelectionChange::Deselected
        } else {
            SelectionChange::Unchanged
        })
    }

    /// Changes how many instances may be selected at once.
    pub fn set_max_selection(&mut self, max_selection: usize) {
        self.state.selection.set_capacity(max_selection);
    }

    // ------------------------------------------------------------------
    // Inbound: commits
    // ------------------------------------------------------------------

    /// Splits the current selection (the split button).
    pub fn request_split(&mut self) -> Result<SplitOutcome, EngineError> {
        self.ensure_idle()?;
        let selected = self.state.selection.selected().to_vec();
        match selected[..] {
            [source] => self.commit_split(source),
            _ => {
                let reason = RejectReason::InvalidSelection;
                self.reject(CommitOutcome::Split(SplitOutcome::Rejected(reason)));
                Ok(SplitOutcome::Rejected(reason))
            }
        }
    }

    /// Combines the current selection (the combine button).
    pub fn request_combine(&mut self) -> Result<CombineOutcome, EngineError> {
        self.ensure_idle()?;
        let selected = self.state.selection.selected().to_vec();
        match selected[..] {
            [first, second] => self.commit_combine(first, second),
            _ => {
                let reason = RejectReason::InvalidSelection;
                self.reject(CommitOutcome::Combine(CombineOutcome::Rejected(reason)));
                Ok(CombineOutcome::Rejected(reason))
            }
        }
    }

    /// Splits `source`, which must be the only selected instance.
    pub fn commit_split(&mut self, source: InstanceId) -> Result<SplitOutcome, EngineError> {
        self.ensure_idle()?;
        let op = SplitOperation::new(source);

        match drive_transition(&op, &mut self.state, &self.table) {
            Ok(applied) => {
                let (a, b) = applied.parts();
                debug!(%source, token = %applied.consumed.token, part_a = %a, part_b = %b, "split applied");

                let produced = applied.produced.clone();
                let outcome = SplitOutcome::Applied(applied);
                self.emit(EngineEvent::OperationOutcome(CommitOutcome::Split(
                    outcome.clone(),
                )));
                self.emit(EngineEvent::PoolChanged {
                    added: produced.to_vec(),
                    removed: vec![source],
                });
                for entry in &produced {
                    self.record_entered(&entry.token);
                }
                Ok(outcome)
            }
            Err(phase_error) => match phase_error.error.reject_reason() {
                Some(reason) => {
                    debug!(%source, %phase_error, "split rejected");
                    self.reject(CommitOutcome::Split(SplitOutcome::Rejected(reason)));
                    Ok(SplitOutcome::Rejected(reason))
                }
                None => {
                    error!(op = %op.kind(), %phase_error, "split transition failed");
                    Err(EngineError::Split(phase_error))
                }
            },
        }
    }

    /// Combines `first` and `second`, which must be exactly the selection.
    pub fn commit_combine(
        &mut self,
        first: InstanceId,
        second: InstanceId,
    ) -> Result<CombineOutcome, EngineError> {
        self.ensure_idle()?;
        let op = CombineOperation::new(first, second);

        match drive_transition(&op, &mut self.state, &self.table) {
            Ok(applied) => {
                debug!(
                    %first,
                    %second,
                    result = %applied.result,
                    is_target = applied.is_target,
                    "combine applied"
                );

                let removed = vec![first, second];
                let added = applied.added.clone();
                let outcome = CombineOutcome::Applied(applied);
                self.emit(EngineEvent::OperationOutcome(CommitOutcome::Combine(
                    outcome.clone(),
                )));
                self.emit(EngineEvent::PoolChanged {
                    added: added.iter().cloned().collect(),
                    removed,
                });
                if let Some(entry) = added {
                    self.record_entered(&entry.token);
                }
                Ok(outcome)
            }
            Err(phase_error) => match phase_error.error.reject_reason() {
                Some(reason) => {
                    debug!(%first, %second, %phase_error, "combine rejected");
                    self.reject(CommitOutcome::Combine(CombineOutcome::Rejected(reason)));
                    Ok(CombineOutcome::Rejected(reason))
                }
                None => {
                    error!(op = %op.kind(), %phase_error, "combine transition failed");
                    Err(EngineError::Combine(phase_error))
                }
            },
        }
    }

    /// Completes a deferred target reward once its presentation has finished.
    ///
    /// Adds the token to the pool, updates target progress and returns the
    /// engine to idle.
    pub fn finalize_reward(&mut self, token: &Token) -> Result<InstanceId, EngineError> {
        match &self.state.phase {
            EnginePhase::Idle => {
                return Err(EngineError::NoPendingReward {
                    provided: token.clone(),
                });
            }
            EnginePhase::RewardPending(expected) if expected != token => {
                return Err(EngineError::RewardMismatch {
                    expected: expected.clone(),
                    provided: token.clone(),
                });
            }
            EnginePhase::RewardPending(_) => {}
        }

        self.state.phase = EnginePhase::Idle;
        let id = self.state.pool.add(token.clone());
        debug!(%id, %token, "reward finalized");

        self.emit(EngineEvent::pool_added([PoolEntry {
            id,
            token: token.clone(),
        }]));
        self.record_entered(token);
        Ok(id)
    }

    /// Resets the level to its initial seed.
    ///
    /// Any pending reward belongs to the discarded level instance and is
    /// dropped with it. The fresh pool allocates ids from zero again, so the
    /// removal of the old instances is emitted as its own event ahead of the
    /// seed additions.
    pub fn restart(&mut self) {
        let removed: Vec<InstanceId> = self.state.pool.ids().collect();
        self.state = PuzzleState::from_level(&self.level, &self.config);
        info!(level = %self.level.name, "level restarted");

        self.emit(EngineEvent::pool_removed(removed));
        self.emit(EngineEvent::pool_added(self.state.pool.entries().to_vec()));
    }

    // ------------------------------------------------------------------
    // Outbound
    // ------------------------------------------------------------------

    /// Takes all buffered events in emission order.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hands all buffered events to `observer` in emission order.
    pub fn dispatch(&mut self, observer: &mut dyn EngineObserver) {
        for event in self.drain_events() {
            observer.on_event(&event);
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn table(&self) -> &Arc<CompositionTable> {
        &self.table
    }

    pub fn level(&self) -> &LevelDefinition {
        &self.level
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    pub fn pool(&self) -> &TokenPool {
        &self.state.pool
    }

    pub fn selection(&self) -> &SelectionState {
        &self.state.selection
    }

    pub fn tracker(&self) -> &CompletionTracker {
        &self.state.tracker
    }

    pub fn phase(&self) -> &EnginePhase {
        &self.state.phase
    }

    pub fn is_busy(&self) -> bool {
        !self.state.phase.is_idle()
    }

    pub fn eligibility(&self) -> OpEligibility {
        self.state.eligibility()
    }

    pub fn max_selection(&self) -> usize {
        self.state.selection.capacity()
    }

    pub fn is_complete(&self) -> bool {
        self.state.tracker.is_complete()
    }

    pub fn progress(&self) -> f64 {
        self.state.tracker.progress()
    }

    pub fn snapshot(&self) -> PuzzleSnapshot {
        self.state.snapshot(&self.level.name)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        match &self.state.phase {
            EnginePhase::Idle => Ok(()),
            EnginePhase::RewardPending(pending) => Err(EngineError::OperationInProgress {
                pending: pending.clone(),
            }),
        }
    }

    fn ensure_live(&self, id: InstanceId) -> Result<(), EngineError> {
        if self.state.pool.contains(id) {
            Ok(())
        } else {
            Err(EngineError::UnknownInstance(id))
        }
    }

    /// Rejections are recoverable: clear the selection and report.
    fn reject(&mut self, outcome: CommitOutcome) {
        self.state.selection.clear();
        self.emit(EngineEvent::OperationOutcome(outcome));
    }

    fn record_entered(&mut self, token: &Token) {
        let update = self.state.tracker.on_token_entered(token);
        if update.target_completed {
            info!(%token, progress = self.state.tracker.progress(), "target completed");
            self.emit(EngineEvent::TargetCompleted(token.clone()));
        }
        if update.level_completed {
            info!(level = %self.level.name, "level completed");
            self.emit(EngineEvent::LevelCompleted);
        }
    }
}

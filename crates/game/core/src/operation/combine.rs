use crate::config::EngineConfig;
use crate::pool::PoolEntry;
use crate::selection::OpEligibility;
use crate::state::{EnginePhase, PuzzleState};
use crate::table::CompositionTable;
use crate::token::{InstanceId, Token};

use super::{
    CombineApplied, OperationError, OperationKind, OperationTransition, RejectReason,
    check_selection, settle_selection,
};

/// Combines the two selected instances into their composite.
///
/// A composite that belongs to the level's target set is not added to the
/// pool here; the state enters [`EnginePhase::RewardPending`] until the
/// reward is finalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombineOperation {
    pub first: InstanceId,
    pub second: InstanceId,
}

impl CombineOperation {
    pub fn new(first: InstanceId, second: InstanceId) -> Self {
        Self { first, second }
    }

    fn resolve(
        &self,
        state: &PuzzleState,
        table: &CompositionTable,
    ) -> Result<(Token, Token, Token), OperationError> {
        let a = state
            .pool
            .get(self.first)
            .ok_or(RejectReason::InvalidSelection)?;
        let b = state
            .pool
            .get(self.second)
            .ok_or(RejectReason::InvalidSelection)?;
        let result = table
            .recompose(a, b)
            .ok_or(RejectReason::NoSuchComposition)?;
        Ok((a.clone(), b.clone(), result))
    }
}

impl OperationTransition for CombineOperation {
    type Error = OperationError;
    type Output = CombineApplied;

    fn kind(&self) -> OperationKind {
        OperationKind::Combine
    }

    fn pre_validate(
        &self,
        state: &PuzzleState,
        table: &CompositionTable,
    ) -> Result<(), Self::Error> {
        let selection = &state.selection;
        if self.first == self.second
            || state.eligibility() != OpEligibility::CombineEligible
            || selection.len() != EngineConfig::COMBINE_ARITY
            || !selection.contains(self.first)
            || !selection.contains(self.second)
        {
            return Err(RejectReason::InvalidSelection.into());
        }

        self.resolve(state, table).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut PuzzleState,
        table: &CompositionTable,
    ) -> Result<Self::Output, Self::Error> {
        let (a, b, result) = self.resolve(state, table)?;

        state.pool.remove(self.first)?;
        state.pool.remove(self.second)?;

        let is_target = state.tracker.is_target(&result);
        let added = if is_target {
            state.phase = EnginePhase::RewardPending(result.clone());
            None
        } else {
            let id = state.pool.add(result.clone());
            Some(PoolEntry {
                id,
                token: result.clone(),
            })
        };
        settle_selection(state);

        Ok(CombineApplied {
            consumed: [
                PoolEntry {
                    id: self.first,
                    token: a,
                },
                PoolEntry {
                    id: self.second,
                    token: b,
                },
            ],
            result,
            is_target,
            added,
        })
    }

    fn post_validate(
        &self,
        state: &PuzzleState,
        _table: &CompositionTable,
    ) -> Result<(), Self::Error> {
        for id in [self.first, self.second] {
            if state.pool.contains(id) {
                return Err(OperationError::StaleSelection(id));
            }
        }
        check_selection(state)
    }
}

use crate::config::EngineConfig;
use crate::pool::PoolEntry;
use crate::selection::OpEligibility;
use crate::state::PuzzleState;
use crate::table::CompositionTable;
use crate::token::{InstanceId, Token};

use super::{
    OperationError, OperationKind, OperationTransition, RejectReason, SplitApplied,
    check_selection, settle_selection,
};

/// Splits one selected instance into the two constituents of its token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitOperation {
    pub source: InstanceId,
}

impl SplitOperation {
    pub fn new(source: InstanceId) -> Self {
        Self { source }
    }

    fn resolve(
        &self,
        state: &PuzzleState,
        table: &CompositionTable,
    ) -> Result<(Token, (Token, Token)), OperationError> {
        let token = state
            .pool
            .get(self.source)
            .ok_or(RejectReason::InvalidSelection)?;
        let parts = table
            .decompose(token)
            .ok_or(RejectReason::NotSplittable)?;
        Ok((token.clone(), parts))
    }
}

impl OperationTransition for SplitOperation {
    type Error = OperationError;
    type Output = SplitApplied;

    fn kind(&self) -> OperationKind {
        OperationKind::Split
    }

    fn pre_validate(
        &self,
        state: &PuzzleState,
        table: &CompositionTable,
    ) -> Result<(), Self::Error> {
        let selected = state.selection.selected();
        if state.eligibility() != OpEligibility::SplitEligible
            || selected.len() != EngineConfig::SPLIT_ARITY
            || selected[0] != self.source
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
        let (token, (part_a, part_b)) = self.resolve(state, table)?;

        state.pool.remove(self.source)?;
        let id_a = state.pool.add(part_a.clone());
        let id_b = state.pool.add(part_b.clone());
        settle_selection(state);

        Ok(SplitApplied {
            consumed: PoolEntry {
                id: self.source,
                token,
            },
            produced: [
                PoolEntry {
                    id: id_a,
                    token: part_a,
                },
                PoolEntry {
                    id: id_b,
                    token: part_b,
                },
            ],
        })
    }

    fn post_validate(
        &self,
        state: &PuzzleState,
        _table: &CompositionTable,
    ) -> Result<(), Self::Error> {
        if state.pool.contains(self.source) {
            return Err(OperationError::StaleSelection(self.source));
        }
        check_selection(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelDefinition;

    fn setup(seed: &[&str]) -> (PuzzleState, CompositionTable) {
        let table = CompositionTable::from_triples([("闪", "门", "人")]).unwrap();
        let level = LevelDefinition::new("test").with_seed(seed.iter().copied());
        (PuzzleState::from_level(&level, &EngineConfig::new()), table)
    }

    #[test]
    fn splits_selected_instance_into_parts() {
        let (mut state, table) = setup(&["闪"]);
        let source = InstanceId(0);
        state.selection.select(source);

        let op = SplitOperation::new(source);
        op.pre_validate(&state, &table).unwrap();
        let applied = op.apply(&mut state, &table).unwrap();
        op.post_validate(&state, &table).unwrap();

        assert_eq!(applied.parts(), (&Token::from("门"), &Token::from("人")));
        assert!(!state.pool.contains_value(&"闪".into()));
        assert_eq!(state.pool.len(), 2);
        assert!(state.selection.is_empty());
    }

    #[test]
    fn rejects_when_source_is_not_the_only_selection() {
        let (mut state, table) = setup(&["闪", "闪"]);
        state.selection.select(InstanceId(1));

        let err = SplitOperation::new(InstanceId(0))
            .pre_validate(&state, &table)
            .unwrap_err();
        assert_eq!(err.reject_reason(), Some(RejectReason::InvalidSelection));
    }

    #[test]
    fn rejects_tokens_without_constituents() {
        let (mut state, table) = setup(&["人"]);
        state.selection.select(InstanceId(0));

        let err = SplitOperation::new(InstanceId(0))
            .pre_validate(&state, &table)
            .unwrap_err();
        assert_eq!(err.reject_reason(), Some(RejectReason::NotSplittable));
    }
}

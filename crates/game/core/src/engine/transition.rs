//! Transition driver shared by split and combine.

use crate::operation::OperationTransition;
use crate::state::PuzzleState;
use crate::table::CompositionTable;

use super::errors::{TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns the result.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the puzzle state and return result
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
pub(super) fn drive_transition<T>(
    transition: &T,
    state: &mut PuzzleState,
    table: &CompositionTable,
) -> Result<T::Output, TransitionPhaseError<T::Error>>
where
    T: OperationTransition,
{
    transition
        .pre_validate(state, table)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let output = transition
        .apply(state, table)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, table)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(output)
}

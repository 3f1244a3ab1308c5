use crate::state::PuzzleState;
use crate::table::CompositionTable;

use super::OperationKind;

/// Defines how a commit validates and mutates the puzzle state.
///
/// Implementors can override the validation hooks to surface pre- and
/// post-conditions that must hold around the state mutation. Validation hooks
/// receive read-only access and must stay side-effect free.
pub trait OperationTransition {
    type Error;
    type Output;

    fn kind(&self) -> OperationKind;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(
        &self,
        _state: &PuzzleState,
        _table: &CompositionTable,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the operation by mutating the state directly. Implementations
    /// should assume that `pre_validate` has already run successfully.
    fn apply(
        &self,
        state: &mut PuzzleState,
        table: &CompositionTable,
    ) -> Result<Self::Output, Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(
        &self,
        _state: &PuzzleState,
        _table: &CompositionTable,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}

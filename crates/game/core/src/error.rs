//! Common error infrastructure for glyph-core.
//!
//! This module provides shared types and traits used across all error types in glyph-core.
//! Domain-specific errors (e.g., `TableError`, `PoolError`, `EngineError`) are defined in
//! their respective modules alongside the operations they guard.
//!
//! # Classification
//!
//! - **Recoverable**: expected player mistakes (an illegal selection, a token
//!   that cannot be split). These never unwind the engine; they are reported
//!   as rejected outcomes and the selection is cleared.
//! - **Validation**: malformed static data supplied at construction time.
//! - **Contract**: the calling collaborator broke the engine's protocol
//!   (unknown instance, finalizing a reward that is not pending, committing
//!   while busy). These indicate a bug in the caller, not in player behavior.
//! - **Internal**: the engine's own bookkeeping disagrees with itself. Should
//!   be unreachable; surfaced instead of panicking.

/// Severity level of an error, used for categorization and logging priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Expected, frequent player-facing failure. Clears transient state only.
    ///
    /// Examples: selection does not form a composition, token not splittable
    Recoverable,

    /// Invalid static input, rejected before the engine is constructed.
    ///
    /// Examples: composite listed twice, two composites sharing one pair
    Validation,

    /// Caller-contract violation; the integrating collaborator has a bug.
    ///
    /// Examples: removing an instance that is not in the pool, finalizing
    /// a reward when none is pending
    Contract,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: a selected instance missing from the pool mid-transition
    /// These indicate bugs in the engine and should be investigated.
    Internal,
}

impl ErrorSeverity {
    /// Returns true if this error is an expected player-facing outcome.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug in the caller.
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Contract)
    }

    /// Returns true if this error indicates a bug in the engine itself.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all glyph-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on who is at fault, not on impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log filtering and for asserting on errors in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_labels_are_snake_case() {
        assert_eq!(ErrorSeverity::Recoverable.to_string(), "recoverable");
        assert_eq!(ErrorSeverity::Contract.as_ref(), "contract");
    }

    #[test]
    fn only_contract_errors_flag_caller_bugs() {
        assert!(ErrorSeverity::Contract.is_contract_violation());
        assert!(!ErrorSeverity::Recoverable.is_contract_violation());
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
    }
}

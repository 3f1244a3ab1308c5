//! Target bookkeeping and the level-complete latch.

use std::collections::BTreeSet;

use crate::token::Token;

/// What a single [`CompletionTracker::on_token_entered`] call changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompletionUpdate {
    /// The token moved from remaining to completed.
    pub target_completed: bool,
    /// This call completed the level. True at most once per tracker.
    pub level_completed: bool,
}

/// Tracks which level targets have been produced.
///
/// `remaining ∪ completed` always equals the original target set and the two
/// sets never overlap. The level-complete signal is latched so it fires once.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompletionTracker {
    targets: Vec<Token>,
    remaining: BTreeSet<Token>,
    completed: BTreeSet<Token>,
    signaled: bool,
}

impl CompletionTracker {
    /// Creates a tracker; duplicate targets collapse into one.
    pub fn new(targets: impl IntoIterator<Item = Token>) -> Self {
        let mut ordered = Vec::new();
        let mut remaining = BTreeSet::new();
        for token in targets {
            if remaining.insert(token.clone()) {
                ordered.push(token);
            }
        }
        Self {
            targets: ordered,
            remaining,
            completed: BTreeSet::new(),
            signaled: false,
        }
    }

    /// Records that `token` entered the pool.
    ///
    /// Tokens that are not remaining targets (including already-completed
    /// ones) are a no-op.
    pub fn on_token_entered(&mut self, token: &Token) -> CompletionUpdate {
        let Some(token) = self.remaining.take(token) else {
            return CompletionUpdate::default();
        };
        self.completed.insert(token);

        let level_completed = !self.signaled && self.is_complete();
        if level_completed {
            self.signaled = true;
        }

        CompletionUpdate {
            target_completed: true,
            level_completed,
        }
    }

    /// Returns true if `token` belongs to the original target set.
    pub fn is_target(&self, token: &Token) -> bool {
        self.remaining.contains(token) || self.completed.contains(token)
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
            && !self.completed.is_empty()
            && self.completed.len() == self.targets.len()
    }

    /// Fraction of targets completed, in `0.0..=1.0`. A level without targets
    /// reports zero.
    pub fn progress(&self) -> f64 {
        if self.targets.is_empty() {
            return 0.0;
        }
        self.completed.len() as f64 / self.targets.len() as f64
    }

    /// Returns true once the level-complete signal has been emitted.
    pub fn completion_signaled(&self) -> bool {
        self.signaled
    }

    /// Targets in the order the level lists them.
    pub fn targets(&self) -> &[Token] {
        &self.targets
    }

    pub fn remaining(&self) -> &BTreeSet<Token> {
        &self.remaining
    }

    pub fn completed(&self) -> &BTreeSet<Token> {
        &self.completed
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(targets: &[&str]) -> CompletionTracker {
        CompletionTracker::new(targets.iter().copied().map(Token::from))
    }

    #[test]
    fn non_targets_are_ignored() {
        let mut tracker = tracker(&["相"]);
        assert_eq!(
            tracker.on_token_entered(&"木".into()),
            CompletionUpdate::default()
        );
        assert!(tracker.completed().is_empty());
    }

    #[test]
    fn completing_a_target_twice_is_idempotent() {
        let mut tracker = tracker(&["相", "间"]);
        let first = tracker.on_token_entered(&"相".into());
        assert!(first.target_completed);

        let second = tracker.on_token_entered(&"相".into());
        assert_eq!(second, CompletionUpdate::default());
        assert_eq!(tracker.completed().len(), 1);
        assert_eq!(tracker.remaining().len(), 1);
    }

    #[test]
    fn level_completes_exactly_once() {
        let mut tracker = tracker(&["金", "相", "便", "间"]);
        let mut signals = 0;
        for glyph in ["金", "相", "便", "间", "相"] {
            if tracker.on_token_entered(&glyph.into()).level_completed {
                signals += 1;
            }
        }
        assert_eq!(signals, 1);
        assert!(tracker.is_complete());
        assert!(tracker.completion_signaled());
        assert_eq!(tracker.progress(), 1.0);
    }

    #[test]
    fn sets_stay_disjoint_and_cover_targets() {
        let mut tracker = tracker(&["金", "相", "便"]);
        tracker.on_token_entered(&"便".into());
        assert!(tracker.remaining().is_disjoint(tracker.completed()));
        assert_eq!(tracker.remaining().len() + tracker.completed().len(), 3);
        assert!((tracker.progress() - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn level_without_targets_never_completes() {
        let mut tracker = tracker(&[]);
        assert!(!tracker.is_complete());
        assert!(!tracker.on_token_entered(&"人".into()).level_completed);
        assert_eq!(tracker.progress(), 0.0);
    }

    #[test]
    fn duplicate_targets_collapse() {
        let tracker = tracker(&["相", "相", "间"]);
        assert_eq!(tracker.target_count(), 2);
        assert!(tracker.is_target(&"间".into()));
    }
}

//! Multiset of tokens currently available to the player.

use crate::error::{ErrorSeverity, GameError};
use crate::selection::SelectionState;
use crate::token::{InstanceId, Token};

/// One live instance in the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolEntry {
    pub id: InstanceId,
    pub token: Token,
}

/// Errors raised by [`TokenPool`] mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PoolError {
    /// The instance was never added or has already been removed.
    #[error("instance {0} is not in the pool")]
    NotFound(InstanceId),
}

impl GameError for PoolError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Contract
    }

    fn error_code(&self) -> &'static str {
        match self {
            PoolError::NotFound(_) => "POOL_INSTANCE_NOT_FOUND",
        }
    }
}

/// Ordered sequence of `(instance_id, token)` pairs.
///
/// Insertion order is preserved so frontends can lay tokens out stably.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenPool {
    entries: Vec<PoolEntry>,
    next_id: u32,
}

impl TokenPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pool holding one instance per seed token, in order.
    pub fn seeded<'a>(seed: impl IntoIterator<Item = &'a Token>) -> Self {
        let mut pool = Self::new();
        for token in seed {
            pool.add(token.clone());
        }
        pool
    }

    /// Appends a new instance and returns its fresh id.
    pub fn add(&mut self, token: Token) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        self.entries.push(PoolEntry { id, token });
        id
    }

    /// Removes an instance and returns its token value.
    pub fn remove(&mut self, id: InstanceId) -> Result<Token, PoolError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(PoolError::NotFound(id))?;
        Ok(self.entries.remove(index).token)
    }

    pub fn get(&self, id: InstanceId) -> Option<&Token> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.token)
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.get(id).is_some()
    }

    /// Returns true if at least one instance holds `token`.
    pub fn contains_value(&self, token: &Token) -> bool {
        self.entries.iter().any(|entry| &entry.token == token)
    }

    /// Number of instances holding `token`.
    pub fn count_value(&self, token: &Token) -> usize {
        self.entries
            .iter()
            .filter(|entry| &entry.token == token)
            .count()
    }

    /// Number of live instances that `selection` currently marks.
    pub fn count_selected(&self, selection: &SelectionState) -> usize {
        self.entries
            .iter()
            .filter(|entry| selection.contains(entry.id))
            .count()
    }

    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

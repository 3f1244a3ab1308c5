//! Static bidirectional mapping between composites and their constituent pairs.
//!
//! The table is built once from `(composite, part_a, part_b)` triples and is
//! never mutated afterwards; engines share it behind an `Arc`. Both lookup
//! directions are single hash lookups.

use std::collections::HashMap;

use crate::error::{ErrorSeverity, GameError};
use crate::token::Token;

/// One row of the composition table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositionEntry {
    pub composite: Token,
    pub parts: (Token, Token),
}

impl CompositionEntry {
    pub fn new(composite: impl Into<Token>, a: impl Into<Token>, b: impl Into<Token>) -> Self {
        Self {
            composite: composite.into(),
            parts: (a.into(), b.into()),
        }
    }
}

/// Errors raised while building a [`CompositionTable`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableError {
    /// The same composite appears in more than one entry.
    #[error("composite {composite} is defined more than once")]
    DuplicateComposite { composite: Token },

    /// Two composites share the same unordered pair, so recompose would be ambiguous.
    #[error("pair {{{a}, {b}}} composes both {existing} and {duplicate}")]
    AmbiguousPair {
        a: Token,
        b: Token,
        existing: Token,
        duplicate: Token,
    },
}

impl GameError for TableError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            TableError::DuplicateComposite { .. } => "TABLE_DUPLICATE_COMPOSITE",
            TableError::AmbiguousPair { .. } => "TABLE_AMBIGUOUS_PAIR",
        }
    }
}

/// Order-insensitive key for a constituent pair.
///
/// Stores the two tokens sorted, so `(a, b)` and `(b, a)` collapse to the same
/// key while `{a, a}` stays a two-element multiset that only matches two equal
/// tokens.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct PairKey(Token, Token);

impl PairKey {
    fn new(a: &Token, b: &Token) -> Self {
        if a <= b {
            Self(a.clone(), b.clone())
        } else {
            Self(b.clone(), a.clone())
        }
    }
}

/// Immutable composite ↔ pair lookup table.
#[derive(Clone, Debug, Default)]
pub struct CompositionTable {
    entries: Vec<CompositionEntry>,
    by_composite: HashMap<Token, usize>,
    by_pair: HashMap<PairKey, usize>,
}

impl CompositionTable {
    /// Builds a table from entries, rejecting duplicates and ambiguous pairs.
    pub fn new(entries: impl IntoIterator<Item = CompositionEntry>) -> Result<Self, TableError> {
        let mut table = Self::default();

        for entry in entries {
            if table.by_composite.contains_key(&entry.composite) {
                return Err(TableError::DuplicateComposite {
                    composite: entry.composite,
                });
            }

            let key = PairKey::new(&entry.parts.0, &entry.parts.1);
            if let Some(&existing) = table.by_pair.get(&key) {
                return Err(TableError::AmbiguousPair {
                    a: entry.parts.0,
                    b: entry.parts.1,
                    existing: table.entries[existing].composite.clone(),
                    duplicate: entry.composite,
                });
            }

            let index = table.entries.len();
            table.by_composite.insert(entry.composite.clone(), index);
            table.by_pair.insert(key, index);
            table.entries.push(entry);
        }

        Ok(table)
    }

    /// Builds a table from `(composite, part_a, part_b)` string triples.
    pub fn from_triples<'a>(
        triples: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    ) -> Result<Self, TableError> {
        Self::new(
            triples
                .into_iter()
                .map(|(composite, a, b)| CompositionEntry::new(composite, a, b)),
        )
    }

    /// Returns the canonical constituent pair of `composite`, if it can be split.
    pub fn decompose(&self, composite: &Token) -> Option<(Token, Token)> {
        self.by_composite
            .get(composite)
            .map(|&index| self.entries[index].parts.clone())
    }

    /// Returns the composite formed by the unordered pair `{a, b}`, if any.
    pub fn recompose(&self, a: &Token, b: &Token) -> Option<Token> {
        self.by_pair
            .get(&PairKey::new(a, b))
            .map(|&index| self.entries[index].composite.clone())
    }

    /// Returns true if `token` appears as a composite key.
    pub fn is_splittable(&self, token: &Token) -> bool {
        self.by_composite.contains_key(token)
    }

    /// All entries in definition order.
    pub fn entries(&self) -> &[CompositionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CompositionTable {
        CompositionTable::from_triples([
            ("闪", "门", "人"),
            ("相", "木", "目"),
            ("间", "门", "日"),
            ("林", "木", "木"),
        ])
        .unwrap()
    }

    #[test]
    fn decompose_returns_canonical_order() {
        let table = table();
        assert_eq!(
            table.decompose(&"闪".into()),
            Some((Token::from("门"), Token::from("人")))
        );
        assert_eq!(table.decompose(&"人".into()), None);
    }

    #[test]
    fn recompose_ignores_pair_order() {
        let table = table();
        assert_eq!(
            table.recompose(&"木".into(), &"目".into()),
            Some(Token::from("相"))
        );
        assert_eq!(
            table.recompose(&"目".into(), &"木".into()),
            Some(Token::from("相"))
        );
        assert_eq!(table.recompose(&"目".into(), &"日".into()), None);
    }

    #[test]
    fn decompose_and_recompose_are_inverse_for_every_entry() {
        let table = table();
        for entry in table.entries() {
            let (a, b) = table.decompose(&entry.composite).unwrap();
            assert_eq!(table.recompose(&a, &b).as_ref(), Some(&entry.composite));
            assert_eq!(table.recompose(&b, &a).as_ref(), Some(&entry.composite));
        }
    }

    #[test]
    fn identical_pair_only_matches_two_equal_tokens() {
        let table = table();
        assert_eq!(
            table.recompose(&"木".into(), &"木".into()),
            Some(Token::from("林"))
        );
        // A single 木 next to a different glyph must not hit the literal {木, 木} row.
        assert_eq!(table.recompose(&"木".into(), &"门".into()), None);
        // Nothing stores {门, 门}.
        assert_eq!(table.recompose(&"门".into(), &"门".into()), None);
    }

    #[test]
    fn rejects_duplicate_composite() {
        let err = CompositionTable::from_triples([("闪", "门", "人"), ("闪", "门", "入")])
            .unwrap_err();
        assert_eq!(err.error_code(), "TABLE_DUPLICATE_COMPOSITE");
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }

    #[test]
    fn rejects_pair_shared_by_two_composites() {
        let err = CompositionTable::from_triples([("相", "木", "目"), ("想", "目", "木")])
            .unwrap_err();
        assert!(matches!(
            err,
            TableError::AmbiguousPair { ref existing, .. } if existing.as_str() == "相"
        ));
    }

    #[test]
    fn empty_table_answers_nothing() {
        let table = CompositionTable::default();
        assert!(table.is_empty());
        assert_eq!(table.decompose(&"闪".into()), None);
        assert_eq!(table.recompose(&"门".into(), &"人".into()), None);
    }
}

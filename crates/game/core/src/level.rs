use crate::token::Token;

/// Static description of one puzzle level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelDefinition {
    /// Human-readable level name shown by frontends.
    pub name: String,
    /// Tokens that must be produced to finish the level.
    pub targets: Vec<Token>,
    /// Tokens the pool starts with. These never count towards targets.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: Vec<Token>,
    /// Tokens lying around in the world that the player can pick up.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pickups: Vec<Token>,
    /// Starting selection capacity; falls back to the engine config.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_selection: Option<usize>,
}

impl LevelDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_targets<T: Into<Token>>(mut self, targets: impl IntoIterator<Item = T>) -> Self {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_seed<T: Into<Token>>(mut self, seed: impl IntoIterator<Item = T>) -> Self {
        self.seed = seed.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pickups<T: Into<Token>>(mut self, pickups: impl IntoIterator<Item = T>) -> Self {
        self.pickups = pickups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_selection(mut self, max_selection: usize) -> Self {
        self.max_selection = Some(max_selection);
        self
    }
}

/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Selection capacity a level starts with, unless the level overrides it.
    pub max_selection: usize,
}

impl EngineConfig {
    // ===== rule constants =====
    /// Capacity the selection is reset to after every applied split or combine.
    ///
    /// The reset targets this literal value, not the capacity the level
    /// started with.
    pub const RESET_MAX_SELECTION: usize = 2;
    /// Tokens consumed by a combine.
    pub const COMBINE_ARITY: usize = 2;
    /// Tokens consumed by a split.
    pub const SPLIT_ARITY: usize = 1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_SELECTION: usize = 2;

    pub fn new() -> Self {
        Self {
            max_selection: Self::DEFAULT_MAX_SELECTION,
        }
    }

    pub fn with_max_selection(max_selection: usize) -> Self {
        Self { max_selection }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

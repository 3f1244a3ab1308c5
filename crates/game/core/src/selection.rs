//! Selection state machine gating which operation the player may commit.

use crate::token::InstanceId;

/// Which commit the current selection makes available.
///
/// This is a pure function of selection cardinality. Whether the selected
/// tokens actually split or combine is only checked at commit time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum OpEligibility {
    None,
    SplitEligible,
    CombineEligible,
}

/// Result of a single selection request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    Selected,
    Deselected,
    /// The request had nothing to do (already selected / not selected).
    Unchanged,
    /// The selection is at capacity; the request was dropped without error.
    CapacityReached,
}

/// Instance ids the player has marked, in the order they were marked.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionState {
    selected: Vec<InstanceId>,
    capacity: usize,
}

impl SelectionState {
    pub fn new(capacity: usize) -> Self {
        Self {
            selected: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Flips the selection state of `id`.
    ///
    /// Selecting beyond capacity is silently ignored; the player simply sees
    /// nothing happen.
    pub fn toggle(&mut self, id: InstanceId) -> SelectionChange {
        if self.deselect(id) {
            SelectionChange::Deselected
        } else {
            self.select(id)
        }
    }

    /// Marks `id` if there is room. Idempotent for already-selected ids.
    pub fn select(&mut self, id: InstanceId) -> SelectionChange {
        if self.contains(id) {
            return SelectionChange::Unchanged;
        }
        if self.selected.len() >= self.capacity {
            return SelectionChange::CapacityReached;
        }
        self.selected.push(id);
        SelectionChange::Selected
    }

    /// Unmarks `id`, returning whether it was selected.
    pub fn deselect(&mut self, id: InstanceId) -> bool {
        match self.selected.iter().position(|&selected| selected == id) {
            Some(index) => {
                self.selected.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn eligibility(&self) -> OpEligibility {
        match self.selected.len() {
            1 => OpEligibility::SplitEligible,
            2 => OpEligibility::CombineEligible,
            _ => OpEligibility::None,
        }
    }

    /// Changes capacity. Shrinking below the current size drops the most
    /// recent selections first.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.selected.truncate(capacity);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected(&self) -> &[InstanceId] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(crate::config::EngineConfig::DEFAULT_MAX_SELECTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_selects_then_deselects() {
        let mut selection = SelectionState::new(2);
        assert_eq!(selection.toggle(InstanceId(1)), SelectionChange::Selected);
        assert_eq!(selection.toggle(InstanceId(1)), SelectionChange::Deselected);
        assert!(selection.is_empty());
    }

    #[test]
    fn toggles_beyond_capacity_are_ignored() {
        let mut selection = SelectionState::new(2);
        for id in 0..5 {
            selection.toggle(InstanceId(id));
        }
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.selected(), &[InstanceId(0), InstanceId(1)]);
        assert_eq!(
            selection.toggle(InstanceId(9)),
            SelectionChange::CapacityReached
        );
    }

    #[test]
    fn deselect_frees_room_at_capacity() {
        let mut selection = SelectionState::new(1);
        selection.toggle(InstanceId(1));
        assert_eq!(
            selection.toggle(InstanceId(2)),
            SelectionChange::CapacityReached
        );
        selection.toggle(InstanceId(1));
        assert_eq!(selection.toggle(InstanceId(2)), SelectionChange::Selected);
    }

    #[test]
    fn eligibility_follows_cardinality_only() {
        let mut selection = SelectionState::new(3);
        assert_eq!(selection.eligibility(), OpEligibility::None);
        selection.select(InstanceId(1));
        assert_eq!(selection.eligibility(), OpEligibility::SplitEligible);
        selection.select(InstanceId(2));
        assert_eq!(selection.eligibility(), OpEligibility::CombineEligible);
        selection.select(InstanceId(3));
        assert_eq!(selection.eligibility(), OpEligibility::None);
    }

    #[test]
    fn select_is_idempotent() {
        let mut selection = SelectionState::new(2);
        selection.select(InstanceId(4));
        assert_eq!(selection.select(InstanceId(4)), SelectionChange::Unchanged);
        assert_eq!(selection.len(), 1);
        assert!(!selection.deselect(InstanceId(5)));
    }

    #[test]
    fn shrinking_capacity_drops_latest() {
        let mut selection = SelectionState::new(3);
        selection.select(InstanceId(1));
        selection.select(InstanceId(2));
        selection.select(InstanceId(3));
        selection.set_capacity(1);
        assert_eq!(selection.selected(), &[InstanceId(1)]);
    }
}

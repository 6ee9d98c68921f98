//! Selection model
//!
//! Tracks which entries are selected and the anchor used as pivot for range
//! and keyboard extension. All range math runs over the *visible* order that
//! the caller passes in, so filtering changes what a range covers.
//!
//! The selected list keeps the order in which entries were added. Membership
//! is what callers care about; the order matters only for keyboard
//! contraction, which drops the anchor's slot in that list.

mod debounce;
mod routing;

pub use debounce::{DEBOUNCE_WINDOW, IntentSlot};
pub use routing::{ClickRoute, Control, Node, route};

use crate::store::EntryId;

/// Arrow direction for keyboard selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// A selection action issued by the user, committed against live state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionIntent {
    Click(EntryId),
    CtrlClick(EntryId),
    ShiftClick(EntryId),
    SelectAll,
    /// Shift+Arrow
    Extend(Direction),
    /// Plain arrow: move a single selection to the neighbour
    Step(Direction),
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    selected: Vec<EntryId>,
    anchor: Option<EntryId>,
}

impl SelectionModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selected(&self) -> &[EntryId] {
        &self.selected
    }

    #[must_use]
    pub const fn anchor(&self) -> Option<EntryId> {
        self.anchor
    }

    #[must_use]
    pub fn is_selected(&self, id: EntryId) -> bool {
        self.selected.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in display order
    #[must_use]
    pub fn in_visible_order(&self, visible: &[EntryId]) -> Vec<EntryId> {
        visible.iter().copied().filter(|id| self.is_selected(*id)).collect()
    }

    /// Commit an intent against the current visible order.
    pub fn apply(&mut self, intent: SelectionIntent, visible: &[EntryId]) {
        match intent {
            SelectionIntent::Click(id) => self.click(id),
            SelectionIntent::CtrlClick(id) => self.ctrl_click(id),
            SelectionIntent::ShiftClick(id) => self.shift_click(id, visible),
            SelectionIntent::SelectAll => self.select_all(visible),
            SelectionIntent::Extend(direction) => self.extend(direction, visible),
            SelectionIntent::Step(direction) => self.step(direction, visible),
            SelectionIntent::Clear => self.clear(),
        }
    }

    pub fn click(&mut self, id: EntryId) {
        self.selected = vec![id];
        self.anchor = Some(id);
    }

    /// Toggle membership; the anchor moves even when the entry is removed.
    pub fn ctrl_click(&mut self, id: EntryId) {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
        self.anchor = Some(id);
    }

    /// Select the contiguous visible run between the anchor and `id`.
    ///
    /// Without a visible anchor this behaves like a plain click.
    pub fn shift_click(&mut self, id: EntryId, visible: &[EntryId]) {
        let anchor_idx = self.anchor.and_then(|a| index_of(visible, a));
        let (Some(a), Some(e)) = (anchor_idx, index_of(visible, id)) else {
            self.click(id);
            return;
        };

        let (start, end) = (a.min(e), a.max(e));
        self.selected = visible[start..=end].to_vec();
    }

    /// Anchor is left where it was.
    pub fn select_all(&mut self, visible: &[EntryId]) {
        self.selected = visible.to_vec();
    }

    /// Grow or shrink the band one step from the moving edge.
    pub fn extend(&mut self, direction: Direction, visible: &[EntryId]) {
        let Some(anchor_idx) = self.anchor.and_then(|a| index_of(visible, a)) else {
            self.select_first(visible);
            return;
        };

        let Some(next_idx) = neighbour(anchor_idx, direction, visible.len()) else {
            return;
        };
        let next = visible[next_idx];

        if self.is_selected(next) {
            if let Some(pos) = self.anchor.and_then(|a| self.selected.iter().position(|s| *s == a)) {
                self.selected.remove(pos);
            }
        } else {
            self.selected.push(next);
        }
        self.anchor = Some(next);
    }

    /// Replace the selection with the anchor's neighbour.
    pub fn step(&mut self, direction: Direction, visible: &[EntryId]) {
        let Some(anchor_idx) = self.anchor.and_then(|a| index_of(visible, a)) else {
            self.select_first(visible);
            return;
        };

        if let Some(next_idx) = neighbour(anchor_idx, direction, visible.len()) {
            self.click(visible[next_idx]);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Drop ids that no longer exist in the store.
    pub fn retain_existing(&mut self, existing: &[EntryId]) {
        self.selected.retain(|id| existing.contains(id));
        if self.anchor.is_some_and(|a| !existing.contains(&a)) {
            self.anchor = None;
        }
    }

    fn select_first(&mut self, visible: &[EntryId]) {
        if let Some(first) = visible.first() {
            self.click(*first);
        }
    }
}

fn index_of(visible: &[EntryId], id: EntryId) -> Option<usize> {
    visible.iter().position(|v| *v == id)
}

const fn neighbour(index: usize, direction: Direction, len: usize) -> Option<usize> {
    match direction {
        Direction::Up if index > 0 => Some(index - 1),
        Direction::Down if index + 1 < len => Some(index + 1),
        _ => None,
    }
}

//! Selection state for the details panel.

/// Which location, if any, is currently open in the details panel.
///
/// The index refers into the session's `LocationSet`. There is no terminal
/// state; the value lives as long as the viewer does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(usize),
}

impl SelectionState {
    /// Select a location from any state, returning the previous state so the
    /// caller can observe enter-vs-replace.
    pub fn select(&mut self, index: usize) -> SelectionState {
        std::mem::replace(self, SelectionState::Selected(index))
    }

    /// Clear the selection. Returns whether anything changed; dismissing an
    /// already-unselected state is a no-op.
    pub fn dismiss(&mut self) -> bool {
        match self {
            SelectionState::Unselected => false,
            SelectionState::Selected(_) => {
                *self = SelectionState::Unselected;
                true
            }
        }
    }

    /// The selected index, if any.
    pub fn selected(&self) -> Option<usize> {
        match self {
            SelectionState::Unselected => None,
            SelectionState::Selected(index) => Some(*index),
        }
    }
}

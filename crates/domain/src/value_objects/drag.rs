//! Drag-and-drop state machine for the dashboard grid
//!
//! `Idle -> Dragging { from } -> Idle`, committing exactly one grid swap on
//! an accepted drop. The hover target is a pure UI hint and never touches
//! committed state; cancelling or dropping on the origin slot mutates
//! nothing.

use crate::aggregates::SlotGrid;
use crate::error::DomainError;

/// Current phase of a drag gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    /// No drag in progress
    #[default]
    Idle,
    /// Dragging the occupant of `from`; `over` is the current hover hint
    Dragging { from: usize, over: Option<usize> },
}

/// Owns the drag gesture lifecycle for one grid.
///
/// The controller never holds item data - only slot indices - so the grid
/// remains the single source of truth until the drop commits.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Begin dragging from a slot.
    ///
    /// Only an occupied, in-range slot starts a gesture; otherwise the
    /// controller stays idle and `false` is returned.
    pub fn begin(&mut self, grid: &SlotGrid, from: usize) -> bool {
        if grid.get(from).is_none() {
            return false;
        }
        self.state = DragState::Dragging { from, over: None };
        true
    }

    /// Update the hover hint. Ignored while idle; commits nothing.
    pub fn hover(&mut self, slot: Option<usize>) {
        if let DragState::Dragging { from, .. } = self.state {
            self.state = DragState::Dragging { from, over: slot };
        }
    }

    /// Abandon the gesture without mutating the grid.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Accept a drop onto `to`, committing a single swap.
    ///
    /// Returns whether the grid changed: dropping on the origin slot is a
    /// no-op, and a drop while idle does nothing. The gesture ends either
    /// way, including on an out-of-range target.
    pub fn drop_onto(&mut self, grid: &mut SlotGrid, to: usize) -> Result<bool, DomainError> {
        let DragState::Dragging { from, .. } = self.state else {
            return Ok(false);
        };
        self.state = DragState::Idle;
        if from == to {
            return Ok(false);
        }
        grid.swap(from, to)?;
        Ok(true)
    }
}

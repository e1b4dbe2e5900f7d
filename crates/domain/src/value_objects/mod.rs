//! Value objects.

pub mod drag;

pub use drag::{DragController, DragState};

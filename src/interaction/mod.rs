//! Pointer interaction: editor modes, pointer samples and gesture trackers
//!
//! Gestures are two-phase: pointer-move mutates the live shapes, the end of
//! the gesture commits once. The `Editor` drives these types.

pub mod drag;
mod mode;
mod pointer;

pub use drag::{
    DragState, DrawTracker, ExtrudeTracker, ExtrudeUpdate, Gesture, Handle, MoveTracker,
    SphereTracker, classify_handle, radius_from_drag,
};
pub use mode::EditorMode;
pub use pointer::PointerEvent;

//! Gesture trackers
//!
//! A gesture runs from pointer-down to pointer-up (or, for two-click tools,
//! from the first click to the second). The active gesture is a single enum,
//! so a drag can never be half extrude and half move.
//!
//! Key types:
//! - `DragState`: initial/current position and pointer, plus the moved flag
//! - `Gesture`: Idle or one of the trackers below
//! - Trackers: DrawTracker, ExtrudeTracker, MoveTracker, SphereTracker
//!
//! Trackers keep the shape as it was at gesture start and recompute the
//! live shape from it on every update, so deltas never accumulate.

mod draw_tracker;
mod extrude_tracker;
mod move_tracker;
mod sphere_tracker;

pub use draw_tracker::DrawTracker;
pub use extrude_tracker::{ExtrudeTracker, ExtrudeUpdate, Handle, classify_handle};
pub use move_tracker::MoveTracker;
pub use sphere_tracker::{SphereTracker, radius_from_drag};

use crate::geometry::{Vec2, Vec3};
use crate::model::ShapeId;

/// State shared by all pointer drags
#[derive(Debug, Clone, Copy)]
pub struct DragState {
    /// Handle position at drag start (world space)
    pub initial_position: Vec3,
    /// Latest handle position
    pub current_position: Vec3,
    /// Pointer at drag start (normalized coordinates)
    pub initial_pointer: Vec2,
    /// Latest pointer
    pub current_pointer: Vec2,
    /// Set once the pointer travels past the click threshold; never cleared
    pub moved: bool,
}

impl DragState {
    pub fn new(initial_position: Vec3, initial_pointer: Vec2) -> Self {
        Self {
            initial_position,
            current_position: initial_position,
            initial_pointer,
            current_pointer: initial_pointer,
            moved: false,
        }
    }

    /// Record a pointer sample, flagging the drag as moved past `threshold`
    pub fn track_pointer(&mut self, pointer: Vec2, threshold: f32) {
        self.current_pointer = pointer;
        let d = pointer - self.initial_pointer;
        if d.x.abs() > threshold || d.y.abs() > threshold {
            self.moved = true;
        }
    }

    /// Get the total position delta from start
    pub fn position_delta(&self) -> Vec3 {
        self.current_position - self.initial_position
    }

    /// Get the pointer delta from start
    pub fn pointer_delta(&self) -> Vec2 {
        self.current_pointer - self.initial_pointer
    }
}

/// The gesture in progress
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// First point placed, waiting for the second click
    Drawing(DrawTracker),
    /// Height, radius or side drag on an existing shape
    Extruding(ExtrudeTracker),
    /// Whole-shape move on a view-aligned plane
    Moving(MoveTracker),
    /// New sphere being sized by vertical pointer travel
    PlacingSphere(SphereTracker),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Shape being dragged, if any
    pub fn shape_id(&self) -> Option<ShapeId> {
        match self {
            Gesture::Idle | Gesture::Drawing(_) => None,
            Gesture::Extruding(t) => Some(t.shape_id),
            Gesture::Moving(t) => Some(t.shape_id),
            Gesture::PlacingSphere(t) => Some(t.shape_id),
        }
    }

    /// Drag state of a pointer drag
    pub fn drag_state(&self) -> Option<&DragState> {
        match self {
            Gesture::Idle | Gesture::Drawing(_) => None,
            Gesture::Extruding(t) => Some(&t.drag),
            Gesture::Moving(t) => Some(&t.drag),
            Gesture::PlacingSphere(t) => Some(&t.drag),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Drawing(_) => "drawing",
            Gesture::Extruding(_) => "extruding",
            Gesture::Moving(_) => "moving",
            Gesture::PlacingSphere(_) => "placing sphere",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_state_moved_threshold() {
        let mut drag = DragState::new(Vec3::ZERO, Vec2::new(0.2, 0.2));
        drag.track_pointer(Vec2::new(0.205, 0.195), 0.01);
        assert!(!drag.moved);
        drag.track_pointer(Vec2::new(0.2, 0.22), 0.01);
        assert!(drag.moved);
        // Returning to the start does not clear it
        drag.track_pointer(Vec2::new(0.2, 0.2), 0.01);
        assert!(drag.moved);
    }

    #[test]
    fn test_idle_gesture() {
        let g = Gesture::default();
        assert!(g.is_idle());
        assert_eq!(g.shape_id(), None);
        assert!(g.drag_state().is_none());
    }
}

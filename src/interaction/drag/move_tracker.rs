//! Whole-shape move on a plane facing the camera

use crate::geometry::{Plane, Ray, Vec2, Vec3};
use crate::model::{Shape, ShapeId};
use super::DragState;

/// Translates one shape with the pointer
///
/// The delta is always measured from the recorded start point, never
/// accumulated per frame.
#[derive(Debug, Clone)]
pub struct MoveTracker {
    pub shape_id: ShapeId,
    pub drag: DragState,
    initial: Shape,
    plane: Plane,
}

impl MoveTracker {
    /// Start moving `shape`, grabbed at `hit`, on the plane through `hit`
    /// perpendicular to `view_dir`
    pub fn start(shape: &Shape, hit: Vec3, pointer: Vec2, view_dir: Vec3) -> Self {
        Self {
            shape_id: shape.id,
            drag: DragState::new(hit, pointer),
            initial: shape.clone(),
            plane: Plane::new(hit, view_dir),
        }
    }

    pub fn initial(&self) -> &Shape {
        &self.initial
    }

    /// Shape translated by the total drag so far. None when the ray misses
    /// the drag plane.
    pub fn update(&mut self, ray: &Ray, pointer: Vec2, click_threshold: f32) -> Option<Shape> {
        self.drag.track_pointer(pointer, click_threshold);
        self.drag.current_position = self.plane.intersect(ray)?;
        let mut shape = self.initial.clone();
        shape.translate(self.drag.position_delta());
        Some(shape)
    }
}

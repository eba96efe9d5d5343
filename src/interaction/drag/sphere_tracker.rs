//! Sphere placement: drop at a point, then size by vertical pointer travel

use crate::config::EditorConfig;
use crate::geometry::{Vec2, Vec3};
use crate::model::ShapeId;
use super::DragState;

/// Radius after a vertical drag, never below the configured minimum
pub fn radius_from_drag(initial: f32, dy: f32, config: &EditorConfig) -> f32 {
    (initial + dy * config.radius_sensitivity).max(config.min_radius)
}

/// Radius adjustment of a sphere placed at pointer-down
#[derive(Debug, Clone)]
pub struct SphereTracker {
    pub shape_id: ShapeId,
    pub drag: DragState,
    pub initial_radius: f32,
}

impl SphereTracker {
    pub fn start(shape_id: ShapeId, center: Vec3, radius: f32, pointer: Vec2) -> Self {
        Self {
            shape_id,
            drag: DragState::new(center, pointer),
            initial_radius: radius,
        }
    }

    /// Radius for the latest pointer sample
    pub fn update(&mut self, pointer: Vec2, config: &EditorConfig) -> f32 {
        self.drag.track_pointer(pointer, config.click_move_threshold);
        radius_from_drag(self.initial_radius, self.drag.pointer_delta().y, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_radius_follows_vertical_travel() {
        let config = EditorConfig::default();
        let mut t = SphereTracker::start(ShapeId(1), Vec3::ZERO, 10.0, Vec2::new(0.3, 0.3));
        assert_abs_diff_eq!(t.update(Vec2::new(0.3, 0.4), &config), 25.0, epsilon = 1e-3);
        assert_eq!(t.update(Vec2::new(0.3, -0.5), &config), config.min_radius);
        // Horizontal travel alone does not resize
        assert_abs_diff_eq!(t.update(Vec2::new(0.8, 0.3), &config), 10.0, epsilon = 1e-3);
        assert!(t.drag.moved);
    }
}

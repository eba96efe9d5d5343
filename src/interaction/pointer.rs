//! Pointer input delivered by the host

use crate::geometry::{Camera, Ray, Vec2, Vec3};

/// One pointer sample: pick ray, normalized position and camera direction
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub ray: Ray,
    /// Normalized device coordinates, y up
    pub ndc: Vec2,
    /// Direction the camera looks, for view-plane drags
    pub view_dir: Vec3,
}

impl PointerEvent {
    pub fn new(ray: Ray, ndc: Vec2, view_dir: Vec3) -> Self {
        Self { ray, ndc, view_dir: view_dir.normalize() }
    }

    /// Build the sample from the pick camera
    pub fn from_camera(camera: &Camera, ndc: Vec2) -> Self {
        Self::new(camera.ray_from_ndc(ndc), ndc, camera.view_direction())
    }
}

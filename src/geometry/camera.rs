//! Perspective camera used to turn pointer positions into pick rays
//!
//! Pointer coordinates are normalized device coordinates: x and y in
//! [-1, 1], y up. The host keeps the camera in sync with its renderer.

use std::f32::consts::FRAC_PI_2;

use super::math::{Vec2, Vec3};
use super::ray::Ray;

/// Pitch stays this far away from straight up/down
const PITCH_MARGIN: f32 = 0.01;

/// Orbit-style pick camera
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    /// Radians; positive looks down
    pub pitch: f32,
    /// Radians around +Y; zero looks along +Z
    pub yaw: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Viewport width / height
    pub aspect: f32,

    right: Vec3,
    up: Vec3,
    forward: Vec3,
}

impl Camera {
    pub fn new(eye: Vec3, pitch: f32, yaw: f32) -> Self {
        let mut camera = Self {
            eye,
            pitch,
            yaw,
            fov_y: 50.0_f32.to_radians(),
            aspect: 1.0,
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::UP,
            forward: Vec3::new(0.0, 0.0, 1.0),
        };
        camera.refresh_frame();
        camera
    }

    /// Camera at `eye` looking toward `target`
    pub fn look_at(eye: Vec3, target: Vec3) -> Self {
        let dir = (target - eye).normalize();
        let pitch = (-dir.y).clamp(-1.0, 1.0).asin();
        let yaw = dir.x.atan2(dir.z);
        Self::new(eye, pitch, yaw)
    }

    fn refresh_frame(&mut self) {
        let (sin_p, cos_p) = self.pitch.sin_cos();
        let (sin_y, cos_y) = self.yaw.sin_cos();
        self.forward = Vec3::new(cos_p * sin_y, -sin_p, cos_p * cos_y);

        // Looking straight up or down leaves forward x UP degenerate
        let right = self.forward.cross(Vec3::UP);
        self.right = if right.len() < 1e-4 {
            Vec3::new(-cos_y, 0.0, sin_y)
        } else {
            right.normalize()
        };
        self.up = self.right.cross(self.forward);
    }

    /// Orbit by a pitch/yaw delta in radians
    pub fn orbit(&mut self, d_pitch: f32, d_yaw: f32) {
        let limit = FRAC_PI_2 - PITCH_MARGIN;
        self.pitch = (self.pitch + d_pitch).clamp(-limit, limit);
        self.yaw += d_yaw;
        self.refresh_frame();
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Direction the camera looks
    pub fn view_direction(&self) -> Vec3 {
        self.forward
    }

    /// Pick ray through a normalized pointer position
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * self.aspect;
        let dir = self.forward + self.right * (ndc.x * half_w) + self.up * (ndc.y * half_h);
        Ray::new(self.eye, dir)
    }
}

impl Default for Camera {
    /// Three-quarter view of the origin
    fn default() -> Self {
        Self::look_at(Vec3::new(0.0, 400.0, -600.0), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_follows_view_direction() {
        let camera = Camera::look_at(Vec3::new(0.0, 200.0, -300.0), Vec3::ZERO);
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        let dot = ray.direction.dot(camera.view_direction());
        assert!(dot > 0.999, "Center ray should match view direction, got dot={}", dot);

        let to_target = (Vec3::ZERO - camera.eye).normalize();
        assert!(ray.direction.dot(to_target) > 0.999);
    }

    #[test]
    fn test_frame_is_y_up() {
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, -100.0), Vec3::ZERO);
        assert!(camera.up().y > 0.99, "up should be +Y, got {:?}", camera.up());

        // Pointer up moves the ray up
        let ray = camera.ray_from_ndc(Vec2::new(0.0, 0.5));
        assert!(ray.direction.y > 0.0);
    }

    #[test]
    fn test_top_down_camera() {
        let camera = Camera::look_at(Vec3::new(0.0, 100.0, 0.0), Vec3::ZERO);
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        assert!(ray.direction.y < -0.999);
        assert!(camera.right().len() > 0.99);
    }

    #[test]
    fn test_orbit_clamps_pitch() {
        let mut camera = Camera::default();
        camera.orbit(10.0, 0.0);
        assert!(camera.pitch < FRAC_PI_2);
        assert!(camera.view_direction().y < -0.99);
    }
}

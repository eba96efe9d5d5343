//! Spatial queries: hover, face detection, snapping and plane picking
//!
//! All queries are pure functions of a pick ray and a shape slice. Callers
//! pass the visible set for hover, face and click tests and the full set for
//! snapping.

pub mod face;
pub mod hover;
pub mod snap;

pub use face::{FaceHit, face_hit, nearest_face};
pub use hover::{clicked_measurement_id, hovered_shape_id, shape_hit_point};
pub use snap::{SnapResult, snap_candidates, snapped_height, snapped_position};

use crate::geometry::{Plane, Ray, Vec3};

/// Where the pointer ray meets the drawing plane (ground or a face)
pub fn drawing_point(ray: &Ray, plane: &Plane) -> Option<Vec3> {
    plane.intersect(ray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawing_point_on_face_plane() {
        let plane = Plane::new(Vec3::new(0.0, 0.0, 100.0), Vec3::new(0.0, 0.0, 1.0));
        let ray = Ray::new(Vec3::new(10.0, 20.0, 300.0), Vec3::new(0.0, 0.0, -1.0));
        let p = drawing_point(&ray, &plane).unwrap();
        assert!((p.z - 100.0).abs() < 0.001);
        assert!((p.x - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_drawing_point_parallel_ray() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(drawing_point(&ray, &Plane::ground()).is_none());
    }
}

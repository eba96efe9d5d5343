//! Point and height snapping
//!
//! Candidates are the world origin, rectangle corners (base and top),
//! sphere centers, cube corners and face centers, and measurement endpoints.
//! A candidate only wins when strictly closer than the threshold.

use crate::config::EditorConfig;
use crate::geometry::{Aabb, Vec3};
use crate::model::{Shape, ShapeId, ShapeKind};

/// Heights below this do not produce top-corner candidates
const MIN_TOP_HEIGHT: f32 = 0.1;

/// Result of snapping a raw point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub point: Vec3,
    pub is_snapped: bool,
}

impl SnapResult {
    pub fn raw(point: Vec3) -> Self {
        Self { point, is_snapped: false }
    }
}

/// Snap targets contributed by one shape
pub fn snap_candidates(shape: &Shape) -> Vec<Vec3> {
    match &shape.kind {
        ShapeKind::Rect(r) => {
            let normal = r.orientation.normal_axis().unit_vector();
            let mut points = Vec::with_capacity(8);
            for base in r.base_corners() {
                points.push(base);
                if r.height.abs() > MIN_TOP_HEIGHT {
                    points.push(base + normal * r.height);
                }
            }
            points
        }
        ShapeKind::Sphere(s) => {
            let mut points = vec![s.center];
            if s.is_cube() {
                let cube = Aabb::from_center_size(s.center, Vec3::splat(s.effective_radius() * 2.0));
                points.extend(cube.corners());
                points.extend(cube.face_centers());
            }
            points
        }
        ShapeKind::Measurement(m) => vec![m.start, m.end],
    }
}

/// Snap `raw` to the nearest feature within `threshold`.
///
/// The origin is checked first and wins outright when in range.
pub fn snapped_position(raw: Vec3, shapes: &[Shape], threshold: f32) -> SnapResult {
    if raw.len() < threshold {
        return SnapResult { point: Vec3::ZERO, is_snapped: true };
    }

    let mut best = SnapResult::raw(raw);
    let mut best_dist = threshold;
    for candidate in shapes.iter().flat_map(snap_candidates) {
        let d = candidate.distance(raw);
        if d < best_dist {
            best_dist = d;
            best = SnapResult { point: candidate, is_snapped: true };
        }
    }
    best
}

/// Magnet an extrusion height to other rectangles' heights, then to zero.
///
/// Returns the adjusted height and the value it snapped to, if any.
pub fn snapped_height(
    height: f32,
    shapes: &[Shape],
    exclude: ShapeId,
    config: &EditorConfig,
) -> (f32, Option<f32>) {
    let magnet = shapes
        .iter()
        .filter(|s| s.id != exclude)
        .filter_map(|s| s.as_rect().map(|r| r.height))
        .filter(|h| h.abs() >= config.height_magnet_min)
        .find(|h| (height - h).abs() < config.height_snap_threshold);

    if let Some(h) = magnet {
        return (h, Some(h));
    }
    if height.abs() < config.height_snap_threshold {
        return (0.0, Some(0.0));
    }
    (height, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityShape, FaceDirection, Measurement, Orientation, RectShape, SphereShape};

    fn wall(id: u64, a: Vec3, b: Vec3, height: f32) -> Shape {
        let mut r = RectShape::from_corners(a, b, Orientation::Xz, 0.0, FaceDirection::Positive);
        r.height = height;
        let mut s = Shape::new(ShapeKind::Rect(r));
        s.id = ShapeId(id);
        s
    }

    #[test]
    fn test_origin_snaps_first() {
        let r = snapped_position(Vec3::new(5.0, 0.0, 5.0), &[], 15.0);
        assert!(r.is_snapped);
        assert_eq!(r.point, Vec3::ZERO);
    }

    #[test]
    fn test_threshold_boundary() {
        let shapes = [wall(1, Vec3::new(100.0, 0.0, 100.0), Vec3::new(200.0, 0.0, 200.0), 0.0)];

        let inside = snapped_position(Vec3::new(114.99, 0.0, 100.0), &shapes, 15.0);
        assert!(inside.is_snapped);
        assert_eq!(inside.point, Vec3::new(100.0, 0.0, 100.0));

        let outside = Vec3::new(115.01, 0.0, 100.0);
        let r = snapped_position(outside, &shapes, 15.0);
        assert!(!r.is_snapped);
        assert_eq!(r.point, outside);
    }

    #[test]
    fn test_top_corners() {
        let shapes = [wall(1, Vec3::new(100.0, 0.0, 100.0), Vec3::new(200.0, 0.0, 200.0), 40.0)];
        let r = snapped_position(Vec3::new(102.0, 38.0, 101.0), &shapes, 15.0);
        assert_eq!(r.point, Vec3::new(100.0, 40.0, 100.0));
    }

    #[test]
    fn test_cube_and_measurement_candidates() {
        let cube = Shape::new(ShapeKind::Sphere(SphereShape {
            center: Vec3::new(100.0, 100.0, 100.0),
            radius: 10.0,
            entity_shape: EntityShape::Cube,
        }));
        assert_eq!(snap_candidates(&cube).len(), 15);

        let r = snapped_position(Vec3::new(112.0, 111.0, 109.0), &[cube], 15.0);
        assert_eq!(r.point, Vec3::new(110.0, 110.0, 110.0));

        let m = Shape::new(ShapeKind::Measurement(Measurement::new(
            Vec3::new(50.0, 0.0, 50.0),
            Vec3::new(90.0, 0.0, 50.0),
        )));
        let r = snapped_position(Vec3::new(88.0, 0.0, 52.0), &[m], 15.0);
        assert_eq!(r.point, Vec3::new(90.0, 0.0, 50.0));
    }

    #[test]
    fn test_snapped_height() {
        let config = EditorConfig::default();
        let shapes = [
            wall(1, Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 0.0),
            wall(2, Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 30.0),
        ];
        assert_eq!(snapped_height(30.6, &shapes, ShapeId(1), &config), (30.0, Some(30.0)));
        assert_eq!(snapped_height(0.4, &shapes, ShapeId(1), &config), (0.0, Some(0.0)));
        assert_eq!(snapped_height(12.0, &shapes, ShapeId(1), &config), (12.0, None));
        // Its own height is not a magnet
        assert_eq!(snapped_height(30.6, &shapes, ShapeId(2), &config), (30.6, None));
    }
}

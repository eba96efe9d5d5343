//! Hover and click picking
//!
//! Hover boxes are slightly inflated so thin walls and flat children stay
//! grabbable. When several boxes are hit at almost the same distance, child
//! shapes win over their parents, then the smaller footprint wins.

use crate::config::EditorConfig;
use crate::geometry::{Aabb, Ray, Vec3, ray_aabb_intersection, ray_point_distance, ray_segment_distance};
use crate::model::{Shape, ShapeId, ShapeKind};

/// Endpoints are this much easier to click than the dimension line itself
const ENDPOINT_THRESHOLD_FACTOR: f32 = 1.5;

#[derive(Debug, Clone, Copy)]
struct HoverHit {
    id: ShapeId,
    distance: f32,
    is_child: bool,
    area: f32,
}

/// Inflated pick box for a shape
fn hover_box(shape: &Shape, config: &EditorConfig) -> Aabb {
    let params = shape.box_params();
    let horizontal = if shape.is_child() { config.hole_hover_margin } else { config.hover_margin };
    let size = params.size() + Vec3::new(horizontal, config.hover_margin, horizontal);
    Aabb::from_center_size(params.center, size)
}

/// Find the shape under the pointer. Measurements are never hovered.
pub fn hovered_shape_id(ray: &Ray, shapes: &[Shape], config: &EditorConfig) -> Option<ShapeId> {
    let mut hits: Vec<HoverHit> = shapes
        .iter()
        .filter(|s| !s.is_measurement())
        .filter_map(|shape| {
            let t = ray_aabb_intersection(ray, &hover_box(shape, config))?;
            Some(HoverHit {
                id: shape.id,
                distance: t,
                is_child: shape.is_child(),
                area: shape.box_params().cross_section(),
            })
        })
        .collect();

    if hits.is_empty() {
        return None;
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    let nearest = hits[0].distance;

    // Among near-ties: children first, then smaller footprint, then nearer
    hits.iter()
        .take_while(|h| h.distance - nearest < config.hover_tie_distance)
        .min_by(|a, b| {
            b.is_child
                .cmp(&a.is_child)
                .then(a.area.total_cmp(&b.area))
                .then(a.distance.total_cmp(&b.distance))
        })
        .map(|h| h.id)
}

/// Point where the ray enters the shape, clamped into its tight box.
///
/// Falls back to the inflated hover box so grabbing the margin of a thin
/// shape still yields a point on the shape.
pub fn shape_hit_point(ray: &Ray, shape: &Shape, config: &EditorConfig) -> Option<Vec3> {
    let tight = shape.aabb();
    let t = ray_aabb_intersection(ray, &tight)
        .or_else(|| ray_aabb_intersection(ray, &hover_box(shape, config)))?;
    Some(tight.clamp(ray.at(t)))
}

/// Find the visible measurement closest to the ray, within `threshold` of its
/// line or `1.5 * threshold` of an endpoint
pub fn clicked_measurement_id(ray: &Ray, shapes: &[Shape], threshold: f32) -> Option<ShapeId> {
    let endpoint_threshold = threshold * ENDPOINT_THRESHOLD_FACTOR;
    let mut closest: Option<(ShapeId, f32)> = None;

    for shape in shapes.iter().filter(|s| s.visible) {
        let ShapeKind::Measurement(m) = &shape.kind else { continue };

        let candidates = [
            (ray_segment_distance(ray, m.start, m.end), threshold),
            (ray_point_distance(ray, m.start), endpoint_threshold),
            (ray_point_distance(ray, m.end), endpoint_threshold),
        ];
        for (dist, limit) in candidates {
            if dist < limit && closest.map_or(true, |(_, best)| dist < best) {
                closest = Some((shape.id, dist));
            }
        }
    }

    closest.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FaceDirection, Measurement, Orientation, RectShape};

    fn rect(id: u64, a: Vec3, b: Vec3, base: f32, height: f32, parent: Option<u64>) -> Shape {
        let mut r = RectShape::from_corners(a, b, Orientation::Xz, base, FaceDirection::Positive);
        r.height = height;
        let mut s = Shape::new(ShapeKind::Rect(r)).with_parent(parent.map(ShapeId));
        s.id = ShapeId(id);
        s
    }

    fn down_ray(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 500.0, z), Vec3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn test_hover_nearest() {
        let config = EditorConfig::default();
        let shapes = vec![
            rect(1, Vec3::ZERO, Vec3::new(100.0, 0.0, 100.0), 0.0, 10.0, None),
            rect(2, Vec3::ZERO, Vec3::new(100.0, 0.0, 100.0), 0.0, 50.0, None),
        ];
        assert_eq!(hovered_shape_id(&down_ray(50.0, 50.0), &shapes, &config), Some(ShapeId(2)));
        assert_eq!(hovered_shape_id(&down_ray(150.0, 50.0), &shapes, &config), None);
    }

    #[test]
    fn test_hover_prefers_child_on_tie() {
        let config = EditorConfig::default();
        // Flat child drawn on the top face of a height-50 parent
        let shapes = vec![
            rect(1, Vec3::ZERO, Vec3::new(100.0, 0.0, 100.0), 0.0, 50.0, None),
            rect(2, Vec3::new(20.0, 0.0, 20.0), Vec3::new(40.0, 0.0, 40.0), 50.0, 0.0, Some(1)),
        ];
        assert_eq!(hovered_shape_id(&down_ray(30.0, 30.0), &shapes, &config), Some(ShapeId(2)));
        assert_eq!(hovered_shape_id(&down_ray(80.0, 80.0), &shapes, &config), Some(ShapeId(1)));
    }

    #[test]
    fn test_hover_skips_measurements() {
        let config = EditorConfig::default();
        let mut m = Shape::new(ShapeKind::Measurement(Measurement::new(
            Vec3::ZERO,
            Vec3::new(100.0, 0.0, 0.0),
        )));
        m.id = ShapeId(5);
        assert_eq!(hovered_shape_id(&down_ray(50.0, 0.0), &[m], &config), None);
    }

    #[test]
    fn test_shape_hit_point_inside_box() {
        let config = EditorConfig::default();
        let s = rect(1, Vec3::ZERO, Vec3::new(100.0, 0.0, 100.0), 0.0, 50.0, None);
        let p = shape_hit_point(&down_ray(30.0, 60.0), &s, &config).unwrap();
        assert!((p.y - 50.0).abs() < 0.001);
        assert!((p.x - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_clicked_measurement() {
        let mut m = Shape::new(ShapeKind::Measurement(Measurement::new(
            Vec3::ZERO,
            Vec3::new(100.0, 0.0, 0.0),
        )));
        m.id = ShapeId(7);
        let shapes = vec![m.clone()];

        assert_eq!(clicked_measurement_id(&down_ray(50.0, 5.0), &shapes, 8.0), Some(ShapeId(7)));
        assert_eq!(clicked_measurement_id(&down_ray(50.0, 9.0), &shapes, 8.0), None);
        // Endpoint gets the wider threshold
        assert_eq!(clicked_measurement_id(&down_ray(-7.0, 7.0), &shapes, 8.0), Some(ShapeId(7)));

        m.visible = false;
        assert_eq!(clicked_measurement_id(&down_ray(50.0, 5.0), &[m], 8.0), None);
    }
}

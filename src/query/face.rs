//! Face detection: which of a volume's six faces the pointer is over

use crate::config::EditorConfig;
use crate::geometry::{Aabb, Axis, Plane, Ray, Vec3, ray_aabb_intersection};
use crate::model::{FaceDirection, Orientation, Shape, ShapeId, ShapeKind};

/// A face of an existing volume under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceHit {
    /// Volume the face belongs to
    pub parent_id: ShapeId,
    /// Base plane a shape drawn on this face gets
    pub orientation: Orientation,
    /// Face coordinate along the orientation normal
    pub face_offset: f32,
    pub face_direction: FaceDirection,
    pub plane: Plane,
    /// Where the ray entered the volume
    pub point: Vec3,
}

/// Faces in tie-break order: top, bottom, front, back, right, left
const FACES: [(Orientation, FaceDirection); 6] = [
    (Orientation::Xz, FaceDirection::Positive),
    (Orientation::Xz, FaceDirection::Negative),
    (Orientation::Xy, FaceDirection::Positive),
    (Orientation::Xy, FaceDirection::Negative),
    (Orientation::Yz, FaceDirection::Positive),
    (Orientation::Yz, FaceDirection::Negative),
];

/// Coordinate of a box face along its normal axis
pub fn face_coordinate(aabb: &Aabb, axis: Axis, direction: FaceDirection) -> f32 {
    match direction {
        FaceDirection::Positive => aabb.max.get(axis),
        FaceDirection::Negative => aabb.min.get(axis),
    }
}

/// Face of `aabb` closest to a point on its surface
pub fn nearest_face(aabb: &Aabb, point: Vec3) -> (Orientation, FaceDirection) {
    let mut best = FACES[0];
    let mut best_dist = f32::INFINITY;
    for (orientation, direction) in FACES {
        let axis = orientation.normal_axis();
        let d = (point.get(axis) - face_coordinate(aabb, axis, direction)).abs();
        if d < best_dist {
            best_dist = d;
            best = (orientation, direction);
        }
    }
    best
}

/// Shapes whose faces can be drawn on: extruded rectangles and cube entities
fn has_pickable_faces(shape: &Shape, config: &EditorConfig) -> bool {
    match &shape.kind {
        ShapeKind::Rect(r) => r.height.abs() >= config.face_min_height,
        ShapeKind::Sphere(s) => s.is_cube() && s.effective_radius() >= 0.01,
        ShapeKind::Measurement(_) => false,
    }
}

/// Resolve the ray to the nearest face of any eligible volume
pub fn face_hit(ray: &Ray, shapes: &[Shape], config: &EditorConfig) -> Option<FaceHit> {
    let mut closest: Option<(f32, FaceHit)> = None;

    for shape in shapes.iter().filter(|s| has_pickable_faces(s, config)) {
        let aabb = shape.aabb();
        let Some(t) = ray_aabb_intersection(ray, &aabb) else { continue };
        if closest.as_ref().is_some_and(|(best, _)| t >= *best) {
            continue;
        }

        let point = ray.at(t);
        let (orientation, face_direction) = nearest_face(&aabb, point);
        let axis = orientation.normal_axis();
        let face_offset = face_coordinate(&aabb, axis, face_direction);

        closest = Some((t, FaceHit {
            parent_id: shape.id,
            orientation,
            face_offset,
            face_direction,
            plane: Plane::axis_aligned(axis, face_offset),
            point,
        }));
    }

    closest.map(|(_, hit)| hit)
}

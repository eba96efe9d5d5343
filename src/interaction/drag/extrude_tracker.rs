//! Extrude drags: height, sphere radius, and one-sided footprint resize

use crate::config::EditorConfig;
use crate::geometry::{Axis, Plane, Ray, Vec2, Vec3};
use crate::model::{FaceDirection, Shape, ShapeId, ShapeKind};
use crate::query::face::face_coordinate;
use crate::query::{nearest_face, snapped_height};
use super::DragState;
use super::sphere_tracker::radius_from_drag;

/// Which part of a shape the drag grabbed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// Extrusion height (or radius for spheres)
    Height,
    /// One side of the footprint along an in-plane axis
    Side { axis: Axis, positive: bool },
}

/// Classify a grab point on the shape's box.
///
/// The nearest box face decides; faces on the extrusion axis win when they
/// are within `handle_epsilon` of the nearest. Measurements have no handle.
pub fn classify_handle(shape: &Shape, point: Vec3, config: &EditorConfig) -> Option<Handle> {
    let rect = match &shape.kind {
        ShapeKind::Rect(r) => r,
        ShapeKind::Sphere(_) => return Some(Handle::Height),
        ShapeKind::Measurement(_) => return None,
    };

    let aabb = shape.aabb();
    let normal = rect.orientation.normal_axis();
    let (orientation, direction) = nearest_face(&aabb, point);
    let axis = orientation.normal_axis();
    if axis == normal {
        return Some(Handle::Height);
    }

    let side_dist = (point.get(axis) - face_coordinate(&aabb, axis, direction)).abs();
    let cap_dist = (point.get(normal) - aabb.min.get(normal))
        .abs()
        .min((point.get(normal) - aabb.max.get(normal)).abs());
    if cap_dist - side_dist <= config.handle_epsilon {
        return Some(Handle::Height);
    }

    Some(Handle::Side { axis, positive: direction == FaceDirection::Positive })
}

/// Live result of an extrude update
#[derive(Debug, Clone)]
pub struct ExtrudeUpdate {
    pub shape: Shape,
    /// Height the drag snapped to, shown as a guide
    pub height_guide: Option<f32>,
}

/// Drag on an existing shape, started in extrude mode
#[derive(Debug, Clone)]
pub struct ExtrudeTracker {
    pub shape_id: ShapeId,
    pub handle: Handle,
    pub drag: DragState,
    /// Shape as it was at pointer-down
    initial: Shape,
    /// Plane side drags are measured on
    side_plane: Plane,
}

impl ExtrudeTracker {
    /// Start a drag on `shape` grabbed at `hit`. None for measurements.
    pub fn start(shape: &Shape, hit: Vec3, pointer: Vec2, config: &EditorConfig) -> Option<Self> {
        let handle = classify_handle(shape, hit, config)?;
        let normal = shape
            .as_rect()
            .map_or(Vec3::UP, |r| r.orientation.normal_axis().unit_vector());
        Some(Self {
            shape_id: shape.id,
            handle,
            drag: DragState::new(hit, pointer),
            initial: shape.clone(),
            side_plane: Plane::new(hit, normal),
        })
    }

    pub fn initial(&self) -> &Shape {
        &self.initial
    }

    /// Recompute the shape from the gesture start and the latest pointer.
    ///
    /// `others` is the full shape list, used for height magnets. Returns None
    /// when a side drag's ray misses its plane; the caller keeps the last shape.
    pub fn update(
        &mut self,
        ray: &Ray,
        pointer: Vec2,
        others: &[Shape],
        config: &EditorConfig,
    ) -> Option<ExtrudeUpdate> {
        self.drag.track_pointer(pointer, config.click_move_threshold);
        let dy = self.drag.pointer_delta().y;
        let mut shape = self.initial.clone();

        let height_guide = match (&mut shape.kind, self.handle) {
            (ShapeKind::Sphere(s), _) => {
                s.radius = radius_from_drag(s.effective_radius(), dy, config);
                None
            }
            (ShapeKind::Rect(r), Handle::Height) => {
                let raw = r.height + dy * config.extrude_sensitivity;
                let (height, guide) = snapped_height(raw, others, self.shape_id, config);
                r.height = height;
                guide
            }
            (ShapeKind::Rect(r), Handle::Side { axis, positive }) => {
                let p = self.side_plane.intersect(ray)?;
                self.drag.current_position = p;
                let delta = self.drag.position_delta().get(axis);

                let coords = r.points.map(|p| p.get(axis));
                let lo = coords.iter().copied().fold(f32::INFINITY, f32::min);
                let hi = coords.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                let center = (lo + hi) * 0.5;
                let min_size = config.min_rect_size;

                for point in r.points.iter_mut() {
                    let c = point.get(axis);
                    let moved = if positive && c > center {
                        (c + delta).max(lo + min_size)
                    } else if !positive && c < center {
                        (c + delta).min(hi - min_size)
                    } else {
                        continue;
                    };
                    *point = point.with(axis, moved);
                }
                None
            }
            (ShapeKind::Measurement(_), _) => return None,
        };

        Some(ExtrudeUpdate { shape, height_guide })
    }
}

//! Two-click tracker for rectangles, dimensions and calibration lines

use crate::geometry::{Plane, Vec3};
use crate::model::{FaceDirection, Orientation, RectShape};
use crate::query::FaceHit;

/// First click recorded, waiting for the second
#[derive(Debug, Clone)]
pub struct DrawTracker {
    pub start: Vec3,
    /// Face the first click landed on, None = ground
    pub face: Option<FaceHit>,
    /// Latest resolved pointer position, for the preview
    pub current: Vec3,
}

impl DrawTracker {
    pub fn new(start: Vec3, face: Option<FaceHit>) -> Self {
        Self { start, face, current: start }
    }

    /// Plane the second point is resolved on
    pub fn plane(&self) -> Plane {
        self.face.map_or_else(Plane::ground, |f| f.plane)
    }

    /// Rectangle spanned by the start and `end`, or None when shorter than `min_size`
    pub fn rect_to(&self, end: Vec3, min_size: f32) -> Option<RectShape> {
        if self.start.distance(end) <= min_size {
            return None;
        }
        let (orientation, offset, direction) = match &self.face {
            Some(f) => (f.orientation, f.face_offset, f.face_direction),
            None => (Orientation::Xz, 0.0, FaceDirection::Positive),
        };
        Some(RectShape::from_corners(self.start, end, orientation, offset, direction))
    }

    /// Preview rectangle to the current pointer position
    pub fn preview(&self) -> Option<RectShape> {
        self.rect_to(self.current, 0.0)
    }
}

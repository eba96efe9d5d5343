//! Shape entities and their box parameters
//!
//! A document is a flat list of shapes. Rectangles live on a base plane
//! (`Orientation`) and extrude along its normal; spheres are point entities
//! drawn as a sphere or a cube; measurements are dimension lines.
//! A rectangle drawn on a face of another volume records that volume as its
//! parent plus the face it was drawn on. The anchoring is captured once at
//! creation and is not re-derived when the parent later moves.

use std::fmt;

use serde::{Serialize, Deserialize};

use crate::geometry::{Aabb, Axis, Vec3};
use super::color::HexColor;
use super::layer::LayerId;

/// Thickness used for the box of a flat (not yet extruded) rectangle
pub const FLAT_THICKNESS: f32 = 0.01;

/// Radius assumed when a sphere has no usable radius
pub const DEFAULT_RADIUS: f32 = 10.0;

// =============================================================================
// Identifiers and enums
// =============================================================================

/// Opaque shape identifier, unique within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Base plane of a rectangle; the remaining axis is the extrusion normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Horizontal, extrudes along Y
    #[default]
    Xz,
    /// Front/back wall, extrudes along Z
    Xy,
    /// Left/right wall, extrudes along X
    Yz,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [Orientation::Xz, Orientation::Xy, Orientation::Yz];

    /// Axis the shape extrudes along
    pub fn normal_axis(&self) -> Axis {
        match self {
            Orientation::Xz => Axis::Y,
            Orientation::Xy => Axis::Z,
            Orientation::Yz => Axis::X,
        }
    }

    /// In-plane axes as (width axis, depth axis)
    pub fn base_axes(&self) -> (Axis, Axis) {
        match self {
            Orientation::Xz => (Axis::X, Axis::Z),
            Orientation::Xy => (Axis::X, Axis::Y),
            Orientation::Yz => (Axis::Z, Axis::Y),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Xz => "xz",
            Orientation::Xy => "xy",
            Orientation::Yz => "yz",
        }
    }
}

/// Which side of its parent a child was drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum FaceDirection {
    /// Top, front or right face
    #[default]
    Positive,
    /// Bottom, back or left face
    Negative,
}

impl FaceDirection {
    pub fn sign(&self) -> f32 {
        match self {
            FaceDirection::Positive => 1.0,
            FaceDirection::Negative => -1.0,
        }
    }
}

/// Rendered form of a sphere-typed entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntityShape {
    #[default]
    Sphere,
    Cube,
}

impl EntityShape {
    pub fn label(&self) -> &'static str {
        match self {
            EntityShape::Sphere => "Sphere",
            EntityShape::Cube => "Cube",
        }
    }
}

/// Discriminant of `ShapeKind`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Rect,
    Sphere,
    Measurement,
}

impl ShapeType {
    /// Prefix for generated names ("Wall 3", "Object 1", ...)
    pub fn name_prefix(&self) -> &'static str {
        match self {
            ShapeType::Rect => "Wall",
            ShapeType::Sphere => "Object",
            ShapeType::Measurement => "Dimension",
        }
    }
}

// =============================================================================
// Shape payloads
// =============================================================================

/// Rectangle drawn on a base plane, optionally extruded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectShape {
    /// Corners in drawing order; 0 and 2 are diagonal
    pub points: [Vec3; 4],
    /// Signed extrusion along the orientation normal, 0 = flat
    pub height: f32,
    /// Y of the base plane for `Xz` rectangles
    pub base_y: f32,
    pub orientation: Orientation,
    /// Coordinate of the base plane along the normal for `Xy`/`Yz`
    pub face_offset: f32,
    pub face_direction: FaceDirection,
}

impl RectShape {
    /// Axis-aligned rectangle spanned by two opposite corners on a base plane
    pub fn from_corners(
        a: Vec3,
        b: Vec3,
        orientation: Orientation,
        plane_offset: f32,
        face_direction: FaceDirection,
    ) -> Self {
        let (u, v) = orientation.base_axes();
        let n = orientation.normal_axis();
        let corner = |cu: f32, cv: f32| {
            Vec3::ZERO.with(u, cu).with(v, cv).with(n, plane_offset)
        };
        let (au, av, bu, bv) = (a.get(u), a.get(v), b.get(u), b.get(v));
        Self {
            points: [corner(au, av), corner(bu, av), corner(bu, bv), corner(au, bv)],
            height: 0.0,
            base_y: if orientation == Orientation::Xz { plane_offset } else { 0.0 },
            orientation,
            face_offset: if orientation == Orientation::Xz { 0.0 } else { plane_offset },
            face_direction,
        }
    }

    /// Coordinate of the base plane along the normal axis
    pub fn base_offset(&self) -> f32 {
        match self.orientation {
            Orientation::Xz => self.base_y,
            Orientation::Xy | Orientation::Yz => self.face_offset,
        }
    }

    /// Center of the footprint (between corners 0 and 2) on the base plane
    pub fn footprint_center(&self) -> Vec3 {
        let mid = (self.points[0] + self.points[2]) * 0.5;
        mid.with(self.orientation.normal_axis(), self.base_offset())
    }

    /// Corners projected onto the base plane
    pub fn base_corners(&self) -> [Vec3; 4] {
        let n = self.orientation.normal_axis();
        let offset = self.base_offset();
        self.points.map(|p| p.with(n, offset))
    }
}

/// Point entity rendered as a sphere or a cube
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereShape {
    pub center: Vec3,
    pub radius: f32,
    pub entity_shape: EntityShape,
}

impl SphereShape {
    /// Radius with the zero fallback applied
    pub fn effective_radius(&self) -> f32 {
        if self.radius > 0.0 { self.radius } else { DEFAULT_RADIUS }
    }

    pub fn is_cube(&self) -> bool {
        self.entity_shape == EntityShape::Cube
    }
}

/// Linear dimension between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub start: Vec3,
    pub end: Vec3,
    /// Cached |end - start|
    pub distance: f32,
}

impl Measurement {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end, distance: start.distance(end) }
    }

    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }
}

/// Type-specific payload; the variant is fixed at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rect(RectShape),
    Sphere(SphereShape),
    Measurement(Measurement),
}

// =============================================================================
// Shape
// =============================================================================

/// A drawable entity in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub name: String,
    pub layer_id: LayerId,
    pub visible: bool,
    /// Per-shape override of the layer color
    pub color: Option<HexColor>,
    /// Volume this shape was drawn on, if any
    pub parent_id: Option<ShapeId>,
    pub kind: ShapeKind,
}

/// World-space box of a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxParams {
    /// Full extents along X, Y, Z
    pub box_args: [f32; 3],
    pub center: Vec3,
    /// Footprint width along the first base axis
    pub width: f32,
    /// Footprint depth along the second base axis
    pub depth: f32,
    /// Box extent along the normal
    pub abs_height: f32,
}

impl BoxParams {
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.box_args[0], self.box_args[1], self.box_args[2])
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.center, self.size())
    }

    /// Horizontal cross-section used to rank overlapping hover hits
    pub fn cross_section(&self) -> f32 {
        self.box_args[0] * self.box_args[2]
    }
}

impl Shape {
    /// Shape with default name, layer and visibility; ids are assigned by the document
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            id: ShapeId(0),
            name: String::new(),
            layer_id: LayerId::DEFAULT,
            visible: true,
            color: None,
            parent_id: None,
            kind,
        }
    }

    pub fn with_parent(mut self, parent_id: Option<ShapeId>) -> Self {
        self.parent_id = parent_id;
        self
    }

    pub fn shape_type(&self) -> ShapeType {
        match &self.kind {
            ShapeKind::Rect(_) => ShapeType::Rect,
            ShapeKind::Sphere(_) => ShapeType::Sphere,
            ShapeKind::Measurement(_) => ShapeType::Measurement,
        }
    }

    pub fn as_rect(&self) -> Option<&RectShape> {
        match &self.kind {
            ShapeKind::Rect(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_rect_mut(&mut self) -> Option<&mut RectShape> {
        match &mut self.kind {
            ShapeKind::Rect(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_sphere(&self) -> Option<&SphereShape> {
        match &self.kind {
            ShapeKind::Sphere(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sphere_mut(&mut self) -> Option<&mut SphereShape> {
        match &mut self.kind {
            ShapeKind::Sphere(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_measurement(&self) -> Option<&Measurement> {
        match &self.kind {
            ShapeKind::Measurement(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_measurement(&self) -> bool {
        matches!(self.kind, ShapeKind::Measurement(_))
    }

    pub fn is_child(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Signed extrusion of a rectangle, 0 for other shapes
    pub fn height(&self) -> f32 {
        self.as_rect().map_or(0.0, |r| r.height)
    }

    /// Convert the shape to its world-space box
    pub fn box_params(&self) -> BoxParams {
        match &self.kind {
            ShapeKind::Sphere(s) => {
                let side = s.effective_radius() * 2.0;
                BoxParams {
                    box_args: [side, side, side],
                    center: s.center,
                    width: side,
                    depth: side,
                    abs_height: side,
                }
            }
            ShapeKind::Measurement(m) => {
                let size = (m.end - m.start).max(m.start - m.end);
                BoxParams {
                    box_args: [size.x, size.y, size.z],
                    center: m.midpoint(),
                    width: m.distance,
                    depth: 0.0,
                    abs_height: 0.0,
                }
            }
            ShapeKind::Rect(r) => rect_box_params(r),
        }
    }

    pub fn aabb(&self) -> Aabb {
        self.box_params().aabb()
    }

    /// True when a child extrudes away from its parent's face (an addition),
    /// false for roots and for children cut into the parent (holes)
    pub fn is_outward_extrusion(&self) -> bool {
        if self.parent_id.is_none() {
            return false;
        }
        match &self.kind {
            ShapeKind::Rect(r) => r.height * r.face_direction.sign() > 0.0,
            ShapeKind::Sphere(_) | ShapeKind::Measurement(_) => false,
        }
    }

    /// Move the whole shape; the box center moves by exactly `delta`
    pub fn translate(&mut self, delta: Vec3) {
        match &mut self.kind {
            ShapeKind::Rect(r) => {
                for p in r.points.iter_mut() {
                    *p += delta;
                }
                match r.orientation {
                    Orientation::Xz => r.base_y += delta.y,
                    Orientation::Xy => r.face_offset += delta.z,
                    Orientation::Yz => r.face_offset += delta.x,
                }
            }
            ShapeKind::Sphere(s) => s.center += delta,
            ShapeKind::Measurement(m) => {
                m.start += delta;
                m.end += delta;
            }
        }
    }

    /// Multiply every length by `ratio`
    pub fn rescale(&mut self, ratio: f32) {
        match &mut self.kind {
            ShapeKind::Rect(r) => {
                for p in r.points.iter_mut() {
                    *p = *p * ratio;
                }
                r.height *= ratio;
                r.base_y *= ratio;
                r.face_offset *= ratio;
            }
            ShapeKind::Sphere(s) => {
                s.center = s.center * ratio;
                s.radius = s.effective_radius() * ratio;
            }
            ShapeKind::Measurement(m) => {
                m.start = m.start * ratio;
                m.end = m.end * ratio;
                m.distance *= ratio;
            }
        }
    }
}

fn rect_box_params(r: &RectShape) -> BoxParams {
    let (p0, p2) = (r.points[0], r.points[2]);
    let extent = if r.height.abs() > 0.0 { r.height.abs() } else { FLAT_THICKNESS };
    let along_normal = r.base_offset() + r.height / 2.0;

    match r.orientation {
        Orientation::Xz => {
            let w = (p0.x - p2.x).abs();
            let d = (p0.z - p2.z).abs();
            BoxParams {
                box_args: [w, extent, d],
                center: Vec3::new((p0.x + p2.x) / 2.0, along_normal, (p0.z + p2.z) / 2.0),
                width: w,
                depth: d,
                abs_height: extent,
            }
        }
        Orientation::Xy => {
            let w = (p0.x - p2.x).abs();
            let h = (p0.y - p2.y).abs();
            BoxParams {
                box_args: [w, h, extent],
                center: Vec3::new((p0.x + p2.x) / 2.0, (p0.y + p2.y) / 2.0, along_normal),
                width: w,
                depth: h,
                abs_height: extent,
            }
        }
        Orientation::Yz => {
            let w = (p0.z - p2.z).abs();
            let h = (p0.y - p2.y).abs();
            BoxParams {
                box_args: [extent, h, w],
                center: Vec3::new(along_normal, (p0.y + p2.y) / 2.0, (p0.z + p2.z) / 2.0),
                width: w,
                depth: h,
                abs_height: extent,
            }
        }
    }
}

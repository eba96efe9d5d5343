//! View models for the layer list and the edit panel
//!
//! Nothing here draws; the UI layer renders these rows and feeds edits back
//! through the editor commands.

use std::fmt;

use crate::document::Document;
use crate::error::EditError;
use crate::geometry::Vec3;
use crate::model::{HexColor, LayerId, Orientation, Shape, ShapeId, ShapeKind};

// =============================================================================
// Layer list
// =============================================================================

/// One shape line in the layer list
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRow {
    pub id: ShapeId,
    pub name: String,
    pub visible: bool,
    /// Shape color override, else the layer color
    pub color: HexColor,
    pub is_child: bool,
    pub position: String,
    pub dimensions: String,
}

/// A layer with the shapes on it, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGroup {
    pub layer_id: LayerId,
    pub name: String,
    pub visible: bool,
    pub color: HexColor,
    pub rows: Vec<ShapeRow>,
}

/// Group the document's shapes by layer, in layer order
pub fn layer_groups(document: &Document, canvas_scale: f32) -> Vec<LayerGroup> {
    document
        .layers()
        .iter()
        .map(|layer| LayerGroup {
            layer_id: layer.id,
            name: layer.name.clone(),
            visible: layer.visible,
            color: layer.color,
            rows: document
                .shapes()
                .iter()
                .filter(|s| s.layer_id == layer.id)
                .map(|s| ShapeRow {
                    id: s.id,
                    name: s.name.clone(),
                    visible: s.visible,
                    color: s.color.unwrap_or(layer.color),
                    is_child: s.is_child(),
                    position: position_label(s, canvas_scale),
                    dimensions: dimensions_label(s, canvas_scale),
                })
                .collect(),
        })
        .collect()
}

/// Whole display units; never prints "-0"
fn whole(v: f32, scale: f32) -> f32 {
    (v * scale).round() + 0.0
}

fn point_label(p: Vec3, scale: f32, sep: &str) -> String {
    format!(
        "({:.0}{sep}{:.0}{sep}{:.0})",
        whole(p.x, scale),
        whole(p.y, scale),
        whole(p.z, scale),
    )
}

/// Box center, sphere center, or both measurement endpoints
pub fn position_label(shape: &Shape, scale: f32) -> String {
    match &shape.kind {
        ShapeKind::Sphere(s) => point_label(s.center, scale, ", "),
        ShapeKind::Measurement(m) => format!(
            "{}→{}",
            point_label(m.start, scale, ","),
            point_label(m.end, scale, ","),
        ),
        ShapeKind::Rect(_) => point_label(shape.box_params().center, scale, ", "),
    }
}

/// "W×D×H" for rectangles, "r=R" for spheres, the length for measurements
pub fn dimensions_label(shape: &Shape, scale: f32) -> String {
    match &shape.kind {
        ShapeKind::Sphere(s) => format!("r={:.1}", s.effective_radius() * scale),
        ShapeKind::Measurement(m) => format_distance(m.distance * scale),
        ShapeKind::Rect(_) => {
            let b = shape.box_params();
            format!(
                "{:.0}×{:.0}×{:.0}",
                whole(b.width, scale),
                whole(b.depth, scale),
                whole(b.abs_height, scale),
            )
        }
    }
}

/// Millimetres, switching to metres from 1000
pub fn format_distance(mm: f32) -> String {
    if mm >= 1000.0 {
        format!("{:.2} m", mm / 1000.0)
    } else {
        format!("{:.2} mm", mm)
    }
}

// =============================================================================
// Edit panel
// =============================================================================

/// Arrow buttons on the edit panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    pub const ALL: [MoveDirection; 4] = [
        MoveDirection::Up,
        MoveDirection::Down,
        MoveDirection::Left,
        MoveDirection::Right,
    ];

    /// World-space offset for one press, as seen facing the base plane.
    ///
    /// Floors move in X/Z with up going to -Z. Walls move vertically in Y;
    /// on side walls left is +Z.
    pub fn delta(self, orientation: Orientation, step: f32) -> Vec3 {
        let (x, y, z) = match (orientation, self) {
            (Orientation::Xz, MoveDirection::Up) => (0.0, 0.0, -step),
            (Orientation::Xz, MoveDirection::Down) => (0.0, 0.0, step),
            (Orientation::Xz | Orientation::Xy, MoveDirection::Left) => (-step, 0.0, 0.0),
            (Orientation::Xz | Orientation::Xy, MoveDirection::Right) => (step, 0.0, 0.0),
            (Orientation::Xy | Orientation::Yz, MoveDirection::Up) => (0.0, step, 0.0),
            (Orientation::Xy | Orientation::Yz, MoveDirection::Down) => (0.0, -step, 0.0),
            (Orientation::Yz, MoveDirection::Left) => (0.0, 0.0, step),
            (Orientation::Yz, MoveDirection::Right) => (0.0, 0.0, -step),
        };
        Vec3::new(x, y, z)
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MoveDirection::Up => "up",
            MoveDirection::Down => "down",
            MoveDirection::Left => "left",
            MoveDirection::Right => "right",
        };
        f.write_str(s)
    }
}

/// Parse a number typed into an edit-panel field
pub fn parse_field(field: &'static str, text: &str) -> Result<f32, EditError> {
    let value: f32 = text
        .trim()
        .parse()
        .map_err(|_| EditError::non_finite(field, text.trim()))?;
    if !value.is_finite() {
        return Err(EditError::non_finite(field, value));
    }
    Ok(value)
}

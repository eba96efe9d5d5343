//! Editor modes

use serde::{Serialize, Deserialize};

/// What a primary click does in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditorMode {
    /// Orbit/pan only; clicking a dimension selects it
    #[default]
    View,
    /// Two clicks span a rectangle on the ground or on a face
    DrawRect,
    /// Drag a shape's height or side, click to edit, drag to move while editing
    Extrude,
    /// Click to drop a sphere, drag vertically to size it
    PlaceSphere,
    /// Two clicks measure a reference length for scale calibration
    Calibrate,
    /// Two clicks add a dimension line
    Measure,
}

impl EditorMode {
    pub const ALL: [EditorMode; 6] = [
        EditorMode::View,
        EditorMode::DrawRect,
        EditorMode::Extrude,
        EditorMode::PlaceSphere,
        EditorMode::Calibrate,
        EditorMode::Measure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::DrawRect => "draw_rect",
            Self::Extrude => "extrude",
            Self::PlaceSphere => "place_sphere",
            Self::Calibrate => "calibrate",
            Self::Measure => "measure",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::View => "View",
            Self::DrawRect => "Draw",
            Self::Extrude => "Extrude",
            Self::PlaceSphere => "Object",
            Self::Calibrate => "Calibrate",
            Self::Measure => "Measure",
        }
    }

    /// Modes where clicks resolve to a point on the ground or a face
    pub fn picks_points(&self) -> bool {
        matches!(self, Self::DrawRect | Self::PlaceSphere | Self::Calibrate | Self::Measure)
    }

    /// Modes that highlight the shape under the pointer
    pub fn tracks_hover(&self) -> bool {
        matches!(self, Self::Extrude | Self::PlaceSphere)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_ids_unique() {
        let mut ids: Vec<&str> = EditorMode::ALL.iter().map(|m| m.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), EditorMode::ALL.len());
        assert_eq!(EditorMode::default(), EditorMode::View);
    }
}

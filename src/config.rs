//! Editor tuning constants
//!
//! Every threshold the interaction core uses lives here. Hosts can override
//! any subset from a RON document; missing fields keep their defaults:
//!
//! ```ignore
//! let config = EditorConfig::from_ron_str("(snap_threshold: 20.0, history_limit: Some(200))")?;
//! ```

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid value for {field}: {value}")]
    Invalid { field: &'static str, value: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    // Snapping
    /// Max distance for point snapping (strictly less than)
    pub snap_threshold: f32,
    /// Max difference for snapping an extrusion height to another shape's height
    pub height_snap_threshold: f32,
    /// Heights smaller than this never act as magnets
    pub height_magnet_min: f32,

    // Drawing
    /// Rectangles and measurements with a shorter diagonal are dropped
    pub min_rect_size: f32,
    /// Calibration lines shorter than this are ignored
    pub min_calibration_distance: f32,

    // Drags
    /// World units per unit of vertical pointer travel (normalized coordinates)
    pub extrude_sensitivity: f32,
    pub radius_sensitivity: f32,
    pub default_radius: f32,
    pub min_radius: f32,
    /// Pointer travel (normalized coordinates) that turns a click into a drag
    pub click_move_threshold: f32,
    /// Tie window when classifying which face of a shape was grabbed
    pub handle_epsilon: f32,

    // Picking
    pub hover_margin: f32,
    /// Horizontal hover margin for child shapes, which are often thin
    pub hole_hover_margin: f32,
    /// Hits closer than this are ranked by child-first, then smaller area
    pub hover_tie_distance: f32,
    /// Rectangles thinner than this have no pickable faces
    pub face_min_height: f32,
    pub measure_click_threshold: f32,

    // CSG
    /// How far a hole brush extends past the parent surface
    pub csg_overlap: f32,
    /// Extra footprint on hole brushes so cuts do not leave slivers
    pub csg_footprint_margin: f32,

    // History
    /// Oldest snapshots are dropped beyond this many; None keeps everything
    pub history_limit: Option<usize>,

    /// Drawing units per displayed unit; used for listing labels
    pub canvas_scale: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 15.0,
            height_snap_threshold: 1.0,
            height_magnet_min: 0.1,
            min_rect_size: 0.1,
            min_calibration_distance: 0.1,
            extrude_sensitivity: 150.0,
            radius_sensitivity: 150.0,
            default_radius: 10.0,
            min_radius: 1.0,
            click_move_threshold: 0.01,
            handle_epsilon: 0.5,
            hover_margin: 0.5,
            hole_hover_margin: 1.0,
            hover_tie_distance: 1.0,
            face_min_height: 0.01,
            measure_click_threshold: 8.0,
            csg_overlap: 0.5,
            csg_footprint_margin: 0.01,
            history_limit: None,
            canvas_scale: 1.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a RON document
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// All lengths and sensitivities must be finite and positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields: [(&'static str, f32); 19] = [
            ("snap_threshold", self.snap_threshold),
            ("height_snap_threshold", self.height_snap_threshold),
            ("height_magnet_min", self.height_magnet_min),
            ("min_rect_size", self.min_rect_size),
            ("min_calibration_distance", self.min_calibration_distance),
            ("extrude_sensitivity", self.extrude_sensitivity),
            ("radius_sensitivity", self.radius_sensitivity),
            ("default_radius", self.default_radius),
            ("min_radius", self.min_radius),
            ("click_move_threshold", self.click_move_threshold),
            ("handle_epsilon", self.handle_epsilon),
            ("hover_margin", self.hover_margin),
            ("hole_hover_margin", self.hole_hover_margin),
            ("hover_tie_distance", self.hover_tie_distance),
            ("face_min_height", self.face_min_height),
            ("measure_click_threshold", self.measure_click_threshold),
            ("csg_overlap", self.csg_overlap),
            ("csg_footprint_margin", self.csg_footprint_margin),
            ("canvas_scale", self.canvas_scale),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        if self.min_radius > self.default_radius {
            return Err(ConfigError::Invalid { field: "min_radius", value: self.min_radius });
        }
        if self.history_limit == Some(0) {
            return Err(ConfigError::Invalid { field: "history_limit", value: 0.0 });
        }
        Ok(())
    }
}

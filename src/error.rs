//! Error types for explicit editor commands
//!
//! Pointer interaction never fails: degenerate input is dropped silently.
//! Commands issued from panels (dimension edits, rescale, renames, colors)
//! report what went wrong so the host can show feedback.

use thiserror::Error;

use crate::model::{LayerId, ShapeId};

/// Error returned by document commands
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("{field} must be a finite number, got {value:?}")]
    NonFinite { field: &'static str, value: String },

    #[error("{field} must be greater than zero, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("scale must be a positive finite number, got {0}")]
    InvalidScale(f32),

    #[error("cannot resize a shape with a zero-size footprint")]
    DegenerateFootprint,

    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    #[error("no shape with id {0}")]
    UnknownShape(ShapeId),

    #[error("no layer with id {0}")]
    UnknownLayer(LayerId),

    #[error("{0} does not apply to this kind of shape")]
    WrongShapeKind(&'static str),
}

impl EditError {
    pub fn non_finite(field: &'static str, value: impl ToString) -> Self {
        EditError::NonFinite { field, value: value.to_string() }
    }
}

/// Check a numeric input, naming the field on failure
pub fn require_finite(field: &'static str, value: f32) -> Result<f32, EditError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EditError::non_finite(field, value))
    }
}

/// Check a length that must be finite and strictly positive
pub fn require_positive(field: &'static str, value: f32) -> Result<f32, EditError> {
    let value = require_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(EditError::NonPositive { field, value })
    }
}

//! Document data model: shapes, layers and colors

pub mod color;
pub mod layer;
pub mod shape;

pub use color::HexColor;
pub use layer::{Layer, LayerId, LayerSet, LAYER_PALETTE};
pub use shape::{
    BoxParams, EntityShape, FaceDirection, Measurement, Orientation, RectShape, Shape,
    ShapeId, ShapeKind, ShapeType, SphereShape, DEFAULT_RADIUS, FLAT_THICKNESS,
};

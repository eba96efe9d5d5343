//! Box-subtraction CSG for holes cut into volumes
//!
//! - `brush` - Box subtraction into disjoint pieces, triangle/edge output
//! - `compose` - Solid/hole classification, hole ordering, memoized scene composition

pub mod brush;
pub mod compose;

pub use brush::{CsgError, CsgMesh, subtract, subtract_box};
pub use compose::{
    CsgCache, CsgKey, CsgStats, RenderItem,
    compose_box, compose_scene, hole_brush, is_solid, nearest_solid_ancestor,
};

//! Geometry primitives
//!
//! # Module Organization
//!
//! - `math` - Vec3, Vec2, Aabb, Axis
//! - `ray` - Ray, Plane, ray/plane and ray/box tests, closest-approach distances
//! - `camera` - Perspective camera that builds pick rays from pointer coordinates

pub mod camera;
pub mod math;
pub mod ray;

// =============================================================================
// Convenience re-exports for commonly used items
// =============================================================================

pub use math::{Aabb, Axis, Vec2, Vec3};

pub use ray::{
    Plane, Ray,
    ray_aabb_intersection, ray_plane_intersection,
    ray_point_distance, ray_segment_distance,
};

pub use camera::Camera;

//! Ray casting utilities for picking and drag operations
//!
//! Everything the spatial queries need: ray/plane, ray/box (slab test),
//! and closest-approach distances to points and segments.

use super::math::{Aabb, Axis, Vec3};

/// Below this a direction component or denominator counts as zero
const PARALLEL_EPSILON: f32 = 0.0001;

/// A 3D ray with origin and direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,  // Normalized
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize()
        }
    }

    /// Get point at distance t along ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// An infinite plane through a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal: normal.normalize() }
    }

    /// The y = 0 ground plane
    pub fn ground() -> Self {
        Self { point: Vec3::ZERO, normal: Vec3::UP }
    }

    /// Plane perpendicular to a world axis at the given coordinate
    pub fn axis_aligned(axis: Axis, offset: f32) -> Self {
        Self {
            point: Vec3::ZERO.with(axis, offset),
            normal: axis.unit_vector(),
        }
    }

    /// Orthogonal projection of a point onto the plane
    pub fn project(&self, p: Vec3) -> Vec3 {
        p - self.normal * (p - self.point).dot(self.normal)
    }

    /// Where the ray crosses the plane
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        ray_plane_intersection(ray, self.point, self.normal).map(|t| ray.at(t))
    }
}

/// Find the intersection of a ray with a plane.
///
/// Returns the distance along the ray to the intersection point,
/// or None if the ray is parallel to the plane or intersection is behind ray origin.
pub fn ray_plane_intersection(
    ray: &Ray,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<f32> {
    let denom = ray.direction.dot(plane_normal);
    if denom.abs() < PARALLEL_EPSILON {
        return None;  // Ray parallel to plane
    }

    let t = (plane_point - ray.origin).dot(plane_normal) / denom;
    if t < 0.0 {
        return None;  // Intersection behind ray origin
    }

    Some(t)
}

/// Slab test of a ray against a box.
///
/// Returns the distance to the entry point, or the exit point when the
/// origin is inside the box. Axis-parallel rays are handled per slab: a zero
/// direction component misses unless the origin lies within that slab.
pub fn ray_aabb_intersection(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in Axis::ALL {
        let o = ray.origin.get(axis);
        let d = ray.direction.get(axis);
        let (lo, hi) = (aabb.min.get(axis), aabb.max.get(axis));

        if d.abs() < PARALLEL_EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let mut t0 = (lo - o) / d;
        let mut t1 = (hi - o) / d;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;  // Box is behind the ray
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}

/// Distance from a point to the closest point on the ray
pub fn ray_point_distance(ray: &Ray, point: Vec3) -> f32 {
    let t = (point - ray.origin).dot(ray.direction).max(0.0);
    ray.at(t).distance(point)
}

/// Shortest distance between a ray and the segment [a, b]
pub fn ray_segment_distance(ray: &Ray, a: Vec3, b: Vec3) -> f32 {
    let seg = b - a;
    let seg_len_sq = seg.dot(seg);
    if seg_len_sq < PARALLEL_EPSILON * PARALLEL_EPSILON {
        return ray_point_distance(ray, a);
    }

    let w = ray.origin - a;
    let b_ = ray.direction.dot(seg);
    let d = ray.direction.dot(w);
    let e = seg.dot(w);
    let denom = seg_len_sq - b_ * b_;

    // Unconstrained solution, then clamp segment first and ray second
    let mut s = if denom.abs() > PARALLEL_EPSILON {
        ((e - b_ * d) / denom).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let t = (a + seg * s - ray.origin).dot(ray.direction).max(0.0);
    s = ((ray.at(t) - a).dot(seg) / seg_len_sq).clamp(0.0, 1.0);

    ray.at(t).distance(a + seg * s)
}

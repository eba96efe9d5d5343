//! Box brushes and box subtraction
//!
//! A solid is a set of disjoint axis-aligned boxes. Subtracting a box brush
//! splits each piece into at most six slabs around the overlap: two along X,
//! then two along Y inside the X range, then two along Z inside both.

use thiserror::Error;

use crate::geometry::{Aabb, Axis, Vec3};

/// Pieces thinner than this along any axis are dropped
const MIN_PIECE: f32 = 1e-5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CsgError {
    #[error("brush geometry is not finite: {0:?}")]
    NonFinite(Aabb),
}

/// Subtract `hole` from a single box
pub fn subtract_box(solid: &Aabb, hole: &Aabb) -> Vec<Aabb> {
    let Some(cut) = solid.intersection(hole) else {
        return vec![*solid];
    };

    let mut pieces = Vec::with_capacity(6);
    let mut rest = *solid;
    for axis in Axis::ALL {
        let (lo, hi) = (rest.min.get(axis), rest.max.get(axis));
        let (cut_lo, cut_hi) = (cut.min.get(axis), cut.max.get(axis));
        if cut_lo - lo > MIN_PIECE {
            pieces.push(Aabb { min: rest.min, max: rest.max.with(axis, cut_lo) });
        }
        if hi - cut_hi > MIN_PIECE {
            pieces.push(Aabb { min: rest.min.with(axis, cut_hi), max: rest.max });
        }
        // Narrow to the overlap range before splitting the next axis
        rest = Aabb {
            min: rest.min.with(axis, cut_lo),
            max: rest.max.with(axis, cut_hi),
        };
    }
    pieces
}

/// Subtract a brush from every piece of a solid
pub fn subtract(solid: &[Aabb], hole: &Aabb) -> Result<Vec<Aabb>, CsgError> {
    if !hole.is_finite() {
        return Err(CsgError::NonFinite(*hole));
    }
    Ok(solid.iter().flat_map(|piece| subtract_box(piece, hole)).collect())
}

/// Triangle and edge geometry for a set of disjoint boxes
#[derive(Debug, Clone, PartialEq)]
pub struct CsgMesh {
    pub boxes: Vec<Aabb>,
}

impl CsgMesh {
    pub fn new(boxes: Vec<Aabb>) -> Self {
        Self { boxes }
    }

    pub fn volume(&self) -> f32 {
        self.boxes.iter().map(Aabb::volume).sum()
    }

    /// Union of all pieces, None for an empty result
    pub fn bounds(&self) -> Option<Aabb> {
        let (first, rest) = self.boxes.split_first()?;
        Some(rest.iter().fold(*first, |acc, b| acc.union(b)))
    }

    /// Outward-wound triangles, 12 per piece
    pub fn triangles(&self) -> Vec<[Vec3; 3]> {
        // Quads over Aabb::corners(): bottom 0-3, top 4-7
        const QUADS: [[usize; 4]; 6] = [
            [0, 1, 2, 3], // -Y
            [4, 7, 6, 5], // +Y
            [0, 4, 5, 1], // -Z
            [3, 2, 6, 7], // +Z
            [0, 3, 7, 4], // -X
            [1, 5, 6, 2], // +X
        ];
        let mut tris = Vec::with_capacity(self.boxes.len() * 12);
        for b in &self.boxes {
            let c = b.corners();
            for q in QUADS {
                tris.push([c[q[0]], c[q[1]], c[q[2]]]);
                tris.push([c[q[0]], c[q[2]], c[q[3]]]);
            }
        }
        tris
    }

    /// Box edges for the outline overlay, 12 per piece
    pub fn edges(&self) -> Vec<[Vec3; 2]> {
        const EDGES: [[usize; 2]; 12] = [
            [0, 1], [1, 2], [2, 3], [3, 0],
            [4, 5], [5, 6], [6, 7], [7, 4],
            [0, 4], [1, 5], [2, 6], [3, 7],
        ];
        let mut lines = Vec::with_capacity(self.boxes.len() * 12);
        for b in &self.boxes {
            let c = b.corners();
            for e in EDGES {
                lines.push([c[e[0]], c[e[1]]]);
            }
        }
        lines
    }
}

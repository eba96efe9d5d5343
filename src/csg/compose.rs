//! Additive/subtractive composition of the scene
//!
//! Root shapes and children extruded away from their parent face are solids.
//! Children extruded into their parent are holes and are subtracted from
//! their nearest solid ancestor. Flat holes (not yet extruded) only draw an
//! outline. Holes are subtracted in a fixed order so the result does not
//! depend on creation order, and each composition is memoized.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::warn;

use crate::config::EditorConfig;
use crate::geometry::{Aabb, Vec3};
use crate::model::{FaceDirection, Orientation, Shape, ShapeId, ShapeKind};
use super::brush::{CsgError, CsgMesh, subtract};

/// Renderable output for one shape
#[derive(Debug, Clone, PartialEq)]
pub enum RenderItem {
    /// Uncut box (rectangle or cube entity)
    Solid { shape_id: ShapeId, aabb: Aabb },
    /// Box with holes cut into it
    Composed { shape_id: ShapeId, mesh: Arc<CsgMesh> },
    Sphere { shape_id: ShapeId, center: Vec3, radius: f32 },
    /// Flat hole or flat child: base rectangle only
    Outline { shape_id: ShapeId, corners: [Vec3; 4] },
    Dimension { shape_id: ShapeId, start: Vec3, end: Vec3, distance: f32 },
}

impl RenderItem {
    pub fn shape_id(&self) -> ShapeId {
        match self {
            RenderItem::Solid { shape_id, .. }
            | RenderItem::Composed { shape_id, .. }
            | RenderItem::Sphere { shape_id, .. }
            | RenderItem::Outline { shape_id, .. }
            | RenderItem::Dimension { shape_id, .. } => *shape_id,
        }
    }
}

/// Hole ordering key: face normal group first, then position, then id
type HoleOrder = (Orientation, FaceDirection, f32, ShapeId);

/// Cache key: bit patterns of the parent box followed by each brush
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CsgKey(Vec<u32>);

impl CsgKey {
    pub fn new(parent: &Aabb, brushes: &[Aabb]) -> Self {
        let mut bits = Vec::with_capacity(6 * (brushes.len() + 1));
        for b in std::iter::once(parent).chain(brushes.iter()) {
            for v in [b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z] {
                bits.push(v.to_bits());
            }
        }
        Self(bits)
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsgStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoized compositions, keyed on (parent box, ordered brushes)
#[derive(Debug, Default)]
pub struct CsgCache {
    entries: HashMap<CsgKey, Arc<CsgMesh>>,
    stats: CsgStats,
}

impl CsgCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CsgStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Return the cached composition or compute and store it
    pub fn get_or_compose(&mut self, parent: &Aabb, brushes: &[Aabb]) -> Result<(CsgKey, Arc<CsgMesh>), CsgError> {
        let key = CsgKey::new(parent, brushes);
        if let Some(mesh) = self.entries.get(&key) {
            self.stats.hits += 1;
            return Ok((key, Arc::clone(mesh)));
        }

        self.stats.misses += 1;
        let mesh = Arc::new(compose_box(parent, brushes)?);
        self.entries.insert(key.clone(), Arc::clone(&mesh));
        Ok((key, mesh))
    }

    /// Drop entries not used by the latest pass
    fn retain(&mut self, used: &HashSet<CsgKey>) {
        self.entries.retain(|k, _| used.contains(k));
    }
}

/// Subtract brushes from a box in the given order
pub fn compose_box(parent: &Aabb, brushes: &[Aabb]) -> Result<CsgMesh, CsgError> {
    if !parent.is_finite() {
        return Err(CsgError::NonFinite(*parent));
    }
    let mut pieces = vec![*parent];
    for brush in brushes {
        pieces = subtract(&pieces, brush)?;
    }
    Ok(CsgMesh::new(pieces))
}

/// Whether a shape renders as its own volume
pub fn is_solid(shape: &Shape) -> bool {
    match &shape.kind {
        ShapeKind::Rect(_) => shape.parent_id.is_none() || shape.is_outward_extrusion(),
        ShapeKind::Sphere(s) => s.is_cube(),
        ShapeKind::Measurement(_) => false,
    }
}

/// Walk up the parent chain to the first solid ancestor
pub fn nearest_solid_ancestor<'a>(shape: &Shape, shapes: &'a [Shape]) -> Option<&'a Shape> {
    let mut next = shape.parent_id;
    // Bounded walk guards against malformed parent cycles
    for _ in 0..shapes.len() {
        let parent = shapes.iter().find(|s| Some(s.id) == next)?;
        if is_solid(parent) {
            return Some(parent);
        }
        next = parent.parent_id;
    }
    None
}

/// Subtraction brush for a hole: slightly wider footprint and pushed past
/// the parent surface so the cut opens cleanly
pub fn hole_brush(hole: &Shape, config: &EditorConfig) -> Option<Aabb> {
    let r = hole.as_rect()?;
    let (u, v) = r.orientation.base_axes();
    let n = r.orientation.normal_axis();
    let margin = config.csg_footprint_margin;
    let mut brush = hole.aabb().expand(
        Vec3::ZERO.with(u, margin).with(v, margin),
    );
    match r.face_direction {
        FaceDirection::Positive => brush.max = brush.max.with(n, brush.max.get(n) + config.csg_overlap),
        FaceDirection::Negative => brush.min = brush.min.with(n, brush.min.get(n) - config.csg_overlap),
    }
    Some(brush)
}

fn hole_order(hole: &Shape) -> HoleOrder {
    let (orientation, direction, offset) = hole
        .as_rect()
        .map(|r| (r.orientation, r.face_direction, r.base_offset()))
        .unwrap_or_default();
    (orientation, direction, offset, hole.id)
}

fn outline(shape: &Shape) -> Option<RenderItem> {
    shape.as_rect().map(|r| RenderItem::Outline {
        shape_id: shape.id,
        corners: r.base_corners(),
    })
}

/// Hole drawn on a cube that was later switched back to a sphere
fn on_plain_sphere(shape: &Shape, shapes: &[Shape]) -> bool {
    shapes
        .iter()
        .find(|s| Some(s.id) == shape.parent_id)
        .and_then(Shape::as_sphere)
        .is_some_and(|s| !s.is_cube())
}

/// Derive render items from the (visible) shape list.
///
/// Holes whose solid ancestor is missing from `shapes` render as
/// independent volumes. Holes on a plain sphere have nothing to cut and
/// draw as outlines.
pub fn compose_scene(shapes: &[Shape], config: &EditorConfig, cache: &mut CsgCache) -> Vec<RenderItem> {
    // Active holes grouped by the solid they cut
    let mut holes: HashMap<ShapeId, Vec<&Shape>> = HashMap::new();
    let mut orphans: HashSet<ShapeId> = HashSet::new();
    let mut outlined: HashSet<ShapeId> = HashSet::new();
    for shape in shapes.iter().filter(|s| s.as_rect().is_some() && !is_solid(s)) {
        if shape.height().abs() < config.face_min_height {
            continue;
        }
        match nearest_solid_ancestor(shape, shapes) {
            Some(solid) => holes.entry(solid.id).or_default().push(shape),
            None if on_plain_sphere(shape, shapes) => {
                outlined.insert(shape.id);
            }
            None => {
                orphans.insert(shape.id);
            }
        }
    }

    let mut used_keys = HashSet::new();
    let mut items = Vec::with_capacity(shapes.len());

    for shape in shapes {
        let item = match &shape.kind {
            ShapeKind::Measurement(m) => RenderItem::Dimension {
                shape_id: shape.id,
                start: m.start,
                end: m.end,
                distance: m.distance,
            },
            ShapeKind::Sphere(s) if !s.is_cube() => RenderItem::Sphere {
                shape_id: shape.id,
                center: s.center,
                radius: s.effective_radius(),
            },
            ShapeKind::Rect(r) if !is_solid(shape) && !orphans.contains(&shape.id) => {
                if r.height.abs() < config.face_min_height || outlined.contains(&shape.id) {
                    match outline(shape) {
                        Some(item) => item,
                        None => continue,
                    }
                } else {
                    // Drawn as part of its ancestor
                    continue;
                }
            }
            ShapeKind::Rect(_) | ShapeKind::Sphere(_) => {
                let aabb = shape.aabb();
                match holes.get_mut(&shape.id) {
                    None => RenderItem::Solid { shape_id: shape.id, aabb },
                    Some(list) => {
                        list.sort_by(|a, b| {
                            let (ka, kb) = (hole_order(a), hole_order(b));
                            ka.0.cmp(&kb.0)
                                .then(ka.1.cmp(&kb.1))
                                .then(ka.2.total_cmp(&kb.2))
                                .then(ka.3.cmp(&kb.3))
                        });
                        let brushes: Vec<Aabb> = list.iter().filter_map(|h| hole_brush(h, config)).collect();
                        match cache.get_or_compose(&aabb, &brushes) {
                            Ok((key, mesh)) => {
                                used_keys.insert(key);
                                RenderItem::Composed { shape_id: shape.id, mesh }
                            }
                            Err(e) => {
                                warn!(shape = %shape.id, error = %e, "hole subtraction failed, drawing uncut box");
                                RenderItem::Solid { shape_id: shape.id, aabb }
                            }
                        }
                    }
                }
            }
        };
        items.push(item);
    }

    cache.retain(&used_keys);
    items
}

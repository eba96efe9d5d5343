//! Editor session document
//!
//! Owns the live shape list, the layers, the undo history and the id and
//! name counters. Pointer gestures mutate shapes transiently through
//! `insert_transient`/`shape_mut` and finish with exactly one `commit`.
//! Every other command below validates its input, applies the change and
//! commits once; on error nothing changes.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::{EditError, require_finite, require_positive};
use crate::geometry::Vec3;
use crate::history::History;
use crate::model::{
    EntityShape, HexColor, LayerId, LayerSet, Orientation, Shape, ShapeId, ShapeKind, ShapeType,
};

/// Values typed into the edit panel; `None` fields are left unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DimensionEdit {
    pub height: Option<f32>,
    pub base_y: Option<f32>,
    /// New footprint width, scaled about the footprint center
    pub width: Option<f32>,
    /// New footprint depth, scaled about the footprint center
    pub depth: Option<f32>,
    pub radius: Option<f32>,
    pub center: Option<Vec3>,
}

/// Per-type counters for generated names
#[derive(Debug, Clone, Default)]
struct NameCounters {
    walls: u32,
    objects: u32,
    dimensions: u32,
}

impl NameCounters {
    fn next_name(&mut self, shape_type: ShapeType) -> String {
        let counter = match shape_type {
            ShapeType::Rect => &mut self.walls,
            ShapeType::Sphere => &mut self.objects,
            ShapeType::Measurement => &mut self.dimensions,
        };
        *counter += 1;
        format!("{} {}", shape_type.name_prefix(), counter)
    }
}

/// Keep shapes that are visible and not on a hidden layer
pub fn filter_visible(shapes: &[Shape], hidden_layers: &HashSet<LayerId>) -> Vec<Shape> {
    shapes
        .iter()
        .filter(|s| s.visible && !hidden_layers.contains(&s.layer_id))
        .cloned()
        .collect()
}

#[derive(Debug, Clone)]
pub struct Document {
    shapes: Vec<Shape>,
    layers: LayerSet,
    history: History,
    next_id: u64,
    names: NameCounters,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Document {
    pub fn new(history_limit: Option<usize>) -> Self {
        Self {
            shapes: Vec::new(),
            layers: LayerSet::new(),
            history: History::new(history_limit),
            next_id: 1,
            names: NameCounters::default(),
        }
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Live shape for transient (uncommitted) edits during a gesture
    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Shapes that take part in hover, face picking and rendering
    pub fn visible_shapes(&self) -> Vec<Shape> {
        filter_visible(&self.shapes, &self.layers.hidden_ids())
    }

    /// Direct children of a shape
    pub fn children_of(&self, id: ShapeId) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(move |s| s.parent_id == Some(id))
    }

    /// All shapes transitively drawn on `id`
    pub fn descendants_of(&self, id: ShapeId) -> Vec<ShapeId> {
        let mut found = Vec::new();
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            for child in self.children_of(current) {
                if child.id != id && !found.contains(&child.id) {
                    found.push(child.id);
                    frontier.push(child.id);
                }
            }
        }
        found
    }

    // =========================================================================
    // Gesture support
    // =========================================================================

    /// Give a new shape its id, and a generated name when it has none
    fn allocate(&mut self, mut shape: Shape) -> Shape {
        shape.id = ShapeId(self.next_id);
        self.next_id += 1;
        if shape.name.is_empty() {
            shape.name = self.names.next_name(shape.shape_type());
        }
        if !self.layers.contains(shape.layer_id) {
            shape.layer_id = LayerId::DEFAULT;
        }
        shape
    }

    /// Append a shape and commit
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = self.insert_transient(shape);
        self.commit();
        id
    }

    /// Append a shape without committing (sphere placement preview)
    pub fn insert_transient(&mut self, shape: Shape) -> ShapeId {
        let shape = self.allocate(shape);
        let id = shape.id;
        debug!(%id, name = %shape.name, "shape added");
        self.shapes.push(shape);
        id
    }

    /// Replace a live shape by id without committing
    pub fn replace_transient(&mut self, shape: Shape) {
        if let Some(slot) = self.shape_mut(shape.id) {
            *slot = shape;
        }
    }

    /// Record the live shapes as a new history state
    pub fn commit(&mut self) {
        self.history.commit(&self.shapes);
        debug!(shapes = self.shapes.len(), cursor = self.history.cursor(), "committed");
    }

    /// Drop uncommitted changes
    pub fn revert_to_committed(&mut self) {
        self.shapes = self.history.current().to_vec();
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(shapes) => {
                self.shapes = shapes;
                debug!(cursor = self.history.cursor(), "undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(shapes) => {
                self.shapes = shapes;
                debug!(cursor = self.history.cursor(), "redo");
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Shape commands
    // =========================================================================

    /// Edit a copy of the shape; replace and commit only if the edit succeeds
    fn edit_shape(
        &mut self,
        id: ShapeId,
        edit: impl FnOnce(&mut Shape) -> Result<(), EditError>,
    ) -> Result<(), EditError> {
        let mut shape = self.shape(id).cloned().ok_or(EditError::UnknownShape(id))?;
        edit(&mut shape)?;
        self.replace_transient(shape);
        self.commit();
        Ok(())
    }

    /// Delete a shape and everything drawn on it. Returns the removed ids.
    pub fn delete_shape(&mut self, id: ShapeId) -> Result<Vec<ShapeId>, EditError> {
        if self.shape(id).is_none() {
            return Err(EditError::UnknownShape(id));
        }
        let mut removed = vec![id];
        removed.extend(self.descendants_of(id));
        self.shapes.retain(|s| !removed.contains(&s.id));
        self.commit();
        info!(%id, count = removed.len(), "deleted shapes");
        Ok(removed)
    }

    pub fn rename_shape(&mut self, id: ShapeId, name: &str) -> Result<(), EditError> {
        let name = name.trim().to_string();
        self.edit_shape(id, |s| {
            s.name = name;
            Ok(())
        })
    }

    /// Set or clear the per-shape color override
    pub fn set_shape_color(&mut self, id: ShapeId, color: Option<HexColor>) -> Result<(), EditError> {
        self.edit_shape(id, |s| {
            s.color = color;
            Ok(())
        })
    }

    pub fn set_entity_shape(&mut self, id: ShapeId, entity_shape: EntityShape) -> Result<(), EditError> {
        self.edit_shape(id, |s| {
            let sphere = s.as_sphere_mut().ok_or(EditError::WrongShapeKind("entity shape"))?;
            sphere.entity_shape = entity_shape;
            Ok(())
        })
    }

    /// Translate a shape by a world-space delta
    pub fn move_shape(&mut self, id: ShapeId, delta: Vec3) -> Result<(), EditError> {
        if !delta.is_finite() {
            return Err(EditError::non_finite("offset", format!("{:?}", delta)));
        }
        self.edit_shape(id, |s| {
            s.translate(delta);
            Ok(())
        })
    }

    /// Apply edit-panel dimensions
    pub fn apply_dimensions(&mut self, id: ShapeId, edit: &DimensionEdit) -> Result<(), EditError> {
        self.edit_shape(id, |s| apply_dimension_edit(s, edit))
    }

    /// Rescale all shapes after the canvas scale changed from `old_scale`
    /// to `new_scale`; every length is multiplied by `old_scale / new_scale`
    pub fn rescale_shapes(&mut self, old_scale: f32, new_scale: f32) -> Result<(), EditError> {
        for scale in [old_scale, new_scale] {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(EditError::InvalidScale(scale));
            }
        }
        if old_scale == new_scale {
            return Ok(());
        }
        let ratio = old_scale / new_scale;
        for shape in self.shapes.iter_mut() {
            shape.rescale(ratio);
        }
        self.commit();
        info!(ratio, "rescaled shapes");
        Ok(())
    }

    pub fn move_shape_to_layer(&mut self, id: ShapeId, layer_id: LayerId) -> Result<(), EditError> {
        if !self.layers.contains(layer_id) {
            return Err(EditError::UnknownLayer(layer_id));
        }
        self.edit_shape(id, |s| {
            s.layer_id = layer_id;
            Ok(())
        })
    }

    /// Flip per-shape visibility, returning the new state
    pub fn toggle_shape_visibility(&mut self, id: ShapeId) -> Result<bool, EditError> {
        let mut visible = false;
        self.edit_shape(id, |s| {
            s.visible = !s.visible;
            visible = s.visible;
            Ok(())
        })?;
        Ok(visible)
    }

    // =========================================================================
    // Layer commands
    // =========================================================================

    pub fn add_layer(&mut self, name: &str) -> LayerId {
        let id = self.layers.add(name);
        debug!(%id, name, "layer added");
        id
    }

    pub fn rename_layer(&mut self, id: LayerId, name: &str) -> Result<(), EditError> {
        self.layers.rename(id, name)
    }

    pub fn set_layer_color(&mut self, id: LayerId, color: HexColor) -> Result<(), EditError> {
        self.layers.set_color(id, color)
    }

    pub fn toggle_layer_visibility(&mut self, id: LayerId) -> Result<bool, EditError> {
        self.layers.toggle_visibility(id)
    }

    /// Remove a layer, first moving its shapes to the default layer.
    ///
    /// The default layer cannot be removed; returns false and changes nothing.
    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        if id.is_default() || !self.layers.contains(id) {
            return false;
        }

        let migrate = |s: &mut Shape| {
            if s.layer_id == id {
                s.layer_id = LayerId::DEFAULT;
            }
        };
        let moved = self.shapes.iter().filter(|s| s.layer_id == id).count();
        self.shapes.iter_mut().for_each(migrate);
        self.history.rewrite_all(migrate);
        self.layers.remove(id);

        info!(%id, moved, "layer removed");
        true
    }
}

fn apply_dimension_edit(shape: &mut Shape, edit: &DimensionEdit) -> Result<(), EditError> {
    let params = shape.box_params();
    match &mut shape.kind {
        ShapeKind::Rect(r) => {
            // Validate everything before touching the shape
            let height = edit.height.map(|h| require_finite("height", h)).transpose()?;
            let base_y = edit.base_y.map(|y| require_finite("base y", y)).transpose()?;
            let scale_w = footprint_scale("width", edit.width, params.width)?;
            let scale_d = footprint_scale("depth", edit.depth, params.depth)?;

            if let Some(h) = height {
                r.height = h;
            }
            if let Some(y) = base_y {
                r.base_y = y;
                if r.orientation == Orientation::Xz {
                    for p in r.points.iter_mut() {
                        p.y = y;
                    }
                }
            }
            if scale_w != 1.0 || scale_d != 1.0 {
                let center = r.footprint_center();
                let (u, v) = r.orientation.base_axes();
                for p in r.points.iter_mut() {
                    let pu = center.get(u) + (p.get(u) - center.get(u)) * scale_w;
                    let pv = center.get(v) + (p.get(v) - center.get(v)) * scale_d;
                    *p = p.with(u, pu).with(v, pv);
                }
            }
            Ok(())
        }
        ShapeKind::Sphere(s) => {
            let radius = edit.radius.map(|r| require_positive("radius", r)).transpose()?;
            if let Some(c) = edit.center {
                if !c.is_finite() {
                    return Err(EditError::non_finite("center", format!("{:?}", c)));
                }
                s.center = c;
            }
            if let Some(r) = radius {
                s.radius = r;
            }
            Ok(())
        }
        ShapeKind::Measurement(_) => Err(EditError::WrongShapeKind("dimension edit")),
    }
}

/// Scale factor turning `current` into the requested size
fn footprint_scale(field: &'static str, requested: Option<f32>, current: f32) -> Result<f32, EditError> {
    match requested {
        None => Ok(1.0),
        Some(value) => {
            let value = require_positive(field, value)?;
            if current <= 0.0 {
                return Err(EditError::DegenerateFootprint);
            }
            Ok(value / current)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::model::{FaceDirection, RectShape, SphereShape};

    fn wall(a: Vec3, b: Vec3, height: f32) -> Shape {
        let mut r = RectShape::from_corners(a, b, Orientation::Xz, 0.0, FaceDirection::Positive);
        r.height = height;
        Shape::new(ShapeKind::Rect(r))
    }

    fn sphere(center: Vec3) -> Shape {
        Shape::new(ShapeKind::Sphere(SphereShape {
            center,
            radius: 10.0,
            entity_shape: EntityShape::Sphere,
        }))
    }

    #[test]
    fn test_names_and_ids() {
        let mut doc = Document::default();
        let a = doc.add_shape(wall(Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 0.0));
        let b = doc.add_shape(sphere(Vec3::ZERO));
        let c = doc.add_shape(wall(Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 0.0));
        assert_ne!(a, b);
        assert_eq!(doc.shape(a).unwrap().name, "Wall 1");
        assert_eq!(doc.shape(b).unwrap().name, "Object 1");
        assert_eq!(doc.shape(c).unwrap().name, "Wall 2");
        assert_eq!(doc.shape(c).unwrap().layer_id, LayerId::DEFAULT);
    }

    #[test]
    fn test_add_commits_and_undo_restores() {
        let mut doc = Document::default();
        doc.add_shape(wall(Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 0.0));
        assert!(doc.can_undo());
        assert!(doc.undo());
        assert!(doc.shapes().is_empty());
        assert!(doc.redo());
        assert_eq!(doc.shapes().len(), 1);
    }

    #[test]
    fn test_revert_drops_transient_changes() {
        let mut doc = Document::default();
        let id = doc.add_shape(wall(Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 0.0));
        if let Some(r) = doc.shape_mut(id).and_then(|s| s.as_rect_mut()) {
            r.height = 99.0;
        }
        doc.insert_transient(sphere(Vec3::ZERO));
        doc.revert_to_committed();
        assert_eq!(doc.shapes().len(), 1);
        assert_eq!(doc.shape(id).unwrap().height(), 0.0);
    }

    #[test]
    fn test_delete_cascades() {
        let mut doc = Document::default();
        let parent = doc.add_shape(wall(Vec3::ZERO, Vec3::new(100.0, 0.0, 100.0), 50.0));
        let child = doc.add_shape(wall(Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 5.0).with_parent(Some(parent)));
        let grandchild = doc.add_shape(wall(Vec3::ZERO, Vec3::new(2.0, 0.0, 2.0), 1.0).with_parent(Some(child)));
        let other = doc.add_shape(sphere(Vec3::ZERO));

        let removed = doc.delete_shape(parent).unwrap();
        assert_eq!(removed.len(), 3);
        assert!(removed.contains(&grandchild));
        assert_eq!(doc.shapes().len(), 1);
        assert!(doc.shape(other).is_some());
        assert_eq!(doc.delete_shape(parent), Err(EditError::UnknownShape(parent)));
    }

    #[test]
    fn test_apply_dimensions_scales_footprint() {
        let mut doc = Document::default();
        let id = doc.add_shape(wall(Vec3::ZERO, Vec3::new(100.0, 0.0, 50.0), 10.0));
        let edit = DimensionEdit {
            height: Some(30.0),
            width: Some(200.0),
            depth: Some(25.0),
            ..Default::default()
        };
        doc.apply_dimensions(id, &edit).unwrap();

        let params = doc.shape(id).unwrap().box_params();
        assert_eq!(params.box_args, [200.0, 30.0, 25.0]);
        assert_abs_diff_eq!(params.center.x, 50.0);
        assert_abs_diff_eq!(params.center.z, 25.0);
    }

    #[test]
    fn test_apply_dimensions_rejects_non_finite() {
        let mut doc = Document::default();
        let id = doc.add_shape(wall(Vec3::ZERO, Vec3::new(100.0, 0.0, 50.0), 10.0));
        let before = doc.shapes().to_vec();
        let edit = DimensionEdit { height: Some(40.0), width: Some(f32::NAN), ..Default::default() };
        assert!(matches!(doc.apply_dimensions(id, &edit), Err(EditError::NonFinite { .. })));
        assert_eq!(doc.shapes(), before.as_slice());
    }

    #[test]
    fn test_sphere_dimensions() {
        let mut doc = Document::default();
        let id = doc.add_shape(sphere(Vec3::ZERO));
        let edit = DimensionEdit { radius: Some(4.0), center: Some(Vec3::new(1.0, 2.0, 3.0)), ..Default::default() };
        doc.apply_dimensions(id, &edit).unwrap();
        let s = doc.shape(id).unwrap().as_sphere().unwrap();
        assert_eq!(s.radius, 4.0);
        assert_eq!(s.center, Vec3::new(1.0, 2.0, 3.0));

        let bad = DimensionEdit { radius: Some(0.0), ..Default::default() };
        assert!(doc.apply_dimensions(id, &bad).is_err());
    }

    #[test]
    fn test_rescale() {
        let mut doc = Document::default();
        let id = doc.add_shape(wall(Vec3::ZERO, Vec3::new(100.0, 0.0, 50.0), 10.0));
        let original = doc.shapes().to_vec();

        doc.rescale_shapes(2.0, 1.0).unwrap();
        assert_abs_diff_eq!(doc.shape(id).unwrap().height(), 20.0);
        doc.rescale_shapes(1.0, 2.0).unwrap();
        let (a, b) = (original[0].as_rect().unwrap(), doc.shape(id).unwrap().as_rect().unwrap());
        assert_abs_diff_eq!(a.points[2].x, b.points[2].x, epsilon = 1e-4);
        assert_abs_diff_eq!(a.height, b.height, epsilon = 1e-4);

        assert_eq!(doc.rescale_shapes(1.0, 0.0), Err(EditError::InvalidScale(0.0)));
        assert!(matches!(doc.rescale_shapes(f32::NAN, 1.0), Err(EditError::InvalidScale(_))));
    }

    #[test]
    fn test_remove_layer_migrates_shapes() {
        let mut doc = Document::default();
        let layer = doc.add_layer("Walls");
        let id = doc.add_shape(wall(Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 0.0));
        doc.move_shape_to_layer(id, layer).unwrap();
        assert_eq!(doc.shape(id).unwrap().layer_id, layer);

        assert!(!doc.remove_layer(LayerId::DEFAULT));
        assert_eq!(doc.layers().len(), 2);

        assert!(doc.remove_layer(layer));
        assert_eq!(doc.shape(id).unwrap().layer_id, LayerId::DEFAULT);
        assert!(!doc.layers().contains(layer));

        // Undo never brings back the removed layer id
        doc.undo();
        assert!(doc.shapes().iter().all(|s| s.layer_id == LayerId::DEFAULT));
    }

    #[test]
    fn test_visible_shapes_filter() {
        let mut doc = Document::default();
        let layer = doc.add_layer("Hidden");
        let a = doc.add_shape(wall(Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 0.0));
        let b = doc.add_shape(wall(Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 0.0));
        let c = doc.add_shape(sphere(Vec3::ZERO));
        doc.move_shape_to_layer(b, layer).unwrap();
        doc.toggle_layer_visibility(layer).unwrap();
        assert_eq!(doc.toggle_shape_visibility(c), Ok(false));

        let visible: Vec<ShapeId> = doc.visible_shapes().iter().map(|s| s.id).collect();
        assert_eq!(visible, vec![a]);
    }

    #[test]
    fn test_entity_shape_only_for_spheres() {
        let mut doc = Document::default();
        let w = doc.add_shape(wall(Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 0.0));
        let s = doc.add_shape(sphere(Vec3::ZERO));
        assert!(doc.set_entity_shape(w, EntityShape::Cube).is_err());
        doc.set_entity_shape(s, EntityShape::Cube).unwrap();
        assert!(doc.shape(s).unwrap().as_sphere().unwrap().is_cube());
    }
}

//! Editor session
//!
//! Ties the document, the current mode and the gesture in progress together.
//! The host feeds `PointerEvent`s and commands; the editor resolves them
//! against the shapes and queues `EditorEvent`s for the UI layer.
//!
//! Every pointer gesture and every command produces at most one history
//! commit. Cancelling (mode switch, Escape, undo) rolls the live shapes back
//! to the last commit.

use std::mem;

use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::csg::{CsgCache, RenderItem, compose_scene};
use crate::document::{DimensionEdit, Document};
use crate::error::EditError;
use crate::geometry::{Plane, Ray, Vec3};
use crate::input::EditorCommand;
use crate::interaction::{
    DrawTracker, EditorMode, ExtrudeTracker, Gesture, MoveTracker, PointerEvent, SphereTracker,
};
use crate::model::{
    EntityShape, HexColor, LayerId, Measurement, Orientation, RectShape, Shape, ShapeId, ShapeKind,
    SphereShape,
};
use crate::panel::{LayerGroup, MoveDirection, layer_groups};
use crate::query::{
    FaceHit, clicked_measurement_id, drawing_point, face_hit, hovered_shape_id, shape_hit_point,
    snapped_position,
};

/// Notifications for the UI layer, drained with `take_events`
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ShapeAdded(ShapeId),
    /// A new history state was recorded
    Committed,
    EditPanelOpened(ShapeId),
    EditPanelClosed,
    /// Reference length picked in calibrate mode (drawing units)
    CalibrationMeasured(f32),
}

pub struct Editor {
    config: EditorConfig,
    document: Document,
    mode: EditorMode,
    pub snap_enabled: bool,
    gesture: Gesture,
    hovered: Option<ShapeId>,
    /// Shape whose edit panel is open
    editing: Option<ShapeId>,
    snap_indicator: Option<Vec3>,
    height_guide: Option<f32>,
    canvas_scale: f32,
    csg_cache: CsgCache,
    events: Vec<EditorEvent>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            document: Document::new(config.history_limit),
            mode: EditorMode::default(),
            snap_enabled: true,
            gesture: Gesture::Idle,
            hovered: None,
            editing: None,
            snap_indicator: None,
            height_guide: None,
            canvas_scale: config.canvas_scale,
            csg_cache: CsgCache::new(),
            events: Vec::new(),
            config,
        }
    }

    // =========================================================================
    // State for the outer layers
    // =========================================================================

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn hovered_id(&self) -> Option<ShapeId> {
        self.hovered
    }

    pub fn editing_id(&self) -> Option<ShapeId> {
        self.editing
    }

    /// Shape being extruded right now
    pub fn active_extrude_id(&self) -> Option<ShapeId> {
        match &self.gesture {
            Gesture::Extruding(t) => Some(t.shape_id),
            _ => None,
        }
    }

    /// Point the last resolved pointer position snapped to
    pub fn snap_indicator(&self) -> Option<Vec3> {
        self.snap_indicator
    }

    /// Height the current extrusion snapped to
    pub fn height_guide(&self) -> Option<f32> {
        self.height_guide
    }

    pub fn canvas_scale(&self) -> f32 {
        self.canvas_scale
    }

    pub fn can_undo(&self) -> bool {
        self.document.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.document.can_redo()
    }

    /// Rectangle between the first click and the pointer
    pub fn preview_rect(&self) -> Option<RectShape> {
        match (&self.gesture, self.mode) {
            (Gesture::Drawing(t), EditorMode::DrawRect) => t.preview(),
            _ => None,
        }
    }

    /// Line between the first click and the pointer in measure/calibrate
    pub fn preview_line(&self) -> Option<(Vec3, Vec3)> {
        match (&self.gesture, self.mode) {
            (Gesture::Drawing(t), EditorMode::Measure | EditorMode::Calibrate) => {
                Some((t.start, t.current))
            }
            _ => None,
        }
    }

    /// Composed geometry of the visible shapes, live gesture included
    pub fn render_items(&mut self) -> Vec<RenderItem> {
        let visible = self.document.visible_shapes();
        compose_scene(&visible, &self.config, &mut self.csg_cache)
    }

    pub fn layer_panel(&self) -> Vec<LayerGroup> {
        layer_groups(&self.document, self.canvas_scale)
    }

    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        mem::take(&mut self.events)
    }

    // =========================================================================
    // Mode and panel
    // =========================================================================

    /// Switch mode, dropping any half-finished gesture and the edit panel
    pub fn set_mode(&mut self, mode: EditorMode) {
        self.cancel_gesture();
        self.close_edit_panel();
        self.hovered = None;
        if self.mode != mode {
            debug!(from = self.mode.as_str(), to = mode.as_str(), "mode changed");
        }
        self.mode = mode;
    }

    /// Abandon the current gesture without committing
    pub fn cancel_gesture(&mut self) {
        let gesture = mem::take(&mut self.gesture);
        match gesture {
            Gesture::Idle => {}
            Gesture::Drawing(_) => debug!("drawing cancelled"),
            _ => {
                self.document.revert_to_committed();
                debug!(gesture = gesture.label(), "gesture cancelled");
            }
        }
        self.snap_indicator = None;
        self.height_guide = None;
    }

    pub fn escape(&mut self) {
        self.cancel_gesture();
        self.close_edit_panel();
    }

    /// Open the edit panel for a shape, e.g. from the layer list
    pub fn select_shape(&mut self, id: ShapeId) -> bool {
        if self.document.shape(id).is_none() {
            return false;
        }
        self.cancel_gesture();
        self.open_edit_panel(id);
        true
    }

    pub fn close_edit_panel(&mut self) {
        if self.editing.take().is_some() {
            self.events.push(EditorEvent::EditPanelClosed);
        }
    }

    fn open_edit_panel(&mut self, id: ShapeId) {
        if self.editing == Some(id) {
            return;
        }
        self.close_edit_panel();
        self.editing = Some(id);
        self.hovered = None;
        self.events.push(EditorEvent::EditPanelOpened(id));
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    pub fn pointer_down(&mut self, event: &PointerEvent) {
        match self.mode {
            EditorMode::View => self.view_down(event),
            EditorMode::DrawRect | EditorMode::Calibrate | EditorMode::Measure => {
                self.two_click_down(event)
            }
            EditorMode::Extrude => self.extrude_down(event),
            EditorMode::PlaceSphere => self.sphere_down(event),
        }
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) {
        match mem::take(&mut self.gesture) {
            Gesture::Idle => {
                if self.mode.tracks_hover() && self.editing.is_none() {
                    let visible = self.document.visible_shapes();
                    self.hovered = hovered_shape_id(&event.ray, &visible, &self.config);
                }
                if self.mode.picks_points() {
                    // Only refreshes the snap indicator
                    self.resolve_point(&event.ray);
                }
            }
            Gesture::Drawing(mut tracker) => {
                let plane = tracker.plane();
                if let Some(p) = self.resolve_on(&event.ray, &plane, tracker.face.is_some()) {
                    tracker.current = p;
                }
                self.gesture = Gesture::Drawing(tracker);
            }
            Gesture::Extruding(mut tracker) => {
                if let Some(update) =
                    tracker.update(&event.ray, event.ndc, self.document.shapes(), &self.config)
                {
                    self.height_guide = update.height_guide;
                    self.document.replace_transient(update.shape);
                }
                self.gesture = Gesture::Extruding(tracker);
            }
            Gesture::Moving(mut tracker) => {
                if let Some(shape) =
                    tracker.update(&event.ray, event.ndc, self.config.click_move_threshold)
                {
                    self.document.replace_transient(shape);
                }
                self.gesture = Gesture::Moving(tracker);
            }
            Gesture::PlacingSphere(mut tracker) => {
                let radius = tracker.update(event.ndc, &self.config);
                if let Some(sphere) = self
                    .document
                    .shape_mut(tracker.shape_id)
                    .and_then(Shape::as_sphere_mut)
                {
                    sphere.radius = radius;
                }
                self.gesture = Gesture::PlacingSphere(tracker);
            }
        }
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) {
        if self.gesture.drag_state().is_some() {
            self.pointer_move(event);
        }

        match mem::take(&mut self.gesture) {
            Gesture::Extruding(tracker) => {
                self.height_guide = None;
                self.finish_drag("extrude", tracker.shape_id, tracker.drag.moved);
            }
            Gesture::Moving(tracker) => {
                self.finish_drag("move", tracker.shape_id, tracker.drag.moved);
            }
            Gesture::PlacingSphere(tracker) => {
                let id = tracker.shape_id;
                self.events.push(EditorEvent::ShapeAdded(id));
                self.commit_gesture("place sphere");
                if !tracker.drag.moved {
                    self.open_edit_panel(id);
                }
            }
            other => self.gesture = other,
        }
    }

    /// A drag commits; a click without motion opens the edit panel instead
    fn finish_drag(&mut self, label: &'static str, id: ShapeId, moved: bool) {
        if moved {
            self.commit_gesture(label);
        } else {
            self.document.revert_to_committed();
            self.open_edit_panel(id);
        }
    }

    fn commit_gesture(&mut self, label: &'static str) {
        self.document.commit();
        self.events.push(EditorEvent::Committed);
        debug!(gesture = label, "gesture committed");
    }

    /// Append a finished shape as one history entry
    fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = self.document.add_shape(shape);
        self.events.push(EditorEvent::ShapeAdded(id));
        self.events.push(EditorEvent::Committed);
        id
    }

    fn view_down(&mut self, event: &PointerEvent) {
        let visible = self.document.visible_shapes();
        if let Some(id) = clicked_measurement_id(&event.ray, &visible, self.config.measure_click_threshold) {
            self.open_edit_panel(id);
        }
    }

    fn two_click_down(&mut self, event: &PointerEvent) {
        match mem::take(&mut self.gesture) {
            Gesture::Drawing(tracker) => self.finish_two_click(tracker, &event.ray),
            Gesture::Idle => {
                if let Some((start, face)) = self.resolve_point(&event.ray) {
                    debug!(mode = self.mode.as_str(), ?start, on_face = face.is_some(), "first point");
                    self.gesture = Gesture::Drawing(DrawTracker::new(start, face));
                }
            }
            other => self.gesture = other,
        }
    }

    fn finish_two_click(&mut self, tracker: DrawTracker, ray: &Ray) {
        let plane = tracker.plane();
        let Some(end) = self.resolve_on(ray, &plane, tracker.face.is_some()) else {
            self.gesture = Gesture::Drawing(tracker);
            return;
        };
        self.snap_indicator = None;

        match self.mode {
            EditorMode::DrawRect => match tracker.rect_to(end, self.config.min_rect_size) {
                Some(rect) => {
                    let parent = tracker.face.map(|f| f.parent_id);
                    self.add_shape(Shape::new(ShapeKind::Rect(rect)).with_parent(parent));
                }
                None => debug!("degenerate rectangle dropped"),
            },
            EditorMode::Measure => {
                if tracker.start.distance(end) > self.config.min_rect_size {
                    let m = Measurement::new(tracker.start, end);
                    self.add_shape(Shape::new(ShapeKind::Measurement(m)));
                }
            }
            EditorMode::Calibrate => {
                let distance = tracker.start.distance(end);
                if distance >= self.config.min_calibration_distance {
                    info!(distance, "calibration length measured");
                    self.events.push(EditorEvent::CalibrationMeasured(distance));
                }
            }
            EditorMode::View | EditorMode::Extrude | EditorMode::PlaceSphere => {}
        }
    }

    fn extrude_down(&mut self, event: &PointerEvent) {
        if !self.gesture.is_idle() {
            return;
        }
        let visible = self.document.visible_shapes();

        // With a panel open, dragging the edited shape moves it; any other
        // click closes the panel
        if let Some(editing) = self.editing {
            let grabbed = visible
                .iter()
                .find(|s| s.id == editing)
                .and_then(|s| shape_hit_point(&event.ray, s, &self.config).map(|hit| (s, hit)));
            match grabbed {
                Some((shape, hit)) => {
                    debug!(id = %shape.id, "move started");
                    self.gesture =
                        Gesture::Moving(MoveTracker::start(shape, hit, event.ndc, event.view_dir));
                }
                None => self.close_edit_panel(),
            }
            return;
        }

        let Some(id) = hovered_shape_id(&event.ray, &visible, &self.config) else { return };
        let Some(shape) = visible.iter().find(|s| s.id == id) else { return };
        let Some(hit) = shape_hit_point(&event.ray, shape, &self.config) else { return };
        if let Some(tracker) = ExtrudeTracker::start(shape, hit, event.ndc, &self.config) {
            debug!(%id, handle = ?tracker.handle, "extrude started");
            self.hovered = Some(id);
            self.gesture = Gesture::Extruding(tracker);
        }
    }

    fn sphere_down(&mut self, event: &PointerEvent) {
        if !self.gesture.is_idle() {
            return;
        }
        if self.editing.is_some() {
            self.close_edit_panel();
            return;
        }

        let visible = self.document.visible_shapes();
        let hovered_sphere = hovered_shape_id(&event.ray, &visible, &self.config)
            .and_then(|id| visible.iter().find(|s| s.id == id))
            .filter(|s| s.as_sphere().is_some());
        if let Some(shape) = hovered_sphere {
            if let Some(hit) = shape_hit_point(&event.ray, shape, &self.config) {
                debug!(id = %shape.id, "sphere move started");
                self.gesture =
                    Gesture::Moving(MoveTracker::start(shape, hit, event.ndc, event.view_dir));
                return;
            }
        }

        let Some((center, _)) = self.resolve_point(&event.ray) else { return };
        let radius = self.config.default_radius;
        let sphere = Shape::new(ShapeKind::Sphere(SphereShape {
            center,
            radius,
            entity_shape: EntityShape::Sphere,
        }));
        let id = self.document.insert_transient(sphere);
        debug!(%id, ?center, "sphere placed");
        self.gesture = Gesture::PlacingSphere(SphereTracker::start(id, center, radius, event.ndc));
    }

    // =========================================================================
    // Point resolution
    // =========================================================================

    /// Resolve the pointer on the face under it, or on the ground
    fn resolve_point(&mut self, ray: &Ray) -> Option<(Vec3, Option<FaceHit>)> {
        let visible = self.document.visible_shapes();
        let face = face_hit(ray, &visible, &self.config);
        let plane = face.map_or_else(Plane::ground, |f| f.plane);
        let point = self.resolve_on(ray, &plane, face.is_some())?;
        Some((point, face))
    }

    /// Intersect with `plane` and snap; snapped points on a face are pulled
    /// back onto the face plane
    fn resolve_on(&mut self, ray: &Ray, plane: &Plane, on_face: bool) -> Option<Vec3> {
        let raw = drawing_point(ray, plane)?;
        if !self.snap_enabled {
            self.snap_indicator = None;
            return Some(raw);
        }
        let snap = snapped_position(raw, self.document.shapes(), self.config.snap_threshold);
        let point = if on_face { plane.project(snap.point) } else { snap.point };
        self.snap_indicator = snap.is_snapped.then_some(point);
        Some(point)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    pub fn apply_command(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::Cancel => self.escape(),
            EditorCommand::Undo => {
                self.undo();
            }
            EditorCommand::Redo => {
                self.redo();
            }
            EditorCommand::DeleteSelected => {
                self.delete_editing();
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let changed = self.document.undo();
        if changed {
            self.after_history_jump();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let changed = self.document.redo();
        if changed {
            self.after_history_jump();
        }
        changed
    }

    fn after_history_jump(&mut self) {
        self.hovered = None;
        if let Some(id) = self.editing {
            if self.document.shape(id).is_none() {
                self.close_edit_panel();
            }
        }
    }

    /// Delete the shape in the edit panel, with everything drawn on it
    pub fn delete_editing(&mut self) -> bool {
        let Some(id) = self.editing else { return false };
        let removed = self.edit("delete", |doc| doc.delete_shape(id));
        if removed.is_some() {
            self.close_edit_panel();
        }
        removed.is_some()
    }

    pub fn delete_shape(&mut self, id: ShapeId) -> bool {
        let removed = self.edit("delete", |doc| doc.delete_shape(id));
        if removed.is_some() && self.editing == Some(id) {
            self.close_edit_panel();
        }
        removed.is_some()
    }

    pub fn rename_shape(&mut self, id: ShapeId, name: &str) -> bool {
        self.edit("rename", |doc| doc.rename_shape(id, name)).is_some()
    }

    pub fn set_shape_color(&mut self, id: ShapeId, color: Option<HexColor>) -> bool {
        self.edit("set color", |doc| doc.set_shape_color(id, color)).is_some()
    }

    pub fn set_entity_shape(&mut self, id: ShapeId, entity_shape: EntityShape) -> bool {
        self.edit("set entity shape", |doc| doc.set_entity_shape(id, entity_shape)).is_some()
    }

    pub fn move_shape(&mut self, id: ShapeId, delta: Vec3) -> bool {
        self.edit("move", |doc| doc.move_shape(id, delta)).is_some()
    }

    /// Edit-panel arrow buttons, mapped onto the shape's base plane
    pub fn nudge_shape(&mut self, id: ShapeId, direction: MoveDirection, step: f32) -> bool {
        let orientation = self
            .document
            .shape(id)
            .and_then(Shape::as_rect)
            .map_or(Orientation::Xz, |r| r.orientation);
        self.move_shape(id, direction.delta(orientation, step))
    }

    pub fn apply_dimensions(&mut self, id: ShapeId, edit: &DimensionEdit) -> bool {
        self.edit("apply dimensions", |doc| doc.apply_dimensions(id, edit)).is_some()
    }

    /// Change the canvas scale, rescaling every shape to match
    pub fn set_canvas_scale(&mut self, scale: f32) -> bool {
        if scale == self.canvas_scale {
            return true;
        }
        let old = self.canvas_scale;
        let ok = self.edit("rescale", |doc| doc.rescale_shapes(old, scale)).is_some();
        if ok {
            self.canvas_scale = scale;
        }
        ok
    }

    pub fn move_shape_to_layer(&mut self, id: ShapeId, layer_id: LayerId) -> bool {
        self.edit("move to layer", |doc| doc.move_shape_to_layer(id, layer_id)).is_some()
    }

    pub fn toggle_shape_visibility(&mut self, id: ShapeId) -> Option<bool> {
        self.edit("toggle visibility", |doc| doc.toggle_shape_visibility(id))
    }

    pub fn add_layer(&mut self, name: &str) -> LayerId {
        self.document.add_layer(name)
    }

    pub fn rename_layer(&mut self, id: LayerId, name: &str) -> bool {
        let result = self.document.rename_layer(id, name);
        report("rename layer", result).is_some()
    }

    pub fn set_layer_color(&mut self, id: LayerId, color: HexColor) -> bool {
        let result = self.document.set_layer_color(id, color);
        report("set layer color", result).is_some()
    }

    pub fn toggle_layer_visibility(&mut self, id: LayerId) -> Option<bool> {
        self.cancel_gesture();
        let result = self.document.toggle_layer_visibility(id);
        report("toggle layer", result)
    }

    /// Remove a layer, moving its shapes to the default layer.
    /// Removing the default layer does nothing.
    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        self.cancel_gesture();
        self.document.remove_layer(id)
    }

    /// Run a committing document command; errors are logged and dropped
    fn edit<T>(
        &mut self,
        command: &'static str,
        f: impl FnOnce(&mut Document) -> Result<T, EditError>,
    ) -> Option<T> {
        self.cancel_gesture();
        let value = report(command, f(&mut self.document))?;
        self.events.push(EditorEvent::Committed);
        Some(value)
    }
}

fn report<T>(command: &'static str, result: Result<T, EditError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(command, error = %e, "command rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::geometry::Vec2;

    const DOWN: Vec3 = Vec3 { x: 0.0, y: -1.0, z: 0.0 };

    /// Pointer straight above (x, z), looking down
    fn at(x: f32, z: f32, ndc: Vec2) -> PointerEvent {
        PointerEvent::new(Ray::new(Vec3::new(x, 500.0, z), DOWN), ndc, DOWN)
    }

    fn click(editor: &mut Editor, x: f32, z: f32) {
        let e = at(x, z, Vec2::ZERO);
        editor.pointer_down(&e);
        editor.pointer_up(&e);
    }

    fn drag(editor: &mut Editor, x: f32, z: f32, dy: f32) {
        editor.pointer_down(&at(x, z, Vec2::ZERO));
        editor.pointer_move(&at(x, z, Vec2::new(0.0, dy)));
        editor.pointer_up(&at(x, z, Vec2::new(0.0, dy)));
    }

    fn draw_rect(editor: &mut Editor, a: (f32, f32), b: (f32, f32)) -> ShapeId {
        editor.set_mode(EditorMode::DrawRect);
        click(editor, a.0, a.1);
        click(editor, b.0, b.1);
        editor.document().shapes().last().map(|s| s.id).unwrap()
    }

    fn history_len(editor: &Editor) -> usize {
        editor.document().history().len()
    }

    #[test]
    fn test_draw_rect_on_ground() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (100.0, 50.0));

        let shapes = editor.document().shapes();
        assert_eq!(shapes.len(), 1);
        let shape = &shapes[0];
        assert_eq!(shape.id, id);
        assert_eq!(shape.name, "Wall 1");
        assert_eq!(shape.parent_id, None);
        let r = shape.as_rect().unwrap();
        assert_eq!(r.height, 0.0);
        assert_eq!(r.orientation, Orientation::Xz);
        assert_eq!(r.points[0], Vec3::ZERO);
        assert_eq!(r.points[1], Vec3::new(100.0, 0.0, 0.0));
        assert_eq!(r.points[2], Vec3::new(100.0, 0.0, 50.0));
        assert_eq!(r.points[3], Vec3::new(0.0, 0.0, 50.0));
        assert!(editor.gesture().is_idle());
        assert_eq!(history_len(&editor), 2);
        assert!(editor.take_events().contains(&EditorEvent::ShapeAdded(id)));
    }

    #[test]
    fn test_extrude_height_commits_once() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (100.0, 50.0));
        editor.set_mode(EditorMode::Extrude);
        editor.take_events();

        editor.pointer_down(&at(30.0, 20.0, Vec2::ZERO));
        assert_eq!(editor.active_extrude_id(), Some(id));
        editor.pointer_move(&at(30.0, 20.0, Vec2::new(0.0, 0.1)));
        // Live but not yet committed
        assert_abs_diff_eq!(editor.document().shape(id).unwrap().height(), 15.0, epsilon = 1e-3);
        assert_eq!(history_len(&editor), 2);

        editor.pointer_up(&at(30.0, 20.0, Vec2::new(0.0, 0.1)));
        assert_abs_diff_eq!(editor.document().shape(id).unwrap().height(), 15.0, epsilon = 1e-3);
        assert_eq!(history_len(&editor), 3);
        assert_eq!(editor.active_extrude_id(), None);
        let events = editor.take_events();
        assert_eq!(events.iter().filter(|e| **e == EditorEvent::Committed).count(), 1);
    }

    #[test]
    fn test_child_on_top_face_outward_and_hole() {
        let mut editor = Editor::default();
        let parent = draw_rect(&mut editor, (0.0, 0.0), (100.0, 100.0));
        let height = DimensionEdit { height: Some(50.0), ..Default::default() };
        assert!(editor.apply_dimensions(parent, &height));

        let child = draw_rect(&mut editor, (20.0, 20.0), (60.0, 60.0));
        {
            let s = editor.document().shape(child).unwrap();
            assert_eq!(s.parent_id, Some(parent));
            let r = s.as_rect().unwrap();
            assert_eq!(r.orientation, Orientation::Xz);
            assert_eq!(r.face_direction, crate::model::FaceDirection::Positive);
            assert_abs_diff_eq!(r.base_y, 50.0);
        }

        editor.set_mode(EditorMode::Extrude);
        drag(&mut editor, 40.0, 40.0, 10.0 / 150.0);
        let s = editor.document().shape(child).unwrap();
        assert_abs_diff_eq!(s.height(), 10.0, epsilon = 1e-3);
        assert!(s.is_outward_extrusion());

        assert!(editor.undo());
        assert_eq!(editor.document().shape(child).unwrap().height(), 0.0);

        drag(&mut editor, 40.0, 40.0, -10.0 / 150.0);
        let s = editor.document().shape(child).unwrap();
        assert_abs_diff_eq!(s.height(), -10.0, epsilon = 1e-3);
        assert!(!s.is_outward_extrusion());

        // The hole is cut out of the parent instead of drawn on its own
        let items = editor.render_items();
        assert!(items.iter().any(|i| matches!(i, RenderItem::Composed { shape_id, .. } if *shape_id == parent)));
        assert!(items.iter().all(|i| i.shape_id() != child));
    }

    #[test]
    fn test_remove_layer_migrates_shapes() {
        let mut editor = Editor::default();
        let a = draw_rect(&mut editor, (0.0, 0.0), (50.0, 50.0));
        let b = draw_rect(&mut editor, (100.0, 100.0), (150.0, 150.0));
        let layer = editor.add_layer("Furniture");
        assert!(editor.move_shape_to_layer(a, layer));
        assert!(editor.move_shape_to_layer(b, layer));

        assert!(editor.remove_layer(layer));
        for id in [a, b] {
            assert_eq!(editor.document().shape(id).unwrap().layer_id, LayerId::DEFAULT);
        }
        assert!(editor.document().layers().get(layer).is_none());

        let before = editor.document().layers().len();
        assert!(!editor.remove_layer(LayerId::DEFAULT));
        assert_eq!(editor.document().layers().len(), before);
    }

    #[test]
    fn test_click_without_motion_opens_panel() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (100.0, 50.0));
        editor.set_mode(EditorMode::Extrude);
        editor.take_events();

        click(&mut editor, 30.0, 20.0);
        assert_eq!(editor.editing_id(), Some(id));
        assert_eq!(history_len(&editor), 2);
        assert_eq!(editor.take_events(), vec![EditorEvent::EditPanelOpened(id)]);
    }

    #[test]
    fn test_move_while_editing() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (100.0, 50.0));
        editor.set_mode(EditorMode::Extrude);
        click(&mut editor, 30.0, 20.0);
        assert_eq!(editor.editing_id(), Some(id));

        // Camera looks down, so the drag plane is horizontal
        editor.pointer_down(&at(30.0, 20.0, Vec2::ZERO));
        editor.pointer_move(&at(40.0, 25.0, Vec2::new(0.1, 0.0)));
        editor.pointer_up(&at(40.0, 25.0, Vec2::new(0.1, 0.0)));
        let r = editor.document().shape(id).unwrap().as_rect().unwrap().clone();
        assert_abs_diff_eq!(r.points[0].x, 10.0, epsilon = 1e-3);
        assert_abs_diff_eq!(r.points[0].z, 5.0, epsilon = 1e-3);
        assert_eq!(history_len(&editor), 3);

        // Clicking elsewhere closes the panel
        click(&mut editor, 400.0, 400.0);
        assert_eq!(editor.editing_id(), None);
    }

    #[test]
    fn test_escape_mid_drag_reverts() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (100.0, 50.0));
        editor.set_mode(EditorMode::Extrude);
        editor.pointer_down(&at(30.0, 20.0, Vec2::ZERO));
        editor.pointer_move(&at(30.0, 20.0, Vec2::new(0.0, 0.2)));
        assert!(editor.document().shape(id).unwrap().height() > 0.0);

        editor.apply_command(EditorCommand::Cancel);
        assert_eq!(editor.document().shape(id).unwrap().height(), 0.0);
        assert!(editor.gesture().is_idle());
        assert_eq!(history_len(&editor), 2);
    }

    #[test]
    fn test_mode_switch_drops_half_drawn_rect() {
        let mut editor = Editor::default();
        editor.set_mode(EditorMode::DrawRect);
        click(&mut editor, 0.0, 0.0);
        editor.pointer_move(&at(50.0, 50.0, Vec2::ZERO));
        assert!(editor.preview_rect().is_some());

        editor.set_mode(EditorMode::View);
        assert!(editor.gesture().is_idle());
        assert!(editor.preview_rect().is_none());
        assert!(editor.document().shapes().is_empty());
    }

    #[test]
    fn test_degenerate_rect_dropped() {
        let mut editor = Editor::default();
        editor.set_mode(EditorMode::DrawRect);
        click(&mut editor, 200.0, 200.0);
        click(&mut editor, 200.0, 200.05);
        assert!(editor.document().shapes().is_empty());
        assert_eq!(history_len(&editor), 1);
    }

    #[test]
    fn test_place_sphere_click_and_drag() {
        let mut editor = Editor::default();
        editor.set_mode(EditorMode::PlaceSphere);

        click(&mut editor, 200.0, 200.0);
        let first = editor.document().shapes()[0].clone();
        assert_eq!(first.name, "Object 1");
        assert_eq!(first.as_sphere().unwrap().radius, 10.0);
        assert_eq!(editor.editing_id(), Some(first.id));
        assert_eq!(history_len(&editor), 2);

        // Next click only closes the panel
        click(&mut editor, 300.0, 300.0);
        assert_eq!(editor.editing_id(), None);
        assert_eq!(editor.document().shapes().len(), 1);

        drag(&mut editor, 400.0, 400.0, 0.1);
        let second = editor.document().shapes()[1].clone();
        assert_abs_diff_eq!(second.as_sphere().unwrap().radius, 25.0, epsilon = 1e-3);
        assert_eq!(editor.editing_id(), None);
        assert_eq!(history_len(&editor), 3);
    }

    #[test]
    fn test_measure_and_select() {
        let mut editor = Editor::default();
        editor.set_mode(EditorMode::Measure);
        click(&mut editor, 100.0, 100.0);
        assert!(editor.preview_line().is_some());
        let before = history_len(&editor);
        click(&mut editor, 200.0, 100.0);
        assert_eq!(history_len(&editor), before + 1);
        let events = editor.take_events();
        assert_eq!(events.iter().filter(|e| **e == EditorEvent::Committed).count(), 1);

        let m = editor.document().shapes()[0].clone();
        assert_eq!(m.name, "Dimension 1");
        assert_abs_diff_eq!(m.as_measurement().unwrap().distance, 100.0, epsilon = 1e-3);

        editor.set_mode(EditorMode::View);
        click(&mut editor, 150.0, 102.0);
        assert_eq!(editor.editing_id(), Some(m.id));
    }

    #[test]
    fn test_calibrate_emits_distance() {
        let mut editor = Editor::default();
        editor.set_mode(EditorMode::Calibrate);
        click(&mut editor, 100.0, 100.0);
        click(&mut editor, 100.0, 180.0);
        assert!(editor.document().shapes().is_empty());
        let events = editor.take_events();
        let measured = events.iter().find_map(|e| match e {
            EditorEvent::CalibrationMeasured(d) => Some(*d),
            _ => None,
        });
        assert_abs_diff_eq!(measured.unwrap(), 80.0, epsilon = 1e-3);
    }

    #[test]
    fn test_snap_to_existing_corner() {
        let mut editor = Editor::default();
        draw_rect(&mut editor, (100.0, 100.0), (200.0, 200.0));
        let second = draw_rect(&mut editor, (205.0, 195.0), (300.0, 300.0));
        let r = editor.document().shape(second).unwrap().as_rect().unwrap().clone();
        assert_eq!(r.points[0], Vec3::new(200.0, 0.0, 200.0));

        editor.snap_enabled = false;
        let third = draw_rect(&mut editor, (205.0, 195.0), (300.0, 100.0));
        let r = editor.document().shape(third).unwrap().as_rect().unwrap().clone();
        assert_eq!(r.points[0], Vec3::new(205.0, 0.0, 195.0));
    }

    #[test]
    fn test_delete_editing_and_undo() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (100.0, 50.0));
        assert!(editor.select_shape(id));
        editor.apply_command(EditorCommand::DeleteSelected);
        assert!(editor.document().shapes().is_empty());
        assert_eq!(editor.editing_id(), None);

        editor.apply_command(EditorCommand::Undo);
        assert!(editor.document().shape(id).is_some());
        editor.apply_command(EditorCommand::Redo);
        assert!(editor.document().shape(id).is_none());
    }

    #[test]
    fn test_invalid_commands_are_swallowed() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (100.0, 50.0));
        let len = history_len(&editor);
        assert!(!editor.set_canvas_scale(0.0));
        assert!(!editor.rename_shape(ShapeId(999), "Ghost"));
        assert!(!editor.set_entity_shape(id, EntityShape::Cube));
        assert_eq!(history_len(&editor), len);
        assert_eq!(editor.canvas_scale(), 1.0);
    }

    #[test]
    fn test_canvas_rescale() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (100.0, 50.0));
        assert!(editor.set_canvas_scale(2.0));
        let r = editor.document().shape(id).unwrap().as_rect().unwrap().clone();
        assert_abs_diff_eq!(r.points[2].x, 50.0, epsilon = 1e-4);
        assert_eq!(editor.canvas_scale(), 2.0);
    }

    #[test]
    fn test_nudge_uses_base_plane() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (100.0, 50.0));
        assert!(editor.nudge_shape(id, MoveDirection::Up, 5.0));
        let r = editor.document().shape(id).unwrap().as_rect().unwrap().clone();
        assert_abs_diff_eq!(r.points[0].z, -5.0);
    }
}

//! Massing Core - interaction and geometry core of a 3D floor-plan editor
//!
//! Rectangles are drawn on the ground or on faces of existing volumes and
//! extruded; children extruded into their parent become holes that are cut
//! out of it. Spheres/cubes and dimension lines complete the shape set.
//!
//! # Module Organization
//!
//! - `geometry` - Vectors, boxes, rays, planes and the pick camera
//! - `model` - Shapes, layers, colors
//! - `query` - Hover, face hit, snapping
//! - `interaction` - Modes, pointer samples, gesture trackers
//! - `csg` - Hole subtraction and scene composition
//! - `history` - Snapshot undo/redo
//! - `document` - Shapes + layers + history, with editing commands
//! - `editor` - Mode/gesture state machine driving the document
//! - `panel` - Layer list and edit panel view models
//! - `input` - Keyboard shortcuts
//! - `config` - Tuning constants, loadable from RON
//!
//! The crate logs through `tracing` and never installs a subscriber.

pub mod config;
pub mod csg;
pub mod document;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod history;
pub mod input;
pub mod interaction;
pub mod model;
pub mod panel;
pub mod query;

pub use config::{ConfigError, EditorConfig};
pub use document::{DimensionEdit, Document};
pub use editor::{Editor, EditorEvent};
pub use error::EditError;
pub use interaction::{EditorMode, PointerEvent};

//! Keyboard input

mod keymap;

pub use keymap::{EditorCommand, Keymap, Shortcut};

//! Keyboard shortcuts for editor commands
//!
//! Lookup is a pure function of key + modifiers so it can be tested without
//! a window; `Keymap::poll` reads the live keyboard through macroquad.

use std::collections::HashMap;

use macroquad::prelude::{KeyCode, is_key_down, is_key_pressed};

/// Commands reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    /// Drop the gesture in progress and close the edit panel
    Cancel,
    Undo,
    Redo,
    /// Delete the shape whose edit panel is open
    DeleteSelected,
}

impl EditorCommand {
    pub fn label(&self) -> &'static str {
        match self {
            EditorCommand::Cancel => "Cancel",
            EditorCommand::Undo => "Undo",
            EditorCommand::Redo => "Redo",
            EditorCommand::DeleteSelected => "Delete",
        }
    }
}

/// A key plus modifiers; `ctrl` also matches Cmd on Mac
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub key: KeyCode,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Shortcut {
    pub fn key(key: KeyCode) -> Self {
        Self { key, ctrl: false, shift: false, alt: false }
    }

    pub fn ctrl(key: KeyCode) -> Self {
        Self { ctrl: true, ..Self::key(key) }
    }

    pub fn ctrl_shift(key: KeyCode) -> Self {
        Self { shift: true, ..Self::ctrl(key) }
    }

    /// Format for menus and tooltips, e.g. "Ctrl+Shift+Z"
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.ctrl {
            s.push_str(if cfg!(target_os = "macos") { "Cmd+" } else { "Ctrl+" });
        }
        if self.shift {
            s.push_str("Shift+");
        }
        if self.alt {
            s.push_str("Alt+");
        }
        s.push_str(key_name(self.key));
        s
    }
}

fn key_name(key: KeyCode) -> &'static str {
    match key {
        KeyCode::Escape => "Esc",
        KeyCode::Delete => "Del",
        KeyCode::Backspace => "Backspace",
        KeyCode::Z => "Z",
        KeyCode::Y => "Y",
        _ => "?",
    }
}

/// Shortcut table
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<Shortcut, EditorCommand>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self { bindings: HashMap::new() };
        keymap.bind(Shortcut::key(KeyCode::Escape), EditorCommand::Cancel);
        keymap.bind(Shortcut::ctrl(KeyCode::Z), EditorCommand::Undo);
        keymap.bind(Shortcut::ctrl(KeyCode::Y), EditorCommand::Redo);
        keymap.bind(Shortcut::ctrl_shift(KeyCode::Z), EditorCommand::Redo);
        keymap.bind(Shortcut::key(KeyCode::Delete), EditorCommand::DeleteSelected);
        keymap.bind(Shortcut::key(KeyCode::Backspace), EditorCommand::DeleteSelected);
        keymap
    }
}

impl Keymap {
    /// Bind a shortcut, returning the command it replaced
    pub fn bind(&mut self, shortcut: Shortcut, command: EditorCommand) -> Option<EditorCommand> {
        self.bindings.insert(shortcut, command)
    }

    pub fn unbind(&mut self, shortcut: &Shortcut) -> Option<EditorCommand> {
        self.bindings.remove(shortcut)
    }

    pub fn command_for(&self, key: KeyCode, ctrl: bool, shift: bool, alt: bool) -> Option<EditorCommand> {
        self.bindings.get(&Shortcut { key, ctrl, shift, alt }).copied()
    }

    /// Shortcuts bound to a command, for tooltips
    pub fn shortcuts_for(&self, command: EditorCommand) -> Vec<Shortcut> {
        let mut found: Vec<Shortcut> = self
            .bindings
            .iter()
            .filter(|(_, c)| **c == command)
            .map(|(s, _)| *s)
            .collect();
        found.sort_by_key(|s| (s.ctrl, s.shift, s.alt, s.display()));
        found
    }

    /// Commands whose key went down this frame
    pub fn poll(&self) -> Vec<EditorCommand> {
        let ctrl = is_key_down(KeyCode::LeftControl)
            || is_key_down(KeyCode::RightControl)
            || is_key_down(KeyCode::LeftSuper)
            || is_key_down(KeyCode::RightSuper);
        let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);
        let alt = is_key_down(KeyCode::LeftAlt) || is_key_down(KeyCode::RightAlt);

        self.bindings
            .iter()
            .filter(|(s, _)| s.ctrl == ctrl && s.shift == shift && s.alt == alt)
            .filter(|(s, _)| is_key_pressed(s.key))
            .map(|(_, command)| *command)
            .collect()
    }
}

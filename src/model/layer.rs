//! Layers group shapes for visibility and coloring
//!
//! The default layer always exists and cannot be removed. Shapes on a layer
//! that is being removed are moved to the default layer by the document.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Deserialize};

use crate::error::EditError;
use super::color::HexColor;

/// Colors handed out to new layers, in order
pub const LAYER_PALETTE: [HexColor; 8] = [
    HexColor(0x3b82f6), // blue
    HexColor(0xef4444), // red
    HexColor(0x10b981), // green
    HexColor(0xf59e0b), // amber
    HexColor(0x8b5cf6), // violet
    HexColor(0xec4899), // pink
    HexColor(0x06b6d4), // cyan
    HexColor(0x84cc16), // lime
];

/// Layer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u32);

impl LayerId {
    pub const DEFAULT: LayerId = LayerId(0);

    pub fn is_default(&self) -> bool {
        *self == LayerId::DEFAULT
    }
}

impl Default for LayerId {
    fn default() -> Self {
        LayerId::DEFAULT
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub color: HexColor,
}

/// Ordered layer list; index 0 is always the default layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSet {
    layers: Vec<Layer>,
    next_id: u32,
}

impl Default for LayerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerSet {
    pub fn new() -> Self {
        Self {
            layers: vec![Layer {
                id: LayerId::DEFAULT,
                name: "Default".to_string(),
                visible: true,
                color: HexColor::BLUE,
            }],
            next_id: 1,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.get(id).is_some()
    }

    fn get_mut(&mut self, id: LayerId) -> Result<&mut Layer, EditError> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(EditError::UnknownLayer(id))
    }

    /// Append a visible layer; its color cycles through the palette
    pub fn add(&mut self, name: &str) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        let color = LAYER_PALETTE[self.layers.len() % LAYER_PALETTE.len()];
        self.layers.push(Layer {
            id,
            name: name.to_string(),
            visible: true,
            color,
        });
        id
    }

    pub fn rename(&mut self, id: LayerId, name: &str) -> Result<(), EditError> {
        self.get_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn set_color(&mut self, id: LayerId, color: HexColor) -> Result<(), EditError> {
        self.get_mut(id)?.color = color;
        Ok(())
    }

    /// Flip visibility, returning the new state
    pub fn toggle_visibility(&mut self, id: LayerId) -> Result<bool, EditError> {
        let layer = self.get_mut(id)?;
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    /// Remove a layer. The default layer and unknown ids are left alone.
    /// Returns whether a layer was removed.
    pub fn remove(&mut self, id: LayerId) -> bool {
        if id.is_default() {
            return false;
        }
        let before = self.layers.len();
        self.layers.retain(|l| l.id != id);
        self.layers.len() != before
    }

    /// Ids of layers currently hidden
    pub fn hidden_ids(&self) -> HashSet<LayerId> {
        self.layers.iter().filter(|l| !l.visible).map(|l| l.id).collect()
    }

    /// Color a shape on `id` should use when it has no override
    pub fn color_of(&self, id: LayerId) -> HexColor {
        self.get(id).map_or(HexColor::BLUE, |l| l.color)
    }
}

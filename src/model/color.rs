//! Hex colors for layers and per-shape overrides

use std::fmt;
use std::str::FromStr;

use macroquad::color::Color;
use serde::{Serialize, Deserialize};

use crate::error::EditError;

/// 24-bit RGB color, stored as 0xRRGGBB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexColor(pub u32);

impl HexColor {
    pub const BLUE: HexColor = HexColor(0x3b82f6);

    /// Convert for rendering
    pub fn to_color(self) -> Color {
        Color::from_hex(self.0)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0xff_ffff)
    }
}

impl FromStr for HexColor {
    type Err = EditError;

    /// Parse "#rrggbb" (the leading '#' is optional)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EditError::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(HexColor)
            .map_err(|_| EditError::InvalidColor(s.to_string()))
    }
}

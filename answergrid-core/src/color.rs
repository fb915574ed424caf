//! Display colors and the shared school palette.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A named display color with a `#RRGGBB` hex value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintColor {
    /// Human-readable name shown in the editor.
    pub name: String,
    /// Hex value in `#RRGGBB` form.
    pub value: String,
}

impl PaintColor {
    /// Create a color from a name and hex value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Decode the hex value into RGB components.
    ///
    /// Returns `None` for anything that is not a `#RRGGBB` string. Callers
    /// treat an undecodable value as "no color" and skip the swatch rather
    /// than failing the whole operation.
    #[must_use]
    pub fn rgb(&self) -> Option<[u8; 3]> {
        let hex = self.value.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some([r, g, b])
    }
}

/// The palette offered by the editor, in pick order.
const PALETTE: [(&str, &str); 24] = [
    ("White", "#FFFFFF"),
    ("Light Pink", "#F4C2C2"),
    ("Salmon", "#FA8072"),
    ("Magenta", "#FF00FF"),
    ("Red", "#FF0000"),
    ("Wine", "#722F37"),
    ("Orange", "#FFA500"),
    ("Yellow", "#FFFF00"),
    ("Lemon Yellow", "#E3FF00"),
    ("Light Green", "#90EE90"),
    ("Green", "#008000"),
    ("Dark Green", "#006400"),
    ("Cyan", "#00FFFF"),
    ("Sky Blue", "#87CEEB"),
    ("Blue", "#0000FF"),
    ("Navy", "#000080"),
    ("Violet", "#8A2BE2"),
    ("Purple", "#800080"),
    ("Copper", "#B87333"),
    ("Brown", "#A52A2A"),
    ("Chestnut", "#704214"),
    ("Gray", "#808080"),
    ("Silver", "#C0C0C0"),
    ("Black", "#000000"),
];

/// The 24-color palette offered by the editor.
#[must_use]
pub fn standard_palette() -> Vec<PaintColor> {
    PALETTE
        .iter()
        .map(|&(name, value)| PaintColor::new(name, value))
        .collect()
}

/// Pick the first palette color whose hex value is not already in use.
///
/// The usage set is passed explicitly so the choice is a pure function of
/// its inputs; `used` is keyed by hex value, matching how the editor tracks
/// colors across questions.
#[must_use]
pub fn next_available(palette: &[PaintColor], used: &HashSet<String>) -> Option<PaintColor> {
    palette.iter().find(|c| !used.contains(&c.value)).cloned()
}

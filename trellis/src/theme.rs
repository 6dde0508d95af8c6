//! Theme: the explicit configuration value threaded through every context.
//!
//! There is no process-wide mutable theme. A `View` is constructed with a
//! `Theme` (usually `Theme::default()`), every `BasicContext` borrows it, and
//! the `Themed` element swaps in a different one for a subtree.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::primitives::Color;

/// How a dial maps pointer motion to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialMode {
    /// Value follows the angle between the dial center and the cursor.
    Radial,
    /// Value follows horizontal/vertical displacement.
    #[default]
    Linear,
}

/// Visual and behavioral parameters for elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub panel_color: Color,
    pub frame_color: Color,
    pub indicator_color: Color,
    pub scrollbar_color: Color,
    pub label_color: Color,
    pub drop_highlight_color: Color,
    /// Background behind selected list items.
    pub selection_color: Color,
    pub label_font_size: f32,

    pub dial_mode: DialMode,
    /// Pixels of linear travel covering the full 0..1 range.
    pub dial_linear_range: f32,
    /// Fraction of a full turn covered by a radial dial, centered on the
    /// bottom dead zone.
    pub dial_travel: f32,
    /// Largest value change a single radial update may make.
    pub dial_max_delta: f32,

    /// Value change per unit of wheel travel for dials and sliders.
    pub scroll_step: f32,
    pub scrollbar_width: f32,
    /// Space left around an element scrolled into view.
    pub scroll_clearance: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            panel_color: Color::rgb8(0x28, 0x28, 0x28),
            frame_color: Color::rgb8(0x40, 0x40, 0x40),
            indicator_color: Color::rgb8(0x2a, 0x8c, 0xe6),
            scrollbar_color: Color::rgba(0.5, 0.5, 0.5, 0.6),
            label_color: Color::rgba(1.0, 1.0, 1.0, 0.85),
            drop_highlight_color: Color::rgba(0.3, 0.5, 0.8, 0.4),
            selection_color: Color::rgba(0.16, 0.55, 0.9, 0.5),
            label_font_size: 14.0,
            dial_mode: DialMode::Linear,
            dial_linear_range: 200.0,
            dial_travel: 0.82,
            dial_max_delta: 0.6,
            scroll_step: 0.005,
            scrollbar_width: 10.0,
            scroll_clearance: 20.0,
        }
    }
}

impl Theme {
    /// Parse a theme from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Theme> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a theme file.
    pub fn load(path: impl AsRef<Path>) -> Result<Theme> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let theme = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), "theme loaded");
        Ok(theme)
    }
}

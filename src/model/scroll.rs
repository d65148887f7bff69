//! Scroll position and margins in pixels.

use serde::{Deserialize, Serialize};

/// Raw scroll position of the viewport in pixels.
///
/// Values can be negative down to `-margin.top` / `-margin.left` when a
/// scroll margin is configured.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollOffsets {
    /// Vertical scroll position.
    pub top: f64,
    /// Horizontal scroll position.
    pub left: f64,
}

/// Extra scrollable space around the content.
///
/// Loaded from the `[renderer.scroll_margin]` config table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollMargin {
    /// Space above the first row.
    pub top: f64,
    /// Space below the last row.
    pub bottom: f64,
    /// Space left of column zero.
    pub left: f64,
    /// Space right of the longest line.
    pub right: f64,
}

impl ScrollMargin {
    /// Create a margin from its four sides.
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Total vertical margin.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Total horizontal margin.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }
}

/// Extra rows of slack used when scrolling a position into view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewMargin {
    /// Pixels to keep clear above the target.
    pub top: f64,
    /// Pixels to keep clear below the target.
    pub bottom: f64,
}

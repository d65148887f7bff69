//! Cached viewport measurements.

use serde::Serialize;

/// Last measured size of the editor viewport in pixels.
///
/// `scroller_width`/`scroller_height` are the area left for text once the
/// gutter and any visible scrollbars are subtracted.
///
/// # Invariants
/// - `dirty` is true until a layout has been computed against a known,
///   non-zero width and height. No paint work proceeds while dirty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportSize {
    /// Total width of the host container.
    pub width: f64,
    /// Height of the host container minus extra chrome.
    pub height: f64,
    /// Width of the text scroller.
    pub scroller_width: f64,
    /// Height of the text scroller.
    pub scroller_height: f64,
    /// No trustworthy measurement has been observed yet.
    pub dirty: bool,
}

impl ViewportSize {
    /// True if both scroller dimensions are known and positive.
    pub fn is_measured(&self) -> bool {
        !self.dirty && self.scroller_width > 0.0 && self.scroller_height > 0.0
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            scroller_width: 0.0,
            scroller_height: 0.0,
            dirty: true,
        }
    }
}

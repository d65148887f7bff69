//! Immutable snapshot of one layout pass.

use serde::Serialize;
use std::sync::Arc;

/// Geometry published by the layout engine and read by every paint layer.
///
/// A new value is produced for every layout pass and handed out as
/// `Arc<LayerConfig>`; the previous snapshot is never mutated, so a layer
/// still holding the old `Arc` keeps seeing a coherent picture.
///
/// All pixel quantities are `f64`; rows are document rows unless noted.
///
/// # Invariants
/// - `first_row <= last_row`
/// - `last_row < document row count` (or `0` for an empty document)
/// - `0 <= vertical_offset` once scroll position is clamped above the top margin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerConfig {
    /// Width of the longest rendered line (never narrower than the scroller).
    pub content_width: f64,
    /// Horizontal text padding.
    pub padding: f64,
    /// First document row kept live.
    pub first_row: usize,
    /// Screen row at which `first_row` starts.
    pub first_row_screen: usize,
    /// Last document row kept live (inclusive).
    pub last_row: usize,
    /// Height of one screen line.
    pub line_height: f64,
    /// Width of one character cell.
    pub character_width: f64,
    /// Minimum backing-surface height for paint layers.
    pub min_height: f64,
    /// Total scrollable content height.
    pub max_height: f64,
    /// Sub-row pixel remainder: `scroll_top - first_row_screen * line_height`.
    pub vertical_offset: f64,
    /// Rows the gutter must extend past the scroller to cover the container.
    pub gutter_offset: usize,
    /// Height of the visible scroller.
    pub height: f64,
}

impl LayerConfig {
    /// Wrap in the shared handle used for publication.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Number of document rows in the live window.
    pub fn row_count(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    /// True if `row` lies inside the live window.
    pub fn contains_row(&self, row: usize) -> bool {
        (self.first_row..=self.last_row).contains(&row)
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            content_width: 1.0,
            padding: 0.0,
            first_row: 0,
            first_row_screen: 0,
            last_row: 0,
            line_height: 0.0,
            character_width: 0.0,
            min_height: 1.0,
            max_height: 1.0,
            vertical_offset: 0.0,
            gutter_offset: 1,
            height: 1.0,
        }
    }
}

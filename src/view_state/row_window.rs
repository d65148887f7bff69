//! Rows kept live by the current layer configuration.

use crate::model::LayerConfig;
use serde::Serialize;

/// Document rows painted by the last layout pass.
///
/// Derived from a [`LayerConfig`]; the fully-visible queries account for
/// the sub-row pixel offset of a partially scrolled first row.
///
/// # Invariants
/// - `first_row <= last_row`
/// - Every row whose pixel span intersects the viewport lies in
///   `first_row..=last_row`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowWindow {
    /// First document row (inclusive).
    pub first_row: usize,
    /// Last document row (inclusive).
    pub last_row: usize,
    /// Screen row of `first_row`.
    pub first_row_screen: usize,
    /// Pixels of `first_row` scrolled above the viewport top.
    pub vertical_offset: f64,
    /// Height of one screen row.
    pub line_height: f64,
    /// Viewport height.
    pub height: f64,
}

impl RowWindow {
    /// Window described by a layer configuration.
    pub fn from_config(config: &LayerConfig) -> Self {
        Self {
            first_row: config.first_row,
            last_row: config.last_row.max(config.first_row),
            first_row_screen: config.first_row_screen,
            vertical_offset: config.vertical_offset,
            line_height: config.line_height,
            height: config.height,
        }
    }

    /// Number of rows in the window.
    pub fn len(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    /// A window always holds at least one row.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True if `row` is painted.
    pub fn contains(&self, row: usize) -> bool {
        (self.first_row..=self.last_row).contains(&row)
    }

    /// Iterate over the painted rows.
    pub fn rows(&self) -> impl Iterator<Item = usize> {
        self.first_row..=self.last_row
    }

    /// First row whose top edge is not cut off.
    pub fn first_fully_visible_row(&self) -> usize {
        self.first_row + usize::from(self.vertical_offset != 0.0)
    }

    /// Last row whose bottom edge is not cut off.
    ///
    /// Can be one less than `first_row` when the viewport is shorter than a
    /// row; saturates at zero.
    pub fn last_fully_visible_row(&self) -> usize {
        if self.line_height <= 0.0 {
            return self.first_row;
        }
        let rows = ((self.height + self.vertical_offset) / self.line_height).floor();
        (self.first_row + rows.max(0.0) as usize).saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(first: usize, last: usize, offset: f64) -> RowWindow {
        RowWindow::from_config(&LayerConfig {
            first_row: first,
            last_row: last,
            first_row_screen: first,
            vertical_offset: offset,
            line_height: 16.0,
            height: 320.0,
            ..LayerConfig::default()
        })
    }

    #[test]
    fn test_aligned_window_first_row_is_fully_visible() {
        let w = window(0, 20, 0.0);
        assert_eq!(w.first_fully_visible_row(), 0);
        assert_eq!(w.last_fully_visible_row(), 19);
        assert_eq!(w.len(), 21);
    }

    #[test]
    fn test_partially_scrolled_first_row_is_not_fully_visible() {
        let w = window(10, 31, 6.0);
        assert_eq!(w.first_fully_visible_row(), 11);
        assert_eq!(w.last_fully_visible_row(), 29);
    }

    #[test]
    fn test_rows_iterates_inclusive_range() {
        let w = window(3, 5, 0.0);
        assert_eq!(w.rows().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert!(w.contains(5));
        assert!(!w.contains(6));
        assert!(!w.is_empty());
    }
}

//! Scrollbar visibility and thickness.

use serde::Serialize;

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Left/right; the bar runs along the bottom edge.
    Horizontal,
    /// Up/down; the bar runs along the right edge.
    Vertical,
}

/// Which scrollbars are currently shown.
///
/// Only the layout engine flips these, and only when the computed need
/// differs from the stored value, so a flip is always observable as a
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScrollbarVisibility {
    /// Horizontal bar shown.
    pub horizontal: bool,
    /// Vertical bar shown.
    pub vertical: bool,
}

impl ScrollbarVisibility {
    /// Visibility of one bar.
    pub fn get(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// Store the need for one bar.
    ///
    /// # Returns
    /// `true` if the visibility flipped.
    pub fn set(&mut self, axis: Axis, visible: bool) -> bool {
        let slot = match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        };
        let changed = *slot != visible;
        *slot = visible;
        changed
    }
}

/// Space each scrollbar takes from the scroller while shown.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollbarThickness {
    /// Height of the horizontal bar.
    pub horizontal: f64,
    /// Width of the vertical bar.
    pub vertical: f64,
}

impl ScrollbarThickness {
    /// Thickness of one bar, or zero when it is hidden.
    pub fn effective(&self, axis: Axis, visibility: ScrollbarVisibility) -> f64 {
        if !visibility.get(axis) {
            return 0.0;
        }
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reports_flips_only() {
        let mut visibility = ScrollbarVisibility::default();
        assert!(visibility.set(Axis::Horizontal, true));
        assert!(!visibility.set(Axis::Horizontal, true));
        assert!(!visibility.set(Axis::Vertical, false));
        assert!(visibility.get(Axis::Horizontal));
        assert!(!visibility.get(Axis::Vertical));
    }

    #[test]
    fn test_hidden_bars_take_no_space() {
        let thickness = ScrollbarThickness {
            horizontal: 12.0,
            vertical: 14.0,
        };
        let visibility = ScrollbarVisibility {
            horizontal: false,
            vertical: true,
        };
        assert_eq!(thickness.effective(Axis::Horizontal, visibility), 0.0);
        assert_eq!(thickness.effective(Axis::Vertical, visibility), 14.0);
    }
}

//! Configuration module.
//!
//! - `RendererConfig`: every renderer option as a named field
//! - `options`: runtime option changes and their side-effect table
//! - `loader`: TOML config file loading with precedence handling

pub mod loader;
pub mod options;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig,
};
pub use options::{OptionEffect, RendererOption};

use crate::model::ScrollMargin;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Renderer-level configuration.
///
/// Holds every option that affects scheduling or layout. Loaded from the
/// `[renderer]` table of the config file; missing fields use the defaults
/// below. Changed at runtime through [`RendererConfig::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    /// Animate `scroll_to_line` jumps (default: false).
    pub animated_scroll: bool,
    /// Render whitespace markers (default: false).
    ///
    /// Without soft wrap this widens the longest line by one column for the
    /// end-of-line marker.
    pub show_invisibles: bool,
    /// Draw the print margin and let it cap the wrap limit (default: true).
    pub show_print_margin: bool,
    /// Print margin column (default: 80).
    pub print_margin_column: u32,
    /// Show the gutter (default: true).
    pub show_gutter: bool,
    /// Show line numbers (default: true).
    pub show_line_numbers: bool,
    /// Show fold widgets (default: true).
    pub show_fold_widgets: bool,
    /// Fade fold widgets until hovered (default: false).
    pub fade_fold_widgets: bool,
    /// Draw indent guides (default: true).
    pub display_indent_guides: bool,
    /// Highlight the gutter cell of the cursor row (default: true).
    pub highlight_gutter_line: bool,
    /// Always show the horizontal scrollbar (default: false).
    pub h_scroll_bar_always_visible: bool,
    /// Always show the vertical scrollbar (default: false).
    pub v_scroll_bar_always_visible: bool,
    /// Autosize cap in lines. `None` keeps the host's height (default).
    pub max_lines: Option<u32>,
    /// Autosize floor in lines (default: 1 when autosizing).
    pub min_lines: Option<u32>,
    /// Overscroll past the last row, as a fraction of the viewport (default: 0).
    pub scroll_past_end: f64,
    /// Keep gutter width fixed (default: false).
    pub fixed_width_gutter: bool,
    /// Horizontal text padding in pixels (default: 4).
    pub padding: f64,
    /// Extra scrollable space around the content.
    pub scroll_margin: ScrollMargin,
    /// Height of chrome around the scroller that autosize must account for.
    pub extra_height: f64,
    /// Number of eased samples per scroll animation (default: 8).
    pub animation_steps: usize,
    /// Interval between animation ticks in milliseconds (default: 10).
    pub animation_interval_ms: u64,
}

impl RendererConfig {
    /// Print margin column when it should cap wrapping.
    pub fn print_margin_limit(&self) -> Option<u32> {
        self.show_print_margin.then_some(self.print_margin_column)
    }

    /// Animation tick interval.
    pub fn animation_interval(&self) -> Duration {
        Duration::from_millis(self.animation_interval_ms)
    }

    /// True when the autosize-to-content mode is active.
    pub fn autosizes(&self) -> bool {
        self.max_lines.is_some_and(|lines| lines > 0)
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            animated_scroll: false,
            show_invisibles: false,
            show_print_margin: true,
            print_margin_column: 80,
            show_gutter: true,
            show_line_numbers: true,
            show_fold_widgets: true,
            fade_fold_widgets: false,
            display_indent_guides: true,
            highlight_gutter_line: true,
            h_scroll_bar_always_visible: false,
            v_scroll_bar_always_visible: false,
            max_lines: None,
            min_lines: None,
            scroll_past_end: 0.0,
            fixed_width_gutter: false,
            padding: 4.0,
            scroll_margin: ScrollMargin::default(),
            extra_height: 0.0,
            animation_steps: 8,
            animation_interval_ms: 10,
        }
    }
}

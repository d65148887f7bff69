//! Collaborator boundary of the render core.
//!
//! The renderer never draws, measures fonts, or owns timers. Everything it
//! needs from the surrounding editor is expressed as a trait here:
//!
//! - [`DocumentAdapter`]: fold/wrap row mapping and the session's scroll storage
//! - [`PaintLayer`], [`TextLayer`], [`GutterLayer`]: layers fed a [`LayerConfig`]
//! - [`ScrollbarWidget`]: one scrollbar, either axis
//! - [`HostContainer`]: the element the editor lives in
//! - [`FramePump`], [`IntervalTimer`]: the only sources of asynchrony
//!
//! Two reference implementations live in submodules: [`MemoryDocument`]
//! and the [`recording`] collaborators that log every call.

pub mod memory_document;
pub mod recording;

pub use memory_document::{FoldError, MemoryDocument, WrapMode};

use crate::model::{DocPosition, LayerConfig, PagePoint, ScreenPosition};
use std::sync::Arc;
use std::time::Duration;

/// A collapsed span of document rows.
///
/// Rendered as a single screen row anchored at `start_row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldSpan {
    /// First row of the fold; stays visible.
    pub start_row: usize,
    /// Last hidden row (inclusive).
    pub end_row: usize,
}

impl FoldSpan {
    /// True if `row` lies inside the fold, including its start row.
    pub fn contains(&self, row: usize) -> bool {
        (self.start_row..=self.end_row).contains(&row)
    }
}

/// Document and view-state queries the layout engine depends on.
///
/// Row arguments are document rows unless the name says `screen`.
/// Implementations clamp out-of-range rows rather than panic.
pub trait DocumentAdapter {
    /// Document row displayed on the given screen row.
    fn screen_to_document_row(&self, screen_row: usize) -> usize;

    /// First screen row on which the given document row is displayed.
    fn document_to_screen_row(&self, row: usize) -> usize;

    /// Fold containing `row`, if any.
    fn fold_at(&self, row: usize) -> Option<FoldSpan>;

    /// Number of screen lines `row` occupies when rendered (1 unless wrapped).
    fn rendered_row_height(&self, row: usize) -> usize;

    /// Number of document rows. Never zero for a real document.
    fn row_count(&self) -> usize;

    /// Number of screen rows after folding and wrapping.
    fn screen_length(&self) -> usize;

    /// Width in columns of the widest rendered line.
    fn longest_line_columns(&self) -> usize;

    /// True when soft wrapping is on.
    fn uses_wrap_mode(&self) -> bool;

    /// Re-wrap for a new limit.
    ///
    /// # Arguments
    ///
    /// * `limit` - Columns that fit in the scroller
    /// * `print_margin` - Print margin column when it should cap wrapping
    ///
    /// # Returns
    /// `true` if the effective wrap limit changed, which invalidates every row.
    fn adjust_wrap_limit(&mut self, limit: usize, print_margin: Option<u32>) -> bool;

    /// Session's vertical scroll position in pixels.
    fn scroll_top(&self) -> f64;

    /// Store the session's vertical scroll position.
    fn set_scroll_top(&mut self, top: f64);

    /// Session's horizontal scroll position in pixels.
    fn scroll_left(&self) -> f64;

    /// Store the session's horizontal scroll position.
    fn set_scroll_left(&mut self, left: f64);

    /// Current cursor position.
    fn cursor(&self) -> DocPosition;

    /// Screen cell of a document position.
    fn document_to_screen_position(&self, position: DocPosition) -> ScreenPosition;

    /// Document position shown at a screen cell.
    fn screen_to_document_position(&self, screen_row: usize, screen_column: usize)
        -> DocPosition;
}

/// A paint layer fed one [`LayerConfig`] snapshot per pass.
///
/// Layers may keep the `Arc` past the pass; the renderer never mutates a
/// published snapshot.
pub trait PaintLayer {
    /// Repaint the whole layer for the given window.
    fn update(&mut self, config: &Arc<LayerConfig>);
}

/// The text layer, which can also repaint incrementally.
pub trait TextLayer: PaintLayer {
    /// Shift already painted rows for a pure scroll, painting only new rows.
    fn scroll_lines(&mut self, config: &Arc<LayerConfig>);

    /// Repaint the document rows `first_row..=last_row`.
    fn update_rows(&mut self, config: &Arc<LayerConfig>, first_row: usize, last_row: usize);
}

/// The gutter (line numbers, fold widgets, annotations).
pub trait GutterLayer: PaintLayer {
    /// Rendered width in pixels.
    fn width(&self) -> f64;

    /// Move the active-line highlight.
    fn highlight_line(&mut self, top: f64, height: f64);

    /// Show or hide the active-line highlight.
    fn set_highlight_visible(&mut self, visible: bool);
}

/// A scrollbar widget. The same trait serves both axes.
pub trait ScrollbarWidget {
    /// Show or hide the bar.
    fn set_visible(&mut self, visible: bool);

    /// Thickness the bar takes from the scroller when visible.
    fn thickness(&self) -> f64;

    /// Total scrollable extent (height for the vertical bar, width for the horizontal one).
    fn set_scroll_extent(&mut self, extent: f64);

    /// Scroll position along the bar's axis.
    fn set_scroll_offset(&mut self, offset: f64);
}

/// Placement of the hidden text input relative to the scroller, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputAnchor {
    /// Distance from the scroller's right edge.
    pub right: f64,
    /// Distance from the viewport's bottom edge.
    pub bottom: f64,
    /// Input width.
    pub width: f64,
    /// Input height.
    pub height: f64,
}

/// The element that hosts the editor.
pub trait HostContainer {
    /// Measured inner size `(width, height)` in pixels; zero when detached.
    fn client_size(&self) -> (f64, f64);

    /// Rendered width; zero means the container is hidden.
    fn offset_width(&self) -> f64;

    /// Force the container height (autosize).
    fn set_height(&mut self, height: f64);

    /// Page position of the scroller's top-left corner.
    fn scroller_origin(&self) -> PagePoint;

    /// Move the hidden text input over the cursor.
    fn place_text_input(&mut self, anchor: InputAnchor);
}

/// Requests a render callback on the next display frame.
///
/// The host answers by calling `Renderer::on_frame`.
pub trait FramePump {
    /// Ask for one callback. The scheduler never asks twice per cycle.
    fn request_frame(&mut self);
}

/// Identifies one running interval timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub u64);

/// Periodic timer used by the scroll animation.
///
/// The host calls `Renderer::on_animation_tick(token)` on every period
/// until the timer is cancelled.
pub trait IntervalTimer {
    /// Start a timer firing every `interval`.
    fn start(&mut self, interval: Duration) -> TimerToken;

    /// Stop a timer. Unknown tokens are ignored.
    fn cancel(&mut self, token: TimerToken);
}

/// Every collaborator a renderer drives.
///
/// A missing gutter degrades gutter work to a no-op.
pub struct Collaborators {
    /// Text layer.
    pub text: Box<dyn TextLayer>,
    /// Gutter layer, if the host built one.
    pub gutter: Option<Box<dyn GutterLayer>>,
    /// Markers painted below the text (selections, highlights).
    pub marker_back: Box<dyn PaintLayer>,
    /// Markers painted above the text.
    pub marker_front: Box<dyn PaintLayer>,
    /// Cursor layer.
    pub cursor: Box<dyn PaintLayer>,
    /// Horizontal scrollbar.
    pub h_scrollbar: Box<dyn ScrollbarWidget>,
    /// Vertical scrollbar.
    pub v_scrollbar: Box<dyn ScrollbarWidget>,
    /// Host container.
    pub container: Box<dyn HostContainer>,
    /// Frame pump.
    pub frame_pump: Box<dyn FramePump>,
    /// Animation timer.
    pub timer: Box<dyn IntervalTimer>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("gutter", &self.gutter.is_some())
            .finish_non_exhaustive()
    }
}

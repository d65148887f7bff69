//! Scrolling, coordinate conversion, and scroll animation.

use super::Renderer;
use crate::host::{DocumentAdapter, TimerToken};
use crate::model::{
    CellSide, ChangeMask, DocPosition, PagePoint, ScreenHit, ScrollOffsets, ViewMargin,
};
use crate::state::scroll_animation::{AnimationStart, AnimationStep, OnDone};
use crate::view_state::Axis;
use tracing::debug;

impl<D: DocumentAdapter> Renderer<D> {
    // ===== Scroll position =====

    /// Session's vertical scroll position (the animation target while
    /// animating), or the painted position without a session.
    pub fn scroll_top(&self) -> f64 {
        self.session
            .as_ref()
            .map_or(self.scroll.top, |doc| doc.scroll_top())
    }

    /// Session's horizontal scroll position.
    pub fn scroll_left(&self) -> f64 {
        self.session
            .as_ref()
            .map_or(self.scroll.left, |doc| doc.scroll_left())
    }

    /// Scroll vertically. Stored in the session, then echoed into the view.
    ///
    /// Non-finite values are ignored.
    pub fn set_scroll_top(&mut self, top: f64) {
        if !top.is_finite() {
            return;
        }
        let Some(doc) = self.session.as_mut() else {
            return;
        };
        if doc.scroll_top() != top {
            doc.set_scroll_top(top);
            self.scroll_to_y(top);
        }
    }

    /// Scroll horizontally. Stored in the session, then echoed into the view.
    pub fn set_scroll_left(&mut self, left: f64) {
        if !left.is_finite() {
            return;
        }
        let Some(doc) = self.session.as_mut() else {
            return;
        };
        if doc.scroll_left() != left {
            doc.set_scroll_left(left);
            self.scroll_to_x(left);
        }
    }

    /// Move the painted view vertically without touching the session.
    pub fn scroll_to_y(&mut self, top: f64) {
        if self.scroll.top != top {
            self.scroll.top = top;
            self.scheduler.schedule(ChangeMask::SCROLL);
        }
    }

    /// Move the painted view horizontally without touching the session.
    pub fn scroll_to_x(&mut self, left: f64) {
        if self.scroll.left != left {
            self.scroll.left = left;
            self.scheduler.schedule(ChangeMask::H_SCROLL);
        }
    }

    /// Scroll to a pixel position; `None` leaves that axis alone.
    pub fn scroll_to_pixel(&mut self, x: Option<f64>, y: Option<f64>) {
        if let Some(y) = y {
            self.set_scroll_top(y);
        }
        if let Some(x) = x {
            self.set_scroll_left(x);
        }
    }

    /// Scroll by a pixel delta.
    pub fn scroll_by(&mut self, delta_x: f64, delta_y: f64) {
        if delta_y != 0.0 {
            self.set_scroll_top(self.scroll_top() + delta_y);
        }
        if delta_x != 0.0 {
            self.set_scroll_left(self.scroll_left() + delta_x);
        }
    }

    /// True if scrolling by the delta would move the view.
    ///
    /// Used to decide whether a wheel event belongs to the editor or to the
    /// page around it.
    pub fn is_scrollable_by(&self, delta_x: f64, delta_y: f64) -> bool {
        let margin = self.config.scroll_margin;
        let config = self.engine.layer_config();
        let size = self.engine.size();
        let top = self.scroll_top();
        let left = self.scroll_left();

        if delta_y < 0.0 && top >= 1.0 - margin.top {
            return true;
        }
        if delta_y > 0.0 && top + size.scroller_height - config.max_height < -1.0 + margin.bottom {
            return true;
        }
        if delta_x < 0.0 && left >= 1.0 - margin.left {
            return true;
        }
        delta_x > 0.0
            && left + size.scroller_width - config.content_width < -1.0 + margin.right
    }

    /// A scrollbar was dragged to `position` along its axis.
    ///
    /// Vertical drags are ignored while an animation owns the position.
    pub fn on_scrollbar_scroll(&mut self, axis: Axis, position: f64) {
        let margin = self.config.scroll_margin;
        match axis {
            Axis::Vertical => {
                if !self.animation.is_active() {
                    self.set_scroll_top(position - margin.top);
                }
            }
            Axis::Horizontal => self.set_scroll_left(position - margin.left),
        }
    }

    // ===== Rows and lines =====

    /// Screen row at the top of the viewport, fractional when scrolled
    /// mid-row.
    pub fn scroll_top_row(&self) -> f64 {
        let line_height = self.engine.line_height();
        if line_height <= 0.0 {
            return 0.0;
        }
        self.scroll.top / line_height
    }

    /// Last screen row whose top is inside the viewport.
    pub fn scroll_bottom_row(&self) -> usize {
        let line_height = self.engine.line_height();
        if line_height <= 0.0 {
            return 0;
        }
        let rows = ((self.scroll.top + self.engine.size().scroller_height) / line_height).floor();
        (rows - 1.0).max(0.0) as usize
    }

    /// Put screen row `row` at the top of the viewport.
    pub fn scroll_to_row(&mut self, row: usize) {
        self.set_scroll_top(row as f64 * self.engine.line_height());
    }

    /// Scroll so `position` sits at `alignment` of the viewport height
    /// (0 top, 0.5 center, 1 bottom). Returns the new scroll top.
    pub fn align_cursor(&mut self, position: DocPosition, alignment: f64) -> f64 {
        let pos = self.pixel_position(position, false);
        let span = self.engine.size().scroller_height - self.engine.line_height();
        let offset = pos.y - span * alignment;
        self.set_scroll_top(offset);
        offset
    }

    /// Jump to document row `line`, optionally centered and animated.
    ///
    /// `on_done` only runs if an animation starts and completes.
    pub fn scroll_to_line(
        &mut self,
        line: usize,
        center: bool,
        animate: bool,
        on_done: Option<OnDone>,
    ) {
        let mut offset = self.pixel_position(DocPosition::new(line, 0), false).y;
        if center {
            offset -= self.engine.size().scroller_height / 2.0;
        }
        let initial = self.scroll.top;
        self.set_scroll_top(offset);
        if animate {
            self.animate_scrolling(initial, on_done);
        }
    }

    /// Animate from `from_top` to the current scroll position.
    ///
    /// A no-op when animation is off or there is no distance to cover;
    /// `on_done` is dropped without running.
    pub fn animate_scrolling(&mut self, from_top: f64, on_done: Option<OnDone>) {
        let to = self.scroll.top;
        if !self.config.animated_scroll || from_top == to {
            return;
        }

        let steps = self.config.animation_steps;
        let interval = self.config.animation_interval();
        match self
            .animation
            .start(self.timer.as_mut(), from_top, to, steps, interval, on_done)
        {
            AnimationStart::Started(first) => self.scroll_to_y(first),
            AnimationStart::Cancelled(target) => self.scroll_to_y(target),
        }
    }

    /// Interval timer callback for the scroll animation.
    pub fn on_animation_tick(&mut self, token: TimerToken) {
        match self.animation.tick(self.timer.as_mut(), token) {
            AnimationStep::Apply(top) => self.scroll_to_y(top),
            AnimationStep::Snap(top) => {
                self.scroll_to_y(top);
                if let Some(doc) = self.session.as_mut() {
                    if doc.scroll_top() != top {
                        doc.set_scroll_top(top);
                    }
                }
            }
            AnimationStep::Done(on_done) => {
                if let Some(on_done) = on_done {
                    on_done();
                }
            }
            AnimationStep::Ignored => {}
        }
    }

    /// Cancel a running scroll animation. The view stays where it is.
    pub fn stop_animation(&mut self) {
        if self.animation.is_active() {
            debug!(top = self.scroll.top, "scroll animation stopped");
        }
        self.animation.stop(self.timer.as_mut());
    }

    // ===== Keeping positions in view =====

    /// Scroll the minimum needed to show `cursor` (default: the session
    /// cursor).
    ///
    /// # Arguments
    ///
    /// * `offset` - Extra slack as a fraction of the viewport height
    /// * `margin` - Pixels to keep clear above and below the target
    pub fn scroll_cursor_into_view(
        &mut self,
        cursor: Option<DocPosition>,
        offset: Option<f64>,
        margin: Option<ViewMargin>,
    ) {
        let size = self.engine.size();
        if size.scroller_height <= 0.0 {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let cursor = cursor.unwrap_or_else(|| session.cursor());
        let scroll_top = if self.animation.is_active() {
            session.scroll_top()
        } else {
            self.scroll.top
        };
        let scroll_left = self.scroll.left;

        let PagePoint { x: left, mut y } = self.pixel_position(cursor, false);
        let line_height = self.engine.line_height();
        let character_width = self.engine.character_width();
        let offset = offset.unwrap_or(0.0);
        let margin = margin.unwrap_or_default();

        if scroll_top + margin.top > y {
            if offset != 0.0 && scroll_top + margin.top > y + line_height {
                y -= offset * size.scroller_height;
            }
            if y == 0.0 {
                y = -self.config.scroll_margin.top;
            }
            self.set_scroll_top(y);
        } else if scroll_top + size.scroller_height - margin.bottom < y + line_height {
            if offset != 0.0 && scroll_top + size.scroller_height - margin.bottom < y - line_height {
                y += offset * size.scroller_height;
            }
            self.set_scroll_top(y + line_height - size.scroller_height);
        }

        if scroll_left > left {
            let target = if left < self.config.padding + 2.0 * character_width {
                -self.config.scroll_margin.left
            } else {
                left
            };
            self.set_scroll_left(target);
        } else if scroll_left + size.scroller_width < left + character_width {
            self.set_scroll_left((left + character_width - size.scroller_width).round());
        } else if scroll_left <= self.config.padding && left - scroll_left < character_width {
            self.set_scroll_left(0.0);
        }
    }

    /// Bring a selection into view, lead last so it wins.
    pub fn scroll_selection_into_view(
        &mut self,
        anchor: DocPosition,
        lead: DocPosition,
        offset: Option<f64>,
    ) {
        self.scroll_cursor_into_view(Some(anchor), offset, None);
        self.scroll_cursor_into_view(Some(lead), offset, None);
    }

    // ===== Coordinates =====

    /// Screen cell under a page pixel.
    pub fn pixel_to_screen_coordinates(&self, x: f64, y: f64) -> ScreenHit {
        let origin = self.container.scroller_origin();
        let ScrollOffsets { top, left } = self.scroll;
        let character_width = self.engine.character_width();
        let line_height = self.engine.line_height();

        let offset = if character_width > 0.0 {
            (x + left - origin.x - self.config.padding) / character_width
        } else {
            0.0
        };
        let column = offset.round();
        let row = if line_height > 0.0 {
            ((y + top - origin.y) / line_height).floor()
        } else {
            0.0
        };
        ScreenHit {
            row: row as i64,
            column: column as i64,
            side: if offset - column > 0.0 {
                CellSide::After
            } else {
                CellSide::Before
            },
        }
    }

    /// Document position under a page pixel. `None` without a session or
    /// before fonts are measured.
    pub fn screen_to_text_coordinates(&self, x: f64, y: f64) -> Option<DocPosition> {
        let doc = self.session.as_ref()?;
        let character_width = self.engine.character_width();
        let line_height = self.engine.line_height();
        if character_width <= 0.0 || line_height <= 0.0 {
            return None;
        }
        let origin = self.container.scroller_origin();
        let ScrollOffsets { top, left } = self.scroll;

        let column = ((x + left - origin.x - self.config.padding) / character_width)
            .round()
            .max(0.0);
        let row = ((y + top - origin.y) / line_height).floor().max(0.0);
        Some(doc.screen_to_document_position(row as usize, column as usize))
    }

    /// Page pixel of a document position's top-left corner.
    pub fn text_to_screen_coordinates(&self, position: DocPosition) -> Option<PagePoint> {
        let doc = self.session.as_ref()?;
        let origin = self.container.scroller_origin();
        let screen = doc.document_to_screen_position(position);
        let ScrollOffsets { top, left } = self.scroll;

        Some(PagePoint::new(
            origin.x + self.config.padding
                + (screen.column as f64 * self.engine.character_width()).round()
                - left,
            origin.y + screen.row as f64 * self.engine.line_height() - top,
        ))
    }
}

//! Renderer - the render dispatcher and its public update API
//!
//! Owns the scheduler, the layout engine, the scroll animation, and every
//! host collaborator. Callers never paint directly: they schedule change
//! reasons, and the host's frame callback ([`Renderer::on_frame`]) turns the
//! accumulated mask into a single ordered sequence of paint-layer calls.
//!
//! # Dispatch order
//!
//! 1. Guard: no session, hidden container, frozen, unknown line height, or
//!    nothing to do. The mask is deferred.
//! 2. Dirty size: the mask is deferred and a forced resize runs instead.
//! 3. Layout: `FULL | SIZE | TEXT | LINES | SCROLL | H_SCROLL` recompute the
//!    [`LayerConfig`], with an anchor correction when rows above the window
//!    changed height.
//! 4. Paint: `FULL`, then `SCROLL`, each returning early; then text, lines,
//!    or gutter; then cursor and markers.
//!
//! Scrolling, coordinate conversion, and animation live in the
//! `renderer_scroll.rs` half of this module.

use super::events::{EventEmitter, Listener, ListenerId, RenderEvent};
use super::resize_guard::ResizeGuard;
use super::scheduler::ChangeScheduler;
use super::scroll_animation::ScrollAnimation;
use crate::config::{OptionEffect, RendererConfig, RendererOption};
use crate::host::{
    Collaborators, DocumentAdapter, GutterLayer, HostContainer, InputAnchor, IntervalTimer,
    PaintLayer, ScrollbarWidget, TextLayer,
};
use crate::model::{
    ChangeMask, ChangedLinesRange, DocPosition, LayerConfig, OptionError, PagePoint, RowBound,
    ScrollOffsets, ViewportSize,
};
use crate::view_state::{
    Axis, LayoutEffect, RowWindow, ScrollbarThickness, ScrollbarVisibility, ViewportLayoutEngine,
};
use std::sync::Arc;
use tracing::{debug, trace};

#[path = "renderer_scroll.rs"]
mod scroll;

/// Drives the paint layers of one editor view.
///
/// # Invariants
/// - Paint layers only ever see a fully computed [`LayerConfig`]
/// - No paint work runs while the cached size is dirty
/// - The session's scroll position is written only through
///   `set_scroll_top` / `set_scroll_left`, which echo into the renderer
pub struct Renderer<D: DocumentAdapter> {
    config: RendererConfig,
    engine: ViewportLayoutEngine,
    scheduler: ChangeScheduler,
    events: EventEmitter,
    resize_guard: ResizeGuard,
    animation: ScrollAnimation,
    session: Option<D>,
    /// Scroll position the layers are painted at; trails the session while
    /// an animation runs.
    scroll: ScrollOffsets,
    changed_lines: Option<ChangedLinesRange>,
    frozen: bool,
    cursor_painted: bool,
    text: Box<dyn TextLayer>,
    gutter: Option<Box<dyn GutterLayer>>,
    marker_back: Box<dyn PaintLayer>,
    marker_front: Box<dyn PaintLayer>,
    cursor: Box<dyn PaintLayer>,
    h_scrollbar: Box<dyn ScrollbarWidget>,
    v_scrollbar: Box<dyn ScrollbarWidget>,
    container: Box<dyn HostContainer>,
    timer: Box<dyn IntervalTimer>,
}

impl<D: DocumentAdapter> std::fmt::Debug for Renderer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("scheduler", &self.scheduler)
            .field("animation", &self.animation)
            .field("scroll", &self.scroll)
            .field("changed_lines", &self.changed_lines)
            .field("frozen", &self.frozen)
            .field("has_session", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

impl<D: DocumentAdapter> Renderer<D> {
    /// Renderer driving `host`. Nothing is painted until a session is
    /// attached, fonts are measured, and the container has a size.
    pub fn new(host: Collaborators, config: RendererConfig) -> Self {
        let thickness = ScrollbarThickness {
            horizontal: host.h_scrollbar.thickness(),
            vertical: host.v_scrollbar.thickness(),
        };
        Self {
            config,
            engine: ViewportLayoutEngine::new(thickness),
            scheduler: ChangeScheduler::new(host.frame_pump),
            events: EventEmitter::default(),
            resize_guard: ResizeGuard::default(),
            animation: ScrollAnimation::default(),
            session: None,
            scroll: ScrollOffsets::default(),
            changed_lines: None,
            frozen: false,
            cursor_painted: false,
            text: host.text,
            gutter: host.gutter,
            marker_back: host.marker_back,
            marker_front: host.marker_front,
            cursor: host.cursor,
            h_scrollbar: host.h_scrollbar,
            v_scrollbar: host.v_scrollbar,
            container: host.container,
            timer: host.timer,
        }
    }

    // ===== Accessors =====

    /// Current options.
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Latest layout snapshot.
    pub fn layer_config(&self) -> &Arc<LayerConfig> {
        self.engine.layer_config()
    }

    /// Cached viewport size.
    pub fn size(&self) -> ViewportSize {
        self.engine.size()
    }

    /// Current scrollbar visibility.
    pub fn scrollbars(&self) -> ScrollbarVisibility {
        self.engine.scrollbars()
    }

    /// Scroll position the layers are painted at.
    pub fn scroll_offsets(&self) -> ScrollOffsets {
        self.scroll
    }

    /// Pixel height of one row; zero until fonts are measured.
    pub fn line_height(&self) -> f64 {
        self.engine.line_height()
    }

    /// Pixel width of one column.
    pub fn character_width(&self) -> f64 {
        self.engine.character_width()
    }

    /// Attached session.
    pub fn session(&self) -> Option<&D> {
        self.session.as_ref()
    }

    /// Attached session, for edits. Call the matching `update_*` method
    /// afterwards so the change gets painted.
    pub fn session_mut(&mut self) -> Option<&mut D> {
        self.session.as_mut()
    }

    /// Reasons waiting for the next frame.
    pub fn pending(&self) -> ChangeMask {
        self.scheduler.pending()
    }

    /// Reasons held back until the view can be painted.
    pub fn deferred(&self) -> ChangeMask {
        self.scheduler.deferred()
    }

    /// True while a frame request is outstanding.
    pub fn frame_requested(&self) -> bool {
        self.scheduler.frame_requested()
    }

    /// True while a scroll animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.animation.is_active()
    }

    // ===== Session and listeners =====

    /// Attach a session, returning the previous one.
    pub fn set_session(&mut self, mut session: D) -> Option<D> {
        let margin_top = self.config.scroll_margin.top;
        if margin_top != 0.0 && session.scroll_top() <= 0.0 {
            session.set_scroll_top(-margin_top);
        }
        self.animation.stop(self.timer.as_mut());
        self.scroll = ScrollOffsets {
            top: session.scroll_top(),
            left: session.scroll_left(),
        };
        self.changed_lines = None;
        self.cursor_painted = false;
        let previous = self.session.replace(session);

        if self.engine.size().is_measured() {
            if let Some(doc) = self.session.as_mut() {
                if doc.uses_wrap_mode() {
                    self.engine.adjust_wrap_limit(doc, &self.config);
                }
            }
        }
        debug!("session attached");
        self.scheduler.schedule(ChangeMask::FULL);
        previous
    }

    /// Detach the session. Pending work is kept for the next one.
    pub fn take_session(&mut self) -> Option<D> {
        self.animation.stop(self.timer.as_mut());
        self.session.take()
    }

    /// Register a lifecycle listener.
    pub fn on(&mut self, listener: Listener) -> ListenerId {
        self.events.on(listener)
    }

    /// Remove a lifecycle listener.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    fn emit(&mut self, event: RenderEvent) {
        let requests = self.events.emit(&event);
        if let Some(force) = requests.resize {
            self.on_resize(force, None, None, None);
        }
        if !requests.schedule.is_empty() {
            self.scheduler.schedule(requests.schedule);
        }
    }

    // ===== Scheduling =====

    /// Queue change reasons for the next frame.
    pub fn schedule(&mut self, changes: ChangeMask) {
        self.scheduler.schedule(changes);
    }

    /// Frame callback: dispatch the pending reasons once.
    ///
    /// Work queued during the dispatch waits for the next frame, which
    /// `end_frame` requests.
    pub fn on_frame(&mut self) {
        if !self.scheduler.begin_frame() {
            return;
        }
        let changes = self.scheduler.take_pending();
        if !changes.is_empty() {
            self.render_changes(changes, false);
        }
        self.scheduler.end_frame();
    }

    /// Dispatch `changes` plus everything pending right now.
    pub fn flush_sync(&mut self, changes: ChangeMask, force: bool) {
        let pending = self.scheduler.take_pending();
        self.render_changes(changes | pending, force);
    }

    /// Stop painting; scheduled work is deferred.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Resume painting at the next dispatch.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    /// True while frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    // ===== Update entry points =====

    /// Rows `first_row..=last_row` changed; `None` means "to the end".
    ///
    /// Ranges entirely below the window are dropped. Ranges entirely above
    /// it are kept for later unless `force`, which stretches them down to
    /// the window's last row.
    pub fn update_lines(&mut self, first_row: usize, last_row: Option<usize>, force: bool) {
        let incoming = ChangedLinesRange::new(first_row, RowBound::from(last_row));
        let mut range = match self.changed_lines {
            Some(existing) => existing.merge(incoming),
            None => incoming,
        };
        let window = Arc::clone(self.engine.layer_config());

        if range.last_row.is_before(window.first_row) {
            if !force {
                self.changed_lines = Some(range);
                return;
            }
            range.last_row = RowBound::Row(window.last_row);
        }
        self.changed_lines = Some(range);
        if range.first_row > window.last_row {
            return;
        }
        self.scheduler.schedule(ChangeMask::LINES);
    }

    /// Queue a repaint of a document-reported range.
    pub fn update_range(&mut self, range: ChangedLinesRange) {
        let last = match range.last_row {
            RowBound::Row(row) => Some(row),
            RowBound::End => None,
        };
        self.update_lines(range.first_row, last, false);
    }

    /// Every visible row of text is stale.
    pub fn update_text(&mut self) {
        self.scheduler.schedule(ChangeMask::TEXT);
    }

    /// Repaint everything; `force` dispatches synchronously.
    pub fn update_full(&mut self, force: bool) {
        if force {
            self.render_changes(ChangeMask::FULL, true);
        } else {
            self.scheduler.schedule(ChangeMask::FULL);
        }
    }

    /// Front markers changed.
    pub fn update_front_markers(&mut self) {
        self.scheduler.schedule(ChangeMask::MARKER_FRONT);
    }

    /// Back markers changed.
    pub fn update_back_markers(&mut self) {
        self.scheduler.schedule(ChangeMask::MARKER_BACK);
    }

    /// Gutter decorations changed.
    pub fn update_breakpoints(&mut self) {
        self.scheduler.schedule(ChangeMask::GUTTER);
    }

    /// The cursor moved.
    pub fn update_cursor(&mut self) {
        self.scheduler.schedule(ChangeMask::CURSOR);
    }

    // ===== Options =====

    /// Change an option and carry out its side effect.
    pub fn set_option(&mut self, option: RendererOption) -> OptionEffect {
        let effect = self.config.apply(option);
        if effect != OptionEffect::None {
            debug!(option = option.name(), ?effect, "option changed");
        }
        match effect {
            OptionEffect::None => {}
            OptionEffect::Schedule(changes) => self.scheduler.schedule(changes),
            OptionEffect::UpdateFull => self.update_full(false),
            OptionEffect::GutterResized => {
                self.scheduler.schedule(ChangeMask::FULL);
                self.on_gutter_resize();
            }
            OptionEffect::GutterHighlight => {
                let visible = self.config.highlight_gutter_line;
                if let Some(gutter) = self.gutter.as_mut() {
                    gutter.set_highlight_visible(visible);
                }
                if visible && self.cursor_painted {
                    self.update_gutter_line_highlight();
                }
            }
            OptionEffect::ScrollbarPolicy { horizontal } => {
                let (axis, always) = if horizontal {
                    (Axis::Horizontal, self.config.h_scroll_bar_always_visible)
                } else {
                    (Axis::Vertical, self.config.v_scroll_bar_always_visible)
                };
                if !always || !self.engine.scrollbars().get(axis) {
                    self.scheduler.schedule(ChangeMask::SCROLL);
                }
            }
            OptionEffect::ScrollMargin => {
                let top = self.config.scroll_margin.top;
                if top != 0.0 && self.scroll.top <= 0.0 && self.session.is_some() {
                    self.set_scroll_top(-top);
                }
                self.update_full(false);
            }
            OptionEffect::PrintMargin => {
                if self.uses_wrap_mode() && self.adjust_wrap_limit() {
                    self.scheduler.schedule(ChangeMask::FULL);
                }
            }
        }
        effect
    }

    /// Parse and apply a `name`/`value` option pair.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError`] for an unknown name or a malformed value;
    /// the configuration is left untouched.
    pub fn set_option_str(&mut self, name: &str, value: &str) -> Result<OptionEffect, OptionError> {
        let option = RendererOption::parse(name, value)?;
        Ok(self.set_option(option))
    }

    // ===== Size =====

    /// Fonts were (re)measured. Forces a resize pass.
    pub fn set_font_metrics(&mut self, line_height: f64, character_width: f64) {
        if !self.engine.set_font_metrics(line_height, character_width) {
            return;
        }
        debug!(line_height, character_width, "font metrics changed");
        let size = self.engine.size();
        let gutter_width = (!size.dirty).then(|| self.engine.gutter_width());
        let height = self.engine.container_height(&self.config);
        self.on_resize(true, gutter_width, Some(size.width), Some(height));
    }

    /// The container may have changed size.
    ///
    /// Missing or non-positive sizes are measured from the container. A
    /// forced resize dispatches synchronously; otherwise the resulting
    /// changes are scheduled.
    ///
    /// Nested calls (from a listener of an event this call emits) are
    /// allowed up to [`MAX_NESTED_RESIZES`](super::resize_guard::MAX_NESTED_RESIZES)
    /// levels deep and dropped beyond that.
    pub fn on_resize(
        &mut self,
        force: bool,
        gutter_width: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
    ) {
        if !self.resize_guard.enter() {
            debug!(depth = self.resize_guard.depth(), "nested resize dropped");
            return;
        }

        let (client_width, client_height) = self.container.client_size();
        let width = width.filter(|w| *w > 0.0).unwrap_or(client_width);
        let height = height.filter(|h| *h > 0.0).unwrap_or(client_height);
        let gutter_width = gutter_width.unwrap_or_else(|| self.visible_gutter_width());

        let changes = self.update_cached_size(force, gutter_width, width, height);
        if self.engine.size().scroller_height <= 0.0 || (width <= 0.0 && height <= 0.0) {
            self.resize_guard.exit();
            return;
        }

        if force {
            self.render_changes(changes, true);
        } else {
            let deferred = self.scheduler.take_deferred();
            self.scheduler.schedule(changes | deferred);
        }
        self.resize_guard.exit();
    }

    /// The gutter changed width (or was shown or hidden).
    pub fn on_gutter_resize(&mut self) {
        let gutter_width = self.visible_gutter_width();
        if gutter_width != self.engine.gutter_width() {
            let size = self.engine.size();
            let height = self.engine.container_height(&self.config);
            let changes = self.update_cached_size(true, gutter_width, size.width, height);
            self.scheduler.defer(changes);
        }

        if self.uses_wrap_mode() && self.adjust_wrap_limit() {
            self.scheduler.schedule(ChangeMask::FULL);
        } else if self.engine.size().dirty {
            self.scheduler.schedule(ChangeMask::FULL);
        } else {
            self.compute_layer_config();
            self.scheduler.schedule(ChangeMask::MARKER);
        }
    }

    /// Re-derive the session's wrap limit from the scroller width.
    ///
    /// Returns `true` if the session re-wrapped.
    pub fn adjust_wrap_limit(&mut self) -> bool {
        match self.session.as_mut() {
            Some(doc) => self.engine.adjust_wrap_limit(doc, &self.config),
            None => false,
        }
    }

    fn uses_wrap_mode(&self) -> bool {
        self.session.as_ref().is_some_and(|doc| doc.uses_wrap_mode())
    }

    fn visible_gutter_width(&self) -> f64 {
        match (&self.gutter, self.config.show_gutter) {
            (Some(gutter), true) => gutter.width(),
            _ => 0.0,
        }
    }

    fn shown_gutter(&mut self) -> Option<&mut Box<dyn GutterLayer>> {
        if self.config.show_gutter {
            self.gutter.as_mut()
        } else {
            None
        }
    }

    fn update_cached_size(&mut self, force: bool, gutter_width: f64, width: f64, height: f64) -> ChangeMask {
        let mut effects = Vec::new();
        let changes = self.engine.update_cached_size(
            self.session.as_mut(),
            &self.config,
            force,
            gutter_width,
            width,
            height,
            &mut effects,
        );
        self.apply_effects(effects);
        changes
    }

    fn compute_layer_config(&mut self) -> ChangeMask {
        let Some(doc) = self.session.as_mut() else {
            return ChangeMask::empty();
        };
        let pass = self.engine.compute_layer_config(doc, &self.config, self.scroll);
        self.apply_clamped_scroll(pass.scroll);
        self.apply_effects(pass.effects);
        pass.changes
    }

    /// Store the clamped position and mirror it into the session. While an
    /// animation runs the session keeps the animation's target.
    fn apply_clamped_scroll(&mut self, scroll: ScrollOffsets) {
        self.scroll = scroll;
        let animating = self.animation.is_active();
        if let Some(doc) = self.session.as_mut() {
            if !animating && doc.scroll_top() != scroll.top {
                doc.set_scroll_top(scroll.top);
            }
            if doc.scroll_left() != scroll.left {
                doc.set_scroll_left(scroll.left);
            }
        }
    }

    fn apply_effects(&mut self, effects: Vec<LayoutEffect>) {
        for effect in effects {
            match effect {
                LayoutEffect::ScrollbarShown { axis, visible } => {
                    self.scrollbar(axis).set_visible(visible);
                }
                LayoutEffect::Resized { old } => self.emit(RenderEvent::Resize { old }),
                LayoutEffect::ScrollbarVisibilityChanged(visibility) => {
                    self.emit(RenderEvent::ScrollbarVisibilityChanged(visibility));
                }
                LayoutEffect::ContainerHeight(height) => self.container.set_height(height),
            }
        }
    }

    fn scrollbar(&mut self, axis: Axis) -> &mut dyn ScrollbarWidget {
        match axis {
            Axis::Horizontal => self.h_scrollbar.as_mut(),
            Axis::Vertical => self.v_scrollbar.as_mut(),
        }
    }

    // ===== Dispatch =====

    fn render_changes(&mut self, changes: ChangeMask, force: bool) {
        let mut changes = changes | self.scheduler.take_deferred();

        let ready = self.session.is_some()
            && self.container.offset_width() > 0.0
            && !self.frozen
            && self.engine.line_height() > 0.0;
        if !ready || (changes.is_empty() && !force) {
            trace!(?changes, ready, "dispatch deferred");
            self.scheduler.defer(changes);
            return;
        }

        if self.engine.size().dirty {
            debug!(?changes, "size unknown, resizing before dispatch");
            self.scheduler.defer(changes);
            self.on_resize(true, None, None, None);
            return;
        }

        debug!(changes = changes.bits(), force, "dispatch");
        self.emit(RenderEvent::BeforeRender);

        if changes.needs_layout() {
            let old = Arc::clone(self.engine.layer_config());
            changes |= self.compute_layer_config() | self.scheduler.take_pending();

            let new = Arc::clone(self.engine.layer_config());
            if old.first_row != new.first_row && old.first_row_screen == new.first_row_screen {
                let shift = (old.first_row as f64 - new.first_row as f64) * self.engine.line_height();
                let corrected = self.scroll.top + shift;
                debug!(
                    old_first_row = old.first_row,
                    new_first_row = new.first_row,
                    scroll_top = corrected,
                    "anchor corrected"
                );
                // The second pass clamps a correction that lands above the top.
                self.scroll.top = corrected;
                changes |= ChangeMask::SCROLL;
                changes |= self.compute_layer_config() | self.scheduler.take_pending();
            }

            self.update_scrollbar_v();
            if changes.contains(ChangeMask::H_SCROLL) {
                self.update_scrollbar_h();
            }
        }

        let config = Arc::clone(self.engine.layer_config());

        if changes.contains(ChangeMask::FULL) {
            self.changed_lines = None;
            self.text.update(&config);
            if let Some(gutter) = self.shown_gutter() {
                gutter.update(&config);
            }
            self.marker_back.update(&config);
            self.marker_front.update(&config);
            self.paint_cursor(&config);
            self.emit(RenderEvent::AfterRender);
            return;
        }

        if changes.contains(ChangeMask::SCROLL) {
            self.changed_lines = None;
            if changes.intersects(ChangeMask::TEXT | ChangeMask::LINES) {
                self.text.update(&config);
            } else {
                self.text.scroll_lines(&config);
            }
            if let Some(gutter) = self.shown_gutter() {
                gutter.update(&config);
            }
            self.marker_back.update(&config);
            self.marker_front.update(&config);
            self.paint_cursor(&config);
            self.emit(RenderEvent::AfterRender);
            return;
        }

        if changes.contains(ChangeMask::TEXT) {
            self.changed_lines = None;
            self.text.update(&config);
            if let Some(gutter) = self.shown_gutter() {
                gutter.update(&config);
            }
        } else if changes.contains(ChangeMask::LINES) {
            let gutter_painted = self.update_changed_lines(&config);
            if changes.contains(ChangeMask::GUTTER) && !gutter_painted {
                if let Some(gutter) = self.shown_gutter() {
                    gutter.update(&config);
                }
            }
        } else if changes.contains(ChangeMask::GUTTER) {
            if let Some(gutter) = self.shown_gutter() {
                gutter.update(&config);
            }
        }

        if changes.contains(ChangeMask::CURSOR) {
            self.paint_cursor(&config);
        }
        if changes.touches_front_markers() {
            self.marker_front.update(&config);
        }
        if changes.touches_back_markers() {
            self.marker_back.update(&config);
        }

        self.emit(RenderEvent::AfterRender);
    }

    /// Repaint the accumulated changed rows that intersect the window.
    ///
    /// Returns `true` if the gutter was repainted along the way.
    fn update_changed_lines(&mut self, config: &Arc<LayerConfig>) -> bool {
        let Some(range) = self.changed_lines.take() else {
            self.text.update(config);
            return false;
        };
        if range.first_row > config.last_row + 1 || range.last_row.is_before(config.first_row) {
            return false;
        }
        match range.last_row {
            RowBound::End => {
                let gutter_painted = match self.shown_gutter() {
                    Some(gutter) => {
                        gutter.update(config);
                        true
                    }
                    None => false,
                };
                self.text.update(config);
                gutter_painted
            }
            RowBound::Row(last_row) => {
                self.text.update_rows(config, range.first_row, last_row);
                false
            }
        }
    }

    fn paint_cursor(&mut self, config: &Arc<LayerConfig>) {
        self.cursor.update(config);
        self.cursor_painted = true;
        self.move_text_input_to_cursor();
        if self.config.highlight_gutter_line {
            self.update_gutter_line_highlight();
        }
    }

    fn update_scrollbar_v(&mut self) {
        let config = self.engine.layer_config();
        let scroller_height = self.engine.size().scroller_height;
        let margin = self.config.scroll_margin;

        let mut scroll_height = config.max_height;
        if !self.config.autosizes() && self.config.scroll_past_end > 0.0 {
            scroll_height -= (scroller_height - self.engine.line_height()) * self.config.scroll_past_end;
            if self.scroll.top > scroll_height - scroller_height {
                scroll_height = self.scroll.top + scroller_height;
            }
        }
        self.v_scrollbar.set_scroll_extent(scroll_height + margin.vertical());
        self.v_scrollbar.set_scroll_offset(self.scroll.top + margin.top);
    }

    fn update_scrollbar_h(&mut self) {
        let content_width = self.engine.layer_config().content_width;
        let margin = self.config.scroll_margin;
        self.h_scrollbar
            .set_scroll_extent(content_width + 2.0 * self.config.padding + margin.horizontal());
        self.h_scrollbar.set_scroll_offset(self.scroll.left + margin.left);
    }

    /// Pixel position of a document position, relative to the content
    /// (`on_screen == false`) or to the first painted row.
    fn pixel_position(&self, position: DocPosition, on_screen: bool) -> PagePoint {
        let Some(doc) = self.session.as_ref() else {
            return PagePoint::default();
        };
        let screen = doc.document_to_screen_position(position);
        let base_row = if on_screen {
            self.engine.layer_config().first_row_screen
        } else {
            0
        };
        PagePoint::new(
            self.config.padding + (screen.column as f64 * self.engine.character_width()).round(),
            (screen.row as f64 - base_row as f64) * self.engine.line_height(),
        )
    }

    /// Keep the hidden text input over the cursor so IME popups line up.
    fn move_text_input_to_cursor(&mut self) {
        let Some(cursor) = self.session.as_ref().map(|doc| doc.cursor()) else {
            return;
        };
        let pos = self.pixel_position(cursor, true);
        let config = self.engine.layer_config();
        let size = self.engine.size();
        let line_height = self.engine.line_height();
        let width = self.engine.character_width();

        let top = pos.y - config.vertical_offset;
        if top < 0.0 || top > config.height - line_height {
            return;
        }
        let mut left = (pos.x - self.scroll.left).min(size.scroller_width - width);
        left -= self
            .engine
            .thickness()
            .effective(Axis::Vertical, self.engine.scrollbars());

        self.container.place_text_input(InputAnchor {
            right: (size.scroller_width - left - width).max(0.0),
            bottom: (size.height - top - line_height).max(0.0),
            width,
            height: line_height,
        });
    }

    fn update_gutter_line_highlight(&mut self) {
        let Some(doc) = self.session.as_ref() else {
            return;
        };
        let mut cursor = doc.cursor();
        let mut height = self.engine.line_height();
        if doc.uses_wrap_mode() {
            cursor.column = 0;
            height *= doc.rendered_row_height(cursor.row) as f64;
        }
        let top = self.pixel_position(cursor, true).y - self.engine.layer_config().vertical_offset;
        if let Some(gutter) = self.shown_gutter() {
            gutter.highlight_line(top, height);
        }
    }

    // ===== Row window =====

    /// Rows painted by the last layout pass.
    pub fn viewport_row_window(&self) -> RowWindow {
        RowWindow::from_config(self.engine.layer_config())
    }

    /// First painted row.
    pub fn first_visible_row(&self) -> usize {
        self.engine.layer_config().first_row
    }

    /// First row not cut off at the top.
    pub fn first_fully_visible_row(&self) -> usize {
        self.viewport_row_window().first_fully_visible_row()
    }

    /// Last row not cut off at the bottom.
    pub fn last_fully_visible_row(&self) -> usize {
        self.viewport_row_window().last_fully_visible_row()
    }

    /// Last painted row.
    pub fn last_visible_row(&self) -> usize {
        self.engine.layer_config().last_row
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;

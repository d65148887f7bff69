//! ViewportLayoutEngine - scroll position and content metrics to a row window
//!
//! Pure core of the renderer: the engine owns the cached viewport size,
//! scrollbar visibility, and the current [`LayerConfig`], and talks only to
//! a [`DocumentAdapter`]. Everything else a pass must do (show a scrollbar,
//! emit `resize`, grow the container) comes back as [`LayoutEffect`]s for
//! the caller to carry out.

use super::scrollbar::{Axis, ScrollbarThickness, ScrollbarVisibility};
use crate::config::RendererConfig;
use crate::host::DocumentAdapter;
use crate::model::{ChangeMask, LayerConfig, ScrollOffsets, ViewportSize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Side effect requested by a layout computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutEffect {
    /// Show or hide a scrollbar widget.
    ScrollbarShown {
        /// Which bar.
        axis: Axis,
        /// New visibility.
        visible: bool,
    },
    /// The cached size changed; carries the size before the change.
    Resized {
        /// Size before the change.
        old: ViewportSize,
    },
    /// At least one scrollbar flipped during a layer config pass.
    ScrollbarVisibilityChanged(ScrollbarVisibility),
    /// Autosize wants the host container at this height.
    ContainerHeight(f64),
}

/// Result of [`ViewportLayoutEngine::compute_layer_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPass {
    /// Layout-level changes the pass discovered (at least `H_SCROLL` when
    /// the content width moved).
    pub changes: ChangeMask,
    /// Scroll position clamped into the legal range.
    pub scroll: ScrollOffsets,
    /// Effects in the order they occurred.
    pub effects: Vec<LayoutEffect>,
}

/// Computes the visible row window, content extents, and scrollbar needs.
///
/// # Invariants
/// - `layer_config()` is replaced wholesale by every pass; a snapshot held
///   by a paint layer is never mutated
/// - A scrollbar's visibility only changes when the computed need differs
///   from the stored value
#[derive(Debug, Clone)]
pub struct ViewportLayoutEngine {
    size: ViewportSize,
    scrollbars: ScrollbarVisibility,
    thickness: ScrollbarThickness,
    gutter_width: f64,
    line_height: f64,
    character_width: f64,
    /// Last height autosize applied, including margins and chrome.
    desired_height: Option<f64>,
    layer_config: Arc<LayerConfig>,
}

impl Default for ViewportLayoutEngine {
    fn default() -> Self {
        Self::new(ScrollbarThickness::default())
    }
}

impl ViewportLayoutEngine {
    /// Engine with no measurements yet.
    pub fn new(thickness: ScrollbarThickness) -> Self {
        Self {
            size: ViewportSize::default(),
            scrollbars: ScrollbarVisibility::default(),
            thickness,
            gutter_width: 0.0,
            line_height: 0.0,
            character_width: 0.0,
            desired_height: None,
            layer_config: Arc::new(LayerConfig::default()),
        }
    }

    /// Cached viewport size.
    pub fn size(&self) -> ViewportSize {
        self.size
    }

    /// Current scrollbar visibility.
    pub fn scrollbars(&self) -> ScrollbarVisibility {
        self.scrollbars
    }

    /// Scrollbar thickness used for scroller sizes.
    pub fn thickness(&self) -> ScrollbarThickness {
        self.thickness
    }

    /// Gutter width of the last width update.
    pub fn gutter_width(&self) -> f64 {
        self.gutter_width
    }

    /// Pixel height of one screen row; zero until fonts are measured.
    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    /// Pixel width of one column.
    pub fn character_width(&self) -> f64 {
        self.character_width
    }

    /// Latest published snapshot.
    pub fn layer_config(&self) -> &Arc<LayerConfig> {
        &self.layer_config
    }

    /// Height to hand back to `update_cached_size` to keep the current size.
    pub fn container_height(&self, config: &RendererConfig) -> f64 {
        self.size.height + config.extra_height
    }

    /// Store measured font metrics.
    ///
    /// # Returns
    /// `true` if either value changed.
    pub fn set_font_metrics(&mut self, line_height: f64, character_width: f64) -> bool {
        let changed = self.line_height != line_height || self.character_width != character_width;
        self.line_height = line_height;
        self.character_width = character_width;
        changed
    }

    /// Store scrollbar thickness; takes effect at the next size update.
    pub fn set_thickness(&mut self, thickness: ScrollbarThickness) {
        self.thickness = thickness;
    }

    /// Screen width in pixels of the widest line, never less than the
    /// scroller's text area.
    pub fn longest_line<D>(&self, doc: &D, config: &RendererConfig) -> f64
    where
        D: DocumentAdapter + ?Sized,
    {
        let mut columns = doc.longest_line_columns();
        if config.show_invisibles && !doc.uses_wrap_mode() {
            // room for the end-of-line marker
            columns += 1;
        }
        let text_area = self.size.scroller_width - 2.0 * config.padding;
        text_area.max((columns as f64 * self.character_width).round())
    }

    /// Derive the wrap limit from the scroller width and hand it to the document.
    ///
    /// # Returns
    /// `true` if the document re-wrapped, which invalidates every row.
    pub fn adjust_wrap_limit<D>(&self, doc: &mut D, config: &RendererConfig) -> bool
    where
        D: DocumentAdapter + ?Sized,
    {
        if self.character_width <= 0.0 {
            return false;
        }
        let available = self.size.scroller_width - 2.0 * config.padding;
        let limit = (available / self.character_width).floor().max(0.0) as usize;
        let changed = doc.adjust_wrap_limit(limit, config.print_margin_limit());
        if changed {
            debug!(limit, "wrap limit changed");
        }
        changed
    }

    /// Record a new container size.
    ///
    /// # Arguments
    ///
    /// * `doc` - Document to re-wrap when the width changes, if attached
    /// * `force` - Recompute even when the size is unchanged
    /// * `gutter_width` - Resolved gutter width (zero when hidden)
    /// * `width`, `height` - Container size; `extra_height` is subtracted here
    ///
    /// # Returns
    /// `SIZE | SCROLL` for a height change, `SIZE` for a width change, plus
    /// `FULL` when wrapping changed or `force` is set. Pushes
    /// [`LayoutEffect::Resized`] when anything changed.
    #[allow(clippy::too_many_arguments)]
    pub fn update_cached_size<D>(
        &mut self,
        doc: Option<&mut D>,
        config: &RendererConfig,
        force: bool,
        gutter_width: f64,
        width: f64,
        height: f64,
        effects: &mut Vec<LayoutEffect>,
    ) -> ChangeMask
    where
        D: DocumentAdapter + ?Sized,
    {
        let height = height - config.extra_height;
        let old = self.size;
        let mut changes = ChangeMask::empty();

        if height > 0.0 && (force || self.size.height != height) {
            self.size.height = height;
            self.size.scroller_height =
                height - self.thickness.effective(Axis::Horizontal, self.scrollbars);
            changes |= ChangeMask::SIZE | ChangeMask::SCROLL;
        }

        if width > 0.0 && (force || self.size.width != width) {
            changes |= ChangeMask::SIZE;
            self.size.width = width;
            self.gutter_width = gutter_width;
            self.size.scroller_width = (width
                - gutter_width
                - self.thickness.effective(Axis::Vertical, self.scrollbars))
            .max(0.0);

            let rewrapped = match doc {
                Some(doc) if doc.uses_wrap_mode() => self.adjust_wrap_limit(doc, config),
                _ => false,
            };
            if rewrapped || force {
                changes |= ChangeMask::FULL;
            }
        }

        self.size.dirty = width <= 0.0 || height <= 0.0;

        if !changes.is_empty() {
            trace!(?old, new = ?self.size, ?changes, "cached size updated");
            effects.push(LayoutEffect::Resized { old });
        }
        changes
    }

    /// Grow or shrink the container to fit the content between
    /// `min_lines` and `max_lines`.
    fn autosize<D>(&mut self, doc: &mut D, config: &RendererConfig, effects: &mut Vec<LayoutEffect>)
    where
        D: DocumentAdapter + ?Sized,
    {
        let line_height = self.line_height;
        let content_height = doc.screen_length() as f64 * line_height;
        let max_height = f64::from(config.max_lines.unwrap_or(0)) * line_height;
        let min_lines = config.min_lines.filter(|&lines| lines > 0).unwrap_or(1);
        let desired = (f64::from(min_lines) * line_height).max(max_height.min(content_height))
            + config.scroll_margin.vertical()
            + config.extra_height;
        let v_scroll = content_height > max_height;

        if self.desired_height == Some(desired)
            && self.container_height(config) == desired
            && v_scroll == self.scrollbars.vertical
        {
            return;
        }

        self.flip(Axis::Vertical, v_scroll, effects);
        debug!(desired, "autosize");
        effects.push(LayoutEffect::ContainerHeight(desired));
        let (gutter_width, width) = (self.gutter_width, self.size.width);
        self.update_cached_size(Some(doc), config, true, gutter_width, width, desired, effects);
        self.desired_height = Some(desired);
    }

    fn flip(&mut self, axis: Axis, visible: bool, effects: &mut Vec<LayoutEffect>) -> bool {
        let changed = self.scrollbars.set(axis, visible);
        if changed {
            debug!(?axis, visible, "scrollbar visibility changed");
            effects.push(LayoutEffect::ScrollbarShown { axis, visible });
        }
        changed
    }

    /// Recompute the layer configuration for a scroll position.
    ///
    /// Publishes a new [`LayerConfig`] and returns the clamped scroll
    /// position. Does nothing while the line height is unknown.
    pub fn compute_layer_config<D>(
        &mut self,
        doc: &mut D,
        config: &RendererConfig,
        scroll: ScrollOffsets,
    ) -> LayoutPass
    where
        D: DocumentAdapter + ?Sized,
    {
        let mut effects = Vec::new();
        let mut scroll = scroll;
        let line_height = self.line_height;
        if line_height <= 0.0 {
            return LayoutPass {
                changes: ChangeMask::empty(),
                scroll,
                effects,
            };
        }

        if config.autosizes() && line_height > 1.0 {
            self.autosize(doc, config, &mut effects);
        }

        let size = self.size;
        let padding = config.padding;
        let margin = config.scroll_margin;
        let hide_scrollbars = size.height <= 2.0 * line_height;

        let mut max_height = doc.screen_length() as f64 * line_height;
        let mut longest_line = self.longest_line(doc, config);

        let h_scroll = !hide_scrollbars
            && (config.h_scroll_bar_always_visible
                || size.scroller_width - longest_line - 2.0 * padding < 0.0);
        let h_changed = self.flip(Axis::Horizontal, h_scroll, &mut effects);

        if !config.autosizes() && config.scroll_past_end > 0.0 {
            max_height += (size.scroller_height - line_height) * config.scroll_past_end;
        }

        let v_scroll = !hide_scrollbars
            && (config.v_scroll_bar_always_visible || size.scroller_height - max_height < 0.0);
        let v_changed = self.flip(Axis::Vertical, v_scroll, &mut effects);

        // max/min rather than clamp: the upper bound can sit below the lower one
        scroll.top = (-margin.top)
            .max(scroll.top.min(max_height - size.scroller_height + margin.bottom));
        scroll.left = (-margin.left).max(
            scroll
                .left
                .min(longest_line + 2.0 * padding - size.scroller_width + margin.right),
        );

        let offset = scroll.top % line_height;
        let line_count = ((size.scroller_height + line_height) / line_height).ceil() - 1.0;
        let first_screen = ((scroll.top - offset) / line_height).round().max(0.0) as usize;
        let last_screen = first_screen + line_count.max(0.0) as usize;

        let mut first_row = doc.screen_to_document_row(first_screen);
        if let Some(fold) = doc.fold_at(first_row) {
            first_row = fold.start_row;
        }
        let first_row_screen = doc.document_to_screen_row(first_row);
        let first_row_height = doc.rendered_row_height(first_row) as f64 * line_height;

        let last_row = doc
            .screen_to_document_row(last_screen)
            .min(doc.row_count().saturating_sub(1))
            .max(first_row);
        let min_height = size.scroller_height
            + doc.rendered_row_height(last_row) as f64 * line_height
            + first_row_height;

        let vertical_offset = scroll.top - first_row_screen as f64 * line_height;

        let mut changes = ChangeMask::empty();
        if self.layer_config.content_width != longest_line {
            changes |= ChangeMask::H_SCROLL;
        }

        // A scrollbar flip changes the scroller area, which can re-wrap rows.
        if h_changed || v_changed {
            let (gutter_width, width) = (self.gutter_width, self.size.width);
            let height = self.container_height(config);
            changes |=
                self.update_cached_size(Some(doc), config, true, gutter_width, width, height, &mut effects);
            effects.push(LayoutEffect::ScrollbarVisibilityChanged(self.scrollbars));
            if v_changed {
                longest_line = self.longest_line(doc, config);
            }
        }

        let size = self.size;
        let gutter_offset = ((vertical_offset + size.height - size.scroller_height) / line_height)
            .ceil()
            .max(0.0) as usize;

        self.layer_config = LayerConfig {
            content_width: longest_line,
            padding,
            first_row,
            first_row_screen,
            last_row,
            line_height,
            character_width: self.character_width,
            min_height,
            max_height,
            vertical_offset,
            gutter_offset,
            height: size.scroller_height,
        }
        .into_shared();

        trace!(
            first_row,
            last_row,
            first_row_screen,
            vertical_offset,
            max_height,
            ?changes,
            "layer config computed"
        );

        LayoutPass {
            changes,
            scroll,
            effects,
        }
    }
}

#[cfg(test)]
#[path = "layout_engine_tests.rs"]
mod tests;

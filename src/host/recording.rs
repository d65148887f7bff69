//! Recording collaborators - every call into the host becomes a log entry
//!
//! The headless driver and the tests attach these instead of real paint
//! layers. All recorders built from one [`Recorder`] append to a single
//! ordered [`PaintCall`] log, so a whole dispatch can be asserted (or
//! snapshotted) as one sequence.

use super::{
    Collaborators, FramePump, GutterLayer, HostContainer, InputAnchor, IntervalTimer, PaintLayer,
    ScrollbarWidget, TextLayer, TimerToken,
};
use crate::model::{LayerConfig, PagePoint};
use crate::view_state::{Axis, ScrollbarThickness};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Which marker layer a call went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerLayer {
    /// Below the text.
    Back,
    /// Above the text.
    Front,
}

/// One call made by the renderer into a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum PaintCall {
    /// Full text repaint.
    TextUpdate {
        /// Window start.
        first_row: usize,
        /// Window end.
        last_row: usize,
    },
    /// Incremental text scroll.
    TextScroll {
        /// Window start.
        first_row: usize,
        /// Window end.
        last_row: usize,
    },
    /// Partial text repaint.
    TextRows {
        /// First repainted row.
        first_row: usize,
        /// Last repainted row.
        last_row: usize,
    },
    /// Gutter repaint.
    GutterUpdate {
        /// Window start.
        first_row: usize,
        /// Window end.
        last_row: usize,
    },
    /// Active-line highlight moved.
    GutterHighlight {
        /// Top relative to the gutter.
        top: f64,
        /// Highlight height.
        height: f64,
    },
    /// Active-line highlight toggled.
    GutterHighlightVisible {
        /// New visibility.
        visible: bool,
    },
    /// Marker layer repaint.
    Markers {
        /// Which layer.
        layer: MarkerLayer,
    },
    /// Cursor layer repaint.
    Cursor,
    /// Scrollbar shown or hidden.
    ScrollbarVisible {
        /// Which bar.
        axis: Axis,
        /// New visibility.
        visible: bool,
    },
    /// Scrollbar extent set.
    ScrollbarExtent {
        /// Which bar.
        axis: Axis,
        /// Total scrollable extent.
        extent: f64,
    },
    /// Scrollbar position set.
    ScrollbarOffset {
        /// Which bar.
        axis: Axis,
        /// Position along the bar.
        offset: f64,
    },
    /// Autosize changed the container height.
    ContainerHeight {
        /// New height.
        height: f64,
    },
    /// Text input moved.
    TextInput {
        /// Distance from the scroller's right edge.
        right: f64,
        /// Distance from the viewport's bottom edge.
        bottom: f64,
    },
    /// A frame was requested.
    FrameRequested,
    /// An animation timer started.
    TimerStarted {
        /// Token of the new timer.
        token: u64,
    },
    /// An animation timer was cancelled.
    TimerCancelled {
        /// Token of the cancelled timer.
        token: u64,
    },
}

impl PaintCall {
    /// True for calls that paint something, as opposed to widget, frame,
    /// and timer bookkeeping.
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            Self::TextUpdate { .. }
                | Self::TextScroll { .. }
                | Self::TextRows { .. }
                | Self::GutterUpdate { .. }
                | Self::GutterHighlight { .. }
                | Self::Markers { .. }
                | Self::Cursor
        )
    }
}

/// Mutable host state shared by the recorder and its collaborators.
#[derive(Debug, Clone)]
struct HostState {
    calls: Vec<PaintCall>,
    width: f64,
    height: f64,
    hidden: bool,
    origin: PagePoint,
    gutter_width: f64,
    text_input: Option<InputAnchor>,
    next_timer: u64,
    running_timers: Vec<TimerToken>,
}

type Shared = Rc<RefCell<HostState>>;

fn record(state: &Shared, call: PaintCall) {
    state.borrow_mut().calls.push(call);
}

/// Builds recording collaborators and inspects what they saw.
#[derive(Debug, Clone)]
pub struct Recorder {
    state: Shared,
    thickness: ScrollbarThickness,
    with_gutter: bool,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Recorder {
    /// Recorder whose container measures `width` x `height`.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(HostState {
                calls: Vec::new(),
                width,
                height,
                hidden: false,
                origin: PagePoint::default(),
                gutter_width: 0.0,
                text_input: None,
                next_timer: 0,
                running_timers: Vec::new(),
            })),
            thickness: ScrollbarThickness::default(),
            with_gutter: true,
        }
    }

    /// Scrollbars take this much space when shown.
    pub fn with_scrollbar_thickness(mut self, thickness: ScrollbarThickness) -> Self {
        self.thickness = thickness;
        self
    }

    /// Build collaborators without a gutter layer.
    pub fn without_gutter(mut self) -> Self {
        self.with_gutter = false;
        self
    }

    /// Fresh set of collaborators sharing this recorder's log.
    pub fn collaborators(&self) -> Collaborators {
        let state = &self.state;
        let gutter: Option<Box<dyn GutterLayer>> = self
            .with_gutter
            .then(|| Box::new(RecordingGutter(Rc::clone(state))) as Box<dyn GutterLayer>);
        Collaborators {
            text: Box::new(RecordingText(Rc::clone(state))),
            gutter,
            marker_back: Box::new(RecordingMarkers {
                state: Rc::clone(state),
                layer: MarkerLayer::Back,
            }),
            marker_front: Box::new(RecordingMarkers {
                state: Rc::clone(state),
                layer: MarkerLayer::Front,
            }),
            cursor: Box::new(RecordingCursor(Rc::clone(state))),
            h_scrollbar: Box::new(RecordingScrollbar {
                state: Rc::clone(state),
                axis: Axis::Horizontal,
                thickness: self.thickness.horizontal,
            }),
            v_scrollbar: Box::new(RecordingScrollbar {
                state: Rc::clone(state),
                axis: Axis::Vertical,
                thickness: self.thickness.vertical,
            }),
            container: Box::new(RecordingContainer(Rc::clone(state))),
            frame_pump: Box::new(RecordingFramePump(Rc::clone(state))),
            timer: Box::new(RecordingTimer(Rc::clone(state))),
        }
    }

    /// Every call so far.
    pub fn calls(&self) -> Vec<PaintCall> {
        self.state.borrow().calls.clone()
    }

    /// Every call so far, clearing the log.
    pub fn take_calls(&self) -> Vec<PaintCall> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    /// Paint calls only, clearing the log.
    pub fn take_paint_calls(&self) -> Vec<PaintCall> {
        self.take_calls()
            .into_iter()
            .filter(PaintCall::is_paint)
            .collect()
    }

    /// Number of frame requests in the log.
    pub fn frame_requests(&self) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| matches!(call, PaintCall::FrameRequested))
            .count()
    }

    /// Change what the container reports as its size.
    pub fn set_container_size(&self, width: f64, height: f64) {
        let mut state = self.state.borrow_mut();
        state.width = width;
        state.height = height;
    }

    /// Hide or show the container (zero offset width while hidden).
    pub fn set_container_hidden(&self, hidden: bool) {
        self.state.borrow_mut().hidden = hidden;
    }

    /// Page position of the scroller.
    pub fn set_scroller_origin(&self, origin: PagePoint) {
        self.state.borrow_mut().origin = origin;
    }

    /// Width the gutter layer reports.
    pub fn set_gutter_width(&self, width: f64) {
        self.state.borrow_mut().gutter_width = width;
    }

    /// Last text input placement.
    pub fn text_input(&self) -> Option<InputAnchor> {
        self.state.borrow().text_input
    }

    /// Timers currently running.
    pub fn running_timers(&self) -> Vec<TimerToken> {
        self.state.borrow().running_timers.clone()
    }
}

struct RecordingText(Shared);

impl PaintLayer for RecordingText {
    fn update(&mut self, config: &Arc<LayerConfig>) {
        record(
            &self.0,
            PaintCall::TextUpdate {
                first_row: config.first_row,
                last_row: config.last_row,
            },
        );
    }
}

impl TextLayer for RecordingText {
    fn scroll_lines(&mut self, config: &Arc<LayerConfig>) {
        record(
            &self.0,
            PaintCall::TextScroll {
                first_row: config.first_row,
                last_row: config.last_row,
            },
        );
    }

    fn update_rows(&mut self, _config: &Arc<LayerConfig>, first_row: usize, last_row: usize) {
        record(&self.0, PaintCall::TextRows { first_row, last_row });
    }
}

struct RecordingGutter(Shared);

impl PaintLayer for RecordingGutter {
    fn update(&mut self, config: &Arc<LayerConfig>) {
        record(
            &self.0,
            PaintCall::GutterUpdate {
                first_row: config.first_row,
                last_row: config.last_row,
            },
        );
    }
}

impl GutterLayer for RecordingGutter {
    fn width(&self) -> f64 {
        self.0.borrow().gutter_width
    }

    fn highlight_line(&mut self, top: f64, height: f64) {
        record(&self.0, PaintCall::GutterHighlight { top, height });
    }

    fn set_highlight_visible(&mut self, visible: bool) {
        record(&self.0, PaintCall::GutterHighlightVisible { visible });
    }
}

struct RecordingMarkers {
    state: Shared,
    layer: MarkerLayer,
}

impl PaintLayer for RecordingMarkers {
    fn update(&mut self, _config: &Arc<LayerConfig>) {
        record(&self.state, PaintCall::Markers { layer: self.layer });
    }
}

struct RecordingCursor(Shared);

impl PaintLayer for RecordingCursor {
    fn update(&mut self, _config: &Arc<LayerConfig>) {
        record(&self.0, PaintCall::Cursor);
    }
}

struct RecordingScrollbar {
    state: Shared,
    axis: Axis,
    thickness: f64,
}

impl ScrollbarWidget for RecordingScrollbar {
    fn set_visible(&mut self, visible: bool) {
        record(
            &self.state,
            PaintCall::ScrollbarVisible {
                axis: self.axis,
                visible,
            },
        );
    }

    fn thickness(&self) -> f64 {
        self.thickness
    }

    fn set_scroll_extent(&mut self, extent: f64) {
        record(
            &self.state,
            PaintCall::ScrollbarExtent {
                axis: self.axis,
                extent,
            },
        );
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        record(
            &self.state,
            PaintCall::ScrollbarOffset {
                axis: self.axis,
                offset,
            },
        );
    }
}

struct RecordingContainer(Shared);

impl HostContainer for RecordingContainer {
    fn client_size(&self) -> (f64, f64) {
        let state = self.0.borrow();
        if state.hidden {
            (0.0, 0.0)
        } else {
            (state.width, state.height)
        }
    }

    fn offset_width(&self) -> f64 {
        let state = self.0.borrow();
        if state.hidden {
            0.0
        } else {
            state.width
        }
    }

    fn set_height(&mut self, height: f64) {
        let mut state = self.0.borrow_mut();
        state.height = height;
        state.calls.push(PaintCall::ContainerHeight { height });
    }

    fn scroller_origin(&self) -> PagePoint {
        self.0.borrow().origin
    }

    fn place_text_input(&mut self, anchor: InputAnchor) {
        let mut state = self.0.borrow_mut();
        state.text_input = Some(anchor);
        state.calls.push(PaintCall::TextInput {
            right: anchor.right,
            bottom: anchor.bottom,
        });
    }
}

struct RecordingFramePump(Shared);

impl FramePump for RecordingFramePump {
    fn request_frame(&mut self) {
        record(&self.0, PaintCall::FrameRequested);
    }
}

struct RecordingTimer(Shared);

impl IntervalTimer for RecordingTimer {
    fn start(&mut self, _interval: Duration) -> TimerToken {
        let mut state = self.0.borrow_mut();
        state.next_timer += 1;
        let token = TimerToken(state.next_timer);
        state.running_timers.push(token);
        state.calls.push(PaintCall::TimerStarted { token: token.0 });
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        let mut state = self.0.borrow_mut();
        state.running_timers.retain(|running| *running != token);
        state.calls.push(PaintCall::TimerCancelled { token: token.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborators_share_one_ordered_log() {
        let recorder = Recorder::new(800.0, 600.0);
        let mut host = recorder.collaborators();
        let config = LayerConfig::default().into_shared();

        host.text.update(&config);
        host.cursor.update(&config);
        host.marker_front.update(&config);
        host.frame_pump.request_frame();

        assert_eq!(
            recorder.take_calls(),
            vec![
                PaintCall::TextUpdate {
                    first_row: 0,
                    last_row: 0
                },
                PaintCall::Cursor,
                PaintCall::Markers {
                    layer: MarkerLayer::Front
                },
                PaintCall::FrameRequested,
            ]
        );
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_hidden_container_reports_zero_size() {
        let recorder = Recorder::new(800.0, 600.0);
        let host = recorder.collaborators();
        assert_eq!(host.container.client_size(), (800.0, 600.0));

        recorder.set_container_hidden(true);

        assert_eq!(host.container.offset_width(), 0.0);
        assert_eq!(host.container.client_size(), (0.0, 0.0));
    }

    #[test]
    fn test_timers_are_tracked_until_cancelled() {
        let recorder = Recorder::default();
        let mut host = recorder.collaborators();

        let first = host.timer.start(Duration::from_millis(10));
        let second = host.timer.start(Duration::from_millis(10));
        host.timer.cancel(first);

        assert_ne!(first, second);
        assert_eq!(recorder.running_timers(), vec![second]);
    }

    #[test]
    fn test_without_gutter_builds_no_gutter_layer() {
        let recorder = Recorder::default().without_gutter();
        assert!(recorder.collaborators().gutter.is_none());
    }

    #[test]
    fn test_paint_filter_drops_bookkeeping() {
        let recorder = Recorder::default();
        let mut host = recorder.collaborators();
        host.frame_pump.request_frame();
        host.v_scrollbar.set_scroll_offset(3.0);
        host.cursor.update(&LayerConfig::default().into_shared());

        assert_eq!(recorder.take_paint_calls(), vec![PaintCall::Cursor]);
    }

    #[test]
    fn test_calls_serialize_with_a_tag() {
        let json = serde_json::to_value(PaintCall::ScrollbarVisible {
            axis: Axis::Vertical,
            visible: true,
        })
        .expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({"call": "scrollbar_visible", "axis": "vertical", "visible": true})
        );
    }
}

//! Acceptance tests for the render core, driven end to end through the
//! recording collaborators.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use vrender::config::RendererConfig;
use vrender::host::recording::{PaintCall, Recorder};
use vrender::host::MemoryDocument;
use vrender::model::ChangeMask;
use vrender::state::{calc_steps, RenderEvent, Renderer, MAX_NESTED_RESIZES};
use vrender::view_state::{Axis, ScrollbarThickness};

fn numbered_doc(rows: usize) -> MemoryDocument {
    MemoryDocument::from_lines((0..rows).map(|i| format!("line {i}")))
}

fn renderer_for(
    recorder: &Recorder,
    config: RendererConfig,
    doc: MemoryDocument,
) -> Renderer<MemoryDocument> {
    let mut renderer = Renderer::new(recorder.collaborators(), config);
    renderer.set_session(doc);
    renderer
}

// ===== Row window =====

#[test]
fn test_window_of_320px_viewport_holds_20_rows() {
    let recorder = Recorder::new(800.0, 320.0);
    let mut renderer = renderer_for(&recorder, RendererConfig::default(), numbered_doc(200));

    renderer.set_font_metrics(16.0, 8.0);
    renderer.on_frame();

    let window = renderer.viewport_row_window();
    assert_eq!(window.first_row, 0);
    assert_eq!(window.last_row - window.first_row, 20);
}

// ===== Scheduling =====

#[test]
fn test_cursor_and_text_reach_dispatch_as_one_mask() {
    let recorder = Recorder::new(800.0, 320.0);
    let mut renderer = renderer_for(&recorder, RendererConfig::default(), numbered_doc(50));
    renderer.set_font_metrics(16.0, 8.0);
    renderer.on_frame();
    recorder.take_calls();

    renderer.update_cursor();
    renderer.update_text();
    assert_eq!(renderer.pending().bits(), 33);
    assert_eq!(recorder.frame_requests(), 1);

    renderer.on_frame();
    let painted = recorder.take_paint_calls();
    assert_eq!(
        painted.first(),
        Some(&PaintCall::TextUpdate {
            first_row: 0,
            last_row: 20
        })
    );
    assert!(painted.contains(&PaintCall::Cursor));
}

// ===== Scroll animation =====

#[test]
fn test_ease_out_steps_from_100_to_0() {
    let steps = calc_steps(100.0, 0.0, 8);

    assert_eq!(steps.len(), 8);
    assert_eq!(steps[0], 100.0);
    assert!(steps[7] > 0.0 && steps[7] < 100.0);
    assert!(steps[7] < steps[6]);
    assert!(steps.windows(2).all(|pair| pair[1] <= pair[0]));
}

#[test]
fn test_retargeted_animation_never_jumps_back() {
    let config = RendererConfig {
        animated_scroll: true,
        ..RendererConfig::default()
    };
    let recorder = Recorder::new(800.0, 320.0);
    let mut renderer = renderer_for(&recorder, config, numbered_doc(500));
    renderer.set_font_metrics(16.0, 8.0);
    renderer.on_frame();

    let first_done = Rc::new(Cell::new(false));
    let flag = Rc::clone(&first_done);
    renderer.scroll_to_line(100, false, true, Some(Box::new(move || flag.set(true))));
    let first_timer = recorder.running_timers()[0];
    renderer.on_animation_tick(first_timer);
    renderer.on_animation_tick(first_timer);
    let mid_flight = renderer.scroll_offsets().top;

    renderer.scroll_to_line(200, false, true, None);
    assert!(renderer.scroll_offsets().top >= mid_flight);
    let timers = recorder.running_timers();
    assert_eq!(timers.len(), 1);
    assert_ne!(timers[0], first_timer);

    while renderer.is_animating() {
        renderer.on_frame();
        renderer.on_animation_tick(timers[0]);
    }
    renderer.on_frame();

    assert!(!first_done.get());
    assert_eq!(renderer.scroll_offsets().top, 3200.0);
    assert_eq!(renderer.first_visible_row(), 200);
}

// ===== Resize guard =====

#[test]
fn test_nested_resize_requests_are_bounded() {
    let recorder = Recorder::new(800.0, 320.0);
    let mut renderer = renderer_for(&recorder, RendererConfig::default(), numbered_doc(50));
    renderer.set_font_metrics(16.0, 8.0);
    renderer.on_frame();

    let passes = Rc::new(Cell::new(0));
    let counter = Rc::clone(&passes);
    renderer.on(Box::new(move |event, requests| {
        if *event == RenderEvent::BeforeRender {
            counter.set(counter.get() + 1);
            requests.request_resize(true);
        }
    }));

    renderer.on_resize(true, None, None, None);

    assert_eq!(passes.get(), 1 + usize::from(MAX_NESTED_RESIZES));
}

// ===== Anchor stability =====

#[test]
fn test_folding_above_the_window_keeps_visible_rows_still() {
    let recorder = Recorder::new(800.0, 320.0);
    let mut renderer = renderer_for(&recorder, RendererConfig::default(), numbered_doc(100));
    renderer.set_font_metrics(16.0, 8.0);
    renderer.set_scroll_top(480.0);
    renderer.on_frame();
    let old_first_row = renderer.first_visible_row();
    let old_scroll_top = renderer.scroll_offsets().top;

    if let Some(doc) = renderer.session_mut() {
        doc.add_fold(2, 9).expect("fold inside document");
    }
    renderer.update_lines(2, None, false);
    renderer.on_frame();

    // The first row is recomputed against the folded mapping, then the
    // scroll position moves by the rows the fold hid.
    assert_eq!(renderer.first_visible_row(), old_first_row);
    assert_eq!(renderer.scroll_offsets().top, old_scroll_top - 7.0 * 16.0);
}

// ===== Scrollbars =====

#[test]
fn test_horizontal_scrollbar_flip_notifies_once_and_resizes() {
    let recorder = Recorder::new(400.0, 320.0).with_scrollbar_thickness(ScrollbarThickness {
        horizontal: 10.0,
        vertical: 10.0,
    });
    let mut doc = numbered_doc(5);
    doc.set_line(2, &"x".repeat(120));
    let mut renderer = renderer_for(&recorder, RendererConfig::default(), doc);

    let notifications = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&notifications);
    renderer.on(Box::new(move |event, _| {
        if let RenderEvent::ScrollbarVisibilityChanged(visibility) = event {
            seen.borrow_mut().push(*visibility);
        }
    }));

    renderer.set_font_metrics(16.0, 8.0);
    renderer.on_frame();

    let notifications = notifications.borrow();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].horizontal);
    assert!(!notifications[0].vertical);
    assert_eq!(renderer.size().scroller_height, 310.0);
    assert!(recorder.calls().contains(&PaintCall::ScrollbarVisible {
        axis: Axis::Horizontal,
        visible: true
    }));
}

#[test]
fn test_always_visible_scrollbar_policy_is_rescheduled() {
    let recorder = Recorder::new(800.0, 320.0);
    let mut renderer = renderer_for(&recorder, RendererConfig::default(), numbered_doc(5));
    renderer.set_font_metrics(16.0, 8.0);
    renderer.on_frame();
    assert!(!renderer.scrollbars().vertical);

    renderer
        .set_option_str("vScrollBarAlwaysVisible", "true")
        .expect("known option");
    assert!(renderer.pending().contains(ChangeMask::SCROLL));
    renderer.on_frame();

    assert!(renderer.scrollbars().vertical);
}

// ===== Call log =====

#[test]
fn test_first_frame_call_log() {
    let recorder = Recorder::new(200.0, 100.0).with_scrollbar_thickness(ScrollbarThickness {
        horizontal: 10.0,
        vertical: 10.0,
    });
    let mut renderer = renderer_for(&recorder, RendererConfig::default(), numbered_doc(10));

    renderer.set_font_metrics(20.0, 10.0);
    renderer.on_frame();

    let log = recorder
        .take_calls()
        .iter()
        .map(|call| serde_json::to_string(call).expect("serializable call"))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!("first_frame_call_log", log);
}

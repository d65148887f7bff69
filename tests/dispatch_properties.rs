//! Property tests for scheduling and dispatch.
//!
//! Tests validate:
//! 1. Scheduling the same reason twice is the same as scheduling it once
//! 2. `FULL` dominates every other bit in the paint calls it produces
//! 3. Raw mask values are stable

use proptest::prelude::*;
use vrender::config::RendererConfig;
use vrender::host::recording::{PaintCall, Recorder};
use vrender::host::MemoryDocument;
use vrender::model::ChangeMask;
use vrender::state::Renderer;
use vrender::view_state::ScrollbarThickness;

fn ready_renderer() -> (Renderer<MemoryDocument>, Recorder) {
    let recorder = Recorder::new(640.0, 240.0).with_scrollbar_thickness(ScrollbarThickness {
        horizontal: 10.0,
        vertical: 10.0,
    });
    let mut renderer = Renderer::new(recorder.collaborators(), RendererConfig::default());
    renderer.set_session(MemoryDocument::from_lines(
        (0..60).map(|i| format!("fn row_{i}() {{}}")),
    ));
    renderer.set_font_metrics(16.0, 8.0);
    renderer.on_frame();
    recorder.take_calls();
    (renderer, recorder)
}

fn any_mask() -> impl Strategy<Value = ChangeMask> {
    (0u16..2048).prop_map(ChangeMask::from_bits_truncate)
}

// ===== Property 1: Idempotent scheduling =====

proptest! {
    #[test]
    fn prop_scheduling_twice_equals_scheduling_once(masks in prop::collection::vec(any_mask(), 1..8)) {
        let (mut once, once_log) = ready_renderer();
        let (mut twice, twice_log) = ready_renderer();

        for mask in &masks {
            once.schedule(*mask);
            twice.schedule(*mask);
            twice.schedule(*mask);
        }

        prop_assert_eq!(once.pending(), twice.pending());
        prop_assert!(once_log.frame_requests() <= 1);
        prop_assert_eq!(once_log.frame_requests(), twice_log.frame_requests());
    }
}

// ===== Property 2: Full dominates =====

proptest! {
    #[test]
    fn prop_full_dominates_every_other_bit(extra in any_mask()) {
        let (mut plain, plain_log) = ready_renderer();
        let (mut mixed, mixed_log) = ready_renderer();

        plain.flush_sync(ChangeMask::FULL, false);
        mixed.flush_sync(ChangeMask::FULL | extra, false);

        let plain_calls: Vec<PaintCall> = plain_log.take_paint_calls();
        let mixed_calls: Vec<PaintCall> = mixed_log.take_paint_calls();
        prop_assert_eq!(plain_calls, mixed_calls);
    }
}

// ===== Property 3: Mask values =====

#[test]
fn test_cursor_then_text_dispatches_33() {
    let (mut renderer, _recorder) = ready_renderer();

    renderer.schedule(ChangeMask::CURSOR);
    renderer.schedule(ChangeMask::TEXT);

    assert_eq!(renderer.pending().bits(), 33);
}

#[test]
fn test_mask_bits_match_their_documented_values() {
    let expected = [
        (ChangeMask::CURSOR, 1),
        (ChangeMask::MARKER, 2),
        (ChangeMask::GUTTER, 4),
        (ChangeMask::SCROLL, 8),
        (ChangeMask::LINES, 16),
        (ChangeMask::TEXT, 32),
        (ChangeMask::SIZE, 64),
        (ChangeMask::MARKER_BACK, 128),
        (ChangeMask::MARKER_FRONT, 256),
        (ChangeMask::FULL, 512),
        (ChangeMask::H_SCROLL, 1024),
    ];
    for (mask, bits) in expected {
        assert_eq!(mask.bits(), bits, "{mask:?}");
    }
}

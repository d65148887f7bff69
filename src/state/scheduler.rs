//! ChangeScheduler - coalesces change reasons into at most one frame request
//!
//! Any number of `schedule` calls between two frames fold into one pending
//! mask and one `FramePump::request_frame`. The renderer drains the pending
//! mask once per frame callback; work scheduled while a frame is being
//! processed waits, and closing the frame requests exactly one more.

use crate::host::FramePump;
use crate::model::ChangeMask;
use tracing::trace;

/// Accumulates change reasons and owns the frame request.
///
/// # Invariants
/// - At most one frame request is outstanding at a time
/// - `pending` only grows between `take_pending` calls
/// - `deferred` holds work refused while the viewport was unmeasured; it is
///   only ever merged back by the dispatcher
pub struct ChangeScheduler {
    pending: ChangeMask,
    deferred: ChangeMask,
    frame_requested: bool,
    pump: Box<dyn FramePump>,
}

impl std::fmt::Debug for ChangeScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeScheduler")
            .field("pending", &self.pending)
            .field("deferred", &self.deferred)
            .field("frame_requested", &self.frame_requested)
            .finish_non_exhaustive()
    }
}

impl ChangeScheduler {
    /// Scheduler that asks `pump` for frames.
    pub fn new(pump: Box<dyn FramePump>) -> Self {
        Self {
            pending: ChangeMask::empty(),
            deferred: ChangeMask::empty(),
            frame_requested: false,
            pump,
        }
    }

    /// Add change reasons; request a frame if none is outstanding.
    ///
    /// An empty mask is a no-op.
    pub fn schedule(&mut self, changes: ChangeMask) {
        self.pending |= changes;
        if !self.frame_requested && !self.pending.is_empty() {
            self.frame_requested = true;
            trace!(pending = ?self.pending, "frame requested");
            self.pump.request_frame();
        }
    }

    /// Reasons waiting for the next frame.
    pub fn pending(&self) -> ChangeMask {
        self.pending
    }

    /// Remove and return the pending reasons.
    pub fn take_pending(&mut self) -> ChangeMask {
        std::mem::take(&mut self.pending)
    }

    /// True while a frame request is outstanding or being processed.
    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Mark the outstanding frame as being processed.
    ///
    /// Returns `false` if no frame was requested, in which case the callback
    /// is spurious and should do nothing.
    pub fn begin_frame(&self) -> bool {
        self.frame_requested
    }

    /// Close the frame cycle. Anything still pending requests a new frame.
    pub fn end_frame(&mut self) {
        self.frame_requested = false;
        if !self.pending.is_empty() {
            self.schedule(ChangeMask::empty());
        }
    }

    /// Hold reasons until the viewport can be measured.
    pub fn defer(&mut self, changes: ChangeMask) {
        self.deferred |= changes;
    }

    /// Remove and return the deferred reasons.
    pub fn take_deferred(&mut self) -> ChangeMask {
        std::mem::take(&mut self.deferred)
    }

    /// Reasons currently deferred.
    pub fn deferred(&self) -> ChangeMask {
        self.deferred
    }
}

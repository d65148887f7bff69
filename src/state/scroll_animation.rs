//! Eased scroll animation as an explicit state machine.
//!
//! ```text
//! Idle --start--> Stepping --last sample--> Finishing --tick--> Idle
//!   ^                |                                            |
//!   +---- retarget onto the current sample (cancelled) ----------+
//! ```
//!
//! The machine owns its timer token. A tick carrying any other token is
//! stale and ignored, so a superseded timer can never move the view.

use crate::host::{IntervalTimer, TimerToken};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;

/// Completion callback of an animation.
pub type OnDone = Box<dyn FnOnce()>;

/// Eased scroll samples from `from` towards `to`.
///
/// `sample(t) = (to - from) * ((t - 1)^3 + 1) + from` for
/// `t = 0/steps, 1/steps, .. (steps-1)/steps`, so the first sample is always
/// `from` and the last one is short of `to`. The final snap to `to` is the
/// animation's job.
///
/// # Examples
///
/// ```
/// # use vrender::state::scroll_animation::calc_steps;
/// let steps = calc_steps(100.0, 0.0, 8);
/// assert_eq!(steps[0], 100.0);
/// assert!(steps[7] > 0.0 && steps[7] < 100.0);
/// ```
pub fn calc_steps(from: f64, to: f64, steps: usize) -> Vec<f64> {
    let delta = to - from;
    (0..steps)
        .map(|i| {
            let t = i as f64 / steps as f64 - 1.0;
            delta * (t.powi(3) + 1.0) + from
        })
        .collect()
}

/// Where the animation is.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationPhase {
    /// No animation in flight.
    Idle,
    /// Samples left to apply.
    Stepping {
        /// Position the animation started from.
        from: f64,
        /// Target position.
        to: f64,
        /// Samples not yet applied.
        steps: VecDeque<f64>,
    },
    /// Every sample applied; the next tick finishes.
    Finishing {
        /// Target position.
        to: f64,
    },
}

/// What a tick asks the renderer to do.
pub enum AnimationStep {
    /// Scroll to an intermediate sample.
    Apply(f64),
    /// Scroll exactly to the target.
    Snap(f64),
    /// The animation ended; run the callback if there is one.
    Done(Option<OnDone>),
    /// The tick was stale or the machine idle.
    Ignored,
}

impl std::fmt::Debug for AnimationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Apply(value) => f.debug_tuple("Apply").field(value).finish(),
            Self::Snap(value) => f.debug_tuple("Snap").field(value).finish(),
            Self::Done(on_done) => f.debug_tuple("Done").field(&on_done.is_some()).finish(),
            Self::Ignored => f.write_str("Ignored"),
        }
    }
}

/// Result of [`ScrollAnimation::start`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationStart {
    /// A timer runs; apply this first sample now.
    Started(f64),
    /// Retargeting landed exactly on the target: the running animation was
    /// cancelled and the view should sit at the target.
    Cancelled(f64),
}

/// The single scroll animation of a renderer.
///
/// # Invariants
/// - `timer` is `Some` exactly when the phase is not `Idle`
/// - At most one timer is running; starting cancels the previous one first
pub struct ScrollAnimation {
    phase: AnimationPhase,
    timer: Option<TimerToken>,
    on_done: Option<OnDone>,
}

impl Default for ScrollAnimation {
    fn default() -> Self {
        Self {
            phase: AnimationPhase::Idle,
            timer: None,
            on_done: None,
        }
    }
}

impl std::fmt::Debug for ScrollAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollAnimation")
            .field("phase", &self.phase)
            .field("timer", &self.timer)
            .field("on_done", &self.on_done.is_some())
            .finish()
    }
}

impl ScrollAnimation {
    /// Current phase.
    pub fn phase(&self) -> &AnimationPhase {
        &self.phase
    }

    /// True while an animation is in flight.
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, AnimationPhase::Idle)
    }

    /// Target of the animation in flight.
    pub fn target(&self) -> Option<f64> {
        match &self.phase {
            AnimationPhase::Idle => None,
            AnimationPhase::Stepping { to, .. } | AnimationPhase::Finishing { to } => Some(*to),
        }
    }

    /// Token of the running timer.
    pub fn timer(&self) -> Option<TimerToken> {
        self.timer
    }

    /// Animate from `from` to `to`.
    ///
    /// If an animation is in flight its next unapplied sample replaces
    /// `from`, so retargeting never jumps. The previous timer is cancelled
    /// and its completion callback dropped.
    ///
    /// # Arguments
    ///
    /// * `timer` - Host timer used for the ticks
    /// * `steps` - Number of eased samples (at least one is used)
    /// * `interval` - Tick period
    /// * `on_done` - Runs after the final snap
    pub fn start(
        &mut self,
        timer: &mut dyn IntervalTimer,
        from: f64,
        to: f64,
        steps: usize,
        interval: Duration,
        on_done: Option<OnDone>,
    ) -> AnimationStart {
        let mut from = from;
        if let AnimationPhase::Stepping { steps: remaining, .. } = &self.phase {
            if let Some(&next) = remaining.front() {
                from = next;
            }
        }

        let preempted = self.is_active();
        self.stop(timer);
        if preempted {
            debug!(from, to, "scroll animation preempted");
        }

        if from == to {
            // `on_done` is dropped with the cancelled animation.
            return AnimationStart::Cancelled(to);
        }

        let mut samples: VecDeque<f64> = calc_steps(from, to, steps.max(1)).into();
        let first = samples.pop_front().unwrap_or(to);
        self.timer = Some(timer.start(interval));
        self.on_done = on_done;
        self.phase = if samples.is_empty() {
            AnimationPhase::Finishing { to }
        } else {
            AnimationPhase::Stepping {
                from,
                to,
                steps: samples,
            }
        };
        debug!(from, to, steps, "scroll animation started");
        AnimationStart::Started(first)
    }

    /// Advance on a timer tick.
    pub fn tick(&mut self, timer: &mut dyn IntervalTimer, token: TimerToken) -> AnimationStep {
        if self.timer != Some(token) {
            return AnimationStep::Ignored;
        }
        match &mut self.phase {
            AnimationPhase::Idle => AnimationStep::Ignored,
            AnimationPhase::Stepping { to, steps, .. } => match steps.pop_front() {
                Some(sample) => AnimationStep::Apply(sample),
                None => {
                    let to = *to;
                    self.phase = AnimationPhase::Finishing { to };
                    AnimationStep::Snap(to)
                }
            },
            AnimationPhase::Finishing { to } => {
                debug!(to = *to, "scroll animation finished");
                let on_done = self.on_done.take();
                self.stop(timer);
                AnimationStep::Done(on_done)
            }
        }
    }

    /// Cancel the animation in flight, dropping its callback.
    pub fn stop(&mut self, timer: &mut dyn IntervalTimer) {
        if let Some(token) = self.timer.take() {
            timer.cancel(token);
        }
        self.phase = AnimationPhase::Idle;
        self.on_done = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeTimer {
        next: u64,
        running: Vec<TimerToken>,
        cancelled: Vec<TimerToken>,
    }

    impl IntervalTimer for FakeTimer {
        fn start(&mut self, _interval: Duration) -> TimerToken {
            self.next += 1;
            let token = TimerToken(self.next);
            self.running.push(token);
            token
        }

        fn cancel(&mut self, token: TimerToken) {
            self.running.retain(|t| *t != token);
            self.cancelled.push(token);
        }
    }

    const TICK: Duration = Duration::from_millis(10);

    /// Tick until Done, collecting every applied position.
    fn run_to_end(animation: &mut ScrollAnimation, timer: &mut FakeTimer) -> Vec<f64> {
        let mut positions = Vec::new();
        for _ in 0..100 {
            let Some(token) = animation.timer() else {
                break;
            };
            match animation.tick(timer, token) {
                AnimationStep::Apply(v) | AnimationStep::Snap(v) => positions.push(v),
                AnimationStep::Done(on_done) => {
                    if let Some(on_done) = on_done {
                        on_done();
                    }
                    break;
                }
                AnimationStep::Ignored => break,
            }
        }
        positions
    }

    mod steps {
        use super::*;

        #[test]
        fn test_eight_steps_from_100_to_0() {
            let steps = calc_steps(100.0, 0.0, 8);
            assert_eq!(steps.len(), 8);
            assert_eq!(steps[0], 100.0);
            assert!(steps[7] > 0.0 && steps[7] < 100.0);
            assert!(steps[7] < 1.0, "last sample approaches the target");
        }

        #[test]
        fn test_samples_are_monotonic() {
            let down = calc_steps(300.0, 20.0, 8);
            assert!(down.windows(2).all(|w| w[0] >= w[1]));
            let up = calc_steps(20.0, 300.0, 8);
            assert!(up.windows(2).all(|w| w[0] <= w[1]));
        }

        #[test]
        fn test_zero_steps_is_empty() {
            assert!(calc_steps(0.0, 10.0, 0).is_empty());
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn test_start_applies_from_and_runs_to_target() {
            let mut timer = FakeTimer::default();
            let mut animation = ScrollAnimation::default();

            let start = animation.start(&mut timer, 0.0, 160.0, 8, TICK, None);
            assert_eq!(start, AnimationStart::Started(0.0));
            assert!(animation.is_active());
            assert_eq!(animation.target(), Some(160.0));

            let positions = run_to_end(&mut animation, &mut timer);

            // seven remaining samples, then the snap
            assert_eq!(positions.len(), 8);
            assert_eq!(positions.last(), Some(&160.0));
            assert!(!animation.is_active());
            assert!(timer.running.is_empty());
        }

        #[test]
        fn test_callback_runs_once_after_snap() {
            let mut timer = FakeTimer::default();
            let mut animation = ScrollAnimation::default();
            let calls = Rc::new(Cell::new(0));
            let counter = Rc::clone(&calls);

            animation.start(
                &mut timer,
                0.0,
                50.0,
                4,
                TICK,
                Some(Box::new(move || counter.set(counter.get() + 1))),
            );
            run_to_end(&mut animation, &mut timer);

            assert_eq!(calls.get(), 1);
        }

        #[test]
        fn test_stale_token_is_ignored() {
            let mut timer = FakeTimer::default();
            let mut animation = ScrollAnimation::default();
            animation.start(&mut timer, 0.0, 50.0, 4, TICK, None);

            let step = animation.tick(&mut timer, TimerToken(999));

            assert!(matches!(step, AnimationStep::Ignored));
            assert!(animation.is_active());
        }

        #[test]
        fn test_idle_tick_is_ignored() {
            let mut timer = FakeTimer::default();
            let mut animation = ScrollAnimation::default();
            assert!(matches!(
                animation.tick(&mut timer, TimerToken(1)),
                AnimationStep::Ignored
            ));
        }

        #[test]
        fn test_single_step_goes_straight_to_finishing() {
            let mut timer = FakeTimer::default();
            let mut animation = ScrollAnimation::default();

            animation.start(&mut timer, 0.0, 30.0, 1, TICK, None);

            assert_eq!(animation.phase(), &AnimationPhase::Finishing { to: 30.0 });
        }
    }

    mod retarget {
        use super::*;

        #[test]
        fn test_new_animation_starts_from_next_unapplied_sample() {
            let mut timer = FakeTimer::default();
            let mut animation = ScrollAnimation::default();
            animation.start(&mut timer, 0.0, 800.0, 8, TICK, None);
            let expected = calc_steps(0.0, 800.0, 8)[1];

            let start = animation.start(&mut timer, 500.0, 100.0, 8, TICK, None);

            assert_eq!(start, AnimationStart::Started(expected));
        }

        #[test]
        fn test_starting_cancels_the_previous_timer() {
            let mut timer = FakeTimer::default();
            let mut animation = ScrollAnimation::default();
            animation.start(&mut timer, 0.0, 800.0, 8, TICK, None);
            let first = animation.timer();

            animation.start(&mut timer, 0.0, 100.0, 8, TICK, None);

            assert_eq!(timer.running.len(), 1);
            assert_eq!(timer.cancelled, first.into_iter().collect::<Vec<_>>());
            assert_ne!(animation.timer(), first);
        }

        #[test]
        fn test_preempted_callback_never_runs() {
            let mut timer = FakeTimer::default();
            let mut animation = ScrollAnimation::default();
            let calls = Rc::new(Cell::new(0));
            let counter = Rc::clone(&calls);
            animation.start(
                &mut timer,
                0.0,
                800.0,
                8,
                TICK,
                Some(Box::new(move || counter.set(counter.get() + 1))),
            );

            animation.start(&mut timer, 0.0, 100.0, 8, TICK, None);
            run_to_end(&mut animation, &mut timer);

            assert_eq!(calls.get(), 0);
        }

        #[test]
        fn test_retarget_onto_current_sample_cancels() {
            let mut timer = FakeTimer::default();
            let mut animation = ScrollAnimation::default();
            animation.start(&mut timer, 0.0, 800.0, 8, TICK, None);
            let next = calc_steps(0.0, 800.0, 8)[1];

            let start = animation.start(&mut timer, 0.0, next, 8, TICK, None);

            assert_eq!(start, AnimationStart::Cancelled(next));
            assert!(!animation.is_active());
            assert!(timer.running.is_empty());
        }
    }
}

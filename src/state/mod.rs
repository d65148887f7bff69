//! Render scheduling and dispatch.
//!
//! - [`ChangeScheduler`]: coalesces change reasons into one frame request
//! - [`Renderer`]: turns a change mask into ordered paint-layer calls
//! - [`ScrollAnimation`]: eased scroll-to-line state machine
//! - [`ResizeGuard`]: bounds resize recursion from listeners
//! - [`EventEmitter`]: lifecycle events and listener requests

pub mod events;
pub mod renderer;
pub mod resize_guard;
pub mod scheduler;
pub mod scroll_animation;

pub use events::{EventEmitter, Listener, ListenerId, ListenerRequests, RenderEvent};
pub use renderer::Renderer;
pub use resize_guard::{ResizeGuard, MAX_NESTED_RESIZES};
pub use scheduler::ChangeScheduler;
pub use scroll_animation::{
    calc_steps, AnimationPhase, AnimationStart, AnimationStep, OnDone, ScrollAnimation,
};

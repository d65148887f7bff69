//! vrender - render scheduling and viewport layout for virtualized code editors
//!
//! Edits, cursor moves, scrolls, and resizes are reported to a [`Renderer`]
//! as change reasons. The renderer coalesces them into one frame, computes
//! which document rows are live for the current scroll position, and
//! drives the paint layers in a fixed order.
//!
//! The library is a pure core: it never draws, owns no timers, and does no
//! I/O. Everything it needs from the host is a trait in [`host`]. The
//! `vrender` binary is the impure shell, a headless driver that runs one
//! frame over a text file and prints what would have been painted.
//!
//! [`Renderer`]: state::Renderer

pub mod config;
pub mod host;
pub mod logging;
pub mod model;
pub mod state;
pub mod view_state;

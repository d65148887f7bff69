//! Data model for the render core.
//!
//! Plain values shared by the scheduler, the dispatcher and the layout
//! engine. Nothing in here talks to a collaborator.

pub mod change_mask;
pub mod changed_lines;
pub mod error;
pub mod geometry;
pub mod layer_config;
pub mod scroll;
pub mod viewport_size;

pub use change_mask::ChangeMask;
pub use changed_lines::{ChangedLinesRange, RowBound};
pub use error::{DriverError, OptionError};
pub use geometry::{CellSide, DocPosition, PagePoint, ScreenHit, ScreenPosition};
pub use layer_config::LayerConfig;
pub use scroll::{ScrollMargin, ScrollOffsets, ViewMargin};
pub use viewport_size::ViewportSize;

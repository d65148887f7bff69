//! View-state layer - layout computation for the render core
//!
//! Pure code: nothing in here touches a paint layer, a widget, or a timer.
//!
//! # Module Structure
//!
//! - `height_index`: HeightIndex - O(log n) screen-row prefix sums via Fenwick tree
//! - `layout_engine`: ViewportLayoutEngine - row window, extents, scrollbar needs, autosize
//! - `row_window`: RowWindow - the painted rows and their fully-visible subset
//! - `scrollbar`: Axis, ScrollbarVisibility, ScrollbarThickness

pub mod height_index;
pub mod layout_engine;
pub mod row_window;
pub mod scrollbar;

pub use height_index::HeightIndex;
pub use layout_engine::{LayoutEffect, LayoutPass, ViewportLayoutEngine};
pub use row_window::RowWindow;
pub use scrollbar::{Axis, ScrollbarThickness, ScrollbarVisibility};

//! Change reasons accumulated between frames.

use bitflags::bitflags;

bitflags! {
    /// Set of visual-state categories that are stale and must be reconciled
    /// on the next render pass.
    ///
    /// Combine with bitwise OR: `ChangeMask::CURSOR | ChangeMask::TEXT`.
    /// Scheduling a bit twice is the same as scheduling it once.
    ///
    /// # Bit values
    /// The numeric values are part of the contract (hosts may log or persist
    /// raw masks), so `CURSOR | TEXT` is always `33`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChangeMask: u16 {
        /// Cursor position or blink state changed.
        const CURSOR = 1;
        /// Both marker layers are stale.
        const MARKER = 2;
        /// Gutter decorations (annotations, breakpoints) changed.
        const GUTTER = 4;
        /// Vertical scroll position changed.
        const SCROLL = 8;
        /// A row span changed; see `ChangedLinesRange`.
        const LINES = 16;
        /// Every visible row of text is stale.
        const TEXT = 32;
        /// The viewport was resized.
        const SIZE = 64;
        /// Only the back (below-text) marker layer is stale.
        const MARKER_BACK = 128;
        /// Only the front (above-text) marker layer is stale.
        const MARKER_FRONT = 256;
        /// Everything is stale. Dominates every other bit.
        const FULL = 512;
        /// Horizontal scroll position or content width changed.
        const H_SCROLL = 1024;
    }
}

impl ChangeMask {
    /// Bits that invalidate the current `LayerConfig` and require a layout pass.
    pub const LAYOUT: Self = Self::FULL
        .union(Self::SIZE)
        .union(Self::TEXT)
        .union(Self::LINES)
        .union(Self::SCROLL)
        .union(Self::H_SCROLL);

    /// True if this mask requires the layout engine to recompute.
    pub fn needs_layout(self) -> bool {
        self.intersects(Self::LAYOUT)
    }

    /// True if the front marker layer must repaint.
    pub fn touches_front_markers(self) -> bool {
        self.intersects(Self::MARKER | Self::MARKER_FRONT)
    }

    /// True if the back marker layer must repaint.
    pub fn touches_back_markers(self) -> bool {
        self.intersects(Self::MARKER | Self::MARKER_BACK)
    }
}

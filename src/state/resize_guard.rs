//! Bounded reentrancy for resize handling.

/// Nested resize entries allowed beyond the outermost one.
pub const MAX_NESTED_RESIZES: u8 = 2;

/// Counts active resize handlers.
///
/// A `before_render` or `resize` listener can trigger another resize while
/// one is running. The guard lets that recursion go [`MAX_NESTED_RESIZES`]
/// levels deep and refuses anything past it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResizeGuard {
    depth: u8,
}

impl ResizeGuard {
    /// Try to enter a resize handler.
    ///
    /// # Returns
    /// `false` when the nesting bound is exceeded; the caller must return
    /// without doing any work and without calling [`ResizeGuard::exit`].
    pub fn enter(&mut self) -> bool {
        if self.depth > MAX_NESTED_RESIZES {
            return false;
        }
        self.depth += 1;
        true
    }

    /// Leave a resize handler entered with [`ResizeGuard::enter`].
    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Handlers currently on the stack.
    pub fn depth(&self) -> u8 {
        self.depth
    }
}

//! Document, screen and page coordinates.

/// Position in the document (row and column before folding or wrapping).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DocPosition {
    /// Document row, 0-indexed.
    pub row: usize,
    /// Column within the row, 0-indexed.
    pub column: usize,
}

impl DocPosition {
    /// Create a document position.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Position on screen after folding and wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ScreenPosition {
    /// Screen row, 0-indexed.
    pub row: usize,
    /// Screen column, 0-indexed.
    pub column: usize,
}

impl ScreenPosition {
    /// Create a screen position.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Which half of a character cell a pixel fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSide {
    /// Left half: the caret goes before the character.
    Before,
    /// Right half: the caret goes after the character.
    After,
}

/// Screen cell hit by a pixel, see `Renderer::pixel_to_screen_coordinates`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenHit {
    /// Screen row; negative when above the content.
    pub row: i64,
    /// Nearest column boundary.
    pub column: i64,
    /// Side of the boundary the pixel was on.
    pub side: CellSide,
}

/// Absolute page coordinates in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PagePoint {
    /// Horizontal page coordinate.
    pub x: f64,
    /// Vertical page coordinate.
    pub y: f64,
}

impl PagePoint {
    /// Create a page point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

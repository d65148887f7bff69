//! In-memory document with folds and soft wrap.
//!
//! Implements [`DocumentAdapter`] over a `Vec<String>`. Used by the
//! headless driver, the tests, and the benchmarks. Screen-row mapping goes
//! through a [`HeightIndex`], so row lookups stay logarithmic for large
//! documents.

use super::{DocumentAdapter, FoldSpan};
use crate::model::{ChangedLinesRange, DocPosition, RowBound, ScreenPosition};
use crate::view_state::height_index::HeightIndex;
use thiserror::Error;
use unicode_width::UnicodeWidthChar;

/// Columns a tab occupies.
pub const TAB_WIDTH: usize = 4;

/// Errors from fold manipulation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FoldError {
    /// A fold must hide at least one row.
    #[error("fold {start}:{end} hides no rows")]
    EmptyRange {
        /// Requested start row.
        start: usize,
        /// Requested end row.
        end: usize,
    },

    /// The fold reaches past the last row.
    #[error("fold end {end} is past the last row ({row_count} rows)")]
    OutOfBounds {
        /// Requested end row.
        end: usize,
        /// Rows in the document.
        row_count: usize,
    },

    /// The fold intersects an existing fold.
    #[error("fold {start}:{end} overlaps an existing fold")]
    Overlaps {
        /// Requested start row.
        start: usize,
        /// Requested end row.
        end: usize,
    },
}

/// How the document soft-wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// No wrapping.
    #[default]
    Off,
    /// Wrap at whatever fits in the scroller.
    Viewport,
    /// Wrap at the print margin when one is shown, else at the scroller.
    PrintMargin,
}

/// A plain-text document with folds, soft wrap, a cursor, and the session
/// scroll position.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    lines: Vec<String>,
    widths: Vec<usize>,
    /// Screen lines per row ignoring folds.
    wrapped_rows: Vec<usize>,
    /// Sorted, non-overlapping.
    folds: Vec<FoldSpan>,
    wrap_mode: WrapMode,
    wrap_limit: usize,
    index: HeightIndex,
    scroll_top: f64,
    scroll_left: f64,
    cursor: DocPosition,
}

impl MemoryDocument {
    /// Document from text. An empty string is a single empty row.
    pub fn new(text: &str) -> Self {
        Self::from_lines(text.split('\n').map(|line| line.trim_end_matches('\r')))
    }

    /// Document from individual rows.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        let mut doc = Self {
            widths: Vec::new(),
            wrapped_rows: Vec::new(),
            lines,
            folds: Vec::new(),
            wrap_mode: WrapMode::Off,
            wrap_limit: 0,
            index: HeightIndex::default(),
            scroll_top: 0.0,
            scroll_left: 0.0,
            cursor: DocPosition::default(),
        };
        doc.remeasure();
        doc
    }

    /// Text of one row.
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    /// Active folds, sorted by start row.
    pub fn folds(&self) -> &[FoldSpan] {
        &self.folds
    }

    /// Current wrap mode.
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    /// Effective wrap limit in columns; zero until the renderer adjusts it.
    pub fn wrap_limit(&self) -> usize {
        self.wrap_limit
    }

    /// Switch wrapping on or off.
    pub fn set_wrap_mode(&mut self, mode: WrapMode) {
        if self.wrap_mode != mode {
            self.wrap_mode = mode;
            self.rewrap();
        }
    }

    /// Move the cursor, clamped to the document.
    pub fn set_cursor(&mut self, position: DocPosition) {
        let row = position.row.min(self.last_row());
        let column = position.column.min(self.char_count(row));
        self.cursor = DocPosition::new(row, column);
    }

    /// Collapse rows `start..=end` into row `start`.
    ///
    /// # Errors
    ///
    /// Fails if the range is empty, past the end, or touches another fold.
    pub fn add_fold(&mut self, start: usize, end: usize) -> Result<FoldSpan, FoldError> {
        if end <= start {
            return Err(FoldError::EmptyRange { start, end });
        }
        if end >= self.lines.len() {
            return Err(FoldError::OutOfBounds {
                end,
                row_count: self.lines.len(),
            });
        }
        let fold = FoldSpan {
            start_row: start,
            end_row: end,
        };
        if self
            .folds
            .iter()
            .any(|f| f.start_row <= end && start <= f.end_row)
        {
            return Err(FoldError::Overlaps { start, end });
        }
        let at = self.folds.partition_point(|f| f.start_row < start);
        self.folds.insert(at, fold);
        self.rebuild_index();
        Ok(fold)
    }

    /// Expand the fold starting at `start`.
    pub fn remove_fold(&mut self, start: usize) -> Option<FoldSpan> {
        let at = self.folds.iter().position(|f| f.start_row == start)?;
        let fold = self.folds.remove(at);
        self.rebuild_index();
        Some(fold)
    }

    /// Replace the text of one row.
    ///
    /// Returns the rows to repaint, or `None` for a row past the end.
    pub fn set_line(&mut self, row: usize, text: &str) -> Option<ChangedLinesRange> {
        let line = self.lines.get_mut(row)?;
        *line = text.to_string();
        self.widths[row] = display_width(text);
        self.wrapped_rows[row] = self.rows_for_width(self.widths[row]);
        self.rebuild_index();
        Some(ChangedLinesRange::new(row, RowBound::Row(row)))
    }

    /// Insert rows before `at` (clamped to the end).
    ///
    /// Every row from `at` down moves, so the returned range is unbounded.
    /// Folds below the insertion point move with their rows; a fold the
    /// insertion lands inside is expanded.
    pub fn insert_lines<I, S>(&mut self, at: usize, lines: I) -> ChangedLinesRange
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let at = at.min(self.lines.len());
        let new: Vec<String> = lines.into_iter().map(Into::into).collect();
        let count = new.len();
        self.lines.splice(at..at, new);

        self.folds.retain(|f| !(f.start_row < at && at <= f.end_row));
        for fold in self.folds.iter_mut().filter(|f| f.start_row >= at) {
            fold.start_row += count;
            fold.end_row += count;
        }

        self.remeasure();
        ChangedLinesRange::new(at, RowBound::End)
    }

    /// Delete rows `first..=last`. The document keeps at least one row.
    pub fn remove_lines(&mut self, first: usize, last: usize) -> ChangedLinesRange {
        let last = last.min(self.last_row());
        if first > last {
            return ChangedLinesRange::new(first, RowBound::End);
        }
        let count = last - first + 1;
        self.lines.drain(first..=last);
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }

        self.folds
            .retain(|f| f.end_row < first || f.start_row > last);
        for fold in self.folds.iter_mut().filter(|f| f.start_row > last) {
            fold.start_row -= count;
            fold.end_row -= count;
        }

        self.cursor = DocPosition::new(
            self.cursor.row.min(self.last_row()),
            self.cursor.column,
        );
        self.remeasure();
        ChangedLinesRange::new(first, RowBound::End)
    }

    fn last_row(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn char_count(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |line| line.chars().count())
    }

    fn wraps(&self) -> bool {
        self.wrap_mode != WrapMode::Off && self.wrap_limit > 0
    }

    fn rows_for_width(&self, width: usize) -> usize {
        if self.wraps() {
            width.div_ceil(self.wrap_limit).max(1)
        } else {
            1
        }
    }

    fn remeasure(&mut self) {
        self.widths = self.lines.iter().map(|line| display_width(line)).collect();
        self.rewrap();
    }

    fn rewrap(&mut self) {
        self.wrapped_rows = self
            .widths
            .iter()
            .map(|&width| self.rows_for_width(width))
            .collect();
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        let folds = &self.folds;
        let heights = self.wrapped_rows.iter().enumerate().map(|(row, &rows)| {
            let hidden = folds
                .iter()
                .any(|f| f.start_row < row && row <= f.end_row);
            if hidden {
                0
            } else {
                rows
            }
        });
        self.index.rebuild(heights);
    }

    /// Display width of the first `chars` characters of `row`.
    fn prefix_width(&self, row: usize, chars: usize) -> usize {
        self.lines
            .get(row)
            .map_or(0, |line| line.chars().take(chars).map(char_width).sum())
    }

    /// Character index whose prefix width first reaches `target` columns.
    fn column_at_width(&self, row: usize, target: usize) -> usize {
        let Some(line) = self.lines.get(row) else {
            return 0;
        };
        let mut width = 0;
        for (i, c) in line.chars().enumerate() {
            let next = width + char_width(c);
            if next > target {
                // Snap to the nearer edge of a wide character.
                return if target - width > (next - width) / 2 { i + 1 } else { i };
            }
            width = next;
        }
        line.chars().count()
    }
}

impl DocumentAdapter for MemoryDocument {
    fn screen_to_document_row(&self, screen_row: usize) -> usize {
        self.index
            .lower_bound(screen_row)
            .unwrap_or_else(|| self.last_row())
    }

    fn document_to_screen_row(&self, row: usize) -> usize {
        let row = row.min(self.last_row());
        let row = self.fold_at(row).map_or(row, |fold| fold.start_row);
        self.index.start_of(row)
    }

    fn fold_at(&self, row: usize) -> Option<FoldSpan> {
        self.folds.iter().find(|fold| fold.contains(row)).copied()
    }

    fn rendered_row_height(&self, row: usize) -> usize {
        self.wrapped_rows.get(row).copied().unwrap_or(1)
    }

    fn row_count(&self) -> usize {
        self.lines.len()
    }

    fn screen_length(&self) -> usize {
        self.index.total()
    }

    fn longest_line_columns(&self) -> usize {
        if self.wraps() {
            self.wrap_limit
        } else {
            self.widths.iter().copied().max().unwrap_or(0)
        }
    }

    fn uses_wrap_mode(&self) -> bool {
        self.wrap_mode != WrapMode::Off
    }

    fn adjust_wrap_limit(&mut self, limit: usize, print_margin: Option<u32>) -> bool {
        let limit = match (self.wrap_mode, print_margin) {
            (WrapMode::PrintMargin, Some(column)) => column as usize,
            _ => limit,
        };
        if limit == self.wrap_limit || limit <= 1 {
            return false;
        }
        self.wrap_limit = limit;
        if self.uses_wrap_mode() {
            self.rewrap();
        }
        true
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, top: f64) {
        if top.is_finite() {
            self.scroll_top = top;
        }
    }

    fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    fn set_scroll_left(&mut self, left: f64) {
        if left.is_finite() {
            self.scroll_left = left;
        }
    }

    fn cursor(&self) -> DocPosition {
        self.cursor
    }

    fn document_to_screen_position(&self, position: DocPosition) -> ScreenPosition {
        let row = position.row.min(self.last_row());
        if let Some(fold) = self.fold_at(row).filter(|fold| fold.start_row != row) {
            // Hidden rows collapse onto the end of the fold's first row.
            let start = fold.start_row;
            let width = self.widths[start];
            return self.split_wrapped(start, width);
        }
        let width = self.prefix_width(row, position.column);
        self.split_wrapped(row, width)
    }

    fn screen_to_document_position(&self, screen_row: usize, screen_column: usize) -> DocPosition {
        let row = self.screen_to_document_row(screen_row);
        let sub_row = screen_row
            .saturating_sub(self.index.start_of(row))
            .min(self.rendered_row_height(row).saturating_sub(1));
        let target = if self.wraps() {
            sub_row * self.wrap_limit + screen_column
        } else {
            screen_column
        };
        DocPosition::new(row, self.column_at_width(row, target))
    }
}

impl MemoryDocument {
    fn split_wrapped(&self, row: usize, width: usize) -> ScreenPosition {
        let start = self.index.start_of(row);
        if !self.wraps() {
            return ScreenPosition::new(start, width);
        }
        let sub_row = (width / self.wrap_limit).min(self.rendered_row_height(row) - 1);
        ScreenPosition::new(start + sub_row, width - sub_row * self.wrap_limit)
    }
}

fn char_width(c: char) -> usize {
    if c == '\t' {
        TAB_WIDTH
    } else {
        c.width().unwrap_or(0)
    }
}

fn display_width(line: &str) -> usize {
    line.chars().map(char_width).sum()
}

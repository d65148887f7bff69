//! Dirty row span accumulated between text repaints.

/// Upper end of a changed row span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RowBound {
    /// A concrete inclusive row.
    Row(usize),
    /// Unknown extent: everything from the first row to the end of the document.
    End,
}

impl RowBound {
    /// True if this bound is strictly before `row`.
    pub fn is_before(self, row: usize) -> bool {
        match self {
            RowBound::Row(last) => last < row,
            RowBound::End => false,
        }
    }
}

impl From<Option<usize>> for RowBound {
    fn from(value: Option<usize>) -> Self {
        value.map_or(RowBound::End, RowBound::Row)
    }
}

/// Minimal span of document rows touched since the text and gutter layers
/// last painted.
///
/// Distinct from `ChangeMask::LINES`: the mask says *that* rows changed,
/// this says *which*. Consumed (cleared) by the next `LINES` dispatch.
///
/// # Invariants
/// - `first_row <= last_row` whenever `last_row` is a concrete row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedLinesRange {
    /// First changed row (inclusive).
    pub first_row: usize,
    /// Last changed row (inclusive), or `End` when unbounded.
    pub last_row: RowBound,
}

impl ChangedLinesRange {
    /// Create a span. A concrete `last_row` below `first_row` is raised to it.
    pub fn new(first_row: usize, last_row: RowBound) -> Self {
        let last_row = match last_row {
            RowBound::Row(last) => RowBound::Row(last.max(first_row)),
            RowBound::End => RowBound::End,
        };
        Self {
            first_row,
            last_row,
        }
    }

    /// Grow to the smallest span covering both `self` and `other`.
    pub fn merge(self, other: Self) -> Self {
        Self {
            first_row: self.first_row.min(other.first_row),
            last_row: self.last_row.max(other.last_row),
        }
    }

    /// True if the span has no concrete end.
    pub fn is_unbounded(&self) -> bool {
        self.last_row == RowBound::End
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_takes_min_first_and_max_last() {
        let a = ChangedLinesRange::new(10, RowBound::Row(12));
        let b = ChangedLinesRange::new(4, RowBound::Row(8));
        let merged = a.merge(b);
        assert_eq!(merged.first_row, 4);
        assert_eq!(merged.last_row, RowBound::Row(12));
    }

    #[test]
    fn test_merge_with_unbounded_is_unbounded() {
        let a = ChangedLinesRange::new(10, RowBound::Row(12));
        let b = ChangedLinesRange::new(20, RowBound::End);
        let merged = a.merge(b);
        assert_eq!(merged.first_row, 10);
        assert!(merged.is_unbounded());
    }

    #[test]
    fn test_new_raises_inverted_last_row() {
        let span = ChangedLinesRange::new(7, RowBound::Row(3));
        assert_eq!(span.last_row, RowBound::Row(7));
    }

    #[test]
    fn test_end_bound_is_never_before_a_row() {
        assert!(!RowBound::End.is_before(usize::MAX));
        assert!(RowBound::Row(3).is_before(4));
        assert!(!RowBound::Row(4).is_before(4));
    }

    #[test]
    fn test_option_converts_to_bound() {
        assert_eq!(RowBound::from(None), RowBound::End);
        assert_eq!(RowBound::from(Some(9)), RowBound::Row(9));
    }
}

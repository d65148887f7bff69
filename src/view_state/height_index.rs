//! HeightIndex - screen rows per document row, backed by a Fenwick tree
//!
//! Answers the two questions fold/wrap mapping asks on every layout pass:
//! "on which screen row does document row `r` start?" (prefix sum) and
//! "which document row covers screen row `s`?" (lower bound).
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: O(log n) amortized
//! - `rebuild`: O(n log n)
//! - `len`: O(1)

/// Cumulative screen-row heights of document rows.
///
/// A height of zero marks a row hidden inside a fold; a height above one
/// marks a soft-wrapped row.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (1-indexed internally, 0-indexed API)
    tree: Vec<isize>,
    /// Number of valid entries (len <= tree.len())
    len: usize,
}

impl HeightIndex {
    /// Creates an empty index with room for `capacity` rows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vrender::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            len: 0,
        }
    }

    /// Builds an index from per-row heights.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vrender::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([1, 3, 0, 1]);
    /// assert_eq!(index.total(), 5);
    /// assert_eq!(index.start_of(2), 4);
    /// ```
    pub fn from_heights(heights: impl IntoIterator<Item = usize>) -> Self {
        let mut index = Self::default();
        index.rebuild(heights);
        index
    }

    /// Replaces every entry, keeping the allocation when it is large enough.
    pub fn rebuild(&mut self, heights: impl IntoIterator<Item = usize>) {
        let heights: Vec<usize> = heights.into_iter().collect();
        let capacity = self.tree.len().max(heights.len());
        self.refill(capacity, &heights);
    }

    /// Zeroes the tree at `capacity` slots and inserts `heights` from row 0.
    ///
    /// Every Fenwick node covering a row must see that row's update, so the
    /// tree is sized before anything is inserted.
    fn refill(&mut self, capacity: usize, heights: &[usize]) {
        self.tree.clear();
        self.tree.resize(capacity, 0);
        self.len = heights.len();
        for (row, &height) in heights.iter().enumerate() {
            if height != 0 {
                fenwick::array::update(&mut self.tree, row, height as isize);
            }
        }
    }

    /// Sets the height of row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, height: usize) {
        let delta = height as isize - self.height(index) as isize;
        if delta != 0 {
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Height of a single row.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn height(&self, index: usize) -> usize {
        if index == 0 {
            self.prefix_sum(0)
        } else {
            self.prefix_sum(index) - self.prefix_sum(index - 1)
        }
    }

    /// Cumulative height of rows `0..=index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vrender::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([3, 4, 5]);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len,
            "index {} out of bounds (len: {})",
            index,
            self.len
        );

        let sum = fenwick::array::prefix_sum(&self.tree, index);
        sum.max(0) as usize
    }

    /// Screen row on which row `index` starts, i.e. the sum of all rows before it.
    ///
    /// Returns `total()` for `index >= len()`.
    pub fn start_of(&self, index: usize) -> usize {
        match index {
            0 => 0,
            i if i >= self.len => self.total(),
            i => self.prefix_sum(i - 1),
        }
    }

    /// First row whose cumulative height exceeds `value`.
    ///
    /// This is the row covering screen row `value`; hidden rows are never
    /// returned because they do not raise the cumulative height.
    ///
    /// # Returns
    ///
    /// - `Some(index)` if there exists an index where `prefix_sum(index) > value`
    /// - `None` if `value >= total()` or the index is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use vrender::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([1, 0, 0, 2, 1]);
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(1), Some(3));
    /// assert_eq!(index.lower_bound(2), Some(3));
    /// assert_eq!(index.lower_bound(3), Some(4));
    /// assert_eq!(index.lower_bound(4), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        // Row i covers screen rows [prefix_sum(i-1), prefix_sum(i))
        let mut left = 0;
        let mut right = self.len;

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len).then_some(left)
    }

    /// Total height of all rows.
    pub fn total(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.prefix_sum(self.len - 1)
        }
    }

    /// Number of rows in the index.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the index contains no rows.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends a row with the given height.
    pub fn push(&mut self, height: usize) {
        if self.len >= self.tree.len() {
            // Nodes added by growth cover earlier rows, so re-seed them.
            let heights: Vec<usize> = (0..self.len).map(|row| self.height(row)).collect();
            self.refill(self.tree.len().max(1) * 2, &heights);
        }

        let idx = self.len;
        self.len += 1;

        // Use the full tree so the update propagates to later slots.
        fenwick::array::update(&mut self.tree, idx, height as isize);
    }

    /// Removes every row, retaining capacity.
    pub fn clear(&mut self) {
        self.tree.iter_mut().for_each(|slot| *slot = 0);
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_index() {
        let index = HeightIndex::new(10);
        assert_eq!(index.len(), 0);
        assert_eq!(index.total(), 0);
        assert_eq!(index.lower_bound(0), None);
        assert_eq!(index.start_of(0), 0);
    }

    #[test]
    fn test_set_updates_height() {
        let mut index = HeightIndex::from_heights([3, 4, 5]);

        index.set(1, 10);

        assert_eq!(index.prefix_sum(0), 3);
        assert_eq!(index.prefix_sum(1), 13);
        assert_eq!(index.total(), 18);
        assert_eq!(index.height(1), 10);
    }

    #[test]
    fn test_hidden_rows_share_the_start_of_the_next_visible_row() {
        // Row 1..=3 folded into row 0.
        let index = HeightIndex::from_heights([1, 0, 0, 0, 1]);
        assert_eq!(index.start_of(1), 1);
        assert_eq!(index.start_of(4), 1);
        assert_eq!(index.lower_bound(1), Some(4));
    }

    #[test]
    fn test_start_of_past_end_is_total() {
        let index = HeightIndex::from_heights([2, 2]);
        assert_eq!(index.start_of(2), 4);
        assert_eq!(index.start_of(50), 4);
    }

    #[test]
    fn test_rebuild_and_clear_reuse_storage() {
        let mut index = HeightIndex::from_heights([5, 3, 7]);
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.total(), 0);

        index.rebuild([1, 1]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.total(), 2);
        assert_eq!(index.prefix_sum(0), 1);
    }

    #[test]
    fn test_rebuild_after_shrinking_leaves_no_stale_sums() {
        let mut index = HeightIndex::from_heights([9, 9, 9, 9, 9, 9, 9, 9]);
        index.rebuild([1, 2]);
        assert_eq!(index.total(), 3);
        index.push(4);
        assert_eq!(index.total(), 7);
    }

    #[test]
    fn test_from_heights_past_initial_capacity() {
        let index = HeightIndex::from_heights(std::iter::repeat(1).take(100));
        assert_eq!(index.total(), 100);
        assert_eq!(index.start_of(50), 50);
        assert_eq!(index.lower_bound(50), Some(50));
        assert_eq!(index.lower_bound(99), Some(99));
    }

    #[test]
    fn test_push_growth_keeps_earlier_rows() {
        let mut index = HeightIndex::new(0);
        for height in [2, 1, 3, 1, 1, 4, 2] {
            index.push(height);
        }
        assert_eq!(index.len(), 7);
        assert_eq!(index.total(), 14);
        assert_eq!(index.prefix_sum(3), 7);
        assert_eq!(index.height(5), 4);
        assert_eq!(index.lower_bound(7), Some(4));
    }

    #[test]
    fn test_growing_rebuild_after_clear() {
        let mut index = HeightIndex::from_heights([1, 1]);
        index.rebuild(std::iter::repeat(2).take(33));
        assert_eq!(index.total(), 66);
        assert_eq!(index.start_of(17), 34);
    }

    proptest! {
        #[test]
        fn prop_push_matches_from_heights(heights in prop::collection::vec(0usize..=4, 0..80)) {
            let mut pushed = HeightIndex::default();
            for &h in &heights {
                pushed.push(h);
            }
            let built = HeightIndex::from_heights(heights.iter().copied());
            prop_assert_eq!(pushed.total(), heights.iter().sum::<usize>());
            for i in 0..heights.len() {
                prop_assert_eq!(pushed.prefix_sum(i), built.prefix_sum(i));
            }
        }

        #[test]
        fn prop_prefix_sum_is_cumulative(heights in prop::collection::vec(0usize..=4, 1..60)) {
            let index = HeightIndex::from_heights(heights.iter().copied());

            let mut expected = 0;
            for (i, &h) in heights.iter().enumerate() {
                expected += h;
                prop_assert_eq!(index.prefix_sum(i), expected);
            }
        }

        #[test]
        fn prop_lower_bound_finds_the_covering_row(heights in prop::collection::vec(0usize..=4, 1..60)) {
            let index = HeightIndex::from_heights(heights.iter().copied());

            for screen_row in 0..index.total() {
                let row = index.lower_bound(screen_row);
                prop_assert!(row.is_some());
                let row = row.unwrap_or_default();
                prop_assert!(index.height(row) > 0);
                prop_assert!(index.start_of(row) <= screen_row);
                prop_assert!(screen_row < index.start_of(row) + index.height(row));
            }
            prop_assert_eq!(index.lower_bound(index.total()), None);
        }

        #[test]
        fn prop_set_then_height_round_trips(
            heights in prop::collection::vec(0usize..=4, 1..50),
            slot in 0usize..50,
            new_height in 0usize..=6
        ) {
            let mut index = HeightIndex::from_heights(heights.iter().copied());
            if slot < index.len() {
                index.set(slot, new_height);
                prop_assert_eq!(index.height(slot), new_height);
            }
        }
    }
}

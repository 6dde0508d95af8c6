//! Greedy line breaking for flowable containers.
//!
//! Children are packed left to right until the running width would exceed
//! the available width, then a new row starts at the child that did not
//! fit. The partition is recomputed from scratch on every reflow; it is
//! O(n) in the number of children and has no incremental state.

use std::ops::Range;

/// Partition children of the given natural widths into rows.
///
/// Each row is a half-open index range. A child wider than `available`
/// still gets a row of its own; children are never split.
pub fn break_lines(widths: impl IntoIterator<Item = f32>, available: f32) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    let mut first = 0;
    let mut cursor_x = 0.0f32;
    let mut count = 0;

    for (ix, width) in widths.into_iter().enumerate() {
        cursor_x += width;
        if cursor_x > available && ix > first {
            rows.push(first..ix);
            first = ix;
            cursor_x = width;
        }
        count = ix + 1;
    }

    if first < count {
        rows.push(first..count);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_break_lines_greedy() {
        // 50+60 fits in 120, 70 does not; 70+40 = 110 fits on the next row.
        let rows = break_lines([50.0, 60.0, 70.0, 40.0], 120.0);
        assert_eq!(rows, vec![0..2, 2..4]);
    }

    #[test]
    fn test_break_lines_is_deterministic() {
        let widths = [30.0, 80.0, 45.0, 45.0, 100.0, 10.0];
        let first = break_lines(widths, 120.0);
        let second = break_lines(widths, 120.0);
        assert_eq!(first, second);
        assert_eq!(first, vec![0..2, 2..4, 4..6]);
    }

    #[test]
    fn test_break_lines_oversized_child_gets_own_row() {
        let rows = break_lines([200.0, 20.0, 300.0], 100.0);
        assert_eq!(rows, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_break_lines_exact_fit_stays_on_row() {
        let rows = break_lines([60.0, 60.0], 120.0);
        assert_eq!(rows, vec![0..2]);
    }

    #[test]
    fn test_break_lines_empty() {
        assert!(break_lines(std::iter::empty(), 120.0).is_empty());
    }
}

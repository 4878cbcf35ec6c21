//! Line enumeration for an n x n board
//!
//! A [`Line`] describes one straight run of cells (a row, a column, or a
//! diagonal of either family at any offset) without storing the cells
//! themselves. Win detection and the line-density heuristic both walk these
//! descriptors, so enumeration allocates nothing.

/// A straight line of cells on the board: origin, step and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    origin: (usize, usize),
    step: (isize, isize),
    len: usize,
}

impl Line {
    pub const fn new(origin: (usize, usize), step: (isize, isize), len: usize) -> Self {
        Line { origin, step, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate the (row, col) coordinates along the line.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (r0, c0) = (self.origin.0 as isize, self.origin.1 as isize);
        let (dr, dc) = self.step;
        (0..self.len as isize).map(move |k| ((r0 + k * dr) as usize, (c0 + k * dc) as usize))
    }

    /// All n rows, top to bottom.
    pub fn rows(n: usize) -> impl Iterator<Item = Line> {
        (0..n).map(move |r| Line::new((r, 0), (0, 1), n))
    }

    /// All n columns, left to right.
    pub fn columns(n: usize) -> impl Iterator<Item = Line> {
        (0..n).map(move |c| Line::new((0, c), (1, 0), n))
    }

    /// Every diagonal of both families, at every offset.
    ///
    /// Down-right ("\\") diagonals come first, starting from column 0 of each
    /// row and then from row 0 of each remaining column; down-left ("/")
    /// diagonals follow in the same pattern. Lines shorter than the win
    /// length are included: they cannot hold a winning run but they do count
    /// toward the line-density heuristic.
    pub fn diagonals(n: usize) -> impl Iterator<Item = Line> {
        let down_right = (0..n)
            .map(move |r| Line::new((r, 0), (1, 1), n - r))
            .chain((1..n).map(move |c| Line::new((0, c), (1, 1), n - c)));
        let down_left = (0..n)
            .map(move |c| Line::new((0, c), (1, -1), c + 1))
            .chain((1..n).map(move |r| Line::new((r, n - 1), (1, -1), n - r)));
        down_right.chain(down_left)
    }

    /// Every line on the board in win-scan order: rows, then columns, then
    /// diagonals.
    pub fn all(n: usize) -> impl Iterator<Item = Line> {
        Line::rows(n).chain(Line::columns(n)).chain(Line::diagonals(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_and_column_counts() {
        assert_eq!(Line::rows(4).count(), 4);
        assert_eq!(Line::columns(4).count(), 4);
        assert!(Line::rows(4).all(|line| line.len() == 4));
        assert!(Line::columns(4).all(|line| line.len() == 4));
    }

    #[test]
    fn test_diagonal_count() {
        // 2n - 1 diagonals per family
        assert_eq!(Line::diagonals(3).count(), 2 * 5);
        assert_eq!(Line::diagonals(5).count(), 2 * 9);
    }

    #[test]
    fn test_diagonal_cells_in_bounds() {
        let n = 5;
        for line in Line::diagonals(n) {
            for (row, col) in line.cells() {
                assert!(row < n && col < n, "({row}, {col}) out of bounds");
            }
        }
    }

    #[test]
    fn test_every_cell_lies_on_one_diagonal_per_family() {
        let n = 4;
        let mut down_right = vec![0usize; n * n];
        let mut down_left = vec![0usize; n * n];
        for line in Line::diagonals(n) {
            let family = match line.step {
                (1, 1) => &mut down_right,
                (1, -1) => &mut down_left,
                step => panic!("unexpected diagonal step {step:?}"),
            };
            for (row, col) in line.cells() {
                family[row * n + col] += 1;
            }
        }
        for idx in 0..n * n {
            assert_eq!(down_right[idx], 1, "cell {idx} down-right coverage");
            assert_eq!(down_left[idx], 1, "cell {idx} down-left coverage");
        }
    }

    #[test]
    fn test_all_scan_order() {
        let lines: Vec<Line> = Line::all(3).collect();
        // rows first
        assert_eq!(lines[0], Line::new((0, 0), (0, 1), 3));
        assert_eq!(lines[2], Line::new((2, 0), (0, 1), 3));
        // then columns
        assert_eq!(lines[3], Line::new((0, 0), (1, 0), 3));
        // then diagonals
        assert_eq!(lines[6], Line::new((0, 0), (1, 1), 3));
    }
}

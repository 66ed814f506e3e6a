//! Row buffers and the changing-element search.
//!
//! `a0` is the position of the next pixel to decide. It starts each row at
//! -1, an imaginary white pixel left of column 0, which the 2-D coding needs
//! to tell apart from column 0 itself.

use retrodec_core::output::Output;

/// Pixel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// White (0 in the packed output).
    #[default]
    White,
    /// Black (1 in the packed output).
    Black,
}

impl Color {
    /// The other color.
    pub fn flip(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }
}

/// Find `b1`: the first changing element of `prev_row` right of `a0` whose
/// color is opposite to `a0_color`. Returns the row width if there is none.
///
/// Column 0 counts as a changing element only if it is black.
pub fn find_b1(prev_row: &[Color], a0: i64, a0_color: Color) -> usize {
    let start = usize::try_from(a0 + 1).unwrap_or(0);
    (start..prev_row.len())
        .find(|&i| {
            prev_row[i] != a0_color
                && if i == 0 {
                    prev_row[0] == Color::Black
                } else {
                    prev_row[i - 1] != prev_row[i]
                }
        })
        .unwrap_or(prev_row.len())
}

/// Find `b2`: the next changing element of `prev_row` after `b1`. Returns
/// the row width if there is none.
pub fn find_b2(prev_row: &[Color], b1: usize) -> usize {
    (b1 + 1..prev_row.len())
        .find(|&i| prev_row[i - 1] != prev_row[i])
        .unwrap_or(prev_row.len())
}

/// Decoding state of the current and previous rows.
#[derive(Debug)]
pub(crate) struct RowState {
    curr: Vec<Color>,
    prev: Vec<Color>,
    packed: Vec<u8>,
    keep_prev: bool,
    height: usize,
    /// Next pixel position to decide, -1 at the start of a row.
    pub a0: i64,
    /// Color of the run starting at `a0`.
    pub a0_color: Color,
    /// Rows written so far.
    pub ypos: usize,
}

impl RowState {
    pub fn new(width: usize, height: usize, keep_prev: bool) -> Self {
        Self {
            curr: vec![Color::White; width],
            prev: vec![Color::White; width],
            packed: vec![0; width.div_ceil(8)],
            keep_prev,
            height,
            a0: -1,
            a0_color: Color::White,
            ypos: 0,
        }
    }

    fn width(&self) -> i64 {
        self.curr.len() as i64
    }

    /// Whether `a0` has reached the right edge.
    pub fn at_row_end(&self) -> bool {
        self.a0 >= self.width()
    }

    /// Whether the last row has been fully decoded.
    pub fn is_complete(&self) -> bool {
        self.ypos >= self.height || (self.ypos + 1 == self.height && self.at_row_end())
    }

    /// Paint `run_len` pixels of `color` from `a0` (or from 0 if `a0` is -1),
    /// clipped at the row end.
    pub fn record_run(&mut self, color: Color, run_len: i64) {
        if self.a0 < 0 {
            self.a0 = 0;
        }
        let end = self.a0.saturating_add(run_len.max(0)).min(self.width());
        if end > self.a0 {
            self.curr[self.a0 as usize..end as usize].fill(color);
            self.a0 = end;
        }
    }

    /// Paint up to `a1 = a0 + run_len` in the current color, where an `a0`
    /// of -1 contributes the imaginary pixel to the run.
    pub fn record_run_using_a0(&mut self, run_len: i64) {
        let mut run_len = run_len;
        if self.a0 < 0 {
            run_len += self.a0;
            self.a0 = 0;
        }
        self.record_run(self.a0_color, run_len);
    }

    pub fn b1(&self) -> usize {
        find_b1(&self.prev, self.a0, self.a0_color)
    }

    pub fn b1_b2(&self) -> (usize, usize) {
        let b1 = self.b1();
        (b1, find_b2(&self.prev, b1))
    }

    /// Finish the current row: pack and write it (unless the image is
    /// already complete), remember it for 2-D coding and start a new one.
    pub fn end_row(&mut self, out: &mut Output<'_>) {
        if self.ypos < self.height {
            self.packed.fill(0);
            for (i, &pixel) in self.curr.iter().enumerate() {
                if pixel == Color::Black {
                    self.packed[i / 8] |= 0x80 >> (i % 8);
                }
            }
            out.write(&self.packed);

            if self.keep_prev {
                self.prev.copy_from_slice(&self.curr);
            }
            self.curr.fill(Color::White);
            self.ypos += 1;
        }
        self.a0 = -1;
        self.a0_color = Color::White;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Color::{Black as B, White as W};

    #[test]
    fn test_changing_elements() {
        let prev = [W, W, B, B, W];
        let b1 = find_b1(&prev, -1, W);
        assert_eq!(b1, 2);
        assert_eq!(find_b2(&prev, b1), 4);

        // from a black a0 the next black-to-white change
        assert_eq!(find_b1(&prev, 2, B), 4);
        assert_eq!(find_b2(&prev, 4), 5);
    }

    #[test]
    fn test_b1_at_column_zero() {
        assert_eq!(find_b1(&[B, B, W], -1, W), 0);
        assert_eq!(find_b1(&[W, W, W], -1, W), 3);
        // a0 = 0 skips column 0 even if it is a change
        assert_eq!(find_b1(&[B, W, B], 0, W), 2);
    }

    #[test]
    fn test_record_runs() {
        let mut state = RowState::new(10, 2, true);
        state.record_run_using_a0(3);
        assert_eq!(state.a0, 2);
        state.a0_color = B;
        state.record_run(B, 4);
        assert_eq!(state.a0, 6);
        state.record_run(W, 100);
        assert!(state.at_row_end());
        state.record_run(B, -5);
        assert_eq!(state.a0, 10);

        let mut buf = Vec::new();
        state.end_row(&mut Output::new(&mut buf));
        assert_eq!(buf, [0b0011_1100, 0b0000_0000]);
        assert_eq!(state.prev[2..6], [B, B, B, B]);
        assert_eq!(state.a0, -1);
        assert_eq!(state.ypos, 1);
    }

    #[test]
    fn test_no_rows_beyond_height() {
        let mut state = RowState::new(4, 1, false);
        let mut buf = Vec::new();
        let mut out = Output::new(&mut buf);
        state.end_row(&mut out);
        state.end_row(&mut out);
        assert_eq!(out.len(), 1);
        assert!(state.is_complete());
    }
}

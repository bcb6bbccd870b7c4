//! Score and source storage for the fill sweep.
//!
//! Rows walk the first sequence, columns the second. Cells are filled
//! row-major and every storage hands back the three predecessors of the cell
//! about to be written.

use std::mem;

use super::source::SourceDirection;
use crate::error::{BioError, BioResult};

/// Stands in for unreachable states; far enough from `i32::MIN` that adding
/// a bounded number of costs can't wrap.
pub const NEG_INF: i32 = i32::MIN / 4;

/// Scores of one cell. Linear fills only use `best`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellScores {
    pub best: i32,
    pub m: i32,
    pub ix: i32,
    pub iy: i32,
}

impl CellScores {
    pub const UNREACHABLE: CellScores = CellScores {
        best: NEG_INF,
        m: NEG_INF,
        ix: NEG_INF,
        iy: NEG_INF,
    };

    #[inline]
    pub fn linear(best: i32) -> Self {
        CellScores {
            best,
            ..Self::UNREACHABLE
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Neighbors {
    pub diag: CellScores,
    pub up: CellScores,
    pub left: CellScores,
}

/// A cell position. `cell` is the row-major linear index `row * cols + col`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OptScoreCell {
    pub row: usize,
    pub col: usize,
    pub cell: usize,
}

impl OptScoreCell {
    #[inline]
    pub fn new(row: usize, col: usize, cols: usize) -> Self {
        OptScoreCell {
            row,
            col,
            cell: row * cols + col,
        }
    }
}

pub trait MatrixStorage: Sized {
    fn new(rows: usize, cols: usize) -> BioResult<Self>;

    /// Predecessors of `at`. Only valid for `row >= 1 && col >= 1`, after
    /// every cell before `at` in row-major order has been written.
    fn neighbors(&self, at: OptScoreCell) -> Neighbors;

    /// Writes `at`. Cells must arrive in row-major order.
    fn set(&mut self, at: OptScoreCell, scores: CellScores, trace: u8);

    fn trace(&self, at: OptScoreCell) -> u8;

    /// Position reached by moving from `at` against `dir`.
    fn step(&self, at: OptScoreCell, dir: SourceDirection) -> OptScoreCell;
}

fn checked_cells(rows: usize, cols: usize, bytes_per_cell: usize) -> BioResult<usize> {
    rows.checked_mul(cols)
        .filter(|&cells| {
            cells
                .checked_mul(bytes_per_cell)
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(BioError::MatrixTooLarge { rows, cols })
}

/// Full `rows x cols` score and source grids, addressed by `(row, col)`.
pub struct DenseMatrix {
    scores: Vec<Vec<CellScores>>,
    traces: Vec<Vec<u8>>,
    cols: usize,
}

impl MatrixStorage for DenseMatrix {
    fn new(rows: usize, cols: usize) -> BioResult<Self> {
        checked_cells(rows, cols, mem::size_of::<CellScores>() + 1)?;
        Ok(DenseMatrix {
            scores: vec![vec![CellScores::UNREACHABLE; cols]; rows],
            traces: vec![vec![0u8; cols]; rows],
            cols,
        })
    }

    #[inline]
    fn neighbors(&self, at: OptScoreCell) -> Neighbors {
        let prev = &self.scores[at.row - 1];
        Neighbors {
            diag: prev[at.col - 1],
            up: prev[at.col],
            left: self.scores[at.row][at.col - 1],
        }
    }

    #[inline]
    fn set(&mut self, at: OptScoreCell, scores: CellScores, trace: u8) {
        self.scores[at.row][at.col] = scores;
        self.traces[at.row][at.col] = trace;
    }

    #[inline]
    fn trace(&self, at: OptScoreCell) -> u8 {
        self.traces[at.row][at.col]
    }

    fn step(&self, at: OptScoreCell, dir: SourceDirection) -> OptScoreCell {
        let (row, col) = match dir {
            SourceDirection::Diagonal => (at.row - 1, at.col - 1),
            SourceDirection::Up => (at.row - 1, at.col),
            SourceDirection::Left => (at.row, at.col - 1),
            SourceDirection::Stop => return at,
        };
        OptScoreCell::new(row, col, self.cols)
    }
}

/// One score row plus a flat source grid addressed by linear cell index.
///
/// Before `(row, col)` is written, `row_scores[col..]` still holds the
/// previous row and `row_scores[..col]` the current one; `diag` keeps the
/// previous-row value displaced by the last write.
///
/// Score memory is one row of `cols` entries, so it scales with the second
/// sequence. Callers after `O(min(n, m))` score memory pass the shorter
/// sequence second; the trace grid stays `rows * cols` either way.
pub struct RollingMatrix {
    row_scores: Vec<CellScores>,
    diag: CellScores,
    traces: Vec<u8>,
    cols: usize,
}

impl MatrixStorage for RollingMatrix {
    fn new(rows: usize, cols: usize) -> BioResult<Self> {
        let cells = checked_cells(rows, cols, 1)?;
        Ok(RollingMatrix {
            row_scores: vec![CellScores::UNREACHABLE; cols],
            diag: CellScores::UNREACHABLE,
            traces: vec![0u8; cells],
            cols,
        })
    }

    #[inline]
    fn neighbors(&self, at: OptScoreCell) -> Neighbors {
        Neighbors {
            diag: self.diag,
            up: self.row_scores[at.col],
            left: self.row_scores[at.col - 1],
        }
    }

    #[inline]
    fn set(&mut self, at: OptScoreCell, scores: CellScores, trace: u8) {
        self.diag = mem::replace(&mut self.row_scores[at.col], scores);
        self.traces[at.cell] = trace;
    }

    #[inline]
    fn trace(&self, at: OptScoreCell) -> u8 {
        self.traces[at.cell]
    }

    fn step(&self, at: OptScoreCell, dir: SourceDirection) -> OptScoreCell {
        let cell = match dir {
            SourceDirection::Diagonal => at.cell - (self.cols + 1),
            SourceDirection::Up => at.cell - self.cols,
            SourceDirection::Left => at.cell - 1,
            SourceDirection::Stop => return at,
        };
        OptScoreCell {
            row: cell / self.cols,
            col: cell % self.cols,
            cell,
        }
    }
}

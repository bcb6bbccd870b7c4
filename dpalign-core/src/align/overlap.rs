//! Pairwise overlap (semi-global): end gaps on either sequence are free,
//! and the alignment runs to the end of at least one sequence.

use super::scoring::CostModel;
use super::source::{SourceDirection, Trace};
use super::storage::{CellScores, OptScoreCell, NEG_INF};
use super::types::AlignmentMode;
use super::variant::{AlignmentVariant, Filled, OptTracker};

#[derive(Clone, Copy, Debug, Default)]
pub struct PairwiseOverlap;

/// Candidates on the last row and column.
///
/// `positive` only admits scores of at least one. `fallback` sees every
/// candidate and is used when nothing positive was found.
pub struct EdgeTracker {
    last_row: usize,
    last_col: usize,
    positive: OptTracker,
    fallback: OptTracker,
}

fn free_end_gap(dir: SourceDirection) -> Filled {
    Filled::new(CellScores::linear(0), Trace::new(dir))
}

fn free_end_gap_affine(dir: SourceDirection) -> Filled {
    let scores = CellScores {
        best: 0,
        m: 0,
        ix: NEG_INF,
        iy: NEG_INF,
    };
    Filled::new(scores, Trace::new(dir))
}

impl AlignmentVariant for PairwiseOverlap {
    type Tracker = EdgeTracker;

    const MODE: AlignmentMode = AlignmentMode::Overlap;

    fn new_tracker(&self, rows: usize, cols: usize) -> EdgeTracker {
        EdgeTracker {
            last_row: rows - 1,
            last_col: cols - 1,
            positive: OptTracker::with_floor(1),
            fallback: OptTracker::with_floor(i32::MIN),
        }
    }

    fn row_boundary_linear(&self, _col: usize, _cost: &CostModel) -> Filled {
        free_end_gap(SourceDirection::Left)
    }

    fn column_boundary_linear(&self, _row: usize, _cost: &CostModel) -> Filled {
        free_end_gap(SourceDirection::Up)
    }

    fn row_boundary_affine(&self, _col: usize, _cost: &CostModel) -> Filled {
        free_end_gap_affine(SourceDirection::Left)
    }

    fn column_boundary_affine(&self, _row: usize, _cost: &CostModel) -> Filled {
        free_end_gap_affine(SourceDirection::Up)
    }

    fn finish_cell(
        &self,
        tracker: &mut EdgeTracker,
        at: OptScoreCell,
        filled: Filled,
    ) -> Filled {
        if at.row == tracker.last_row || at.col == tracker.last_col {
            tracker.positive.offer(at, filled.scores.best);
            tracker.fallback.offer(at, filled.scores.best);
        }
        filled
    }

    fn select_optimal_cells(&self, tracker: EdgeTracker) -> (i32, Vec<OptScoreCell>) {
        if tracker.positive.is_empty() {
            tracker.fallback.into_parts()
        } else {
            tracker.positive.into_parts()
        }
    }

    fn stop_traceback(&self, at: OptScoreCell, _dir: SourceDirection) -> bool {
        at.row == 0 || at.col == 0
    }
}

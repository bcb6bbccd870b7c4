//! Smith-Waterman: the best-scoring pair of substrings.

use super::scoring::CostModel;
use super::source::{SourceDirection, Trace};
use super::storage::{CellScores, OptScoreCell};
use super::types::AlignmentMode;
use super::variant::{AlignmentVariant, Filled, OptTracker};

#[derive(Clone, Copy, Debug, Default)]
pub struct SmithWaterman;

fn zero_stop() -> Filled {
    Filled::new(CellScores::linear(0), Trace::STOP)
}

impl AlignmentVariant for SmithWaterman {
    type Tracker = OptTracker;

    const MODE: AlignmentMode = AlignmentMode::Local;

    fn new_tracker(&self, _rows: usize, _cols: usize) -> OptTracker {
        // zero-scoring cells never start a traceback
        OptTracker::with_floor(1)
    }

    fn row_boundary_linear(&self, _col: usize, _cost: &CostModel) -> Filled {
        zero_stop()
    }

    fn column_boundary_linear(&self, _row: usize, _cost: &CostModel) -> Filled {
        zero_stop()
    }

    fn row_boundary_affine(&self, _col: usize, _cost: &CostModel) -> Filled {
        zero_stop()
    }

    fn column_boundary_affine(&self, _row: usize, _cost: &CostModel) -> Filled {
        zero_stop()
    }

    fn finish_cell(
        &self,
        tracker: &mut OptTracker,
        at: OptScoreCell,
        mut filled: Filled,
    ) -> Filled {
        if filled.scores.best < 0 {
            filled.scores.best = 0;
            filled.trace.best = SourceDirection::Stop;
        }
        tracker.offer(at, filled.scores.best);
        filled
    }

    fn select_optimal_cells(&self, tracker: OptTracker) -> (i32, Vec<OptScoreCell>) {
        tracker.into_parts()
    }

    fn stop_traceback(&self, at: OptScoreCell, dir: SourceDirection) -> bool {
        at.row == 0 || at.col == 0 || dir == SourceDirection::Stop
    }
}

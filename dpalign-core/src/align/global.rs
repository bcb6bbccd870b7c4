//! Needleman-Wunsch: both sequences aligned end to end.

use super::scoring::CostModel;
use super::source::{GapSource, SourceDirection, Trace};
use super::storage::{CellScores, OptScoreCell, NEG_INF};
use super::types::AlignmentMode;
use super::variant::{AlignmentVariant, Filled};

#[derive(Clone, Copy, Debug, Default)]
pub struct NeedlemanWunsch;

/// The corner cell, recorded when the sweep reaches it.
pub struct CornerTracker {
    corner: OptScoreCell,
    score: Option<i32>,
}

/// Leading gap run of `len` positions; the first one opens from the origin.
fn leading_gap_source(len: usize) -> GapSource {
    if len == 1 {
        GapSource::OpenFromMatch
    } else {
        GapSource::Extend
    }
}

impl AlignmentVariant for NeedlemanWunsch {
    type Tracker = CornerTracker;

    const MODE: AlignmentMode = AlignmentMode::Global;

    fn new_tracker(&self, rows: usize, cols: usize) -> CornerTracker {
        CornerTracker {
            corner: OptScoreCell::new(rows - 1, cols - 1, cols),
            score: None,
        }
    }

    fn row_boundary_linear(&self, col: usize, cost: &CostModel) -> Filled {
        Filled::new(
            CellScores::linear(cost.gap_run_cost(col)),
            Trace::new(SourceDirection::Left),
        )
    }

    fn column_boundary_linear(&self, row: usize, cost: &CostModel) -> Filled {
        Filled::new(
            CellScores::linear(cost.gap_run_cost(row)),
            Trace::new(SourceDirection::Up),
        )
    }

    fn row_boundary_affine(&self, col: usize, cost: &CostModel) -> Filled {
        if col == 0 {
            let origin = CellScores {
                best: 0,
                m: 0,
                ix: NEG_INF,
                iy: NEG_INF,
            };
            return Filled::new(origin, Trace::new(SourceDirection::Left));
        }
        let run = cost.gap_run_cost(col);
        Filled::new(
            CellScores {
                best: run,
                m: NEG_INF,
                ix: NEG_INF,
                iy: run,
            },
            Trace::with_gaps(
                SourceDirection::Left,
                GapSource::Extend,
                leading_gap_source(col),
            ),
        )
    }

    fn column_boundary_affine(&self, row: usize, cost: &CostModel) -> Filled {
        let run = cost.gap_run_cost(row);
        Filled::new(
            CellScores {
                best: run,
                m: NEG_INF,
                ix: run,
                iy: NEG_INF,
            },
            Trace::with_gaps(
                SourceDirection::Up,
                leading_gap_source(row),
                GapSource::Extend,
            ),
        )
    }

    fn finish_cell(
        &self,
        tracker: &mut CornerTracker,
        at: OptScoreCell,
        filled: Filled,
    ) -> Filled {
        if at == tracker.corner {
            tracker.score = Some(filled.scores.best);
        }
        filled
    }

    fn select_optimal_cells(&self, tracker: CornerTracker) -> (i32, Vec<OptScoreCell>) {
        match tracker.score {
            Some(score) => (score, vec![tracker.corner]),
            None => (0, Vec::new()),
        }
    }

    fn stop_traceback(&self, at: OptScoreCell, _dir: SourceDirection) -> bool {
        at.row == 0 && at.col == 0
    }
}

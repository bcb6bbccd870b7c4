//! Hooks that turn the shared fill sweep into one alignment semantics.

use super::scoring::CostModel;
use super::source::{GapSource, SourceDirection, Trace};
use super::storage::{CellScores, Neighbors, OptScoreCell};
use super::types::AlignmentMode;

/// Scores and packed source of one freshly computed cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Filled {
    pub scores: CellScores,
    pub trace: Trace,
}

impl Filled {
    #[inline]
    pub fn new(scores: CellScores, trace: Trace) -> Self {
        Filled { scores, trace }
    }
}

/// Boundary, per-cell and traceback policy for one alignment mode.
///
/// The per-call tracker carries whatever a variant accumulates during the
/// sweep; it is created fresh for every alignment.
pub trait AlignmentVariant {
    type Tracker;

    const MODE: AlignmentMode;

    fn new_tracker(&self, rows: usize, cols: usize) -> Self::Tracker;

    /// Cell `(0, col)` under a linear gap cost.
    fn row_boundary_linear(&self, col: usize, cost: &CostModel) -> Filled;

    /// Cell `(row, 0)` for `row >= 1` under a linear gap cost.
    fn column_boundary_linear(&self, row: usize, cost: &CostModel) -> Filled;

    fn row_boundary_affine(&self, col: usize, cost: &CostModel) -> Filled;

    fn column_boundary_affine(&self, row: usize, cost: &CostModel) -> Filled;

    fn fill_cell_linear(&self, n: &Neighbors, sim: i32, cost: &CostModel) -> Filled {
        let diag = n.diag.best + sim;
        let up = n.up.best + cost.gap_open;
        let left = n.left.best + cost.gap_open;
        let (best, dir) = best_of(diag, up, left);
        Filled::new(CellScores::linear(best), Trace::new(dir))
    }

    fn fill_cell_affine(&self, n: &Neighbors, sim: i32, cost: &CostModel) -> Filled {
        let m = n.diag.best + sim;
        let (ix, ix_src) = gap_state(
            n.up.ix + cost.gap_extend,
            n.up.m + cost.gap_open,
            n.up.iy + cost.gap_open,
        );
        let (iy, iy_src) = gap_state(
            n.left.iy + cost.gap_extend,
            n.left.m + cost.gap_open,
            n.left.ix + cost.gap_open,
        );
        let (best, dir) = best_of(m, ix, iy);
        Filled::new(
            CellScores { best, m, ix, iy },
            Trace::with_gaps(dir, ix_src, iy_src),
        )
    }

    /// Post-processes an interior cell and records it as a traceback
    /// candidate if the variant tracks it.
    fn finish_cell(
        &self,
        tracker: &mut Self::Tracker,
        at: OptScoreCell,
        filled: Filled,
    ) -> Filled;

    /// Best score and the cells traceback starts from, in sweep order.
    fn select_optimal_cells(&self, tracker: Self::Tracker) -> (i32, Vec<OptScoreCell>);

    /// True once the walk has reached `at` and must not consume it.
    fn stop_traceback(&self, at: OptScoreCell, dir: SourceDirection) -> bool;
}

/// Ties prefer the diagonal, then up, then left.
#[inline]
pub(crate) fn best_of(diag: i32, up: i32, left: i32) -> (i32, SourceDirection) {
    if diag >= up && diag >= left {
        (diag, SourceDirection::Diagonal)
    } else if up >= left {
        (up, SourceDirection::Up)
    } else {
        (left, SourceDirection::Left)
    }
}

/// Ties prefer extending the current gap run.
#[inline]
fn gap_state(extend: i32, from_match: i32, from_other: i32) -> (i32, GapSource) {
    if extend >= from_match && extend >= from_other {
        (extend, GapSource::Extend)
    } else if from_match >= from_other {
        (from_match, GapSource::OpenFromMatch)
    } else {
        (from_other, GapSource::OpenFromOther)
    }
}

/// Running maximum that keeps every cell tying it.
///
/// Scores below `floor` are never recorded; a score equal to the floor is.
#[derive(Clone, Debug)]
pub struct OptTracker {
    best: i32,
    cells: Vec<OptScoreCell>,
}

impl OptTracker {
    pub fn with_floor(floor: i32) -> Self {
        OptTracker {
            best: floor,
            cells: Vec::new(),
        }
    }

    #[inline]
    pub fn offer(&mut self, at: OptScoreCell, score: i32) {
        if score > self.best {
            self.best = score;
            self.cells.clear();
            self.cells.push(at);
        } else if score == self.best {
            self.cells.push(at);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn into_parts(self) -> (i32, Vec<OptScoreCell>) {
        if self.cells.is_empty() {
            return (0, Vec::new());
        }
        (self.best, self.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_of_tie_order() {
        assert_eq!(best_of(1, 1, 1).1, SourceDirection::Diagonal);
        assert_eq!(best_of(0, 1, 1).1, SourceDirection::Up);
        assert_eq!(best_of(0, 0, 1), (1, SourceDirection::Left));
    }

    #[test]
    fn gap_state_prefers_extension() {
        assert_eq!(gap_state(-3, -3, -3).1, GapSource::Extend);
        assert_eq!(gap_state(-4, -3, -3).1, GapSource::OpenFromMatch);
        assert_eq!(gap_state(-4, -5, -3), (-3, GapSource::OpenFromOther));
    }

    #[test]
    fn tracker_keeps_ties_and_respects_floor() {
        let at = |r, c| OptScoreCell::new(r, c, 10);
        let mut t = OptTracker::with_floor(1);
        t.offer(at(1, 1), 0);
        assert!(t.is_empty());
        t.offer(at(1, 2), 1);
        t.offer(at(2, 2), 3);
        t.offer(at(3, 3), 3);
        t.offer(at(4, 4), 2);
        let (score, cells) = t.into_parts();
        assert_eq!(score, 3);
        assert_eq!(cells, vec![at(2, 2), at(3, 3)]);

        let empty = OptTracker::with_floor(1);
        assert_eq!(empty.into_parts(), (0, Vec::new()));
    }
}

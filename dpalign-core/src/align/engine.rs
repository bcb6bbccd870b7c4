//! Row-major fill sweep shared by every alignment mode.

use super::scoring::CostModel;
use super::storage::{MatrixStorage, OptScoreCell};
use super::traceback::traceback;
use super::types::{AlignmentResult, GapModel};
use super::variant::AlignmentVariant;
use crate::error::BioResult;

pub(crate) struct FilledMatrix<S> {
    pub storage: S,
    pub score: i32,
    pub cells: Vec<OptScoreCell>,
}

/// Fills the `(len(first)+1) x (len(second)+1)` grid. Both sequences must be
/// non-empty and validated against `cost`.
pub(crate) fn fill<S, V>(
    variant: &V,
    first: &[u8],
    second: &[u8],
    cost: &CostModel,
) -> BioResult<FilledMatrix<S>>
where
    S: MatrixStorage,
    V: AlignmentVariant,
{
    let rows = first.len() + 1;
    let cols = second.len() + 1;
    let affine = cost.gap_model == GapModel::Affine;
    let mut storage = S::new(rows, cols)?;
    let mut tracker = variant.new_tracker(rows, cols);

    for col in 0..cols {
        let filled = if affine {
            variant.row_boundary_affine(col, cost)
        } else {
            variant.row_boundary_linear(col, cost)
        };
        storage.set(
            OptScoreCell::new(0, col, cols),
            filled.scores,
            filled.trace.encode(),
        );
    }

    for (row, &a) in (1..rows).zip(first) {
        let filled = if affine {
            variant.column_boundary_affine(row, cost)
        } else {
            variant.column_boundary_linear(row, cost)
        };
        storage.set(
            OptScoreCell::new(row, 0, cols),
            filled.scores,
            filled.trace.encode(),
        );

        for (col, &b) in (1..cols).zip(second) {
            let at = OptScoreCell::new(row, col, cols);
            let neighbors = storage.neighbors(at);
            let sim = cost.similarity(a, b);
            let filled = if affine {
                variant.fill_cell_affine(&neighbors, sim, cost)
            } else {
                variant.fill_cell_linear(&neighbors, sim, cost)
            };
            let filled = variant.finish_cell(&mut tracker, at, filled);
            storage.set(at, filled.scores, filled.trace.encode());
        }
    }

    let (score, cells) = variant.select_optimal_cells(tracker);
    log::debug!(
        "{}: best score {} at {} cell(s)",
        V::MODE.name(),
        score,
        cells.len()
    );
    Ok(FilledMatrix {
        storage,
        score,
        cells,
    })
}

/// Fills the grid, then walks back from every optimal cell.
pub(crate) fn run<S, V>(
    variant: &V,
    first: &[u8],
    second: &[u8],
    cost: &CostModel,
) -> BioResult<Vec<AlignmentResult>>
where
    S: MatrixStorage,
    V: AlignmentVariant,
{
    log::debug!(
        "{}: {} x {} grid, {:?} gaps, {:?} layout",
        V::MODE.name(),
        first.len() + 1,
        second.len() + 1,
        cost.gap_model,
        cost.layout
    );
    let matrix = fill::<S, V>(variant, first, second, cost)?;
    matrix
        .cells
        .iter()
        .map(|&opt| {
            traceback(
                variant,
                &matrix.storage,
                first,
                second,
                opt,
                matrix.score,
                cost,
            )
        })
        .collect()
}

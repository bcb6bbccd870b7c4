//! Backward walk from an optimal cell to the variant's stop condition.

use super::scoring::CostModel;
use super::source::{GapSource, SourceDirection, Trace};
use super::storage::{MatrixStorage, OptScoreCell};
use super::types::{AlignmentResult, GAP_CODE};
use super::variant::AlignmentVariant;
use crate::error::{BioError, BioResult};

/// Which score the walk is currently explaining.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Best,
    Match,
    Ix,
    Iy,
}

fn gap_successor(src: GapSource, same: State, other: State) -> State {
    match src {
        GapSource::Extend => same,
        GapSource::OpenFromMatch => State::Match,
        GapSource::OpenFromOther => other,
    }
}

fn read_trace<S: MatrixStorage>(storage: &S, at: OptScoreCell) -> BioResult<Trace> {
    let code = storage.trace(at);
    Trace::decode(code, at.row, at.col).map_err(|err| {
        log::error!("corrupt source code {:#04x} at ({}, {})", code, at.row, at.col);
        err
    })
}

pub(crate) fn traceback<S, V>(
    variant: &V,
    storage: &S,
    first: &[u8],
    second: &[u8],
    opt: OptScoreCell,
    score: i32,
    cost: &CostModel,
) -> BioResult<AlignmentResult>
where
    S: MatrixStorage,
    V: AlignmentVariant,
{
    let affine = cost.is_affine();
    let capacity = opt.row + opt.col;
    let mut first_aligned = Vec::with_capacity(capacity);
    let mut second_aligned = Vec::with_capacity(capacity);
    let mut insertions = [0usize; 2];
    let mut state = State::Best;
    let mut at = opt;

    loop {
        // boundary cells only carry a best-state direction
        if at.row == 0 || at.col == 0 {
            state = State::Best;
        }
        let trace = read_trace(storage, at)?;
        let dir = match state {
            State::Best => trace.best,
            State::Match => SourceDirection::Diagonal,
            State::Ix => SourceDirection::Up,
            State::Iy => SourceDirection::Left,
        };
        if variant.stop_traceback(at, dir) {
            break;
        }

        let blocked = match dir {
            SourceDirection::Diagonal => at.row == 0 || at.col == 0,
            SourceDirection::Up => at.row == 0,
            SourceDirection::Left => at.col == 0,
            SourceDirection::Stop => true,
        };
        if blocked {
            log::error!(
                "{}: source {:?} leaves the grid at ({}, {})",
                V::MODE.name(),
                dir,
                at.row,
                at.col
            );
            return Err(BioError::TracebackBadSource {
                code: trace.encode(),
                row: at.row,
                col: at.col,
            });
        }

        match dir {
            SourceDirection::Diagonal => {
                first_aligned.push(first[at.row - 1]);
                second_aligned.push(second[at.col - 1]);
                state = State::Best;
            }
            SourceDirection::Up => {
                first_aligned.push(first[at.row - 1]);
                second_aligned.push(GAP_CODE);
                insertions[1] += 1;
                state = if affine {
                    gap_successor(trace.ix, State::Ix, State::Iy)
                } else {
                    State::Best
                };
            }
            SourceDirection::Left => {
                first_aligned.push(GAP_CODE);
                second_aligned.push(second[at.col - 1]);
                insertions[0] += 1;
                state = if affine {
                    gap_successor(trace.iy, State::Iy, State::Ix)
                } else {
                    State::Best
                };
            }
            SourceDirection::Stop => {}
        }
        at = storage.step(at, dir);
    }

    first_aligned.reverse();
    second_aligned.reverse();

    let (first_offset, second_offset) = if at.row >= at.col {
        (0, at.row - at.col)
    } else {
        (at.col - at.row, 0)
    };
    log::trace!(
        "{}: traceback ({}, {}) -> ({}, {}), {} columns",
        V::MODE.name(),
        opt.row,
        opt.col,
        at.row,
        at.col,
        first_aligned.len()
    );

    Ok(AlignmentResult {
        first_aligned,
        second_aligned,
        score,
        first_offset,
        second_offset,
        start_offsets: [at.row, at.col],
        end_offsets: [opt.row - 1, opt.col - 1],
        insertions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::global::NeedlemanWunsch;
    use crate::align::local::SmithWaterman;
    use crate::align::scoring::SimilarityMatrix;
    use crate::align::storage::{CellScores, DenseMatrix, RollingMatrix};

    fn write_grid<S: MatrixStorage>(
        rows: usize,
        cols: usize,
        code: impl Fn(usize, usize) -> u8,
    ) -> S {
        let mut storage = S::new(rows, cols).unwrap();
        for row in 0..rows {
            for col in 0..cols {
                let at = OptScoreCell::new(row, col, cols);
                storage.set(at, CellScores::linear(0), code(row, col));
            }
        }
        storage
    }

    #[test]
    fn corrupt_source_is_an_internal_error() {
        let cost = CostModel::linear(SimilarityMatrix::diagonal(1, -1), -1);
        let storage: DenseMatrix =
            write_grid(3, 3, |r, c| if (r, c) == (1, 1) { 0x40 } else { 0 });
        let opt = OptScoreCell::new(2, 2, 3);
        let err =
            traceback(&NeedlemanWunsch, &storage, b"AC", b"AC", opt, 2, &cost).unwrap_err();
        assert!(err.is_internal());
        match err {
            BioError::TracebackBadSource { code, row, col } => {
                assert_eq!((code, row, col), (0x40, 1, 1));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn stop_outside_local_is_rejected() {
        let cost = CostModel::linear(SimilarityMatrix::diagonal(1, -1), -1);
        let stop = Trace::STOP.encode();
        let storage: RollingMatrix = write_grid(3, 3, |_, _| stop);
        let opt = OptScoreCell::new(2, 2, 3);
        let err =
            traceback(&NeedlemanWunsch, &storage, b"AC", b"AC", opt, 2, &cost).unwrap_err();
        assert!(matches!(
            err,
            BioError::TracebackBadSource { row: 2, col: 2, .. }
        ));
    }

    #[test]
    fn local_walk_stops_before_stop_cell() {
        let cost = CostModel::linear(SimilarityMatrix::diagonal(1, -1), -1);
        let stop = Trace::STOP.encode();
        let diag = Trace::new(SourceDirection::Diagonal).encode();
        // diagonal at (2, 2) and (3, 3), stop at (1, 1)
        let storage: DenseMatrix =
            write_grid(4, 4, |r, c| if r == c && r >= 2 { diag } else { stop });
        let opt = OptScoreCell::new(3, 3, 4);
        let res = traceback(&SmithWaterman, &storage, b"GCA", b"TCA", opt, 2, &cost).unwrap();
        assert_eq!(res.first_aligned, b"CA");
        assert_eq!(res.second_aligned, b"CA");
        assert_eq!(res.start_offsets, [1, 1]);
        assert_eq!(res.end_offsets, [2, 2]);
        assert_eq!((res.first_offset, res.second_offset), (0, 0));
    }
}

mod batch;
mod engine;
mod global;
mod local;
mod overlap;
pub mod scoring;
mod source;
mod storage;
mod traceback;
pub mod types;
mod variant;

pub use batch::align_pairs;
pub use scoring::{CostModel, ScoreTable, SimilarityMatrix};
pub use types::{
    AlignmentMode, AlignmentResult, Cigar, CigarOp, GapModel, MatrixLayout, GAP_CODE,
};

use crate::error::{BioError, BioResult};
use global::NeedlemanWunsch;
use local::SmithWaterman;
use overlap::PairwiseOverlap;
use storage::{DenseMatrix, RollingMatrix};
use variant::AlignmentVariant;


fn validate_inputs(first: &[u8], second: &[u8], cost: &CostModel) -> BioResult<()> {
    if first.is_empty() {
        return Err(BioError::EmptySequence { which: "first" });
    }
    if second.is_empty() {
        return Err(BioError::EmptySequence { which: "second" });
    }
    cost.matrix.validate_sequence(first)?;
    cost.matrix.validate_sequence(second)?;
    cost.check_score_bound(first.len(), second.len())?;
    cost.warn_on_positive_gaps();
    Ok(())
}

fn run_variant<V: AlignmentVariant>(
    variant: &V,
    first: &[u8],
    second: &[u8],
    cost: &CostModel,
) -> BioResult<Vec<AlignmentResult>> {
    match cost.layout {
        MatrixLayout::Dense => engine::run::<DenseMatrix, V>(variant, first, second, cost),
        MatrixLayout::Rolling => engine::run::<RollingMatrix, V>(variant, first, second, cost),
    }
}

/// Aligns `first` (matrix rows) against `second` (matrix columns).
///
/// Returns every optimal alignment the mode reports: exactly one for
/// `Global`, and possibly none for `Local` when nothing scores above zero.
/// Input errors are rejected before any matrix is allocated.
pub fn align(
    first: &[u8],
    second: &[u8],
    cost: &CostModel,
    mode: AlignmentMode,
) -> BioResult<Vec<AlignmentResult>> {
    validate_inputs(first, second, cost)?;
    match mode {
        AlignmentMode::Global => run_variant(&NeedlemanWunsch, first, second, cost),
        AlignmentMode::Local => run_variant(&SmithWaterman, first, second, cost),
        AlignmentMode::Overlap => run_variant(&PairwiseOverlap, first, second, cost),
    }
}

pub fn align_global(
    first: &[u8],
    second: &[u8],
    cost: &CostModel,
) -> BioResult<Vec<AlignmentResult>> {
    align(first, second, cost, AlignmentMode::Global)
}

pub fn align_local(
    first: &[u8],
    second: &[u8],
    cost: &CostModel,
) -> BioResult<Vec<AlignmentResult>> {
    align(first, second, cost, AlignmentMode::Local)
}

pub fn align_overlap(
    first: &[u8],
    second: &[u8],
    cost: &CostModel,
) -> BioResult<Vec<AlignmentResult>> {
    align(first, second, cost, AlignmentMode::Overlap)
}

/// A reusable alignment configuration. Holds no per-call state, so one
/// aligner can serve many threads at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairwiseAligner {
    pub mode: AlignmentMode,
    pub cost: CostModel,
}

impl PairwiseAligner {
    pub fn new(mode: AlignmentMode, cost: CostModel) -> Self {
        Self { mode, cost }
    }

    pub fn global(cost: CostModel) -> Self {
        Self::new(AlignmentMode::Global, cost)
    }

    pub fn local(cost: CostModel) -> Self {
        Self::new(AlignmentMode::Local, cost)
    }

    pub fn overlap(cost: CostModel) -> Self {
        Self::new(AlignmentMode::Overlap, cost)
    }

    pub fn name(&self) -> &'static str {
        self.mode.name()
    }

    pub fn description(&self) -> &'static str {
        self.mode.description()
    }

    pub fn align(&self, first: &[u8], second: &[u8]) -> BioResult<Vec<AlignmentResult>> {
        align(first, second, &self.cost, self.mode)
    }

    pub fn align_pairs<A, B>(&self, pairs: &[(A, B)]) -> BioResult<Vec<Vec<AlignmentResult>>>
    where
        A: AsRef<[u8]> + Sync,
        B: AsRef<[u8]> + Sync,
    {
        align_pairs(pairs, &self.cost, self.mode)
    }
}

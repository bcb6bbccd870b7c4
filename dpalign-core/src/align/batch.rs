use super::scoring::CostModel;
use super::types::{AlignmentMode, AlignmentResult};
use crate::error::BioResult;

/// Aligns every `(first, second)` pair independently, preserving input order.
///
/// Runs across the rayon pool when the `parallel` feature is on. The first
/// failing pair aborts the batch.
pub fn align_pairs<A, B>(
    pairs: &[(A, B)],
    cost: &CostModel,
    mode: AlignmentMode,
) -> BioResult<Vec<Vec<AlignmentResult>>>
where
    A: AsRef<[u8]> + Sync,
    B: AsRef<[u8]> + Sync,
{
    log::debug!("{}: aligning {} pairs", mode.name(), pairs.len());
    let results: BioResult<Vec<Vec<AlignmentResult>>> = par_try_map!(pairs, |(first, second)| {
        super::align(first.as_ref(), second.as_ref(), cost, mode)
    });
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::scoring::SimilarityMatrix;
    use crate::error::BioError;

    #[test]
    fn batch_matches_single_calls_in_order() {
        let cost = CostModel::linear(SimilarityMatrix::diagonal(1, -1), -1);
        let pairs: Vec<(&[u8], &[u8])> = vec![
            (&b"GATTACA"[..], &b"GCATGCU"[..]),
            (&b"ACGT"[..], &b"ACGT"[..]),
            (&b"AAAA"[..], &b"TTTTAAAA"[..]),
        ];
        let batch = align_pairs(&pairs, &cost, AlignmentMode::Global).unwrap();
        assert_eq!(batch.len(), 3);
        for (res, (a, b)) in batch.iter().zip(&pairs) {
            let single = crate::align::align(a, b, &cost, AlignmentMode::Global).unwrap();
            assert_eq!(res, &single);
        }
        assert_eq!(batch[1][0].score, 4);
    }

    #[test]
    fn batch_propagates_input_errors() {
        let cost = CostModel::default();
        let pairs = vec![
            (b"ACGT".to_vec(), b"ACGT".to_vec()),
            (Vec::new(), b"A".to_vec()),
        ];
        assert!(matches!(
            align_pairs(&pairs, &cost, AlignmentMode::Local),
            Err(BioError::EmptySequence { which: "first" })
        ));
    }
}

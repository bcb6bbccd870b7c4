//! Fill + traceback cost across modes, gap models and matrix layouts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dpalign_core::align::{align, AlignmentMode, CostModel, MatrixLayout, SimilarityMatrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded random DNA so runs stay comparable.
fn generate_sequence(len: usize, seed: u64) -> Vec<u8> {
    let bases = b"ACGT";
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| bases[rng.gen_range(0..4)]).collect()
}

fn cost_models() -> Vec<(&'static str, CostModel)> {
    let linear = CostModel::linear(SimilarityMatrix::diagonal(2, -2), -4);
    let affine = CostModel::default();
    vec![
        ("linear_dense", linear.clone()),
        ("linear_rolling", linear.with_layout(MatrixLayout::Rolling)),
        ("affine_dense", affine.clone()),
        ("affine_rolling", affine.with_layout(MatrixLayout::Rolling)),
    ]
}

fn bench_modes(c: &mut Criterion) {
    for mode in [
        AlignmentMode::Global,
        AlignmentMode::Local,
        AlignmentMode::Overlap,
    ] {
        let mut group = c.benchmark_group(format!("pairwise_{:?}", mode).to_lowercase());
        group.sample_size(20);

        for seq_len in [100usize, 500, 1000] {
            let first = generate_sequence(seq_len, 1);
            let second = generate_sequence(seq_len, 2);
            group.throughput(Throughput::Elements((seq_len * seq_len) as u64));

            for (label, cost) in cost_models() {
                group.bench_with_input(
                    BenchmarkId::new(label, format!("{}bp", seq_len)),
                    &seq_len,
                    |b, _| {
                        b.iter(|| {
                            black_box(align(
                                black_box(&first),
                                black_box(&second),
                                black_box(&cost),
                                mode,
                            ))
                        })
                    },
                );
            }
        }

        group.finish();
    }
}

criterion_group!(benches, bench_modes);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use huffsplit_codec::{Alphabet, Codec, CostModel, Planner, Segmented, SingleTree};
use rand::Rng;
use std::hint::black_box;

/// Random blocks of one or two symbols, so the planner has real switches to find.
fn blocky_input(len: usize, rng: &mut impl Rng) -> Vec<u8> {
    const LETTERS: &[u8] = b"ACGTN";
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        let block = rng.gen_range(16..2048).min(len - out.len());
        let a = LETTERS[rng.gen_range(0..4)];
        let b = LETTERS[rng.gen_range(0..5)];
        out.extend((0..block).map(|_| if rng.gen_bool(0.8) { a } else { b }));
    }
    out
}

fn bench_codecs(c: &mut Criterion) {
    let mut rng = rand::thread_rng();

    let strategies: Vec<(&str, Box<dyn Codec>)> = vec![
        ("Segmented", Box::new(Segmented::new(Alphabet::Dna5))),
        ("SegmentedSingleRun", Box::new(Segmented::single_run(Alphabet::Dna5))),
    ];

    let sizes = vec![
        ("Small", 1_000),
        ("Medium", 100_000),
        ("Large", 1_000_000),
    ];

    for (size_name, size) in sizes {
        let input = blocky_input(size, &mut rng);

        let mut group_encode = c.benchmark_group(format!("Encode_{size_name}"));
        group_encode.throughput(Throughput::Bytes(size as u64));
        for (strategy_name, strategy) in &strategies {
            group_encode.bench_with_input(
                BenchmarkId::new(*strategy_name, size),
                &input,
                |b, i| b.iter(|| strategy.encode(black_box(i)).unwrap()),
            );
        }
        let acgt: Vec<u8> = input.iter().map(|&b| if b == b'N' { b'A' } else { b }).collect();
        group_encode.bench_with_input(BenchmarkId::new("SingleTree", size), &acgt, |b, i| {
            b.iter(|| SingleTree.encode(black_box(i)).unwrap())
        });
        group_encode.finish();

        let mut group_decode = c.benchmark_group(format!("Decode_{size_name}"));
        group_decode.throughput(Throughput::Bytes(size as u64));
        for (strategy_name, strategy) in &strategies {
            let encoded = strategy.encode(&input).unwrap();
            group_decode.bench_with_input(
                BenchmarkId::new(*strategy_name, size),
                &encoded,
                |b, e| b.iter(|| strategy.decode(black_box(e)).unwrap()),
            );
        }
        group_decode.finish();
    }
}

fn bench_planners(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let model = CostModel::segmented(Alphabet::Dna5);
    let planner = Planner::new(&model);

    let mut group = c.benchmark_group("Plan");
    for size in [1_000usize, 10_000] {
        let symbols = Alphabet::Dna5.parse(&blocky_input(size, &mut rng)).unwrap();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("streaming", size), &symbols, |b, s| {
            b.iter(|| planner.plan(black_box(s)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("batch", size), &symbols, |b, s| {
            b.iter(|| planner.plan_batch(black_box(s)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codecs, bench_planners);
criterion_main!(benches);

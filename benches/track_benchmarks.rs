use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use funscript_frames::{Action, FillRatio, dedupe, extrapolate};

/// A track of `count` actions alternating between three positions, with a
/// run of repeated positions every tenth action.
fn synthetic_actions(count: u64) -> Vec<Action> {
    (0..count)
        .map(|index| {
            let pos = if index % 10 < 3 { 50 } else { ((index * 37) % 101) as i64 };
            Action::new(index * 250, pos)
        })
        .collect()
}

fn bench_dedupe(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("dedupe");

    for count in [1_000_u64, 10_000, 100_000] {
        let actions = synthetic_actions(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &actions, |bench, actions| {
            bench.iter(|| dedupe(actions));
        });
    }

    group.finish();
}

fn bench_extrapolate(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("extrapolate");
    let actions = synthetic_actions(5_000);

    for fps in [30.0_f64, 60.0, 120.0] {
        let fps_ms = fps / 1000.0;
        group.bench_with_input(BenchmarkId::new("fps", fps), &actions, |bench, actions| {
            bench.iter(|| extrapolate(actions, fps_ms, FillRatio::FULL));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dedupe, bench_extrapolate);
criterion_main!(benches);

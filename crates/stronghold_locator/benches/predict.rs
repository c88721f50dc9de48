mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use stronghold_locator::geometry::{bearing, Candidate, ChunkAlignment, Point};
use stronghold_locator::grid::CandidateGrid;
use stronghold_locator::heatmap::{Heatmap, HeatmapConfig};
use stronghold_locator::locate::{points_in_cone, ConeOptions};
use stronghold_locator::predict::{Predictor, PredictorConfig};

const RINGS: &[usize] = &[0, 1, 2];
const ERRORS: [f64; 3] = [0.05, 0.2, 1.0];

fn fixtures() -> Option<(CandidateGrid, Heatmap)> {
    let grid = CandidateGrid::build(RINGS, ChunkAlignment::Center).ok()?;
    let config = HeatmapConfig::new(20_000).with_ring_indices(RINGS);
    let heatmap = Heatmap::build(&config, &mut common::rng(42)).ok()?;
    Some((grid, heatmap))
}

fn cone_benches(c: &mut Criterion) {
    let Ok(grid) = CandidateGrid::build(RINGS, ChunkAlignment::Center) else {
        return;
    };
    let mut group = c.benchmark_group("predict/points_in_cone");
    group.throughput(common::elements_throughput(grid.len()));
    let observer = Point::new(120.0, -340.0);

    for &error in &ERRORS {
        group.bench_with_input(BenchmarkId::from_parameter(error), &error, |b, &error| {
            b.iter(|| {
                black_box(
                    points_in_cone(observer, grid.candidates(), 35.0, error, &ConeOptions::default())
                        .len(),
                )
            });
        });
    }

    group.finish();
}

fn two_throw_benches(c: &mut Criterion) {
    let Some((grid, heatmap)) = fixtures() else {
        return;
    };
    let Ok(predictor) = Predictor::new(grid, heatmap, PredictorConfig::default()) else {
        return;
    };

    let target = Candidate::new(2008, 8).to_point();
    let first = target + Point::new(-300.0, -400.0);
    let second = target + Point::new(400.0, -300.0);
    let (Some(a1), Some(a2)) = (bearing(first, target), bearing(second, target)) else {
        return;
    };

    let mut group = c.benchmark_group("predict/two_throws");
    for &error in &ERRORS {
        group.bench_with_input(BenchmarkId::from_parameter(error), &error, |b, &error| {
            b.iter_batched(
                || predictor.clone(),
                |mut p| {
                    let _ = p.add_throw(first, a1, error);
                    black_box(p.add_throw(second, a2, error).ok())
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = cone_benches, two_throw_benches
}
criterion_main!(benches);

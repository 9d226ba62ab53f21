//! Benchmarks for the per-tile kernels

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;

use tilemath_algorithms::change::{RapidChange, RapidChangeParams};
use tilemath_algorithms::flood::FloodDetection;
use tilemath_core::{TileAlgorithm, TileImage};

fn create_band(size: usize, base: f64) -> Array2<f64> {
    let mut band = Array2::zeros((size, size));
    for row in 0..size {
        for col in 0..size {
            band[[row, col]] = base + ((row * 7 + col * 13) % 200) as f64;
        }
    }
    band
}

fn bench_rapid_change(c: &mut Criterion) {
    let mut group = c.benchmark_group("change/rca");
    for size in [256, 512, 1024] {
        let img = TileImage::from_bands(vec![create_band(size, 100.0), create_band(size, 300.0)])
            .unwrap();
        let alg = RapidChange::new(RapidChangeParams {
            threshold: 0.3,
            ..Default::default()
        })
        .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| alg.apply(black_box(&img)).unwrap())
        });
    }
    group.finish();
}

fn bench_flood_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood/mndwi_otsu");
    for size in [256, 512, 1024] {
        let img = TileImage::from_bands(vec![create_band(size, 50.0), create_band(size, 150.0)])
            .unwrap();
        let alg = FloodDetection::default();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| alg.apply(black_box(&img)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rapid_change, bench_flood_detection);
criterion_main!(benches);

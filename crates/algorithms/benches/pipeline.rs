//! Benchmarks for rasterization, NDVI and the full pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use greencover_algorithms::imagery::ndvi;
use greencover_algorithms::pipeline::VegetationPipeline;
use greencover_algorithms::vector::rasterize;
use greencover_core::{Boundary, GeoTransform, Polygon, Raster};

fn create_band(size: usize, base: f64) -> Raster<f64> {
    let values = (0..size * size)
        .map(|i| {
            let (row, col) = (i / size, i % size);
            base + ((row * 7 + col * 13) % 200) as f64
        })
        .collect();
    Raster::from_vec(values, size, size)
        .unwrap()
        .with_transform(GeoTransform::new(0.0, size as f64, 1.0, -1.0))
}

/// A 64-vertex star covering most of a `size` x `size` grid
fn star(size: usize) -> Polygon {
    let c = size as f64 / 2.0;
    let ring: Vec<(f64, f64)> = (0..64)
        .map(|i| {
            let a = i as f64 * std::f64::consts::TAU / 64.0;
            let r = size as f64 * if i % 2 == 0 { 0.48 } else { 0.3 };
            (c + r * a.cos(), c + r * a.sin())
        })
        .collect();
    Polygon::new(ring, vec![]).unwrap()
}

fn bench_rasterize(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector/rasterize");
    for size in [256, 512, 1024, 2048] {
        let grid = Raster::<f64>::new(size, size)
            .with_transform(GeoTransform::new(0.0, size as f64, 1.0, -1.0));
        let poly = star(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| rasterize(black_box(&poly), black_box(&grid)).unwrap())
        });
    }
    group.finish();
}

fn bench_ndvi(c: &mut Criterion) {
    let mut group = c.benchmark_group("imagery/ndvi");
    for size in [256, 512, 1024, 2048] {
        let nir = create_band(size, 300.0);
        let red = create_band(size, 100.0);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| ndvi(black_box(&nir), black_box(&red)).unwrap())
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline/run");
    let pipeline = VegetationPipeline::default();
    for size in [256, 1024] {
        let nir = create_band(size, 300.0);
        let red = create_band(size, 100.0);
        let boundary = Boundary::from(star(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| pipeline.run(black_box(&nir), black_box(&red), &boundary).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rasterize, bench_ndvi, bench_pipeline);
criterion_main!(benches);

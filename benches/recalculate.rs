//! Benchmarks for image token calculation
//!
//! This benchmark measures:
//! - Full recalculation over image lists of increasing length, per scheme
//! - Single-image patch sizing when the budget shrink kicks in
//! - Catalog parsing from YAML

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use vision_token_calc::catalog::presets;
use vision_token_calc::tokens::{patch_tokens, recalculate};
use vision_token_calc::{ImageRecord, ModelCatalog};

fn sample_images(n: u32) -> Vec<ImageRecord> {
    (0..n)
        .map(|i| ImageRecord::new(320 + i * 97 % 4000, 240 + i * 53 % 3000).with_multiplier(1 + i % 3))
        .collect()
}

fn bench_recalculate(c: &mut Criterion) {
    let mut group = c.benchmark_group("recalculate");

    for n in [1u32, 10, 100] {
        let images = sample_images(n);
        group.throughput(Throughput::Elements(u64::from(n)));

        let tile = presets::gpt_4o();
        group.bench_with_input(BenchmarkId::new("tile", n), &images, |b, imgs| {
            b.iter(|| recalculate(black_box(&tile), black_box(imgs)).unwrap())
        });

        let patch = presets::gpt_5_mini();
        group.bench_with_input(BenchmarkId::new("patch", n), &images, |b, imgs| {
            b.iter(|| recalculate(black_box(&patch), black_box(imgs)).unwrap())
        });
    }

    group.finish();
}

fn bench_patch_shrink(c: &mut Criterion) {
    c.bench_function("patch_tokens_over_budget", |b| {
        b.iter(|| patch_tokens(black_box(1800), black_box(2400), 32, 1536, 1.62))
    });
}

fn bench_catalog_parse(c: &mut Criterion) {
    let yaml = ModelCatalog::builtin().to_yaml_string().unwrap();
    c.bench_function("catalog_from_yaml", |b| {
        b.iter(|| ModelCatalog::from_yaml_str(black_box(&yaml)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_recalculate,
    bench_patch_shrink,
    bench_catalog_parse,
);
criterion_main!(benches);

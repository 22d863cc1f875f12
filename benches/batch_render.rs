// this_file: benches/batch_render.rs

//! Batch rendering performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use midashi::{BatchPlan, BatchRenderer, Compositor, ExportKind, SkiaRasterizer, StyleFlags};
use midashi_core::{FontPool, RenderRequest};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

fn fixture_font() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/fonts/DejaVuSans.ttf")
}

fn bench_batch_formats(c: &mut Criterion) {
    let compositor = Compositor::new(SkiaRasterizer::new());
    let request = RenderRequest::new(
        "Hello",
        FontPool::from_paths([fixture_font()]),
        StyleFlags::default(),
    );
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    let mut group = c.benchmark_group("batch_export");
    group.sample_size(10);
    group.throughput(Throughput::Elements(10));

    for kind in ExportKind::ALL {
        let plan = BatchPlan::new(dir.path(), "bench", kind);
        group.bench_with_input(BenchmarkId::from_parameter(kind), &plan, |b, plan| {
            b.iter(|| {
                let report = BatchRenderer::new(&compositor)
                    .run(black_box(&request), plan, &mut rng)
                    .unwrap();
                assert_eq!(report.saved_count(), plan.count);
            });
        });
    }

    group.finish();
}

fn bench_render_without_export(c: &mut Criterion) {
    let compositor = Compositor::new(SkiaRasterizer::new());
    let request = RenderRequest::new(
        "Hello",
        FontPool::from_paths([fixture_font()]),
        StyleFlags::all(),
    );
    let mut rng = StdRng::seed_from_u64(7);

    let mut group = c.benchmark_group("batch_render_only");
    for batch_size in [10usize, 100] {
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &batch_size,
            |b, &batch_size| {
                b.iter(|| {
                    for _ in 0..batch_size {
                        let _ = compositor.render(black_box(&request), &mut rng).unwrap();
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_batch_formats, bench_render_without_export);
criterion_main!(benches);

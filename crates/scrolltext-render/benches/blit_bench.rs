//! Benchmarks for layout, blitting, and viewport scrolling.
//!
//! Run with: cargo bench -p scrolltext-render --bench blit_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use scrolltext_render::{BlockFont, PixelFormat, PixelSurface, RenderContext};
use std::hint::black_box;

const TEXT: &str = "nine hundred and nine million one hundred and sixty-eight thousand four hundred and forty-two";

fn context(format: PixelFormat) -> RenderContext<BlockFont> {
    let surface = PixelSurface::new(1080, 1920, 1088, format).expect("surface");
    let mut ctx = RenderContext::new(BlockFont::new(), surface);
    ctx.configure_viewport(250, 10);
    ctx.load_face("block", 8, 480).expect("load");
    ctx
}

// =============================================================================
// Line counting (warm cache)
// =============================================================================

fn bench_compute_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/compute_lines");
    group.throughput(Throughput::Bytes(TEXT.len() as u64));

    for width in [200, 1060] {
        let mut ctx = context(PixelFormat::Rgb565);
        ctx.compute_lines(TEXT.as_bytes(), width, true)
            .expect("warm");
        group.bench_with_input(BenchmarkId::new("width", width), &width, |b, &width| {
            b.iter(|| black_box(ctx.compute_lines(black_box(TEXT.as_bytes()), width, true)))
        });
    }

    group.finish();
}

// =============================================================================
// Rendering per pixel format
// =============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("blit/render");
    group.throughput(Throughput::Bytes(TEXT.len() as u64));

    for (name, format) in [("rgba8888", PixelFormat::Rgba8888), ("rgb565", PixelFormat::Rgb565)] {
        let mut ctx = context(format);
        ctx.render(TEXT.as_bytes(), 10, 250, 1060).expect("warm");
        group.bench_function(name, |b| {
            b.iter(|| black_box(ctx.render(black_box(TEXT.as_bytes()), 10, 250, 1060)))
        });
    }

    group.finish();
}

// =============================================================================
// Steady-state append with scrolling
// =============================================================================

fn bench_append_scrolling(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport/append");

    for (name, format) in [("rgba8888", PixelFormat::Rgba8888), ("rgb565", PixelFormat::Rgb565)] {
        let mut ctx = context(format);
        // Fill the viewport so every iteration scrolls.
        for _ in 0..ctx.viewport().max_lines() {
            ctx.append_block(TEXT.as_bytes(), 10, 1060).expect("fill");
        }
        group.bench_function(name, |b| {
            b.iter(|| black_box(ctx.append_block(black_box(TEXT.as_bytes()), 10, 1060)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_lines,
    bench_render,
    bench_append_scrolling
);
criterion_main!(benches);

//! Benchmarks for the inktrap pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use inktrap::trap::{darker_layers_mask, AnalyzerLimits};
use inktrap::{
    analyze, dilate, erode, extract, validate_range, Colour, LayerPlan, Raster, TrapSettings,
    Trapper,
};

/// Concentric bands of yellow, red and black on white paper.
fn artwork(size: u32) -> Raster {
    let mut r = Raster::new(size, size);
    let centre = size as i64 / 2;
    for y in 0..size {
        for x in 0..size {
            let d = (x as i64 - centre).abs().max((y as i64 - centre).abs());
            let band = d * 4 / centre.max(1);
            let c = match band {
                0 => Colour::BLACK,
                1 => Colour::rgb(255, 0, 0),
                2 => Colour::rgb(255, 255, 0),
                _ => Colour::WHITE,
            };
            r.set_pixel(x, y, c.to_rgba());
        }
    }
    r
}

fn settings() -> TrapSettings {
    TrapSettings {
        range: validate_range("0", "4pt").unwrap(),
        dpi: 72.0,
        limits: AnalyzerLimits {
            ignore: vec![Colour::WHITE],
            ..Default::default()
        },
    }
}

// -- Stage benchmarks --

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");

    let source = artwork(256);
    let yellow = extract(&source, Colour::rgb(255, 255, 0));

    group.bench_function("analyze_256", |b| b.iter(|| analyze(black_box(&source))));

    group.bench_function("extract_256", |b| {
        b.iter(|| extract(black_box(&source), Colour::rgb(255, 0, 0)))
    });

    group.bench_function("dilate_unmasked_4", |b| {
        b.iter(|| dilate(black_box(&yellow), 4, None).unwrap())
    });

    group.bench_function("erode_4", |b| b.iter(|| erode(black_box(&yellow), 4)));

    group.finish();
}

// -- Full pipeline --

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);

    let small = artwork(128);
    let medium = artwork(512);

    group.bench_function("trap_128", |b| {
        b.iter(|| Trapper::new(settings()).run(black_box(&small), None).unwrap())
    });

    group.bench_function("trap_512", |b| {
        b.iter(|| Trapper::new(settings()).run(black_box(&medium), None).unwrap())
    });

    group.bench_function("mask_512", |b| {
        // Masks read untrapped plates
        let plans: Vec<LayerPlan> = Trapper::new(settings())
            .run(&medium, None)
            .unwrap()
            .layers
            .into_iter()
            .map(|plan| LayerPlan {
                raster: extract(&medium, plan.color.colour),
                ..plan
            })
            .collect();
        b.iter(|| darker_layers_mask(black_box(&plans), 0).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_stages, bench_pipeline);
criterion_main!(benches);

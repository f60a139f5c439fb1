//! Benchmarks for the Squish compression pipeline.
//!
//! Run with: cargo bench -p squish-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use squish_core::pipeline::{fit_dimensions, resize_to_fit, CodecEncoder, QualitySearch};
use squish_core::{Config, Format, ImageCompressor, SelectedFile};
use std::io::Cursor;

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

fn benchmark_fit_dimensions(c: &mut Criterion) {
    c.bench_function("fit_dimensions", |b| {
        b.iter(|| fit_dimensions(black_box(4032), black_box(3024), black_box(1920)))
    });
}

fn benchmark_resize(c: &mut Criterion) {
    let img = gradient(3000, 2000);

    let mut group = c.benchmark_group("resize_3000x2000_to_1920");
    group.sample_size(10);
    for (name, filter) in [
        ("triangle", FilterType::Triangle),
        ("lanczos3", FilterType::Lanczos3),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| resize_to_fit(black_box(img.clone()), 1920, filter))
        });
    }
    group.finish();
}

fn benchmark_quality_search(c: &mut Criterion) {
    let img = gradient(640, 480);
    let search = QualitySearch::default();

    let mut group = c.benchmark_group("quality_search_640x480");
    group.sample_size(10);
    for format in [Format::Jpeg, Format::WebP] {
        group.bench_function(format.label(), |b| {
            b.iter(|| {
                let _ = search.run(&CodecEncoder, black_box(&img), format, 20_000);
            })
        });
    }
    group.finish();
}

fn benchmark_compress(c: &mut Criterion) {
    let mut buffer = Cursor::new(Vec::new());
    gradient(1280, 960)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    let file = SelectedFile::new("bench.png", "image/png", buffer.into_inner());
    let compressor = ImageCompressor::new(&Config::default());

    let mut group = c.benchmark_group("compress");
    group.sample_size(10);
    group.bench_function("png_1280x960", |b| {
        b.iter(|| {
            let _ = compressor.compress(black_box(&file));
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_fit_dimensions,
    benchmark_resize,
    benchmark_quality_search,
    benchmark_compress,
);
criterion_main!(benches);

//! Benchmarks for the Prism variant pipeline.
//!
//! Run with: cargo bench -p prism-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::DynamicImage;
use std::io::Cursor;

use prism_core::pipeline::step::encode;
use prism_core::{ColorExtractor, DominantColor, MedianCut};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::new_rgb8(width, height);
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
    buffer.into_inner()
}

fn benchmark_resize_encode_jpeg(c: &mut Criterion) {
    let img = DynamicImage::new_rgb8(1920, 1080);

    c.bench_function("resize_encode_jpeg_960", |b| {
        b.iter(|| {
            let variant =
                black_box(&img).resize_exact(960, 836, image::imageops::FilterType::Lanczos3);
            let _ = encode(&variant, "jpg");
        })
    });
}

fn benchmark_encode_webp(c: &mut Criterion) {
    let img = DynamicImage::new_rgb8(540, 470);

    c.bench_function("encode_webp_540", |b| {
        b.iter(|| {
            let _ = encode(black_box(&img), "webp");
        })
    });
}

fn benchmark_dominant_color(c: &mut Criterion) {
    let bytes = png_bytes(256, 256);
    let extractor = MedianCut::default();

    c.bench_function("dominant_color_256px", |b| {
        b.iter(|| {
            let _ = extractor.extract(black_box(&bytes));
        })
    });
}

fn benchmark_color_conversion(c: &mut Criterion) {
    c.bench_function("dominant_color_from_rgb", |b| {
        b.iter(|| {
            let _ = DominantColor::from_rgb(black_box(170), black_box(187), black_box(204));
        })
    });
}

criterion_group!(
    benches,
    benchmark_resize_encode_jpeg,
    benchmark_encode_webp,
    benchmark_dominant_color,
    benchmark_color_conversion,
);
criterion_main!(benches);

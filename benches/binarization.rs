use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qr_locator::utils::binarization::{otsu_binarize, otsu_level, threshold_binarize};
use qr_locator::utils::grayscale::rgb_to_grayscale;

fn gradient(width: usize, height: usize) -> Vec<u8> {
    (0..width * height)
        .map(|i| ((i % width) * 255 / width.max(1)) as u8)
        .collect()
}

fn bench_grayscale_medium(c: &mut Criterion) {
    let rgb = vec![128u8; 640 * 480 * 3];
    c.bench_function("rgb_to_grayscale_640x480", |b| {
        b.iter(|| rgb_to_grayscale(black_box(&rgb), black_box(640), black_box(480)))
    });
}

fn bench_otsu_level(c: &mut Criterion) {
    let gray = gradient(640, 480);
    c.bench_function("otsu_level_640x480", |b| {
        b.iter(|| otsu_level(black_box(&gray)))
    });
}

fn bench_otsu_binarize_small(c: &mut Criterion) {
    let gray = gradient(100, 100);
    c.bench_function("otsu_binarize_100x100", |b| {
        b.iter(|| otsu_binarize(black_box(&gray), black_box(100), black_box(100)))
    });
}

fn bench_otsu_binarize_large(c: &mut Criterion) {
    let gray = gradient(1920, 1080);
    c.bench_function("otsu_binarize_1920x1080", |b| {
        b.iter(|| otsu_binarize(black_box(&gray), black_box(1920), black_box(1080)))
    });
}

fn bench_threshold_binarize_medium(c: &mut Criterion) {
    let gray = gradient(640, 480);
    c.bench_function("threshold_binarize_640x480", |b| {
        b.iter(|| {
            threshold_binarize(
                black_box(&gray),
                black_box(640),
                black_box(480),
                black_box(128),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_grayscale_medium,
    bench_otsu_level,
    bench_otsu_binarize_small,
    bench_otsu_binarize_large,
    bench_threshold_binarize_medium
);
criterion_main!(benches);

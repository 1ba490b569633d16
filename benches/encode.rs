use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qrforge::{encode, render, OutputKind, QrCodeEcc, RenderOptions};

fn bench_encode_short(c: &mut Criterion) {
    c.bench_function("encode_hello_world_m", |b| {
        b.iter(|| encode(black_box("HELLO WORLD"), black_box(QrCodeEcc::Medium)))
    });
}

fn bench_encode_url(c: &mut Criterion) {
    let url = "https://example.com/products/12345?ref=newsletter&utm_source=qr";
    c.bench_function("encode_url_q", |b| {
        b.iter(|| encode(black_box(url), black_box(QrCodeEcc::Quartile)))
    });
}

fn bench_encode_version_40(c: &mut Criterion) {
    let text = "a".repeat(2953);
    c.bench_function("encode_v40_l", |b| {
        b.iter(|| encode(black_box(&text), black_box(QrCodeEcc::Low)))
    });
}

fn bench_render_png(c: &mut Criterion) {
    let qr = encode("https://example.com", QrCodeEcc::Medium).unwrap();
    let options = RenderOptions::default().fit_width(300, &qr);
    c.bench_function("render_png_300", |b| {
        b.iter(|| render(black_box(&qr), black_box(&options)).and_then(|img| img.to_bytes()))
    });
}

fn bench_render_svg(c: &mut Criterion) {
    let qr = encode("https://example.com", QrCodeEcc::Medium).unwrap();
    let options = RenderOptions::default().kind(OutputKind::Vector);
    c.bench_function("render_svg", |b| {
        b.iter(|| render(black_box(&qr), black_box(&options)).and_then(|img| img.to_bytes()))
    });
}

criterion_group!(
    benches,
    bench_encode_short,
    bench_encode_url,
    bench_encode_version_40,
    bench_render_png,
    bench_render_svg
);
criterion_main!(benches);

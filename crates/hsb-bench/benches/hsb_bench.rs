//! Benchmarks for the HSB pipeline.
//!
//! Run with: `cargo bench -p hsb-bench`

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use hsb_compute::{Backend, Transfer, create_backend};
use hsb_core::transfer;
use hsb_core::{ColorSpace, Origin, PixelBuffer};
use hsb_ops::{ColorAdjustPipeline, ColorControls, HsbParameters, HueAdjust};
use hsb_render::{FrameRenderer, HeadlessSurface, RenderConfig};

fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let u = x as f32 / width as f32;
            let v = y as f32 / height as f32;
            data.extend_from_slice(&[u, v, 1.0 - u, 1.0]);
        }
    }
    PixelBuffer::from_data(width, height, data, Origin::BottomLeft, ColorSpace::DeviceRgb)
        .unwrap()
}

/// Per-pixel kernels.
fn bench_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernels");
    let pixels: Vec<[f32; 3]> = (0..10000)
        .map(|i| {
            let t = i as f32 / 10000.0;
            [t, 1.0 - t, 0.5]
        })
        .collect();
    group.throughput(Throughput::Elements(pixels.len() as u64));

    let controls = ColorControls::new(1.4, 0.1);
    group.bench_function("color_controls", |b| {
        b.iter(|| {
            pixels
                .iter()
                .map(|&p| controls.apply(black_box(p)))
                .collect::<Vec<_>>()
        })
    });

    let hue = HueAdjust::new(1.2);
    group.bench_function("hue_adjust", |b| {
        b.iter(|| {
            pixels
                .iter()
                .map(|&p| hue.apply(black_box(p)))
                .collect::<Vec<_>>()
        })
    });

    group.bench_function("srgb_eotf", |b| {
        b.iter(|| {
            pixels
                .iter()
                .map(|&p| transfer::eotf_rgb(black_box(p)))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

/// Full pipeline at several sizes.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let pipeline = ColorAdjustPipeline::new();
    let params = HsbParameters::new(0.8, 1.3, 0.05);

    for (w, h) in [(256, 256), (1024, 1024), (1920, 1080)] {
        let src = gradient(w, h);
        group.throughput(Throughput::Elements(w as u64 * h as u64));
        group.bench_with_input(
            BenchmarkId::new("apply", format!("{}x{}", w, h)),
            &src,
            |b, src| b.iter(|| pipeline.apply(black_box(src), params).unwrap()),
        );
    }

    group.finish();
}

/// Individual backend stages on the best available backend.
fn bench_backend(c: &mut Criterion) {
    let backend = create_backend(Backend::Auto).unwrap();
    let src = gradient(1024, 1024);
    let (w, h) = src.dimensions();
    let matrix = ColorControls::new(1.3, 0.05).matrix();
    let (cos, sin) = HueAdjust::new(0.8).rotation();

    let mut group = c.benchmark_group(format!("backend_{}", backend.name()));
    group.throughput(Throughput::Elements(w as u64 * h as u64));

    group.bench_function("upload_download", |b| {
        b.iter(|| {
            let handle = backend.upload(black_box(src.data()), w, h, 4).unwrap();
            backend.download(handle.as_ref()).unwrap()
        })
    });

    let fresh = || backend.upload(src.data(), w, h, 4).unwrap();
    group.bench_function("srgb_decode", |b| {
        b.iter_batched(
            fresh,
            |mut handle| {
                backend
                    .apply_transfer(handle.as_mut(), Transfer::SrgbToLinear)
                    .unwrap()
            },
            BatchSize::LargeInput,
        )
    });
    group.bench_function("affine", |b| {
        b.iter_batched(
            fresh,
            |mut handle| backend.apply_affine(handle.as_mut(), black_box(&matrix)).unwrap(),
            BatchSize::LargeInput,
        )
    });
    group.bench_function("hue_rotate", |b| {
        b.iter_batched(
            fresh,
            |mut handle| backend.apply_hue_rotate(handle.as_mut(), cos, sin).unwrap(),
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

/// One render tick into a headless surface.
fn bench_frame(c: &mut Criterion) {
    let src = gradient(1024, 768);
    let mut surface = HeadlessSurface::new(1024, 768);
    let (renderer, params) = FrameRenderer::from_config(src, &RenderConfig::default()).unwrap();
    params.set_hue(0.5);

    c.bench_function("render_frame_1024x768", |b| {
        b.iter(|| renderer.render_frame(black_box(&mut surface)))
    });
}

criterion_group!(
    benches,
    bench_kernels,
    bench_backend,
    bench_pipeline,
    bench_frame
);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use raw_render_rs::render_pipeline::{
    render_to_bitmap, Adjustments, DecodedImage, HeapAllocator, OutputBound, SampleEncoding,
    ShaderParams,
};
use raw_render_rs::render_pipeline::tone;

fn synthetic_linear_image(width: u32, height: u32) -> DecodedImage {
    let mut data = Vec::with_capacity(width as usize * height as usize * 6);
    for y in 0..height {
        for x in 0..width {
            for channel in 0..3u32 {
                let value = (((x + y + channel * 17) % 4096) * 16) as u16;
                data.extend_from_slice(&value.to_ne_bytes());
            }
        }
    }
    DecodedImage {
        width,
        height,
        channels: 3,
        bits_per_channel: 16,
        encoding: SampleEncoding::Linear,
        data,
    }
}

fn benchmark_render_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_by_size");

    let sizes = vec![(640, 480, "640x480"), (1920, 1080, "1920x1080"), (3000, 2000, "3000x2000")];

    for (width, height, label) in sizes {
        let source = synthetic_linear_image(width, height);
        let params = ShaderParams::derive(&Adjustments {
            exposure_multiplier: 1.4,
            contrast: 1.1,
            whites: 0.3,
            blacks: -0.2,
        });

        group.bench_with_input(BenchmarkId::from_parameter(label), &source, |b, source| {
            b.iter(|| {
                render_to_bitmap(
                    black_box(source),
                    &params,
                    Some(OutputBound::FULL_HD),
                    &HeapAllocator,
                )
            })
        });
    }

    group.finish();
}

fn benchmark_shader(c: &mut Criterion) {
    let params = ShaderParams::derive(&Adjustments {
        exposure_multiplier: 2.0,
        ..Adjustments::default()
    });
    let ramp: Vec<f32> = (0..4096).map(|i| i as f32 / 4095.0 * 8.0).collect();

    c.bench_function("tone_apply_ramp", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for &sample in &ramp {
                acc += tone::apply(black_box(sample), &params);
            }
            acc
        })
    });
}

criterion_group!(benches, benchmark_render_sizes, benchmark_shader);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use skewlat_image::Image;
use skewlat_imgproc::spectrum::build_spectrum;

fn bench_spectrum(c: &mut Criterion) {
    let mut group = c.benchmark_group("Spectrum");

    for (width, height) in [(256, 256), (512, 512), (1000, 1000)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = [*width, *height].into();
        let data = (0..width * height)
            .map(|v| ((v % width) as f64 * 0.3).sin() + ((v / width) as f64 * 0.2).cos())
            .collect();
        let image = Image::new(image_size, data).unwrap();

        group.bench_with_input(
            BenchmarkId::new("rustfft", &parameter_string),
            &image,
            |b, i| b.iter(|| build_spectrum(black_box(i))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_spectrum);
criterion_main!(benches);

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ls_contour::{BoundarySelector, build_boundary_graph, vectorize};
use ls_core::Image;
use ls_label::LabelImage;

const LABELS: u32 = 6;

/// Wavy horizontal bands with a speckle of single-pixel islands.
fn synthetic_bands(w: usize, h: usize) -> LabelImage {
    let band = h as f64 / LABELS as f64;
    let data: Vec<u32> = (0..w * h)
        .map(|i| {
            let (x, y) = ((i % w) as f64, (i / w) as f64);
            let wave = 0.35 * band * (x * 0.013).sin();
            let l = ((y + wave) / band).floor().clamp(0.0, (LABELS - 1) as f64) as u32;
            if i % 997 == 0 {
                (l + 1) % LABELS
            } else {
                l
            }
        })
        .collect();
    Image::from_vec(w, h, data).expect("valid label image")
}

fn bench_vectorize(c: &mut Criterion) {
    let labels = synthetic_bands(1024, 768);

    c.bench_function("ls_contour_vectorize_1024x768x6", |b| {
        b.iter(|| black_box(vectorize(black_box(&labels), LABELS as usize)))
    });

    c.bench_function("ls_contour_pair_boundary_1024x768", |b| {
        b.iter(|| {
            black_box(build_boundary_graph(
                black_box(&labels),
                BoundarySelector::Pair(2, 3),
            ))
        })
    });
}

criterion_group!(benches, bench_vectorize);
criterion_main!(benches);

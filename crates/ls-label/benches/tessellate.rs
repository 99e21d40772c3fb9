use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ls_core::{Image, Point2};
use ls_label::{OverlapPolicy, clear_overlaps, tessellate};
use ls_raster::{PixelGrid, RasterStack};

/// Six horizontal bands with alternating overlaps and gaps.
fn synthetic_stack(width: usize, height: usize) -> RasterStack {
    let mut stack = RasterStack::new(PixelGrid {
        origin: Point2::new(0.0, 0.0),
        width,
        height,
    });

    let band = height / 6;
    for i in 0..6 {
        let top = (i * band).saturating_sub(if i % 2 == 0 { 8 } else { 0 });
        let bottom = ((i + 1) * band).saturating_sub(if i % 2 == 0 { 0 } else { 12 });
        let data: Vec<bool> = (0..width * height)
            .map(|p| {
                let (x, y) = (p % width, p / width);
                let wobble = (x / 37) % 5;
                y + wobble >= top && y < bottom + wobble
            })
            .collect();
        stack.push(
            format!("layer{i}"),
            Image::from_vec(width, height, data).expect("valid plane"),
        );
    }

    stack
}

fn bench_tessellate(c: &mut Criterion) {
    let (width, height) = (1024, 768);
    let base = synthetic_stack(width, height);
    let ranks: Vec<usize> = (0..base.len()).collect();
    let mask = Image::new_fill(width, height, true);

    c.bench_function("ls_label_clear_and_tessellate_1024x768x6", |b| {
        b.iter(|| {
            let mut stack = base.clone();
            clear_overlaps(&mut stack, OverlapPolicy::ClearAll, black_box(&ranks));
            let labels = tessellate(&stack, black_box(&mask), &ranks);
            black_box(labels.len());
        });
    });
}

criterion_group!(benches, bench_tessellate);
criterion_main!(benches);

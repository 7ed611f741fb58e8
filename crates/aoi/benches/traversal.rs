use aoi::{BitMask, BitMaskIterator, ModeType, RasterDescriptor};
use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};

/// Checkerboard of 8x8 squares over a `size` x `size` area
fn checkerboard(size: i32) -> BitMask {
    let mut mask = BitMask::new();
    for y in (0..size).step_by(8) {
        for x in (0..size).step_by(8) {
            if (x / 8 + y / 8) % 2 == 0 {
                mask.set_region(x, y, x + 7, y + 7, ModeType::Draw);
            }
        }
    }
    mask
}

fn bench_iterator(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal/iterator");

    for size in [256i32, 1_024, 2_048] {
        let mask = checkerboard(size);
        let raster = RasterDescriptor::new(size as u32, size as u32);
        group.throughput(Throughput::Elements((size as u64) * (size as u64)));

        group.bench_with_input(BenchmarkId::new("walk", size), &mask, |b, mask| {
            b.iter(|| {
                let walked = BitMaskIterator::from_raster(Some(mask), &raster).fold(0u64, |sum, location| {
                    sum + location.x as u64
                });
                black_box(walked);
            });
        });

        group.bench_with_input(BenchmarkId::new("count", size), &mask, |b, mask| {
            b.iter(|| black_box(BitMaskIterator::from_raster(Some(mask), &raster).pixel_count()));
        });

        let mut inverted = mask.clone();
        inverted.invert();
        group.bench_with_input(BenchmarkId::new("walk_inverted", size), &inverted, |b, mask| {
            b.iter(|| black_box(BitMaskIterator::from_raster(Some(mask), &raster).last()));
        });
    }

    group.finish();
}

fn bench_set_region(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal/set_region");

    for size in [64i32, 512, 4_096] {
        group.throughput(Throughput::Elements((size as u64) * (size as u64)));

        group.bench_with_input(BenchmarkId::new("region", size), &size, |b, &size| {
            b.iter_batched(
                BitMask::new,
                |mut mask| {
                    mask.set_region(3, 3, size + 2, size + 2, ModeType::Toggle);
                    black_box(mask);
                },
                BatchSize::SmallInput,
            );
        });

        if size > 512 {
            continue;
        }
        group.bench_with_input(BenchmarkId::new("pixel_loop", size), &size, |b, &size| {
            b.iter_batched(
                BitMask::new,
                |mut mask| {
                    for y in 3..size + 3 {
                        for x in 3..size + 3 {
                            mask.set_pixel(x, y, true);
                        }
                    }
                    black_box(mask);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal/algebra");
    let lhs = checkerboard(1_024);
    let mut rhs = BitMask::rectangle(100, 100, 1_500, 900);
    rhs.invert();

    group.bench_function("merge", |b| {
        b.iter_batched(
            || lhs.clone(),
            |mut mask| {
                mask.merge(&rhs);
                black_box(mask);
            },
            BatchSize::LargeInput,
        );
    });
    group.bench_function("is_subset_of", |b| {
        b.iter(|| black_box(lhs.is_subset_of(&rhs)));
    });

    group.finish();
}

criterion_group!(benches, bench_iterator, bench_set_region, bench_algebra);
criterion_main!(benches);

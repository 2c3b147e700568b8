// Snapshot benchmarks - build, bulk removal, moves and reloads at list sizes
// typical for grouped tables.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use sectioned::Snapshot;

const SIZES: [u32; 3] = [100, 1_000, 10_000];
const SECTIONS: u32 = 10;

fn build(total: u32) -> Snapshot<u32, u32> {
    let mut snapshot = Snapshot::with_sections(0..SECTIONS).unwrap();
    let per_section = total / SECTIONS;
    for section in 0..SECTIONS {
        let first = section * per_section;
        snapshot.append_items_into(first..first + per_section, &section).unwrap();
    }
    return snapshot;
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| black_box(build(size)));
        });
    }
    group.finish();
}

fn bench_remove_every_other(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_every_other");
    for size in SIZES {
        let snapshot = build(size);
        group.throughput(Throughput::Elements(size as u64 / 2));
        group.bench_with_input(BenchmarkId::from_parameter(size), &snapshot, |b, snapshot| {
            b.iter(|| {
                let mut snapshot = snapshot.clone();
                snapshot.remove_items((0..size).step_by(2));
                black_box(snapshot)
            });
        });
    }
    group.finish();
}

fn bench_move_across_sections(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_across_sections");
    for size in SIZES {
        let snapshot = build(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &snapshot, |b, snapshot| {
            b.iter(|| {
                let mut snapshot = snapshot.clone();
                snapshot.move_item_before(&(size - 1), &0).unwrap();
                black_box(snapshot)
            });
        });
    }
    group.finish();
}

fn bench_reload(c: &mut Criterion) {
    let mut group = c.benchmark_group("reload_items");
    for size in SIZES {
        let snapshot = build(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &snapshot, |b, snapshot| {
            b.iter(|| {
                let mut snapshot = snapshot.clone();
                snapshot.reload_items((0..size).step_by(10)).unwrap();
                black_box(snapshot)
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_remove_every_other,
    bench_move_across_sections,
    bench_reload
);
criterion_main!(benches);

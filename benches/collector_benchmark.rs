//! Performance benchmarks for the event collector hot path.
//!
//! **Benchmarks Included:**
//! - `normalize_path`: leading-separator fix on clean and defective paths
//! - `events_log_record`: appending operations for 100, 1000 and 10000 paths
//!
//! **Run benchmarks:**
//! ```bash
//! cargo bench                          # Run all benchmarks
//! cargo bench -- events_log_record     # Log appends only
//! ```

use std::path::{Path, PathBuf};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use treenotify::notifier::normalize_path;
use treenotify::{EventsLog, Op};

fn bench_normalize_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_path");

    group.bench_function("clean", |b| {
        b.iter(|| normalize_path(black_box(Path::new("/srv/project/src/main.rs"))));
    });

    group.bench_function("doubled_root", |b| {
        b.iter(|| normalize_path(black_box(Path::new("//srv/project/src/main.rs"))));
    });

    group.finish();
}

fn bench_events_log_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("events_log_record");

    for count in [100_usize, 1_000, 10_000] {
        let paths: Vec<PathBuf> = (0..count)
            .map(|i| PathBuf::from(format!("/srv/project/dir{}/file{i}.rs", i % 32)))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &paths, |b, paths| {
            b.iter(|| {
                let mut log = EventsLog::new();
                // Each path sees a create followed by two writes.
                for op in [Op::CREATE, Op::WRITE, Op::WRITE] {
                    for path in paths {
                        log.record(path, op);
                    }
                }
                black_box(log.total_ops())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize_path, bench_events_log_record);
criterion_main!(benches);

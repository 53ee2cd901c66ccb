//! Search structure benchmarks.
//!
//! Wall-clock counterparts of the transfer and comparison counts reported by
//! the CLI: building each structure over a generated record file, and looking
//! up a key in it.

#![allow(clippy::expect_used)]

use std::hint::black_box;
use std::path::{Path, PathBuf};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use searchbench::btree::{BTree, DEFAULT_ORDER};
use searchbench::index::SequentialIndex;
use searchbench::pbst::{NodeFile, Pbst};
use searchbench::record::{self, KeyOrder, RecordFile};
use searchbench::types::Cost;
use tempfile::{TempDir, tempdir};

const QUANTITIES: [u64; 2] = [1_000, 10_000];

fn record_file(dir: &TempDir, order: KeyOrder, quantity: u64) -> PathBuf {
    let path = dir.path().join(record::record_file_name(order, quantity));
    record::generate(&path, quantity, order, &mut StdRng::seed_from_u64(42))
        .expect("generate records");
    path
}

fn open(path: &Path) -> RecordFile {
    RecordFile::open(path).expect("open records")
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(10);
    let dir = tempdir().expect("create temp dir");

    for quantity in QUANTITIES {
        let path = record_file(&dir, KeyOrder::Random, quantity);

        group.bench_with_input(BenchmarkId::new("index", quantity), &path, |b, path| {
            b.iter(|| {
                let mut cost = Cost::new();
                SequentialIndex::build(&mut open(path), 100, &mut cost).expect("build");
                black_box(cost)
            });
        });

        group.bench_with_input(BenchmarkId::new("pbst", quantity), &path, |b, path| {
            let node_path = path.with_extension("pbst");
            b.iter(|| {
                let mut cost = Cost::new();
                let nodes = NodeFile::create(&node_path).expect("create nodes");
                Pbst::build(nodes, &mut open(path), &mut cost).expect("build");
                black_box(cost)
            });
        });

        for order in [DEFAULT_ORDER, 16, 64] {
            group.bench_with_input(
                BenchmarkId::new(format!("btree_order_{order}"), quantity),
                &path,
                |b, path| {
                    b.iter(|| {
                        let mut cost = Cost::new();
                        let tree = BTree::build(order, &mut open(path), &mut cost).expect("build");
                        black_box(tree.release())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let dir = tempdir().expect("create temp dir");

    for quantity in QUANTITIES {
        let path = record_file(&dir, KeyOrder::Ascending, quantity);
        let mut records = open(&path);
        let key = i32::try_from(quantity / 2).expect("key fits");

        let index =
            SequentialIndex::build(&mut records, 100, &mut Cost::new()).expect("build index");
        group.bench_function(BenchmarkId::new("index", quantity), |b| {
            b.iter(|| {
                let mut cost = Cost::new();
                black_box(index.search(&mut records, black_box(key), &mut cost).expect("search"))
            });
        });

        let nodes = NodeFile::create(&path.with_extension("pbst")).expect("create nodes");
        let mut pbst = Pbst::build(nodes, &mut records, &mut Cost::new()).expect("build pbst");
        group.bench_function(BenchmarkId::new("pbst", quantity), |b| {
            b.iter(|| {
                let mut cost = Cost::new();
                black_box(pbst.search(black_box(key), &mut cost).expect("search"))
            });
        });

        let btree =
            BTree::build(DEFAULT_ORDER, &mut records, &mut Cost::new()).expect("build btree");
        group.bench_function(BenchmarkId::new("btree", quantity), |b| {
            b.iter(|| {
                let mut cost = Cost::new();
                black_box(btree.search(black_box(key), &mut cost))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);

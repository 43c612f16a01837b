//! Throughput of the read and write paths against a warm `AtomicStore`.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use arktree::{AtomicStore, Config, WriteSet};

fn seeded_store(dir: &std::path::Path, entries: usize) -> AtomicStore {
    let store = AtomicStore::start(dir, Config::default()).unwrap();
    for i in 0..entries {
        store
            .mutate(
                WriteSet::new().put(format!("key-{:08}", i).into_bytes(), format!("value-{:08}", i).into_bytes()),
                false,
            )
            .unwrap();
    }
    store.compact_now();
    store
}

fn bench_get(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(dir.path(), 10_000);
    let mut i = 0usize;
    c.bench_function("get_existing_key", |b| {
        b.iter(|| {
            let key = format!("key-{:08}", i % 10_000);
            i += 1;
            store.get(key.as_bytes()).unwrap()
        })
    });
}

fn bench_range(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(dir.path(), 10_000);
    c.bench_function("range_1000_entries", |b| {
        b.iter(|| store.range(Some(b"key-00001000"), Some(b"key-00002000"), false).unwrap())
    });
}

fn bench_unsynced_put(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let store = AtomicStore::start(dir.path(), Config::default()).unwrap();
    let mut i = 0usize;
    c.bench_function("mutate_unsynced_put", |b| {
        b.iter(|| {
            let key = format!("k-{:08}", i);
            i += 1;
            store.mutate(WriteSet::new().put(key.into_bytes(), b"v".to_vec()), false).unwrap();
        })
    });
}

fn bench_synced_put(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let store = AtomicStore::start(dir.path(), Config::default()).unwrap();
    let mut i = 0usize;
    c.bench_function("mutate_synced_put", |b| {
        b.iter(|| {
            let key = format!("k-{:08}", i);
            i += 1;
            store.mutate(WriteSet::new().put(key.into_bytes(), b"v".to_vec()), true).unwrap();
        })
    });
}

fn bench_compaction(c: &mut Criterion) {
    c.bench_function("compact_now_10k_entries", |b| {
        b.iter_batched(
            || {
                let dir = tempfile::tempdir().unwrap();
                let store = AtomicStore::start(dir.path(), Config::default()).unwrap();
                for i in 0..10_000 {
                    store
                        .mutate(WriteSet::new().put(format!("k{:08}", i).into_bytes(), b"v".to_vec()), false)
                        .unwrap();
                }
                (dir, store)
            },
            |(_dir, store)| store.compact_now(),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_get, bench_range, bench_unsynced_put, bench_synced_put, bench_compaction);
criterion_main!(benches);

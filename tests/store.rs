//! End-to-end `AtomicStore` scenarios: crash recovery, hot copy racing a
//! compaction, and counter adjusts folding across generations
//! (spec section 8, scenarios 3-6).

use std::thread;

use arktree::{decode_counter, encode_counter, ArrayWriter, AtomicStore, Config, WriteSet};

#[test]
fn crash_before_gen_switch_recovers_to_the_old_generation() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = AtomicStore::start(dir.path(), Config::default()).unwrap();
        store.mutate(WriteSet::new().put(b"a".to_vec(), b"1".to_vec()), true).unwrap();
        store.stop().unwrap();
    }

    // A compaction that finished writing generation 1's blobs but crashed
    // before the gen pointer was switched over leaves these files stray.
    let indx1 = dir.path().join("indx.1");
    let keys1 = dir.path().join("keys.1");
    let vals1 = dir.path().join("vals.1");
    {
        let mut indx = std::fs::File::create(&indx1).unwrap();
        let mut keysb = std::fs::File::create(&keys1).unwrap();
        let mut valsb = std::fs::File::create(&vals1).unwrap();
        let mut w = ArrayWriter::new(&mut indx, &mut keysb, &mut valsb);
        w.append(b"a", b"1").unwrap();
        w.append(b"b", b"2").unwrap();
        w.flush().unwrap();
    }

    let store = AtomicStore::start(dir.path(), Config::default()).unwrap();
    let stats = store.stats();
    assert_eq!(stats.generation, 0);
    assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(store.get(b"b").unwrap(), None);
}

#[test]
fn hot_copy_racing_a_compaction_still_captures_every_write() {
    let dir = tempfile::tempdir().unwrap();
    let store = AtomicStore::start(dir.path(), Config::default()).unwrap();
    for i in 0..500 {
        store
            .mutate(
                WriteSet::new().put(format!("k{:04}", i).into_bytes(), format!("v{}", i).into_bytes()),
                false,
            )
            .unwrap();
    }

    let compacting_handle = store.clone();
    let compactor_thread = thread::spawn(move || compacting_handle.compact_now());

    let dest = tempfile::tempdir().unwrap();
    store.hot_copy(dest.path()).unwrap();
    compactor_thread.join().unwrap();

    let copy = AtomicStore::start(dest.path(), Config::default()).unwrap();
    for i in 0..500 {
        let key = format!("k{:04}", i);
        assert_eq!(copy.get(key.as_bytes()).unwrap(), Some(format!("v{}", i).into_bytes()));
    }
}

#[test]
fn counter_adjust_survives_compaction_and_removal() {
    let dir = tempfile::tempdir().unwrap();
    let store = AtomicStore::start(dir.path(), Config::default()).unwrap();

    store.mutate(WriteSet::new().put(b"ctr".to_vec(), encode_counter(10)), true).unwrap();
    store.compact_now();

    store.mutate(WriteSet::new().adjust(b"ctr".to_vec(), 5), true).unwrap();
    assert_eq!(decode_counter(&store.get(b"ctr").unwrap().unwrap()), Some(15));

    store.compact_now();
    assert_eq!(decode_counter(&store.get(b"ctr").unwrap().unwrap()), Some(15));

    store
        .mutate(WriteSet::new().remove_range(Some(b"c".to_vec()), Some(b"d".to_vec())), true)
        .unwrap();
    store.mutate(WriteSet::new().adjust(b"ctr".to_vec(), 1), true).unwrap();
    store.compact_now();
    assert_eq!(store.get(b"ctr").unwrap(), None);
}

#[test]
fn reopen_after_a_background_compaction_reflects_the_new_generation() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = AtomicStore::start(dir.path(), Config::default()).unwrap();
        store.mutate(WriteSet::new().put(b"a".to_vec(), b"1".to_vec()), true).unwrap();
        store.mutate(WriteSet::new().put(b"b".to_vec(), b"2".to_vec()), true).unwrap();
        store.compact_now();
        store.mutate(WriteSet::new().put(b"c".to_vec(), b"3".to_vec()), true).unwrap();
        store.stop().unwrap();
    }

    let store = AtomicStore::start(dir.path(), Config::default()).unwrap();
    assert_eq!(store.stats().generation, 1);
    assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
    assert_eq!(store.get(b"c").unwrap(), Some(b"3".to_vec()));
}

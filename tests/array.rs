//! Encode/decode round-trip and prefix-cache correctness scenarios
//! (spec section 8, scenarios 1-2).

use arktree::{ArrayStore, ArrayWriter};

fn build_store(keys: &[String]) -> ArrayStore {
    let mut indx = Vec::new();
    let mut keysb = Vec::new();
    let mut valsb = Vec::new();
    {
        let mut w = ArrayWriter::new(&mut indx, &mut keysb, &mut valsb);
        for (i, k) in keys.iter().enumerate() {
            w.append(k.as_bytes(), format!("{}", i).as_bytes()).unwrap();
        }
        w.flush().unwrap();
    }
    ArrayStore::from_buffers(indx, keysb, valsb).unwrap()
}

#[test]
fn forty_key_round_trip() {
    let keys: Vec<String> = (0..40).map(|i| format!("k{:03}", i)).collect();
    let store = build_store(&keys);
    assert_eq!(store.len(), 40);

    let finder = store.finder();
    assert_eq!(finder.read_key(0).unwrap(), b"k000");
    assert_eq!(finder.read_key(32).unwrap(), b"k032");
    assert_eq!(finder.read_key(33).unwrap(), b"k033");

    assert_eq!(store.get(b"k017").unwrap().unwrap(), b"17");
    assert!(store.get_at_least(b"k100").unwrap().is_none());
}

#[test]
fn prefix_cache_agrees_with_a_fresh_finder() {
    let keys: Vec<String> = ["apple", "banana", "bandana", "cherry"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let store = build_store(&keys);

    let mut finder = store.finder();
    finder.find(b"banana").ok();
    let narrowed = finder.find(b"bandana");

    let mut fresh = store.finder();
    let from_fresh = fresh.find(b"bandana");

    assert_eq!(narrowed, from_fresh);
}

#[test]
fn ascending_adjacent_keys_invariant_holds() {
    let keys: Vec<String> = (0..200).map(|i| format!("key-{:05}", i)).collect();
    let store = build_store(&keys);
    let entries: Vec<_> = store.range(None, None, false).map(|e| e.unwrap()).collect();
    for pair in entries.windows(2) {
        assert!(pair[0].key < pair[1].key);
    }
}

#[test]
fn empty_store_boundaries() {
    let store = build_store(&[]);
    assert!(store.get_at_least(b"").unwrap().is_none());
    assert_eq!(store.range(None, None, false).count(), 0);
}

#[test]
fn single_entry_store_insertion_points() {
    let store = build_store(&["m".to_string()]);
    let mut finder = store.finder();
    assert_eq!(finder.find(b"m"), Ok(0));
    assert_eq!(finder.find(b"a"), Err(0));
    assert_eq!(finder.find(b"z"), Err(1));
}

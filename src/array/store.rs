//! `ArrayStore`: the read-only ordered KV view over one `ArrayImage`.

use std::path::Path;
use std::sync::Arc;

use crate::array::finder::Blob;
use crate::array::{ArrayFinder, Entry};
use crate::error::{Error, Result};

/// Three immutable blobs (`indx`, `keys`, `vals`) for one generation.
pub struct ArrayStore {
    indx: Arc<Blob>,
    keys: Arc<Blob>,
    vals: Arc<Blob>,
    n: usize,
}

impl ArrayStore {
    /// Load a generation's three blobs from disk.
    pub fn open(indx_path: &Path, keys_path: &Path, vals_path: &Path) -> Result<ArrayStore> {
        let indx = Blob::load(indx_path)?;
        let keys = Blob::load(keys_path)?;
        let vals = Blob::load(vals_path)?;
        Self::from_blobs(indx, keys, vals)
    }

    /// Build a store from in-memory buffers, primarily for tests and for
    /// the compactor's freshly-built (not-yet-flushed) generation.
    pub fn from_buffers(indx: Vec<u8>, keys: Vec<u8>, vals: Vec<u8>) -> Result<ArrayStore> {
        Self::from_blobs(Blob::Heap(indx), Blob::Heap(keys), Blob::Heap(vals))
    }

    fn from_blobs(indx: Blob, keys: Blob, vals: Blob) -> Result<ArrayStore> {
        if indx.len() % 8 != 0 {
            return Err(Error::Corrupt(format!(
                "indx length {} is not a multiple of 8",
                indx.len()
            )));
        }
        if keys.len() as u64 >= (1u64 << 31) {
            return Err(Error::Corrupt("keys blob exceeds 2 GiB bound".into()));
        }
        if vals.len() as u64 >= (1u64 << 31) {
            return Err(Error::Corrupt("vals blob exceeds 2 GiB bound".into()));
        }
        let n = indx.len() / 8;
        Ok(ArrayStore {
            indx: Arc::new(indx),
            keys: Arc::new(keys),
            vals: Arc::new(vals),
            n,
        })
    }

    /// An empty, generation-0 style store, used when starting a fresh
    /// directory.
    pub fn empty() -> ArrayStore {
        ArrayStore {
            indx: Arc::new(Blob::empty()),
            keys: Arc::new(Blob::empty()),
            vals: Arc::new(Blob::empty()),
            n: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// A fresh, single-threaded finder with an empty prefix cache.
    pub fn finder(&self) -> ArrayFinder {
        ArrayFinder::new(
            Arc::clone(&self.indx),
            Arc::clone(&self.keys),
            Arc::clone(&self.vals),
            self.n,
        )
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let mut finder = self.finder();
        match finder.find(key) {
            Ok(i) => Ok(Some(finder.read_value(i)?)),
            Err(_) => Ok(None),
        }
    }

    pub fn get_at_least(&self, min: &[u8]) -> Result<Option<Entry>> {
        let mut finder = self.finder();
        let i = match finder.find(min) {
            Ok(i) => i,
            Err(i) => i,
        };
        self.entry_at(&finder, i)
    }

    pub fn get_at_most(&self, max: &[u8]) -> Result<Option<Entry>> {
        let mut finder = self.finder();
        let i = match finder.find(max) {
            Ok(i) => i,
            Err(i) => i,
        };
        if i == 0 {
            Ok(None)
        } else {
            self.entry_at(&finder, i - 1)
        }
    }

    fn entry_at(&self, finder: &ArrayFinder, i: usize) -> Result<Option<Entry>> {
        if i >= self.n {
            Ok(None)
        } else {
            Ok(Some(Entry::new(finder.read_key(i)?, finder.read_value(i)?)))
        }
    }

    /// Index at or above `min` (0 if `min` is `None`).
    fn lower_index(&self, finder: &mut ArrayFinder, min: Option<&[u8]>) -> usize {
        match min {
            None => 0,
            Some(k) => match finder.find(k) {
                Ok(i) => i,
                Err(i) => i,
            },
        }
    }

    /// Index at or above `max` (n if `max` is `None`), i.e. the exclusive
    /// upper bound of the `[lo, hi)` window.
    fn upper_index(&self, finder: &mut ArrayFinder, max: Option<&[u8]>) -> usize {
        match max {
            None => self.n,
            Some(k) => match finder.find(k) {
                Ok(i) => i,
                Err(i) => i,
            },
        }
    }

    /// Lazy, finite, non-restartable scan of `[min, max)` in ascending or
    /// descending key order.
    pub fn range(&self, min: Option<&[u8]>, max: Option<&[u8]>, reverse: bool) -> RangeIter {
        let mut finder = self.finder();
        let lo = self.lower_index(&mut finder, min);
        let hi = self.upper_index(&mut finder, max);
        let hi = hi.max(lo);
        RangeIter {
            finder,
            lo,
            hi,
            reverse,
            pos: if reverse { hi } else { lo },
        }
    }

    /// `ArrayStore` is read-only; any write attempt fails.
    pub fn put(&self, _key: &[u8], _value: &[u8]) -> Result<()> {
        Err(Error::ReadOnly)
    }

    /// Write this generation's three blobs out verbatim to new paths,
    /// fsyncing each. Used by `AtomicStore::hot_copy` to materialize a
    /// standalone copy of the currently active generation.
    pub fn write_to(&self, indx_path: &Path, keys_path: &Path, vals_path: &Path) -> Result<()> {
        write_blob_file(indx_path, &self.indx)?;
        write_blob_file(keys_path, &self.keys)?;
        write_blob_file(vals_path, &self.vals)?;
        Ok(())
    }
}

fn write_blob_file(path: &Path, blob: &Blob) -> Result<()> {
    use std::io::Write;
    let mut file = crate::util::create_file_w(path)?;
    file.write_all(blob)?;
    file.sync_all()?;
    Ok(())
}

/// Lazy iterator over an `ArrayStore` range. Holds no lock; safe to
/// interleave with other readers, not restartable once exhausted.
pub struct RangeIter {
    finder: ArrayFinder,
    lo: usize,
    hi: usize,
    reverse: bool,
    pos: usize,
}

impl Iterator for RangeIter {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reverse {
            if self.pos <= self.lo {
                return None;
            }
            self.pos -= 1;
            let i = self.pos;
            Some(
                self.finder
                    .read_key(i)
                    .and_then(|k| self.finder.read_value(i).map(|v| Entry::new(k, v))),
            )
        } else {
            if self.pos >= self.hi {
                return None;
            }
            let i = self.pos;
            self.pos += 1;
            Some(
                self.finder
                    .read_key(i)
                    .and_then(|k| self.finder.read_value(i).map(|v| Entry::new(k, v))),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::ArrayWriter;

    fn store_of(keys: &[&str]) -> ArrayStore {
        let mut indx = Vec::new();
        let mut keysb = Vec::new();
        let mut valsb = Vec::new();
        {
            let mut w = ArrayWriter::new(&mut indx, &mut keysb, &mut valsb);
            for (i, k) in keys.iter().enumerate() {
                w.append(k.as_bytes(), format!("v{}", i).as_bytes()).unwrap();
            }
            w.flush().unwrap();
        }
        ArrayStore::from_buffers(indx, keysb, valsb).unwrap()
    }

    #[test]
    fn empty_store_boundaries() {
        let store = ArrayStore::empty();
        assert!(store.get_at_least(b"").unwrap().is_none());
        let entries: Vec<_> = store.range(None, None, false).collect();
        assert!(entries.is_empty());
    }

    #[test]
    fn forward_and_reverse_ranges_agree() {
        let store = store_of(&["a", "b", "c", "d", "e"]);
        let fwd: Vec<Vec<u8>> = store
            .range(Some(b"b"), Some(b"e"), false)
            .map(|e| e.unwrap().key)
            .collect();
        assert_eq!(fwd, vec![b"b".to_vec(), b"c".to_vec(), b"d".to_vec()]);

        let rev: Vec<Vec<u8>> = store
            .range(Some(b"b"), Some(b"e"), true)
            .map(|e| e.unwrap().key)
            .collect();
        assert_eq!(rev, vec![b"d".to_vec(), b"c".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn read_only_rejects_writes() {
        let store = store_of(&["a"]);
        assert!(matches!(store.put(b"x", b"y"), Err(Error::ReadOnly)));
    }

    #[test]
    fn get_at_most_is_strictly_less() {
        let store = store_of(&["a", "c", "e"]);
        let e = store.get_at_most(b"d").unwrap().unwrap();
        assert_eq!(e.key, b"c");
        let e = store.get_at_most(b"c").unwrap().unwrap();
        assert_eq!(e.key, b"a");
    }
}

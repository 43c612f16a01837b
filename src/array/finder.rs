//! `ArrayFinder`: key reconstruction and binary search with a per-finder
//! prefix-locality cache, per spec section 4.2.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;

use crate::array::GROUP_SIZE;
use crate::error::{Error, Result};
use crate::util::read_u32_be;

/// Below this size, a blob is read fully into a heap buffer instead of
/// mapped; above it, it is memory-mapped read-only. Matches the teacher's
/// "read into a buffer if below a size threshold" lifecycle note.
pub const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// A read-only byte blob, either heap-buffered or memory-mapped.
pub enum Blob {
    Heap(Vec<u8>),
    Mapped(Mmap),
}

impl Blob {
    pub fn load(path: &Path) -> Result<Blob> {
        let file = fs::File::open(path)?;
        let len = file.metadata()?.len();
        if len < MMAP_THRESHOLD {
            use std::io::Read;
            let mut buf = Vec::with_capacity(len as usize);
            let mut file = file;
            file.read_to_end(&mut buf)?;
            Ok(Blob::Heap(buf))
        } else {
            // SAFETY: the file is immutable for the lifetime of this
            // generation by construction (ArrayWriter never reopens a
            // published blob for writing), which is the invariant mmap's
            // safety contract requires of the caller.
            let mmap = unsafe { Mmap::map(&file)? };
            Ok(Blob::Mapped(mmap))
        }
    }

    pub fn empty() -> Blob {
        Blob::Heap(Vec::new())
    }
}

impl std::ops::Deref for Blob {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Blob::Heap(v) => v.as_slice(),
            Blob::Mapped(m) => &m[..],
        }
    }
}

const CACHE_CAP: usize = 20;

/// Per-finder prefix-locality cache: the longest prefix of the most recent
/// search key for which the `[lo, hi)` index window is known to contain
/// every key sharing that prefix.
struct PrefixCache {
    prefix: Vec<u8>,
    lo: usize,
    hi: usize,
}

impl PrefixCache {
    fn empty() -> PrefixCache {
        PrefixCache {
            prefix: Vec::new(),
            lo: 0,
            hi: 0,
        }
    }
}

/// Single-threaded cursor over one `ArrayImage`. Not `Sync`/shareable across
/// threads: each reader thread should hold its own finder so the prefix
/// cache stays useful instead of thrashing.
pub struct ArrayFinder {
    indx: Arc<Blob>,
    keys: Arc<Blob>,
    vals: Arc<Blob>,
    n: usize,
    cache: PrefixCache,
}

impl ArrayFinder {
    pub(crate) fn new(indx: Arc<Blob>, keys: Arc<Blob>, vals: Arc<Blob>, n: usize) -> ArrayFinder {
        ArrayFinder {
            indx,
            keys,
            vals,
            n,
            cache: PrefixCache::empty(),
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    fn locator(&self, i: usize) -> u32 {
        read_u32_be(&self.indx, i * 8)
    }

    fn value_offset(&self, i: usize) -> u32 {
        read_u32_be(&self.indx, i * 8 + 4)
    }

    /// Offset in `keys` marking the end of entry `i`'s key material (its
    /// base offset for a base entry, its suffix offset for a successor).
    fn next_offset(&self, i: usize) -> Result<u32> {
        if i + 1 >= self.n {
            return Ok(self.keys.len() as u32);
        }
        if (i + 1) % GROUP_SIZE == 0 {
            Ok(self.locator(i + 1))
        } else {
            let base = i - i % GROUP_SIZE;
            let base_off = self.locator(base);
            let loc = self.locator(i + 1);
            let suffix_rel = loc & 0x00FF_FFFF;
            Ok(base_off + suffix_rel)
        }
    }

    /// Reconstruct the key stored at index `i`.
    pub fn read_key(&self, i: usize) -> Result<Vec<u8>> {
        if i >= self.n {
            return Err(Error::Corrupt(format!("index {} out of range ({})", i, self.n)));
        }
        let base = i - i % GROUP_SIZE;
        let base_off = self.locator(base);
        let next = self.next_offset(i)?;
        if i == base {
            let len = next
                .checked_sub(base_off)
                .ok_or_else(|| Error::Corrupt("negative base key length".into()))?;
            let start = base_off as usize;
            Ok(self.keys[start..start + len as usize].to_vec())
        } else {
            let loc = self.locator(i);
            let prefix_len = (loc >> 24) as usize;
            let suffix_rel = loc & 0x00FF_FFFF;
            let suffix_off = base_off + suffix_rel;
            let suffix_len = next
                .checked_sub(suffix_off)
                .ok_or_else(|| Error::Corrupt("negative suffix length".into()))?;
            if suffix_len == 0 {
                return Err(Error::Corrupt(format!(
                    "non-base entry {} has zero-length suffix (duplicate of its base)",
                    i
                )));
            }
            let mut out = Vec::with_capacity(prefix_len + suffix_len as usize);
            let base_start = base_off as usize;
            out.extend_from_slice(&self.keys[base_start..base_start + prefix_len]);
            let suffix_start = suffix_off as usize;
            out.extend_from_slice(&self.keys[suffix_start..suffix_start + suffix_len as usize]);
            Ok(out)
        }
    }

    /// Read the value stored at index `i`.
    pub fn read_value(&self, i: usize) -> Result<Vec<u8>> {
        if i >= self.n {
            return Err(Error::Corrupt(format!("index {} out of range ({})", i, self.n)));
        }
        let off = self.value_offset(i);
        let next = if i + 1 < self.n {
            self.value_offset(i + 1)
        } else {
            self.vals.len() as u32
        };
        let len = next
            .checked_sub(off)
            .ok_or_else(|| Error::Corrupt("negative value length".into()))?;
        let start = off as usize;
        Ok(self.vals[start..start + len as usize].to_vec())
    }

    fn trim_cache(&self, search: &[u8]) -> (usize, usize) {
        if self.cache.prefix.is_empty() {
            return (0, self.n);
        }
        let shared = self
            .cache
            .prefix
            .iter()
            .zip(search.iter())
            .take_while(|(a, b)| a == b)
            .count();
        if shared >= self.cache.prefix.len() {
            (self.cache.lo, self.cache.hi)
        } else {
            (0, self.n)
        }
    }

    fn update_cache(&mut self, search: &[u8], lo: usize, hi: usize, found: Option<usize>) {
        // Matched length is determined by the neighbor(s) straddling the
        // final window: the entry just inside the window on the low side
        // (the match itself, or the insertion point's left/right
        // neighbors).
        let mut matched = 0usize;
        let mut probe = |idx: usize, matched: &mut usize| {
            if let Ok(key) = self.read_key(idx) {
                let m = key
                    .iter()
                    .zip(search.iter())
                    .take_while(|(a, b)| a == b)
                    .count();
                if m > *matched {
                    *matched = m;
                }
            }
        };
        match found {
            Some(i) => probe(i, &mut matched),
            None => {
                if lo > 0 {
                    probe(lo - 1, &mut matched);
                }
                if lo < self.n {
                    probe(lo, &mut matched);
                }
            }
        }
        let matched = matched.min(CACHE_CAP).min(search.len());
        self.cache.prefix = search[..matched].to_vec();
        self.cache.lo = lo;
        self.cache.hi = hi;
    }

    /// Locate `key`. Returns `Ok(index)` on an exact match, `Err(insertion)`
    /// otherwise -- the same convention as `[T]::binary_search`, standing in
    /// for the bitwise-complement return used by the reference design.
    pub fn find(&mut self, key: &[u8]) -> std::result::Result<usize, usize> {
        let (start_lo, start_hi) = self.trim_cache(key);
        let mut lo = start_lo;
        let mut hi = start_hi;
        let mut found = None;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let mid_key = match self.read_key(mid) {
                Ok(k) => k,
                Err(_) => break,
            };
            match mid_key.as_slice().cmp(key) {
                Ordering::Equal => {
                    found = Some(mid);
                    break;
                }
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
            }
        }
        let result = match found {
            Some(i) => Ok(i),
            None => Err(lo),
        };
        self.update_cache(key, lo, hi.max(lo), found);
        result
    }
}

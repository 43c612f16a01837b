//! `MutationSet`: the in-memory layer of puts, remove-ranges, and counter
//! adjusts on top of a base KV store (spec section 4.4), plus `Overlay`,
//! the generic composition that turns a `MutationSet` plus any `KvRead`
//! base into another `KvRead` -- used both for the normal
//! overlay-on-array read path and for stacking the in-flight compaction's
//! detached set beneath the live one.

use std::collections::BTreeMap;

use crate::array::Entry;
use crate::codec::{decode_counter, encode_counter, WriteOp, WriteSet};
use crate::error::Result;
use crate::view::KvRead;

type Bound = Option<Vec<u8>>;

fn min_le_key(min: &Bound, key: &[u8]) -> bool {
    match min {
        None => true,
        Some(m) => m.as_slice() <= key,
    }
}

fn key_lt_max(key: &[u8], max: &Bound) -> bool {
    match max {
        None => true,
        Some(m) => key < m.as_slice(),
    }
}

fn range_contains(min: &Bound, max: &Bound, key: &[u8]) -> bool {
    min_le_key(min, key) && key_lt_max(key, max)
}

/// `a.min <= b.max`, with an absent bound acting as -infinity/+infinity.
fn min_le_other_max(min: &Bound, other_max: &Bound) -> bool {
    match (min, other_max) {
        (_, None) | (None, _) => true,
        (Some(m), Some(om)) => m.as_slice() <= om.as_slice(),
    }
}

fn ranges_touch_or_overlap(a: &(Bound, Bound), b: &(Bound, Bound)) -> bool {
    min_le_other_max(&a.0, &b.1) && min_le_other_max(&b.0, &a.1)
}

fn min_of(a: &Bound, b: &Bound) -> Bound {
    match (a, b) {
        (None, _) | (_, None) => None,
        (Some(x), Some(y)) => Some(if x <= y { x.clone() } else { y.clone() }),
    }
}

fn max_of(a: &Bound, b: &Bound) -> Bound {
    match (a, b) {
        (None, _) | (_, None) => None,
        (Some(x), Some(y)) => Some(if x >= y { x.clone() } else { y.clone() }),
    }
}

/// Absent-min sorts first, absent-max sorts last.
fn min_sort_key(min: &Bound) -> (u8, &[u8]) {
    match min {
        None => (0, &[]),
        Some(v) => (1, v.as_slice()),
    }
}

/// Puts, remove-ranges, and counter adjusts buffered over a base store.
///
/// Invariants maintained by construction: `removes` stays sorted by its
/// lower bound and pairwise disjoint; for any key, at most one of
/// `puts`/`adjusts` holds an entry at a time.
#[derive(Clone, Debug, Default)]
pub struct MutationSet {
    puts: BTreeMap<Vec<u8>, Vec<u8>>,
    removes: Vec<(Bound, Bound)>,
    adjusts: BTreeMap<Vec<u8>, i64>,
}

impl MutationSet {
    pub fn new() -> MutationSet {
        MutationSet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.puts.is_empty() && self.removes.is_empty() && self.adjusts.is_empty()
    }

    pub fn puts(&self) -> &BTreeMap<Vec<u8>, Vec<u8>> {
        &self.puts
    }

    pub fn removes(&self) -> &[(Bound, Bound)] {
        &self.removes
    }

    pub fn adjusts(&self) -> &BTreeMap<Vec<u8>, i64> {
        &self.adjusts
    }

    /// A put always wins over any prior remove-range or adjust recorded
    /// for this key -- at read time a put short-circuits before removes
    /// or adjusts are even consulted, so no range bookkeeping is needed
    /// here beyond clearing the conflicting adjust.
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.adjusts.remove(&key);
        self.puts.insert(key, value);
    }

    /// Half-open `[min, max)` removal; `None` on either side is unbounded.
    /// Drops covered puts/adjusts and coalesces with any overlapping or
    /// touching existing range.
    pub fn remove_range(&mut self, min: Bound, max: Bound) {
        if let (Some(mn), Some(mx)) = (&min, &max) {
            if mn >= mx {
                return;
            }
        }
        self.puts.retain(|k, _| !range_contains(&min, &max, k));
        self.adjusts.retain(|k, _| !range_contains(&min, &max, k));
        self.coalesce_remove(min, max);
    }

    fn coalesce_remove(&mut self, mut min: Bound, mut max: Bound) {
        let mut i = 0;
        while i < self.removes.len() {
            if ranges_touch_or_overlap(&(min.clone(), max.clone()), &self.removes[i]) {
                let (emin, emax) = self.removes.remove(i);
                min = min_of(&min, &emin);
                max = max_of(&max, &emax);
                // restart the scan; merging can chain across adjacent ranges.
                i = 0;
            } else {
                i += 1;
            }
        }
        let pos = self
            .removes
            .partition_point(|(m, _)| min_sort_key(m) < min_sort_key(&min));
        self.removes.insert(pos, (min, max));
    }

    fn is_removed(&self, key: &[u8]) -> bool {
        let idx = self.removes.partition_point(|(min, _)| min_le_key(min, key));
        if idx == 0 {
            return false;
        }
        key_lt_max(key, &self.removes[idx - 1].1)
    }

    /// Additive delta in wrap-around 64-bit arithmetic. If a live put
    /// exists for the key, fold the delta into it directly; otherwise
    /// accumulate the delta for later folding against the base value. A
    /// decode failure against an existing non-counter put produces no
    /// output, matching `Overlay::resolve_adjust`'s treatment of a
    /// non-counter base value: the key is dropped rather than left with a
    /// stale put that could never be read back as a counter again.
    pub fn adjust_counter(&mut self, key: Vec<u8>, delta: i64) {
        if let Some(v) = self.puts.get(&key) {
            match decode_counter(v) {
                Some(cur) => {
                    self.puts.insert(key, encode_counter(cur.wrapping_add(delta)));
                }
                None => {
                    log::debug!(
                        "adjust_counter: existing put for {:?} is not a counter, dropping the key",
                        key
                    );
                    self.puts.remove(&key);
                }
            }
            return;
        }
        let entry = self.adjusts.entry(key).or_insert(0);
        *entry = entry.wrapping_add(delta);
    }

    /// Apply one already-decoded write-set, in order, the same way a fresh
    /// `mutate()` call or log replay does.
    pub fn apply_write_set(&mut self, ws: &WriteSet) {
        for op in &ws.0 {
            match op {
                WriteOp::Put(k, v) => self.put(k.clone(), v.clone()),
                WriteOp::RemoveRange(min, max) => self.remove_range(min.clone(), max.clone()),
                WriteOp::Adjust(k, delta) => self.adjust_counter(k.clone(), *delta),
            }
        }
    }

    /// Re-apply another set's operations on top of this one, preserving
    /// this set's invariants. Used to carry mutations that arrived during
    /// a compaction window back on top of the detached `writes_to_compact`
    /// set after a failed compaction.
    pub fn merge_from(&mut self, other: &MutationSet) {
        for (min, max) in &other.removes {
            self.remove_range(min.clone(), max.clone());
        }
        for (k, v) in &other.puts {
            self.put(k.clone(), v.clone());
        }
        for (k, delta) in &other.adjusts {
            self.adjust_counter(k.clone(), *delta);
        }
    }

    /// Re-express the current buffered state as one `WriteSet` that,
    /// replayed from empty via `apply_write_set`, reconstructs an
    /// equivalent `MutationSet`. Used to persist a cloned or carried-over
    /// set into a fresh `mods.<g>` file.
    pub fn to_write_set(&self) -> WriteSet {
        let mut ws = WriteSet::new();
        for (min, max) in &self.removes {
            ws = ws.remove_range(min.clone(), max.clone());
        }
        for (k, v) in &self.puts {
            ws = ws.put(k.clone(), v.clone());
        }
        for (k, delta) in &self.adjusts {
            ws = ws.adjust(k.clone(), *delta);
        }
        ws
    }

    /// Total bytes buffered across puts, removes, and adjusts, used by the
    /// pressure controller as an approximation of mods-file growth.
    pub fn approx_len(&self) -> u64 {
        let puts: u64 = self.puts.iter().map(|(k, v)| (k.len() + v.len()) as u64).sum();
        let removes: u64 = self
            .removes
            .iter()
            .map(|(a, b)| (a.as_ref().map_or(0, Vec::len) + b.as_ref().map_or(0, Vec::len)) as u64)
            .sum();
        let adjusts: u64 = self.adjusts.iter().map(|(k, _)| (k.len() + 8) as u64).sum();
        puts + removes + adjusts
    }
}

impl KvRead for MutationSet {
    fn kv_get(&self, _key: &[u8]) -> Result<Option<Vec<u8>>> {
        unreachable!("MutationSet has no base store; use Overlay")
    }
    fn kv_get_at_least(&self, _min: &[u8]) -> Result<Option<Entry>> {
        unreachable!("MutationSet has no base store; use Overlay")
    }
    fn kv_get_at_most(&self, _max: &[u8]) -> Result<Option<Entry>> {
        unreachable!("MutationSet has no base store; use Overlay")
    }
    fn kv_range(
        &self,
        _min: Option<&[u8]>,
        _max: Option<&[u8]>,
        _reverse: bool,
    ) -> Result<Box<dyn Iterator<Item = Result<Entry>> + '_>> {
        unreachable!("MutationSet has no base store; use Overlay")
    }
}

/// A `MutationSet` layered on top of any `KvRead` base -- composes so the
/// in-flight compaction's detached set can sit between the live set and
/// the immutable array without either layer knowing about the other.
pub struct Overlay<'a, B: KvRead> {
    pub overlay: &'a MutationSet,
    pub under: &'a B,
}

impl<'a, B: KvRead> Overlay<'a, B> {
    pub fn new(overlay: &'a MutationSet, under: &'a B) -> Overlay<'a, B> {
        Overlay { overlay, under }
    }

    fn resolve_adjust(&self, key: &[u8], delta: i64) -> Result<Option<Vec<u8>>> {
        if self.overlay.is_removed(key) {
            return Ok(None);
        }
        Ok(match self.under.kv_get(key)? {
            Some(bv) => decode_counter(&bv).map(|c| encode_counter(c.wrapping_add(delta))),
            None => None,
        })
    }

    /// Same merge `KvRead::kv_range` below implements, but tied to `'a` --
    /// the lifetime of the underlying `MutationSet`/base store -- rather
    /// than to `&self`'s own borrow. Callers that build an `Overlay` as a
    /// bare temporary (never binding it to a name that outlives the call)
    /// need this form: the returned iterator only references `self.overlay`
    /// / `self.under`, both already `&'a`, so it stays valid long after the
    /// `Overlay` wrapper value itself is gone.
    pub fn kv_range(&self, min: Option<&[u8]>, max: Option<&[u8]>, reverse: bool) -> Result<Box<dyn Iterator<Item = Result<Entry>> + 'a>> {
        let in_range = |k: &[u8]| -> bool {
            if let Some(lo) = min {
                if k < lo {
                    return false;
                }
            }
            if let Some(hi) = max {
                if k >= hi {
                    return false;
                }
            }
            true
        };

        let mut overlay_resolved: BTreeMap<Vec<u8>, Option<Vec<u8>>> = BTreeMap::new();
        for (k, v) in self.overlay.puts.iter().filter(|(k, _)| in_range(k)) {
            overlay_resolved.insert(k.clone(), Some(v.clone()));
        }
        for (k, delta) in self.overlay.adjusts.iter().filter(|(k, _)| in_range(k)) {
            let resolved = self.resolve_adjust(k, *delta)?;
            overlay_resolved.insert(k.clone(), resolved);
        }

        let mut overlay_entries: Vec<Entry> = overlay_resolved
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| Entry::new(k, v)))
            .collect();
        overlay_entries.sort_by(|a, b| a.key.cmp(&b.key));
        if reverse {
            overlay_entries.reverse();
        }

        let base_iter = self.under.kv_range(min, max, reverse)?;

        Ok(Box::new(OverlayRangeIter {
            overlay_entries: overlay_entries.into_iter().peekable(),
            base_iter,
            base_peek: None,
            overlay: self.overlay,
            reverse,
        }))
    }
}

impl<'a, B: KvRead> KvRead for Overlay<'a, B> {
    fn kv_get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if let Some(v) = self.overlay.puts.get(key) {
            return Ok(Some(v.clone()));
        }
        if let Some(delta) = self.overlay.adjusts.get(key) {
            return self.resolve_adjust(key, *delta);
        }
        if self.overlay.is_removed(key) {
            return Ok(None);
        }
        self.under.kv_get(key)
    }

    fn kv_get_at_least(&self, min: &[u8]) -> Result<Option<Entry>> {
        let put_c = self
            .overlay
            .puts
            .range(min.to_vec()..)
            .next()
            .map(|(k, v)| Entry::new(k.clone(), v.clone()));

        let mut adj_c = None;
        for (k, delta) in self.overlay.adjusts.range(min.to_vec()..) {
            if let Some(v) = self.resolve_adjust(k, *delta)? {
                adj_c = Some(Entry::new(k.clone(), v));
                break;
            }
        }

        let mut base_c = None;
        let mut probe = self.under.kv_get_at_least(min)?;
        while let Some(entry) = probe {
            if self.overlay.puts.contains_key(&entry.key)
                || self.overlay.adjusts.contains_key(&entry.key)
                || self.overlay.is_removed(&entry.key)
            {
                probe = self.under.kv_range(Some(&bump(&entry.key)), None, false)?.next().transpose()?;
                continue;
            }
            base_c = Some(entry);
            break;
        }

        Ok(pick_extreme([put_c, adj_c, base_c], true))
    }

    fn kv_get_at_most(&self, max: &[u8]) -> Result<Option<Entry>> {
        let put_c = self
            .overlay
            .puts
            .range(..=max.to_vec())
            .next_back()
            .map(|(k, v)| Entry::new(k.clone(), v.clone()));

        let mut adj_c = None;
        for (k, delta) in self.overlay.adjusts.range(..=max.to_vec()).rev() {
            if let Some(v) = self.resolve_adjust(k, *delta)? {
                adj_c = Some(Entry::new(k.clone(), v));
                break;
            }
        }

        let mut base_c = None;
        let mut probe = self.under.kv_get_at_most(max)?;
        while let Some(entry) = probe {
            if self.overlay.puts.contains_key(&entry.key)
                || self.overlay.adjusts.contains_key(&entry.key)
                || self.overlay.is_removed(&entry.key)
            {
                if entry.key.is_empty() {
                    probe = None;
                } else {
                    probe = self.under.kv_get_at_most(&entry.key)?.filter(|e| e.key < entry.key);
                }
                continue;
            }
            base_c = Some(entry);
            break;
        }

        Ok(pick_extreme([put_c, adj_c, base_c], false))
    }

    /// Delegates to the inherent `Overlay::kv_range`, whose return type is
    /// tied to `'a` rather than to this method's own elided `&self`
    /// lifetime; `'a: '_` always holds for a live `&self`, so the coercion
    /// back down to the trait's signature is automatic.
    fn kv_range(
        &self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        reverse: bool,
    ) -> Result<Box<dyn Iterator<Item = Result<Entry>> + '_>> {
        Overlay::kv_range(self, min, max, reverse)
    }
}

/// Lazy merge of two already-direction-ordered streams: the overlay's
/// resolved puts/adjusts (an owned `Vec`, since it is bounded by buffered
/// size) and the base's own range iterator, pulled one entry ahead at a
/// time and cached in `base_peek` until consumed, skipping any base key the
/// overlay already covers.
struct OverlayRangeIter<'a> {
    overlay_entries: std::iter::Peekable<std::vec::IntoIter<Entry>>,
    base_iter: Box<dyn Iterator<Item = Result<Entry>> + 'a>,
    base_peek: Option<Result<Entry>>,
    overlay: &'a MutationSet,
    reverse: bool,
}

impl<'a> OverlayRangeIter<'a> {
    fn fill_base_peek(&mut self) {
        if self.base_peek.is_some() {
            return;
        }
        for item in self.base_iter.by_ref() {
            match item {
                Err(err) => {
                    self.base_peek = Some(Err(err));
                    return;
                }
                Ok(entry) => {
                    if self.overlay.puts.contains_key(&entry.key)
                        || self.overlay.adjusts.contains_key(&entry.key)
                        || self.overlay.is_removed(&entry.key)
                    {
                        continue;
                    }
                    self.base_peek = Some(Ok(entry));
                    return;
                }
            }
        }
    }
}

impl<'a> Iterator for OverlayRangeIter<'a> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Result<Entry>> {
        self.fill_base_peek();
        match (&self.base_peek, self.overlay_entries.peek()) {
            (None, None) => None,
            (Some(_), None) => self.base_peek.take(),
            (None, Some(_)) => self.overlay_entries.next().map(Ok),
            (Some(Err(_)), _) => self.base_peek.take(),
            (Some(Ok(b)), Some(o)) => {
                let take_base = if self.reverse { b.key > o.key } else { b.key < o.key };
                if take_base {
                    self.base_peek.take()
                } else {
                    self.overlay_entries.next().map(Ok)
                }
            }
        }
    }
}

/// Smallest byte string strictly greater than `key` in lexicographic order.
fn bump(key: &[u8]) -> Vec<u8> {
    let mut v = key.to_vec();
    v.push(0);
    v
}

fn pick_extreme(candidates: [Option<Entry>; 3], smallest: bool) -> Option<Entry> {
    candidates
        .into_iter()
        .flatten()
        .fold(None, |acc, e| match acc {
            None => Some(e),
            Some(cur) => {
                let take_new = if smallest { e.key < cur.key } else { e.key > cur.key };
                if take_new {
                    Some(e)
                } else {
                    Some(cur)
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{ArrayStore, ArrayWriter};

    fn base_store(keys: &[(&str, &str)]) -> ArrayStore {
        let mut indx = Vec::new();
        let mut keysb = Vec::new();
        let mut valsb = Vec::new();
        {
            let mut w = ArrayWriter::new(&mut indx, &mut keysb, &mut valsb);
            for (k, v) in keys {
                w.append(k.as_bytes(), v.as_bytes()).unwrap();
            }
            w.flush().unwrap();
        }
        ArrayStore::from_buffers(indx, keysb, valsb).unwrap()
    }

    fn counter_store(entries: &[(&str, i64)]) -> ArrayStore {
        let mut indx = Vec::new();
        let mut keysb = Vec::new();
        let mut valsb = Vec::new();
        {
            let mut w = ArrayWriter::new(&mut indx, &mut keysb, &mut valsb);
            for (k, v) in entries {
                w.append(k.as_bytes(), &encode_counter(*v)).unwrap();
            }
            w.flush().unwrap();
        }
        ArrayStore::from_buffers(indx, keysb, valsb).unwrap()
    }

    #[test]
    fn put_wins_over_prior_adjust_and_removal() {
        let base = base_store(&[("n", "x")]);
        let mut m = MutationSet::new();
        m.remove_range(Some(b"a".to_vec()), Some(b"z".to_vec()));
        m.put(b"n".to_vec(), b"fresh".to_vec());
        let view = Overlay::new(&m, &base);
        assert_eq!(view.kv_get(b"n").unwrap(), Some(b"fresh".to_vec()));
    }

    #[test]
    fn adjust_on_top_of_base_counter() {
        let base = counter_store(&[("n", 10)]);
        let mut m = MutationSet::new();
        m.adjust_counter(b"n".to_vec(), 5);
        let view = Overlay::new(&m, &base);
        assert_eq!(view.kv_get(b"n").unwrap(), Some(encode_counter(15)));
    }

    #[test]
    fn adjust_on_a_non_counter_put_drops_the_key() {
        let base = base_store(&[("n", "x")]);
        let mut m = MutationSet::new();
        m.put(b"n".to_vec(), b"not-a-counter".to_vec());
        m.adjust_counter(b"n".to_vec(), 5);
        let view = Overlay::new(&m, &base);
        assert_eq!(view.kv_get(b"n").unwrap(), None);
        assert!(!m.puts().contains_key(b"n".as_slice()));
    }

    #[test]
    fn remove_then_adjust_drops_the_key() {
        let base = counter_store(&[("n", 10)]);
        let mut m = MutationSet::new();
        m.remove_range(Some(b"m".to_vec()), Some(b"o".to_vec()));
        m.adjust_counter(b"n".to_vec(), 1);
        let view = Overlay::new(&m, &base);
        assert_eq!(view.kv_get(b"n").unwrap(), None);
    }

    #[test]
    fn coalesces_overlapping_and_touching_ranges() {
        let mut m = MutationSet::new();
        m.remove_range(Some(b"a".to_vec()), Some(b"c".to_vec()));
        m.remove_range(Some(b"c".to_vec()), Some(b"e".to_vec()));
        m.remove_range(Some(b"b".to_vec()), Some(b"d".to_vec()));
        assert_eq!(m.removes().len(), 1);
        assert_eq!(m.removes()[0], (Some(b"a".to_vec()), Some(b"e".to_vec())));
    }

    #[test]
    fn unbounded_remove_covers_everything_from_min() {
        let base = base_store(&[("n", "x")]);
        let mut m = MutationSet::new();
        m.remove_range(Some(b"m".to_vec()), None);
        let view = Overlay::new(&m, &base);
        assert_eq!(view.kv_get(b"n").unwrap(), None);
        assert_eq!(view.kv_get(b"a").unwrap(), None);
        let mut m2 = MutationSet::new();
        m2.remove_range(Some(b"m".to_vec()), None);
        // anything below "m" stays visible
        let base2 = base_store(&[("a", "x"), ("n", "y")]);
        let view2 = Overlay::new(&m2, &base2);
        assert_eq!(view2.kv_get(b"a").unwrap(), Some(b"x".to_vec()));
        assert_eq!(view2.kv_get(b"n").unwrap(), None);
    }

    #[test]
    fn fully_unbounded_remove_and_touching_coalesce() {
        let mut m = MutationSet::new();
        m.remove_range(None, Some(b"m".to_vec()));
        m.remove_range(Some(b"m".to_vec()), None);
        assert_eq!(m.removes().len(), 1);
        assert_eq!(m.removes()[0], (None, None));
    }

    fn collect_range(view: &Overlay<'_, ArrayStore>, min: Option<&[u8]>, max: Option<&[u8]>, reverse: bool) -> Vec<(Vec<u8>, Vec<u8>)> {
        view.kv_range(min, max, reverse)
            .unwrap()
            .map(|r| r.map(|e| (e.key, e.value)).unwrap())
            .collect()
    }

    #[test]
    fn range_merges_overlay_puts_ahead_of_and_behind_base_entries_in_order() {
        let base = base_store(&[("a", "1"), ("m", "2"), ("z", "3")]);
        let mut m = MutationSet::new();
        m.put(b"b".to_vec(), b"new".to_vec());
        let view = Overlay::new(&m, &base);
        let got = collect_range(&view, None, None, false);
        assert_eq!(
            got,
            vec![
                (b"a".to_vec(), b"1".to_vec()),
                (b"b".to_vec(), b"new".to_vec()),
                (b"m".to_vec(), b"2".to_vec()),
                (b"z".to_vec(), b"3".to_vec()),
            ]
        );
    }

    #[test]
    fn range_reverse_visits_the_same_merged_entries_back_to_front() {
        let base = base_store(&[("a", "1"), ("m", "2"), ("z", "3")]);
        let mut m = MutationSet::new();
        m.put(b"b".to_vec(), b"new".to_vec());
        let view = Overlay::new(&m, &base);
        let got = collect_range(&view, None, None, true);
        assert_eq!(
            got,
            vec![
                (b"z".to_vec(), b"3".to_vec()),
                (b"m".to_vec(), b"2".to_vec()),
                (b"b".to_vec(), b"new".to_vec()),
                (b"a".to_vec(), b"1".to_vec()),
            ]
        );
    }

    #[test]
    fn range_overlay_put_shadows_a_base_entry_at_the_same_key() {
        let base = base_store(&[("m", "old")]);
        let mut m = MutationSet::new();
        m.put(b"m".to_vec(), b"new".to_vec());
        let view = Overlay::new(&m, &base);
        let got = collect_range(&view, None, None, false);
        assert_eq!(got, vec![(b"m".to_vec(), b"new".to_vec())]);
    }

    #[test]
    fn range_removal_masks_the_base_entry_without_touching_neighbors() {
        let base = base_store(&[("a", "1"), ("m", "2"), ("z", "3")]);
        let mut m = MutationSet::new();
        m.remove_range(Some(b"m".to_vec()), Some(b"n".to_vec()));
        let view = Overlay::new(&m, &base);
        let got = collect_range(&view, None, None, false);
        assert_eq!(got, vec![(b"a".to_vec(), b"1".to_vec()), (b"z".to_vec(), b"3".to_vec())]);
    }

    #[test]
    fn range_respects_bounds_against_the_merged_stream() {
        let base = base_store(&[("a", "1"), ("m", "2"), ("z", "3")]);
        let mut m = MutationSet::new();
        m.put(b"b".to_vec(), b"new".to_vec());
        let view = Overlay::new(&m, &base);
        let got = collect_range(&view, Some(b"b"), Some(b"z"), false);
        assert_eq!(got, vec![(b"b".to_vec(), b"new".to_vec()), (b"m".to_vec(), b"2".to_vec())]);
    }

    #[test]
    fn range_adjust_against_a_non_counter_base_value_drops_the_key() {
        let base = base_store(&[("a", "1"), ("n", "not-a-counter"), ("z", "3")]);
        let mut m = MutationSet::new();
        m.adjust_counter(b"n".to_vec(), 1);
        let view = Overlay::new(&m, &base);
        let got = collect_range(&view, None, None, false);
        assert_eq!(got, vec![(b"a".to_vec(), b"1".to_vec()), (b"z".to_vec(), b"3".to_vec())]);
    }
}

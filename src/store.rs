//! `AtomicStore`: the front door. Generation lifecycle, the mutate/read
//! paths, snapshotting, hot-copy, and the concurrency machinery tying the
//! rest of the crate together (spec section 5).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, RwLock, RwLockWriteGuard};

use crate::array::{ArrayStore, Entry};
use crate::codec::WriteSet;
use crate::compactor::{self, CompactionStatus, Compactor};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::lockfile::LockFile;
use crate::modlog::MutationLog;
use crate::mutset::{MutationSet, Overlay};
use crate::pressure::PressureController;
use crate::scheduler::Scheduler;
use crate::util::fsync_dir;
use crate::view::KvRead;

fn indx_path(dir: &Path, gen: u64) -> PathBuf {
    dir.join(format!("indx.{}", gen))
}
fn keys_path(dir: &Path, gen: u64) -> PathBuf {
    dir.join(format!("keys.{}", gen))
}
fn vals_path(dir: &Path, gen: u64) -> PathBuf {
    dir.join(format!("vals.{}", gen))
}
fn mods_path(dir: &Path, gen: u64) -> PathBuf {
    dir.join(format!("mods.{}", gen))
}
fn gen_path(dir: &Path) -> PathBuf {
    dir.join("gen")
}

fn read_gen_pointer(dir: &Path) -> Result<Option<u64>> {
    match fs::read_to_string(gen_path(dir)) {
        Ok(s) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| Error::Inconsistent(format!("gen pointer {:?} is not a number", s))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(Error::IoFailure(err)),
    }
}

/// Atomically point `gen` at `generation`: write to a sibling temp file,
/// fsync it, then rename over the real pointer and fsync the directory
/// entry. A crash before the rename leaves the old generation live; a
/// crash after leaves the new one live. Either is a valid recovery state.
fn write_gen_pointer(dir: &Path, generation: u64) -> Result<()> {
    let tmp = dir.join("gen.tmp");
    fs::write(&tmp, generation.to_string())?;
    fs::File::open(&tmp)?.sync_all()?;
    fs::rename(&tmp, gen_path(dir))?;
    fsync_dir(dir)?;
    Ok(())
}

/// Clamp a nonsensical `high < low` water mark pair up to `low`, rather than
/// rejecting `start()` outright, the same "validated lazily at use" stance
/// the teacher's own config types take.
fn validate_config(mut config: Config, dir: &Path) -> Config {
    if config.compact_high_water_bytes < config.compact_low_water_bytes {
        log::warn!(
            "{:?}: compact_high_water_bytes ({}) below compact_low_water_bytes ({}), clamping high up to low",
            dir,
            config.compact_high_water_bytes,
            config.compact_low_water_bytes
        );
        config.compact_high_water_bytes = config.compact_low_water_bytes;
    }
    config
}

fn warn_stray_generations(dir: &Path, current: u64) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some((prefix, gen_str)) = name.rsplit_once('.') {
            if matches!(prefix, "indx" | "keys" | "vals" | "mods") {
                if let Ok(g) = gen_str.parse::<u64>() {
                    if g != current {
                        log::warn!(
                            "{:?}: stray generation file {} left from generation {} (current is {})",
                            dir,
                            name,
                            g,
                            current
                        );
                    }
                }
            }
        }
    }
}

struct State {
    generation: u64,
    base: Arc<ArrayStore>,
    mutset: MutationSet,
    /// The frozen set a running compaction is folding; present from the
    /// moment a compaction detaches it until finalize (or failure
    /// recovery) clears it.
    compacting: Option<Arc<MutationSet>>,
    log: MutationLog,
}

struct Inner {
    dir: PathBuf,
    config: Config,
    _lock: LockFile,
    state: RwLock<State>,
    write_mu: Mutex<()>,
    pressure: PressureController,
    compactor: Compactor,
    scheduler: Mutex<Option<Scheduler>>,
    stopped: AtomicBool,
    /// Number of `hot_copy` calls currently reading the live blobs.
    /// Shutdown drains this to zero before the handle is allowed to fully
    /// tear down, per spec section 5's "shutdown suspends ... while hot
    /// copies drain."
    hot_copies: Mutex<usize>,
    hot_copies_cv: Condvar,
    /// Wall-clock time the buffered mutation set went from empty to
    /// non-empty since the last compaction, `None` while nothing is
    /// buffered. Drives the age-based compaction trigger of spec section
    /// 4.8's pressure controller.
    first_mod_at: Mutex<Option<Instant>>,
}

/// The embedded store's front door: owns the directory lock, the current
/// generation's array and mutation overlay, and the background compactor.
#[derive(Clone)]
pub struct AtomicStore {
    inner: Arc<Inner>,
}

/// Decrements `Inner::hot_copies` and wakes any `stop()` waiting on the
/// drain, even if `hot_copy` returns early via `?`.
struct HotCopyGuard<'a> {
    inner: &'a Inner,
}

impl<'a> Drop for HotCopyGuard<'a> {
    fn drop(&mut self) {
        let mut count = self.inner.hot_copies.lock();
        *count -= 1;
        if *count == 0 {
            self.inner.hot_copies_cv.notify_all();
        }
    }
}

/// The iterator behind `AtomicStore::range`. Holds no lock between steps:
/// each `next()` reacquires `Inner::state`'s read lock just long enough to
/// ask the current overlay view for the one entry past `cursor`, then drops
/// it before returning.
pub struct StoreRangeIter {
    inner: Arc<Inner>,
    min: Option<Vec<u8>>,
    max: Option<Vec<u8>>,
    reverse: bool,
    cursor: Option<Vec<u8>>,
    done: bool,
}

impl Iterator for StoreRangeIter {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Result<Entry>> {
        if self.done {
            return None;
        }

        let (effective_min, effective_max) = if self.reverse {
            (self.min.clone(), self.cursor.clone().or_else(|| self.max.clone()))
        } else {
            (self.cursor.clone().map(|last| bump(&last)).or_else(|| self.min.clone()), self.max.clone())
        };

        let guard = self.inner.state.read();
        let step = match &guard.compacting {
            Some(compacting) => {
                let under = Overlay::new(compacting, guard.base.as_ref());
                let view = Overlay::new(&guard.mutset, &under);
                view.kv_range(effective_min.as_deref(), effective_max.as_deref(), self.reverse)
                    .and_then(|mut it| it.next().transpose())
            }
            None => {
                let view = Overlay::new(&guard.mutset, guard.base.as_ref());
                view.kv_range(effective_min.as_deref(), effective_max.as_deref(), self.reverse)
                    .and_then(|mut it| it.next().transpose())
            }
        };
        drop(guard);

        match step {
            Ok(Some(entry)) => {
                self.cursor = Some(entry.key.clone());
                Some(Ok(entry))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
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

/// A point-in-time, independently readable view, decoupled from the live
/// store so a long iteration doesn't hold any lock. Any in-flight
/// compaction's detached set is folded into `mutset` at construction time
/// (newest-over-oldest, via `merge_from`) so this stays a single overlay
/// layer rather than a nested one -- keeping `kv_range`'s lazy iterator a
/// plain borrow of `&self` instead of something borrowing a temporary.
pub struct Snapshot {
    base: Arc<ArrayStore>,
    mutset: MutationSet,
}

#[derive(Clone, Debug)]
pub struct Stats {
    pub generation: u64,
    pub base_entries: usize,
    pub buffered_puts: usize,
    pub buffered_removes: usize,
    pub buffered_adjusts: usize,
    pub compaction_status: CompactionStatus,
}

impl AtomicStore {
    /// Open (or initialize) the store rooted at `dir`. Acquires the
    /// directory's exclusive lock for the lifetime of the returned handle.
    pub fn start(dir: impl AsRef<Path>, config: Config) -> Result<AtomicStore> {
        let dir = dir.as_ref().to_path_buf();
        let config = validate_config(config, &dir);
        fs::create_dir_all(&dir)?;
        let lock = LockFile::acquire(&dir)?;

        let generation = match read_gen_pointer(&dir)? {
            Some(g) => g,
            None => {
                ArrayStore::empty().write_to(&indx_path(&dir, 0), &keys_path(&dir, 0), &vals_path(&dir, 0))?;
                MutationLog::create(&mods_path(&dir, 0))?;
                write_gen_pointer(&dir, 0)?;
                0
            }
        };

        for path in [indx_path(&dir, generation), keys_path(&dir, generation), vals_path(&dir, generation)] {
            if !path.exists() {
                return Err(Error::Inconsistent(format!(
                    "generation {} file missing: {:?}",
                    generation, path
                )));
            }
        }

        let base = ArrayStore::open(
            &indx_path(&dir, generation),
            &keys_path(&dir, generation),
            &vals_path(&dir, generation),
        )?;

        let mods_p = mods_path(&dir, generation);
        let (mutset, truncated) = MutationLog::replay(&mods_p)?;
        if truncated {
            log::warn!("{:?}: generation {} mutation log had a truncated tail on startup", dir, generation);
        }
        let log = match MutationLog::open_append(&mods_p) {
            Ok(log) => log,
            Err(_) => MutationLog::create(&mods_p)?,
        };

        warn_stray_generations(&dir, generation);

        let state = State {
            generation,
            base: Arc::new(base),
            mutset,
            compacting: None,
            log,
        };

        let pressure = PressureController::new(
            config.compact_low_water_bytes,
            config.compact_high_water_bytes,
            config.compact_max_delay,
        );

        let inner = Arc::new(Inner {
            dir,
            config,
            _lock: lock,
            state: RwLock::new(state),
            write_mu: Mutex::new(()),
            pressure,
            compactor: Compactor::new(),
            scheduler: Mutex::new(None),
            stopped: AtomicBool::new(false),
            hot_copies: Mutex::new(0),
            hot_copies_cv: Condvar::new(),
            first_mod_at: Mutex::new(None),
        });

        // A weak back-reference avoids an Arc<Inner> -> Scheduler ->
        // (closure) -> Arc<Inner> cycle that would otherwise keep the
        // store alive forever once the scheduler thread is running.
        let weak = Arc::downgrade(&inner);
        let scheduler = Scheduler::start(move || {
            if let Some(inner) = weak.upgrade() {
                AtomicStore { inner }.run_compaction();
            }
        });
        *inner.scheduler.lock() = Some(scheduler);

        Ok(AtomicStore { inner })
    }

    /// Stop accepting new mutations. Any writer currently stalled on
    /// backpressure is released with `Error::Canceled`. A compaction that
    /// is merely scheduled is canceled outright; one already running is
    /// waited out to completion (including its finalize step), and any
    /// in-flight `hot_copy` calls are drained, before the background
    /// compactor thread and directory lock are released.
    pub fn stop(self) -> Result<()> {
        self.inner.stopped.store(true, Ordering::SeqCst);

        self.inner.compactor.try_mark_canceled();
        self.inner.compactor.wait_until_quiescent();

        let mut hot_copies = self.inner.hot_copies.lock();
        while *hot_copies > 0 {
            self.inner.hot_copies_cv.wait(&mut hot_copies);
        }
        drop(hot_copies);

        if let Some(sched) = self.inner.scheduler.lock().take() {
            drop(sched);
        }
        Ok(())
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.with_view(|v| v.kv_get(key))
    }

    pub fn get_at_least(&self, min: &[u8]) -> Result<Option<Entry>> {
        self.with_view(|v| v.kv_get_at_least(min))
    }

    pub fn get_at_most(&self, max: &[u8]) -> Result<Option<Entry>> {
        self.with_view(|v| v.kv_get_at_most(max))
    }

    /// Lazy scan over `[min, max)`. Unlike `get`/`get_at_least`/
    /// `get_at_most`, this does not hold the store's read lock for the
    /// whole call: each `.next()` step reacquires it only long enough to
    /// pull the single next entry past the last one returned, per spec
    /// section 5's "range iterators acquire the read lock only around
    /// their advance step."
    pub fn range(&self, min: Option<&[u8]>, max: Option<&[u8]>, reverse: bool) -> StoreRangeIter {
        StoreRangeIter {
            inner: Arc::clone(&self.inner),
            min: min.map(|m| m.to_vec()),
            max: max.map(|m| m.to_vec()),
            reverse,
            cursor: None,
            done: false,
        }
    }

    fn with_view<R>(&self, f: impl FnOnce(&dyn KvRead) -> R) -> R {
        let guard = self.inner.state.read();
        match &guard.compacting {
            Some(compacting) => {
                let under = Overlay::new(compacting, guard.base.as_ref());
                let view = Overlay::new(&guard.mutset, &under);
                f(&view)
            }
            None => {
                let view = Overlay::new(&guard.mutset, guard.base.as_ref());
                f(&view)
            }
        }
    }

    /// Apply a batch of operations atomically: logged, then folded into
    /// the live overlay. A single write-lock critical section covers the
    /// in-memory update; when `sync` is requested, the log's fsync happens
    /// after downgrading to a read lock so slow disk I/O does not block
    /// concurrent readers. With `sync` false the write is visible to
    /// subsequent readers immediately but is not guaranteed durable until a
    /// later synced write or a clean `stop()`.
    pub fn mutate(&self, ws: WriteSet, sync: bool) -> Result<()> {
        if self.inner.stopped.load(Ordering::SeqCst) {
            return Err(Error::Closed);
        }
        let _permit = self.inner.write_mu.lock();

        let buffered_before = {
            let guard = self.inner.state.read();
            guard.mutset.approx_len() + guard.compacting.as_ref().map_or(0, |c| c.approx_len())
        };
        if let Some(delay) = self.inner.pressure.stall_delay(buffered_before) {
            log::debug!(
                "{:?}: stalling writer up to {:?} at {} buffered bytes",
                self.inner.dir,
                delay,
                buffered_before
            );
            // A compaction merely scheduled for later is nudged to run now
            // rather than making this writer wait out a debounce window
            // before the pressure it's stalling on even starts draining.
            if self.inner.compactor.status() == CompactionStatus::Scheduled {
                if let Some(sched) = self.inner.scheduler.lock().as_ref() {
                    sched.schedule(Duration::from_millis(0));
                }
            }
            self.inner.compactor.wait_for(delay);
        }
        if self.inner.stopped.load(Ordering::SeqCst) {
            return Err(Error::Canceled);
        }

        let mut guard = self.inner.state.write();
        guard.log.append(&ws)?;
        let was_empty = guard.mutset.is_empty();
        guard.mutset.apply_write_set(&ws);
        let buffered_after = guard.mutset.approx_len();
        if was_empty {
            *self.inner.first_mod_at.lock() = Some(Instant::now());
        }
        if sync {
            let read_guard = RwLockWriteGuard::downgrade(guard);
            if let Err(err) = read_guard.log.sync() {
                log::error!("{:?}: fsync of mutation log failed: {}", self.inner.dir, err);
            }
            drop(read_guard);
        } else {
            drop(guard);
        }

        self.evaluate_pressure(buffered_after);
        Ok(())
    }

    /// Re-run the pressure controller's scheduling decision (spec section
    /// 4.8): past the low water mark, schedule compaction for immediate
    /// execution; otherwise, if anything has been buffered since the last
    /// compaction, keep a compaction queued for no later than
    /// `compact_max_delay` after that first mutation. Called both after
    /// every `mutate()` and once a compaction finishes.
    fn evaluate_pressure(&self, buffered: u64) {
        if buffered > self.inner.config.compact_low_water_bytes {
            self.maybe_schedule_compaction();
            return;
        }
        let first_mod_at = *self.inner.first_mod_at.lock();
        if let Some(t) = first_mod_at {
            let remaining = self.inner.config.compact_max_delay.saturating_sub(t.elapsed());
            if self.inner.compactor.status() == CompactionStatus::Idle {
                self.inner.compactor.set_status(CompactionStatus::Scheduled);
            }
            if let Some(sched) = self.inner.scheduler.lock().as_ref() {
                sched.schedule(remaining);
            }
        }
    }

    /// Buffered mutation bytes across the live overlay and any in-flight
    /// compaction's detached set.
    fn buffered_len(&self) -> u64 {
        let guard = self.inner.state.read();
        guard.mutset.approx_len() + guard.compacting.as_ref().map_or(0, |c| c.approx_len())
    }

    /// Run a compaction synchronously on the calling thread, regardless of
    /// current buffered size. Used by `arktree-cli compact` and tests that
    /// want a compaction to have happened before making assertions.
    pub fn compact_now(&self) {
        self.inner.compactor.set_status(CompactionStatus::Scheduled);
        self.run_compaction();
    }

    /// Explicitly request a background compaction, returning `true` if this
    /// call is what scheduled it (`false` if one was already pending or
    /// running). There is no separate handle type to hold onto; poll
    /// `stats().compaction_status` to observe progress.
    pub fn schedule_compaction(&self) -> bool {
        if self.inner.compactor.status() != CompactionStatus::Idle {
            return false;
        }
        self.maybe_schedule_compaction();
        true
    }

    fn maybe_schedule_compaction(&self) {
        if self.inner.compactor.status() == CompactionStatus::Idle {
            self.inner.compactor.set_status(CompactionStatus::Scheduled);
        }
        let delay = self.inner.config.scheduler_debounce.unwrap_or(Duration::from_millis(0));
        if let Some(sched) = self.inner.scheduler.lock().as_ref() {
            sched.schedule(delay);
        }
    }

    fn run_compaction(&self) {
        if self.inner.compactor.status() == CompactionStatus::Canceled {
            return;
        }
        self.inner.compactor.set_status(CompactionStatus::Running);

        let (new_gen, base, frozen) = {
            let mut guard = self.inner.state.write();
            let new_gen = guard.generation + 1;
            let base = Arc::clone(&guard.base);
            let frozen = std::mem::take(&mut guard.mutset);
            guard.compacting = Some(Arc::new(frozen.clone()));
            (new_gen, base, frozen)
        };

        match compactor::compact(&self.inner.dir, new_gen, &base, &frozen) {
            Ok(new_store) => {
                self.inner.compactor.set_status(CompactionStatus::Finalizing);
                if let Err(err) = self.finalize_compaction(new_gen, new_store) {
                    log::error!("{:?}: compaction finalize failed: {}", self.inner.dir, err);
                    self.restore_after_failed_compaction(&frozen);
                    self.inner.compactor.set_status(CompactionStatus::Idle);
                    self.evaluate_pressure(self.buffered_len());
                    return;
                }
                self.inner.compactor.set_status(CompactionStatus::Complete);
                self.inner.compactor.set_status(CompactionStatus::Idle);
            }
            Err(err) => {
                log::error!("{:?}: compaction failed: {}", self.inner.dir, err);
                self.restore_after_failed_compaction(&frozen);
                self.inner.compactor.set_status(CompactionStatus::Idle);
                self.evaluate_pressure(self.buffered_len());
            }
        }
    }

    fn finalize_compaction(&self, new_gen: u64, new_store: ArrayStore) -> Result<()> {
        let mut guard = self.inner.state.write();
        let old_gen = guard.generation;

        let new_mods_path = mods_path(&self.inner.dir, new_gen);
        let mut new_log = MutationLog::create(&new_mods_path)?;
        let carry = guard.mutset.to_write_set();
        if !carry.is_empty() {
            new_log.append(&carry)?;
        }
        new_log.flush()?;
        new_log.sync()?;

        write_gen_pointer(&self.inner.dir, new_gen)?;

        guard.generation = new_gen;
        guard.base = Arc::new(new_store);
        guard.compacting = None;
        guard.log = new_log;
        let buffered_after = guard.mutset.approx_len();
        let still_buffered = !guard.mutset.is_empty();
        drop(guard);

        // Mutations carried over from during the compaction window are
        // treated as freshly arrived for age-bound purposes, same as the
        // reference design's own "stamp now rather than the oldest carried
        // mod" approximation.
        *self.inner.first_mod_at.lock() = if still_buffered { Some(Instant::now()) } else { None };

        for path in [
            indx_path(&self.inner.dir, old_gen),
            keys_path(&self.inner.dir, old_gen),
            vals_path(&self.inner.dir, old_gen),
            mods_path(&self.inner.dir, old_gen),
        ] {
            if let Err(err) = fs::remove_file(&path) {
                log::warn!(
                    "{:?}: could not remove stale generation file {:?}: {}",
                    self.inner.dir,
                    path,
                    err
                );
            }
        }
        self.evaluate_pressure(buffered_after);
        Ok(())
    }

    /// After a failed compaction, reapply the frozen set's operations as
    /// having happened before whatever new writes the live `mutset`
    /// accumulated during the attempt, so the newer writes still win.
    fn restore_after_failed_compaction(&self, frozen: &MutationSet) {
        let mut guard = self.inner.state.write();
        let mut restored = frozen.clone();
        restored.merge_from(&guard.mutset);
        guard.mutset = restored;
        guard.compacting = None;
    }

    /// A cloned, lock-free view of the store at this instant.
    pub fn snapshot(&self) -> Snapshot {
        let guard = self.inner.state.read();
        let mutset = match &guard.compacting {
            Some(compacting) => {
                let mut flattened = (**compacting).clone();
                flattened.merge_from(&guard.mutset);
                flattened
            }
            None => guard.mutset.clone(),
        };
        Snapshot {
            base: Arc::clone(&guard.base),
            mutset,
        }
    }

    /// Materialize a standalone copy of the store's current state into a
    /// fresh directory, safe to call while the store keeps running. Counted
    /// in `hot_copies` for the duration of the call so `stop()` can drain
    /// in-flight hot copies before tearing down.
    pub fn hot_copy(&self, dest: impl AsRef<Path>) -> Result<()> {
        *self.inner.hot_copies.lock() += 1;
        let _guard = HotCopyGuard { inner: &self.inner };

        let dest = dest.as_ref();
        fs::create_dir_all(dest)?;

        let (base, combined) = {
            let guard = self.inner.state.read();
            let combined = match &guard.compacting {
                Some(c) => {
                    let mut m = (**c).clone();
                    m.merge_from(&guard.mutset);
                    m
                }
                None => guard.mutset.clone(),
            };
            (Arc::clone(&guard.base), combined)
        };

        base.write_to(&indx_path(dest, 0), &keys_path(dest, 0), &vals_path(dest, 0))?;
        let mut log = MutationLog::create(&mods_path(dest, 0))?;
        let ws = combined.to_write_set();
        if !ws.is_empty() {
            log.append(&ws)?;
        }
        log.flush()?;
        log.sync()?;
        write_gen_pointer(dest, 0)?;
        Ok(())
    }

    pub fn stats(&self) -> Stats {
        let guard = self.inner.state.read();
        Stats {
            generation: guard.generation,
            base_entries: guard.base.len(),
            buffered_puts: guard.mutset.puts().len(),
            buffered_removes: guard.mutset.removes().len(),
            buffered_adjusts: guard.mutset.adjusts().len(),
            compaction_status: self.inner.compactor.status(),
        }
    }
}

impl KvRead for Snapshot {
    fn kv_get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.view(|v| v.kv_get(key))
    }
    fn kv_get_at_least(&self, min: &[u8]) -> Result<Option<Entry>> {
        self.view(|v| v.kv_get_at_least(min))
    }
    fn kv_get_at_most(&self, max: &[u8]) -> Result<Option<Entry>> {
        self.view(|v| v.kv_get_at_most(max))
    }
    fn kv_range(
        &self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        reverse: bool,
    ) -> Result<Box<dyn Iterator<Item = Result<Entry>> + '_>> {
        Overlay::new(&self.mutset, self.base.as_ref()).kv_range(min, max, reverse)
    }
}

impl Snapshot {
    fn view<R>(&self, f: impl FnOnce(&dyn KvRead) -> R) -> R {
        let view = Overlay::new(&self.mutset, self.base.as_ref());
        f(&view)
    }
}

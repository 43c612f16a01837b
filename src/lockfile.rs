//! Directory-exclusive advisory lock on the store's `lockfile` sentinel.
//!
//! The teacher's own `file_lock.rs` hand-rolls this with raw `libc`/`winapi`
//! `flock`/`LockFileEx` calls (credited there as a port of the `fs2` crate);
//! we take the crate itself instead of re-deriving its platform branches.

use std::fs;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Held for the lifetime of one `AtomicStore::start()` call. Dropping it
/// releases the advisory lock.
pub struct LockFile {
    file: fs::File,
    path: PathBuf,
}

impl LockFile {
    /// Acquire the directory's exclusive lock, creating `lockfile` if
    /// needed. Fails with `Error::AlreadyLocked` if another process (or
    /// another live `AtomicStore` in this process) already holds it.
    pub fn acquire(dir: &Path) -> Result<LockFile> {
        let path = dir.join("lockfile");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        file.try_lock_exclusive()
            .map_err(|_| Error::AlreadyLocked(dir.display().to_string()))?;
        Ok(LockFile { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            log::warn!("failed to release lockfile {:?}: {}", self.path, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_in_same_process_fails() {
        let dir = tempfile::tempdir().unwrap();
        let first = LockFile::acquire(dir.path()).unwrap();
        let second = LockFile::acquire(dir.path());
        assert!(matches!(second, Err(Error::AlreadyLocked(_))));
        drop(first);
        assert!(LockFile::acquire(dir.path()).is_ok());
    }
}

//! `MutationLog`: the append-only `mods.<g>` write-set log backing one
//! generation's `MutationSet`, per spec section 4.5.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::codec::{decode_write_set, encode_write_set, WriteSet};
use crate::error::Result;
use crate::mutset::MutationSet;
use crate::util::{open_file_append, open_file_r};

pub struct MutationLog {
    file: fs::File,
    path: PathBuf,
}

impl MutationLog {
    /// Create a brand new, empty log file for a fresh generation. Fails if
    /// the file already exists.
    pub fn create(path: &Path) -> Result<MutationLog> {
        let file = open_file_append(path, true)?;
        Ok(MutationLog {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Reopen an existing log file in append mode, typically right after
    /// `replay` has truncated any partial tail.
    pub fn open_append(path: &Path) -> Result<MutationLog> {
        let file = open_file_append(path, false)?;
        Ok(MutationLog {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one framed write-set. Does not fsync; callers decide the
    /// fsync boundary (see `AtomicStore::mutate`, which syncs the log
    /// under a downgraded read lock before acknowledging the write).
    pub fn append(&mut self, ws: &WriteSet) -> Result<()> {
        let framed = encode_write_set(ws);
        self.file.write_all(&framed)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }

    pub fn sync(&self) -> Result<()> {
        self.file.sync_data()?;
        Ok(())
    }

    /// Replay a log file into a fresh `MutationSet`. A log file that
    /// doesn't exist yet (a brand new generation) replays to an empty set.
    /// A write that was interrupted mid-append leaves an undecodable
    /// partial frame at the very end of the file; that tail is discarded
    /// and the file is truncated on disk to the last complete frame so a
    /// subsequent append starts from a clean boundary. A malformed frame
    /// anywhere else in the file is real corruption and is reported as an
    /// error rather than silently dropped.
    pub fn replay(path: &Path) -> Result<(MutationSet, bool)> {
        let mut buf = Vec::new();
        match open_file_r(path) {
            Ok(mut file) => {
                file.read_to_end(&mut buf)?;
            }
            Err(err) => {
                if is_not_found(&err) {
                    return Ok((MutationSet::new(), false));
                }
                return Err(err);
            }
        }

        let mut offset = 0usize;
        let mut set = MutationSet::new();
        let mut truncated = false;
        loop {
            match decode_write_set(&buf[offset..])? {
                Some((ws, consumed)) => {
                    set.apply_write_set(&ws);
                    offset += consumed;
                }
                None => {
                    if offset < buf.len() {
                        truncated = true;
                        log::warn!(
                            "mutation log {:?}: discarding {} bytes of partial tail write at offset {}",
                            path,
                            buf.len() - offset,
                            offset
                        );
                    }
                    break;
                }
            }
        }

        if truncated {
            let file = fs::OpenOptions::new().write(true).open(path)?;
            file.set_len(offset as u64)?;
            file.sync_all()?;
        }

        Ok((set, truncated))
    }
}

fn is_not_found(err: &crate::error::Error) -> bool {
    matches!(err, crate::error::Error::IoFailure(e) if e.kind() == std::io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mods.0");
        let (set, truncated) = MutationLog::replay(&path).unwrap();
        assert!(set.is_empty());
        assert!(!truncated);
    }

    #[test]
    fn append_and_replay_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mods.0");
        {
            let mut log = MutationLog::create(&path).unwrap();
            log.append(&WriteSet::new().put(b"a".to_vec(), b"1".to_vec())).unwrap();
            log.append(&WriteSet::new().adjust(b"n".to_vec(), 3)).unwrap();
            log.flush().unwrap();
        }
        let (set, truncated) = MutationLog::replay(&path).unwrap();
        assert!(!truncated);
        assert_eq!(set.puts().get(b"a".as_slice()), Some(&b"1".to_vec()));
        assert_eq!(set.adjusts().get(b"n".as_slice()), Some(&3));
    }

    #[test]
    fn replay_truncates_partial_tail_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mods.0");
        {
            let mut log = MutationLog::create(&path).unwrap();
            log.append(&WriteSet::new().put(b"a".to_vec(), b"1".to_vec())).unwrap();
            log.flush().unwrap();
        }
        let good_len = fs::metadata(&path).unwrap().len();
        {
            // Simulate a crash mid-append: only the 4-byte frame length
            // prefix landed on disk, with its body never written.
            let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
            file.write_all(&100u32.to_be_bytes()).unwrap();
        }

        let (set, truncated) = MutationLog::replay(&path).unwrap();
        assert!(truncated);
        assert_eq!(set.puts().get(b"a".as_slice()), Some(&b"1".to_vec()));
        assert!(!set.puts().contains_key(b"b".as_slice()));
        assert_eq!(fs::metadata(&path).unwrap().len(), good_len);
    }

    #[test]
    fn open_append_continues_after_replay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mods.0");
        {
            let mut log = MutationLog::create(&path).unwrap();
            log.append(&WriteSet::new().put(b"a".to_vec(), b"1".to_vec())).unwrap();
            log.flush().unwrap();
        }
        let (_, truncated) = MutationLog::replay(&path).unwrap();
        assert!(!truncated);
        {
            let mut log = MutationLog::open_append(&path).unwrap();
            log.append(&WriteSet::new().put(b"b".to_vec(), b"2".to_vec())).unwrap();
            log.flush().unwrap();
        }
        let (set, _) = MutationLog::replay(&path).unwrap();
        assert_eq!(set.puts().len(), 2);
    }
}

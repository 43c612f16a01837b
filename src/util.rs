//! Small file and byte helpers shared across modules.

use std::{
    fs,
    io::{self, Read, Seek, Write},
    path::Path,
};

use crate::error::{Error, Result};

/// Open a file for appending, creating it (and its parent directory) when
/// `create` is true. Fails if the file already exists and `create` is true,
/// matching the "fresh generation" use at store-start.
pub(crate) fn open_file_append(path: &Path, create: bool) -> Result<fs::File> {
    let mut opts = fs::OpenOptions::new();
    if create {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(opts.append(true).create_new(true).open(path)?)
    } else {
        Ok(opts.append(true).open(path)?)
    }
}

/// Open a file read-only.
pub(crate) fn open_file_r(path: &Path) -> Result<fs::File> {
    Ok(fs::OpenOptions::new().read(true).open(path)?)
}

/// Create (truncating) a file for writing from scratch.
pub(crate) fn create_file_w(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?)
}

/// Read exactly `n` bytes at `fpos`, failing loudly on a short read instead
/// of silently returning a truncated buffer.
pub(crate) fn read_buffer(fd: &mut fs::File, fpos: u64, n: u64, msg: &str) -> Result<Vec<u8>> {
    fd.seek(io::SeekFrom::Start(fpos))?;
    let mut buf = vec![0u8; n as usize];
    fd.read_exact(&mut buf).map_err(|err| {
        Error::IoFailure(io::Error::new(
            err.kind(),
            format!("{}: short read at {} for {} bytes", msg, fpos, n),
        ))
    })?;
    Ok(buf)
}

pub(crate) fn write_u32_be(w: &mut impl Write, v: u32) -> Result<()> {
    w.write_all(&v.to_be_bytes())?;
    Ok(())
}

pub(crate) fn write_u64_be(w: &mut impl Write, v: u64) -> Result<()> {
    w.write_all(&v.to_be_bytes())?;
    Ok(())
}

pub(crate) fn read_u32_be(buf: &[u8], at: usize) -> u32 {
    u32::from_be_bytes(buf[at..at + 4].try_into().unwrap())
}

pub(crate) fn read_u64_be(buf: &[u8], at: usize) -> u64 {
    u64::from_be_bytes(buf[at..at + 8].try_into().unwrap())
}

/// fsync a directory handle; best-effort on platforms (or filesystems) that
/// don't support it.
pub(crate) fn fsync_dir(dir: &Path) -> Result<()> {
    match fs::File::open(dir) {
        Ok(fd) => match fd.sync_all() {
            Ok(()) => Ok(()),
            Err(err) => {
                log::warn!("directory fsync not supported for {:?}: {}", dir, err);
                Ok(())
            }
        },
        Err(err) => {
            log::warn!("could not open directory {:?} for fsync: {}", dir, err);
            Ok(())
        }
    }
}

/// Longest common prefix length between two byte strings, capped at `cap`.
pub(crate) fn common_prefix_len(a: &[u8], b: &[u8], cap: usize) -> usize {
    a.iter()
        .zip(b.iter())
        .take(cap)
        .take_while(|(x, y)| x == y)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_len_caps() {
        assert_eq!(common_prefix_len(b"hello", b"help", 255), 3);
        assert_eq!(common_prefix_len(b"abc", b"abc", 2), 2);
        assert_eq!(common_prefix_len(b"", b"abc", 255), 0);
    }
}

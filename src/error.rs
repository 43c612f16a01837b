//! Tagged error type for the whole crate, per the propagation policy:
//! structural errors during start are fatal, mutation errors are surfaced
//! with the mods file restored, and a handful of cleanup paths are
//! intentionally logged-and-swallowed rather than routed through here.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Another process (or another `start()` in this one) already holds the
    /// directory's advisory lock.
    #[error("directory already locked: {0}")]
    AlreadyLocked(String),

    /// `indx.*`/`keys.*`/`vals.*` files exist but the `gen` pointer file is
    /// absent, or vice versa.
    #[error("inconsistent generation state: {0}")]
    Inconsistent(String),

    /// Underlying I/O failure, with cause.
    #[error("I/O failure: {0}")]
    IoFailure(#[from] io::Error),

    /// Index size not a multiple of 8, reversed keys, 24-bit locator
    /// overflow, or any other structural violation of the on-disk format.
    #[error("corrupt array image: {0}")]
    Corrupt(String),

    /// A blob would exceed the 2 GiB per-file bound, or a group's suffix
    /// offset does not fit in 24 bits.
    #[error("size overflow: {0}")]
    Overflow(String),

    /// The store has been stopped; no further operations are permitted.
    #[error("store closed")]
    Closed,

    /// A write was attempted against a read-only `ArrayStore`.
    #[error("store is read-only")]
    ReadOnly,

    /// A writer was stalled on backpressure when the store closed underneath
    /// it.
    #[error("operation canceled by shutdown")]
    Canceled,
}

//! arktree is an embedded, ordered key/value storage engine: immutable,
//! prefix-compressed on-disk arrays for the bulk of the data, a small
//! in-memory overlay of puts/removes/counter-adjusts for recent writes,
//! an append-only log backing that overlay across restarts, and a
//! background compactor that folds the two back into a fresh array
//! generation once the overlay grows past a configured size.
//!
//! [`AtomicStore`] is the front door. Open one with [`Config::default`]
//! or a tuned [`Config`], then read with `get`/`get_at_least`/
//! `get_at_most`/`range` and write with `mutate`.

mod array;
mod codec;
mod compactor;
mod config;
mod error;
mod lockfile;
mod modlog;
mod mutset;
mod pressure;
mod scheduler;
mod store;
mod util;
mod view;

pub use crate::array::{ArrayFinder, ArrayStore, ArrayWriter, Entry};
pub use crate::codec::{decode_counter, encode_counter, WriteOp, WriteSet};
pub use crate::compactor::CompactionStatus;
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::modlog::MutationLog;
pub use crate::mutset::{MutationSet, Overlay};
pub use crate::store::{AtomicStore, Snapshot, Stats, StoreRangeIter};
pub use crate::view::KvRead;

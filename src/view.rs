//! `KvRead`: the capability both `ArrayStore` and an overlaid
//! `MutationSet` implement, per spec section 9's note that "read view"
//! operations should be expressed as a capability rather than an
//! inheritance hierarchy.

use crate::array::{ArrayStore, Entry};
use crate::error::Result;

pub trait KvRead {
    fn kv_get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    fn kv_get_at_least(&self, min: &[u8]) -> Result<Option<Entry>>;
    fn kv_get_at_most(&self, max: &[u8]) -> Result<Option<Entry>>;
    /// A lazy scan over `[min, max)`: no implementation may buffer the full
    /// result up front. `ArrayStore` already has a genuinely lazy
    /// `RangeIter`; `Overlay` merges its buffered puts/adjusts against a
    /// lazily-pulled base stream one step at a time.
    fn kv_range(
        &self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        reverse: bool,
    ) -> Result<Box<dyn Iterator<Item = Result<Entry>> + '_>>;
}

impl KvRead for ArrayStore {
    fn kv_get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.get(key)
    }

    fn kv_get_at_least(&self, min: &[u8]) -> Result<Option<Entry>> {
        self.get_at_least(min)
    }

    fn kv_get_at_most(&self, max: &[u8]) -> Result<Option<Entry>> {
        self.get_at_most(max)
    }

    fn kv_range(
        &self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        reverse: bool,
    ) -> Result<Box<dyn Iterator<Item = Result<Entry>> + '_>> {
        Ok(Box::new(self.range(min, max, reverse)))
    }
}

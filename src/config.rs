//! Tunables for `AtomicStore::start`, built with the same `impl` builder
//! style the teacher uses for its own config types.

use std::time::Duration;

/// Builder for the knobs that govern write backpressure and background
/// compaction scheduling. `Config::default()` mirrors the values noted in
/// the design write-up: a 4 MiB low water mark, a 16 MiB high water mark,
/// and a 300 second delay ceiling.
#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) compact_low_water_bytes: u64,
    pub(crate) compact_high_water_bytes: u64,
    pub(crate) compact_max_delay: Duration,
    pub(crate) scheduler_debounce: Option<Duration>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            compact_low_water_bytes: 4 * 1024 * 1024,
            compact_high_water_bytes: 16 * 1024 * 1024,
            compact_max_delay: Duration::from_secs(300),
            scheduler_debounce: None,
        }
    }
}

impl Config {
    pub fn new() -> Config {
        Config::default()
    }

    /// Size of the buffered `MutationSet` at which compaction is first
    /// scheduled and write stalling can begin.
    pub fn compact_low_water_bytes(mut self, v: u64) -> Config {
        self.compact_low_water_bytes = v;
        self
    }

    /// Size at which write stalling saturates at `compact_max_delay`.
    pub fn compact_high_water_bytes(mut self, v: u64) -> Config {
        self.compact_high_water_bytes = v;
        self
    }

    /// Ceiling on the per-`mutate()` stall delay the pressure controller
    /// can impose.
    pub fn compact_max_delay(mut self, v: Duration) -> Config {
        self.compact_max_delay = v;
        self
    }

    /// Debounce window the background scheduler waits after crossing the
    /// low water mark before actually kicking off compaction, so a burst
    /// of mutations triggers one compaction instead of many. `None` fires
    /// immediately on crossing the mark.
    pub fn scheduler_debounce(mut self, v: Option<Duration>) -> Config {
        self.scheduler_debounce = v;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = Config::default();
        assert_eq!(c.compact_low_water_bytes, 4 * 1024 * 1024);
        assert_eq!(c.compact_high_water_bytes, 16 * 1024 * 1024);
        assert_eq!(c.compact_max_delay, Duration::from_secs(300));
        assert!(c.scheduler_debounce.is_none());
    }

    #[test]
    fn builder_overrides_apply() {
        let c = Config::new()
            .compact_low_water_bytes(1024)
            .compact_high_water_bytes(2048)
            .compact_max_delay(Duration::from_secs(5))
            .scheduler_debounce(Some(Duration::from_millis(50)));
        assert_eq!(c.compact_low_water_bytes, 1024);
        assert_eq!(c.compact_high_water_bytes, 2048);
        assert_eq!(c.compact_max_delay, Duration::from_secs(5));
        assert_eq!(c.scheduler_debounce, Some(Duration::from_millis(50)));
    }
}

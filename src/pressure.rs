//! `PressureController`: converts the live mutation set's size into a
//! writer stall delay, per spec section 4.8's low/high water-mark curve.

use std::time::Duration;

/// Computes how long a writer should pause before a `mutate()` call is
/// allowed to proceed, as a function of how far the current generation's
/// buffered mutations sit between `low` and `high` water marks.
#[derive(Clone, Copy, Debug)]
pub struct PressureController {
    low: u64,
    high: u64,
    max_delay: Duration,
}

impl PressureController {
    pub fn new(low_water_bytes: u64, high_water_bytes: u64, max_delay: Duration) -> PressureController {
        PressureController {
            low: low_water_bytes,
            high: high_water_bytes,
            max_delay,
        }
    }

    /// `None` below the halfway point between the water marks; otherwise a
    /// delay that grows without bound as the buffered size approaches
    /// `high`, capped at `max_delay`.
    pub fn stall_delay(&self, buffered_bytes: u64) -> Option<Duration> {
        let span = self.high.saturating_sub(self.low).max(1) as f64;
        let w = if buffered_bytes <= self.low {
            0.0
        } else {
            ((buffered_bytes - self.low) as f64 / span).min(1.0)
        };
        if w <= 0.5 {
            return None;
        }
        let millis = if w >= 1.0 {
            self.max_delay.as_millis() as f64
        } else {
            (100.0 * (1.0 / (1.0 - w) - 1.0)).floor()
        };
        let millis = millis.min(self.max_delay.as_millis() as f64).max(0.0);
        Some(Duration::from_millis(millis as u64))
    }
}

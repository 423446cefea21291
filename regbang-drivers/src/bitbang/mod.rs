//! Bit-banged serial line drivers
//!
//! One pin, one delay per bit cell. The transmitters own the authoritative
//! line level and never read the pin back; the receiver polls a pin at a
//! fixed oversampling rate.

pub mod rx;
pub mod tx;
pub mod tx_async;

pub use rx::{BitBangRx, RxError};
pub use tx::BitBangTx;
pub use tx_async::AsyncBitBangTx;

use regbang_hal::BitTiming;

/// Converts a picosecond period into a stream of nanosecond delays
///
/// Delays are whole nanoseconds, so the sub-nanosecond remainder is carried
/// into the next step. After `n` steps the total issued delay is within one
/// nanosecond of `n * period_ps`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepClock {
    step_ps: u64,
    owed_ps: u64,
}

impl StepClock {
    /// One step per bit period
    pub(crate) fn per_bit(timing: BitTiming) -> Self {
        Self {
            step_ps: timing.period_ps(),
            owed_ps: 0,
        }
    }

    /// `oversample` steps per bit period
    ///
    /// Fractions of a picosecond are dropped; they stay far below any
    /// sampling jitter that matters.
    pub(crate) fn per_sample(timing: BitTiming, oversample: u32) -> Self {
        Self {
            step_ps: timing.period_ps() / oversample.max(1) as u64,
            owed_ps: 0,
        }
    }

    /// Delay for the next step in nanoseconds
    pub(crate) fn next_ns(&mut self) -> u32 {
        self.owed_ps += self.step_ps;
        let ns = (self.owed_ps / 1000).min(u32::MAX as u64);
        self.owed_ps -= ns * 1000;
        ns as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_clock_carries_remainder() {
        let mut clock = StepClock::per_bit(BitTiming::default());
        let total: u64 = (0..1000).map(|_| clock.next_ns() as u64).sum();
        // 1000 * 8_680_556 ps = 8_680_556 ns exactly
        assert_eq!(total, 8_680_556);
    }

    #[test]
    fn test_step_clock_single_step() {
        let mut clock = StepClock::per_bit(BitTiming::default());
        assert_eq!(clock.next_ns(), 8_680);
        assert_eq!(clock.next_ns(), 8_681);
    }

    #[test]
    fn test_step_clock_per_sample() {
        let timing = BitTiming::from_baud(1_000_000).unwrap();
        let mut clock = StepClock::per_sample(timing, 4);
        assert_eq!(clock.next_ns(), 250);
    }
}

//! Serial line configuration and bit timing
//!
//! The line is always 8 data bits, no parity, one stop bit. Only the baud
//! rate and the receiver's oversampling factor are configurable.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default baud rate of the target's serial receiver
pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// Picoseconds per second
const PS_PER_SECOND: u64 = 1_000_000_000_000;

/// Bit cells per byte on the wire (start + 8 data + stop)
pub const CELLS_PER_BYTE: u32 = 10;

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Receiver samples per bit period (1 = sample once per bit)
    pub oversample: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: DEFAULT_BAUDRATE,
            oversample: 16,
        }
    }
}

impl UartConfig {
    /// Bit timing for this configuration
    ///
    /// Returns `None` for a zero baud rate.
    pub fn timing(&self) -> Option<BitTiming> {
        BitTiming::from_baud(self.baudrate)
    }
}

/// Duration of one bit cell
///
/// Held in picoseconds so that standard baud rates stay within rounding
/// error of one picosecond per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BitTiming {
    period_ps: u64,
}

impl BitTiming {
    /// Bit timing for a baud rate, rounded to the nearest picosecond
    ///
    /// Returns `None` if `baud` is zero.
    pub const fn from_baud(baud: u32) -> Option<Self> {
        if baud == 0 {
            return None;
        }
        let baud = baud as u64;
        Some(Self {
            period_ps: (PS_PER_SECOND + baud / 2) / baud,
        })
    }

    /// Bit timing with an explicit period in picoseconds
    pub const fn from_period_ps(period_ps: u64) -> Self {
        Self { period_ps }
    }

    /// Bit period in picoseconds
    pub const fn period_ps(&self) -> u64 {
        self.period_ps
    }

    /// Bit period in nanoseconds, rounded to nearest
    pub const fn period_ns(&self) -> u32 {
        let ns = (self.period_ps + 500) / 1000;
        if ns > u32::MAX as u64 {
            u32::MAX
        } else {
            ns as u32
        }
    }

    /// Time to transmit `bytes` back-to-back bytes, in picoseconds
    pub const fn frame_duration_ps(&self, bytes: usize) -> u64 {
        CELLS_PER_BYTE as u64 * bytes as u64 * self.period_ps
    }
}

impl Default for BitTiming {
    fn default() -> Self {
        Self {
            period_ps: (PS_PER_SECOND + DEFAULT_BAUDRATE as u64 / 2) / DEFAULT_BAUDRATE as u64,
        }
    }
}

//! Polled bit-banged receiver
//!
//! Samples an input pin `oversample` times per bit period and feeds the
//! samples, in time order, to a [`TransactionDecoder`]. Used to check a
//! transmitter against real hardware loopback, or to stand in for the
//! target's receiver in tests.

use core::fmt;

use embedded_hal::delay::DelayNs;
use regbang_hal::{BitTiming, InputPin};
use regbang_protocol::{CodecError, FrameLayout, Transaction, TransactionDecoder};

use super::StepClock;

/// Receive errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxError {
    /// Malformed frame on the line
    Codec(CodecError),
    /// Poll budget ran out with the line idle
    Timeout,
}

impl From<CodecError> for RxError {
    fn from(err: CodecError) -> Self {
        RxError::Codec(err)
    }
}

impl fmt::Display for RxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RxError::Codec(e) => write!(f, "{e}"),
            RxError::Timeout => f.write_str("receive timeout"),
        }
    }
}

impl core::error::Error for RxError {}

/// Bit-banged transaction receiver
pub struct BitBangRx<P, D> {
    pin: P,
    delay: D,
    clock: StepClock,
    decoder: TransactionDecoder,
}

impl<P: InputPin, D: DelayNs> BitBangRx<P, D> {
    /// Create a receiver polling `oversample` times per bit
    pub fn new(pin: P, delay: D, timing: BitTiming, oversample: u32, layout: FrameLayout) -> Self {
        Self {
            pin,
            delay,
            clock: StepClock::per_sample(timing, oversample),
            decoder: TransactionDecoder::new(oversample, layout),
        }
    }

    /// Wait for the next transaction
    ///
    /// With `max_polls = None` the receiver waits forever. When the budget
    /// runs out while idle the result is [`RxError::Timeout`]; inside a frame
    /// it is a truncation framing error.
    pub fn receive(&mut self, max_polls: Option<u32>) -> Result<Transaction, RxError> {
        let mut polls = 0u32;
        loop {
            if max_polls.is_some_and(|max| polls >= max) {
                self.decoder.finish()?;
                return Err(RxError::Timeout);
            }
            polls = polls.saturating_add(1);

            let sample = self.pin.sample();
            let result = self.decoder.feed(sample);
            let ns = self.clock.next_ns();
            self.delay.delay_ns(ns);

            match result {
                Ok(Some(transaction)) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("rx {}", transaction);
                    return Ok(transaction);
                }
                Ok(None) => {}
                Err(e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("rx framing: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    /// Release the pin and delay
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

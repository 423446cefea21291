//! Byte recovery from a sampled serial line
//!
//! The decoder sees the line `oversample` times per bit period, in strict
//! time order. A falling edge from an idle-high line starts a byte. Each bit
//! is then sampled once at its centre, so the decoder never looks further
//! ahead than one bit period.

use regbang_hal::Logic;

use crate::error::FramingError;

/// Byte-level receive state machine
#[derive(Debug, Clone)]
pub struct SampleDecoder {
    oversample: u32,
    state: SampleState,
    /// Level of the previous sample (the line idles high)
    prev_high: bool,
    /// Samples left before the next centre sample
    countdown: u32,
    bits_read: u8,
    shift: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SampleState {
    /// Waiting for a falling edge
    Idle,
    /// Inside the start bit
    Start,
    /// Inside the data bits
    Data,
    /// Inside the stop bit
    Stop,
}

impl SampleDecoder {
    /// Create a decoder for `oversample` samples per bit (0 is treated as 1)
    ///
    /// The line is assumed idle (high) just before the first sample, so a
    /// stream that opens low, `X` or `Z` is taken as a start edge. Streams
    /// should begin in idle or at a start bit.
    pub fn new(oversample: u32) -> Self {
        Self {
            oversample: oversample.max(1),
            state: SampleState::Idle,
            prev_high: true,
            countdown: 0,
            bits_read: 0,
            shift: 0,
        }
    }

    /// Samples per bit period
    pub fn oversample(&self) -> u32 {
        self.oversample
    }

    /// True when no byte is in progress
    pub fn is_idle(&self) -> bool {
        self.state == SampleState::Idle
    }

    /// Abandon any byte in progress
    ///
    /// The previous-sample memory is kept, so a line that is currently low
    /// must return high before the next byte can start.
    pub fn reset(&mut self) {
        self.state = SampleState::Idle;
        self.countdown = 0;
        self.bits_read = 0;
        self.shift = 0;
    }

    /// Feed one sample
    ///
    /// Returns `Ok(Some(byte))` on the centre sample of a valid stop bit.
    /// Indeterminate samples read as low.
    pub fn feed(&mut self, sample: Logic) -> Result<Option<u8>, FramingError> {
        let high = sample.is_high();
        let prev_high = core::mem::replace(&mut self.prev_high, high);

        if self.state == SampleState::Idle {
            if !(prev_high && !high) {
                return Ok(None);
            }
            self.state = SampleState::Start;
            self.countdown = self.oversample / 2;
        }

        if self.countdown > 0 {
            self.countdown -= 1;
            return Ok(None);
        }

        let result = self.centre(high);
        if result.is_err() {
            self.reset();
        }
        result
    }

    /// Handle the centre sample of the current bit
    fn centre(&mut self, high: bool) -> Result<Option<u8>, FramingError> {
        self.countdown = self.oversample - 1;

        match self.state {
            SampleState::Idle => Ok(None),
            SampleState::Start => {
                if high {
                    return Err(FramingError::StartBit);
                }
                self.state = SampleState::Data;
                self.bits_read = 0;
                self.shift = 0;
                Ok(None)
            }
            SampleState::Data => {
                self.shift |= (high as u8) << self.bits_read;
                self.bits_read += 1;
                if self.bits_read == 8 {
                    self.state = SampleState::Stop;
                }
                Ok(None)
            }
            SampleState::Stop => {
                if !high {
                    return Err(FramingError::StopBit);
                }
                let byte = self.shift;
                self.reset();
                Ok(Some(byte))
            }
        }
    }
}

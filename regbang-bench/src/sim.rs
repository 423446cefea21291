//! Virtual-time simulation of the target's input port
//!
//! The transmitter's delays advance a shared picosecond clock instead of
//! sleeping. Every whole-byte write to the port is recorded with its time
//! stamp, so the resulting trace can be sampled like a waveform dump.

use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use regbang_drivers::PortBus;
use regbang_hal::Logic;

/// Shared virtual clock in picoseconds
#[derive(Debug, Clone, Default)]
pub struct SimClock(Rc<Cell<u64>>);

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time
    pub fn now_ps(&self) -> u64 {
        self.0.get()
    }

    /// Move time forward
    pub fn advance_ps(&self, ps: u64) {
        self.0.set(self.0.get() + ps);
    }
}

/// Delay that advances the virtual clock
#[derive(Debug, Clone)]
pub struct SimDelay {
    clock: SimClock,
}

impl SimDelay {
    pub fn new(clock: SimClock) -> Self {
        Self { clock }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ps(ns as u64 * 1000);
    }
}

/// Recording 8-bit input port
#[derive(Debug)]
pub struct SimPort {
    clock: SimClock,
    trace: Trace,
}

impl SimPort {
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            trace: Trace::default(),
        }
    }

    /// Everything written so far
    pub fn trace(&self) -> &Trace {
        &self.trace
    }
}

impl PortBus for SimPort {
    fn write(&mut self, value: u8) {
        self.trace.push(self.clock.now_ps(), value);
    }
}

/// Time-stamped port writes, in time order
///
/// Before the first write the port is undriven and samples as unknown.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    events: Vec<(u64, u8)>,
}

impl Trace {
    /// Record a write at `time_ps` (must not go back in time)
    pub fn push(&mut self, time_ps: u64, value: u8) {
        debug_assert!(self.events.last().map_or(true, |&(t, _)| t <= time_ps));
        self.events.push((time_ps, value));
    }

    /// Number of recorded writes
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Time of the last write
    pub fn end_ps(&self) -> u64 {
        self.events.last().map_or(0, |&(t, _)| t)
    }

    /// Port value at `time_ps`; the last write at or before that time wins
    pub fn value_at(&self, time_ps: u64) -> Option<u8> {
        let idx = self.events.partition_point(|&(t, _)| t <= time_ps);
        idx.checked_sub(1).map(|i| self.events[i].1)
    }

    /// Level of one port bit at `time_ps`
    pub fn level_at(&self, bit: u8, time_ps: u64) -> Logic {
        match self.value_at(time_ps) {
            Some(value) => Logic::from(value & (1 << (bit & 7)) != 0),
            None => Logic::Unknown,
        }
    }

    /// Sample one port bit `oversample` times per bit period over
    /// `[start_ps, end_ps)`
    pub fn sample(
        &self,
        bit: u8,
        start_ps: u64,
        end_ps: u64,
        period_ps: u64,
        oversample: u32,
    ) -> Vec<Logic> {
        let oversample = oversample.max(1) as u64;
        (0u64..)
            .map(|k| start_ps + k * period_ps / oversample)
            .take_while(|&t| t < end_ps)
            .map(|t| self.level_at(bit, t))
            .collect()
    }
}

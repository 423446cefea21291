//! Shadowed input port
//!
//! The target's inputs are 8-bit buses that can only be written whole. A
//! read-modify-write through the live bus could pick up a stale or
//! unresolved value, so every update goes through a shadow copy and the
//! full byte is written out.

use regbang_hal::OutputPin;

/// An 8-bit bus that accepts whole-byte writes
pub trait PortBus {
    /// Drive the whole bus
    fn write(&mut self, value: u8);
}

/// Shadow register in front of a [`PortBus`]
#[derive(Debug)]
pub struct ShadowPort<B> {
    bus: B,
    value: u8,
}

impl<B: PortBus> ShadowPort<B> {
    /// Create a port and drive its initial value
    pub fn new(bus: B, initial: u8) -> Self {
        let mut port = Self { bus, value: initial };
        port.bus.write(initial);
        port
    }

    /// Last value written to the bus
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Drive a whole new value
    pub fn write(&mut self, value: u8) {
        self.value = value;
        self.bus.write(value);
    }

    /// Update a single bit (0-7), keeping the others
    pub fn set_bit(&mut self, bit: u8, high: bool) {
        let mask = 1u8 << (bit & 7);
        let value = if high {
            self.value | mask
        } else {
            self.value & !mask
        };
        self.write(value);
    }

    /// Borrow one bit of the port as an output pin
    pub fn pin(&mut self, bit: u8) -> PortPin<'_, B> {
        PortPin {
            port: self,
            bit: bit & 7,
        }
    }

    /// Access the underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Consume the port, returning the bus
    pub fn into_inner(self) -> B {
        self.bus
    }
}

/// One bit of a [`ShadowPort`] used as an output pin
pub struct PortPin<'a, B> {
    port: &'a mut ShadowPort<B>,
    bit: u8,
}

impl<B: PortBus> OutputPin for PortPin<'_, B> {
    fn set_high(&mut self) {
        self.port.set_bit(self.bit, true);
    }

    fn set_low(&mut self) {
        self.port.set_bit(self.bit, false);
    }
}

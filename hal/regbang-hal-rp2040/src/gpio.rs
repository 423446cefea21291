//! GPIO wrappers

use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::Peri;
use regbang_hal::OutputPin;

/// Output pin driving a serial line
pub struct RpOutput {
    pin: Output<'static>,
}

impl RpOutput {
    /// Configure `pin` as an output, starting at the idle (high) level
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        Self {
            pin: Output::new(pin, Level::High),
        }
    }
}

impl OutputPin for RpOutput {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }
}

/// Eight inputs read as a byte, bit N from `pins[N]`
pub struct StatusBus {
    pins: [Input<'static>; 8],
}

impl StatusBus {
    pub fn new(pins: [Peri<'static, AnyPin>; 8]) -> Self {
        Self {
            pins: pins.map(|pin| Input::new(pin, Pull::Down)),
        }
    }

    /// Sample all eight pins
    pub fn read(&self) -> u8 {
        self.pins
            .iter()
            .enumerate()
            .fold(0, |acc, (bit, pin)| acc | ((pin.is_high() as u8) << bit))
    }
}

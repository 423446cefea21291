//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins that can be implemented
//! by chip-specific code, simulators and test mocks.

use crate::logic::Logic;

/// Digital output pin
///
/// Implementations only drive the pin. Callers that need the current line
/// level keep their own copy instead of reading the pin back.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }

    /// Sample the pin as a four-state value
    ///
    /// Real pins are always resolved, so the default maps the digital level.
    /// Simulated pins override this to report unknown or floating values.
    fn sample(&self) -> Logic {
        Logic::from(self.is_high())
    }
}

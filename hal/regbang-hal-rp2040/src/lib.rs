//! RP2040 bindings for the regbang HAL
//!
//! Wraps embassy-rp GPIO so the bit-bang drivers can run on RP2040 pins:
//!
//! - [`RpOutput`]: push-pull output implementing [`regbang_hal::OutputPin`]
//! - [`StatusBus`]: eight inputs read as one byte

#![no_std]

pub mod gpio;

pub use gpio::{RpOutput, StatusBus};

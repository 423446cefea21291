//! Regbang Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware abstractions the serial
//! register-bus codec needs. Chip crates, simulators and test mocks
//! implement them so the same transmitter and receiver code can drive a
//! real GPIO, a simulated input bus or a recorded waveform.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  regbang-drivers / regbang-bench        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  regbang-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ RP2040 GPIO   │       │ simulated     │
//! │ (firmware)    │       │ input port    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Contents
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`logic::Logic`] - Four-state sampled values and their normalization
//! - [`uart::UartConfig`], [`uart::BitTiming`] - Serial line configuration

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod logic;
pub mod uart;

// Re-export key items at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use logic::{Logic, LogicError};
pub use uart::{BitTiming, UartConfig, DEFAULT_BAUDRATE};

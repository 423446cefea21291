//! Bit-banged register bus drivers
//!
//! This crate drives the serial register-bus protocol from
//! `regbang-protocol` over plain pins:
//!
//! - Transmitters (blocking and async) that bit-bang frames on an output pin
//! - A polled receiver that decodes frames from an input pin
//! - A shadowed 8-bit input port for targets whose inputs are whole buses
//! - The target SoC's register map, bring-up sequence and status pins

#![no_std]
#![deny(unsafe_code)]

pub mod bitbang;
pub mod port;
pub mod soc;

pub use bitbang::{AsyncBitBangTx, BitBangRx, BitBangTx, RxError};
pub use port::{PortBus, PortPin, ShadowPort};
pub use soc::OutputStatus;

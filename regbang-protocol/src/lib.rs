//! Serial Register-Bus Protocol
//!
//! This crate defines the wire format used to issue memory-mapped register
//! reads and writes to an on-chip bus bridge over a bit-level serial line,
//! and the codec that converts between transactions and that line.
//!
//! # Protocol Overview
//!
//! Each transaction is one frame of bytes:
//! ```text
//! ┌──────────┬─────────┬─────┬─────────┬──────────┬─────────┬──────────┐
//! │ PREAMBLE │ VERSION │ DIR │ CONTROL │ RESERVED │ ADDRESS │ DATA     │
//! │ 0xA5     │ 0x01    │ 1B  │ 1B      │ 0–1B     │ 4B LE   │ 4B LE, W │
//! └──────────┴─────────┴─────┴─────────┴──────────┴─────────┴──────────┘
//! ```
//!
//! Each byte travels as ten bit cells (start, 8 data bits LSB first, stop)
//! on an idle-high line, back to back, with no parity.
//!
//! - [`bitcell`] turns a transaction into timed bit cells.
//! - [`sampler`] recovers bytes from line samples.
//! - [`frame`] turns bytes into transactions and back.
//! - [`decoder`] ties the sampler and frame parser together.

#![no_std]
#![deny(unsafe_code)]

pub mod bitcell;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod sampler;
pub mod transaction;

pub use bitcell::{encode, BitCell, BitCells};
pub use decoder::{decode, TransactionDecoder};
pub use error::{CodecError, FramingError};
pub use frame::{FrameLayout, FrameParser, FRAME_PREAMBLE, FRAME_VERSION, MAX_FRAME_SIZE};
pub use sampler::SampleDecoder;
pub use transaction::{ByteEnable, Direction, Transaction};

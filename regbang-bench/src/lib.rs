//! Host-side loopback bench for the regbang serial register bus
//!
//! Runs the bit-banged transmitter against a simulated 8-bit input port in
//! virtual time and checks that the recorded waveform decodes back to the
//! transactions that were sent.

pub mod bench;
pub mod config;
pub mod error;
pub mod sim;

pub use bench::{Bench, BenchReport, Outcome};
pub use config::{BenchConfig, Kind, LinkConfig, TransactionSpec};
pub use error::{BenchError, Result};
pub use sim::{SimClock, SimDelay, SimPort, Trace};

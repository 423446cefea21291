//! Error types for the loopback bench.

use regbang_protocol::{CodecError, Transaction};
use thiserror::Error;

/// Main error type for all bench operations.
#[derive(Debug, Error)]
pub enum BenchError {
    /// I/O error while reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML or a field of the wrong type.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Well-formed configuration with unusable values.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Encoding or decoding failed.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// The decoded transaction differs from the one transmitted.
    #[error("Transaction {index}: sent {sent:?}, decoded {decoded:?}")]
    Mismatch {
        index: usize,
        sent: Transaction,
        decoded: Transaction,
    },

    /// Decoding the whole trace found a different number of transactions.
    #[error("Trace holds {decoded} transactions, expected {expected}")]
    Count { expected: usize, decoded: usize },

    /// Line time of a frame is off by more than one bit period.
    #[error("Transaction {index}: took {actual_ps} ps, expected {expected_ps} ps")]
    Timing {
        index: usize,
        actual_ps: u64,
        expected_ps: u64,
    },
}

/// Result type alias using BenchError.
pub type Result<T> = std::result::Result<T, BenchError>;

//! Bench configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! [link]
//! baud = 115200
//! oversample = 16
//! read_reserved = false
//! write_reserved = false
//! rx_bit = 0
//! idle_bits = 2
//!
//! [[transaction]]
//! kind = "write"
//! address = 0x8000_0010
//! data = 0x0BCB_0001
//! byte_enable = 0xF
//!
//! [[transaction]]
//! kind = "read"
//! address = 0x8000_0010
//! ```
//!
//! Every `[link]` key is optional. Without any `[[transaction]]` entries the
//! bench replays the SoC bring-up sequence.

use std::fs;
use std::path::Path;

use regbang_drivers::soc;
use regbang_hal::{BitTiming, UartConfig, DEFAULT_BAUDRATE};
use regbang_protocol::{Direction, FrameLayout, Transaction};
use serde::Deserialize;

use crate::error::{BenchError, Result};

/// Complete bench configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    /// Serial line settings
    #[serde(default)]
    pub link: LinkConfig,
    /// Transactions to replay, in order
    #[serde(default, rename = "transaction")]
    pub transactions: Vec<TransactionSpec>,
}

/// Serial line settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
    /// Baud rate in bits per second
    pub baud: u32,
    /// Receiver samples per bit
    pub oversample: u32,
    /// Reserved zero byte after the control byte in reads
    pub read_reserved: bool,
    /// Reserved zero byte after the control byte in writes
    pub write_reserved: bool,
    /// Input port bit carrying the serial line (0-7)
    pub rx_bit: u8,
    /// Idle bit periods before each transaction
    pub idle_bits: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud: DEFAULT_BAUDRATE,
            oversample: 16,
            read_reserved: false,
            write_reserved: false,
            rx_bit: soc::RX_BIT,
            idle_bits: 2,
        }
    }
}

impl LinkConfig {
    /// Line configuration as seen by the HAL
    pub fn uart(&self) -> UartConfig {
        UartConfig {
            baudrate: self.baud,
            oversample: self.oversample,
        }
    }

    /// Frame layout
    pub fn layout(&self) -> FrameLayout {
        FrameLayout {
            read_reserved: self.read_reserved,
            write_reserved: self.write_reserved,
        }
    }

    /// Bit timing, rejecting a zero baud rate
    pub fn timing(&self) -> Result<BitTiming> {
        self.uart()
            .timing()
            .ok_or_else(|| BenchError::Config("baud must be positive".into()))
    }
}

/// Transaction kind as written in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Read,
    Write,
}

impl From<Kind> for Direction {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Read => Direction::Read,
            Kind::Write => Direction::Write,
        }
    }
}

/// One transaction as written in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionSpec {
    pub kind: Kind,
    pub address: u32,
    #[serde(default)]
    pub data: u32,
    pub byte_enable: Option<u8>,
}

impl TransactionSpec {
    /// Validate and convert into a transaction
    pub fn to_transaction(&self) -> Result<Transaction> {
        Ok(Transaction::from_parts(
            self.kind.into(),
            self.address,
            self.data,
            self.byte_enable,
        )?)
    }
}

impl BenchConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: BenchConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges that the TOML types cannot express
    pub fn validate(&self) -> Result<()> {
        self.link.timing()?;
        if self.link.oversample == 0 {
            return Err(BenchError::Config("oversample must be at least 1".into()));
        }
        if self.link.rx_bit > 7 {
            return Err(BenchError::Config(format!(
                "rx_bit {} outside the 8-bit input port",
                self.link.rx_bit
            )));
        }
        Ok(())
    }

    /// Transactions to replay
    ///
    /// Falls back to the SoC bring-up sequence when none are configured.
    pub fn script(&self) -> Result<Vec<Transaction>> {
        if self.transactions.is_empty() {
            return Ok(soc::bringup_script().to_vec());
        }
        self.transactions
            .iter()
            .map(TransactionSpec::to_transaction)
            .collect()
    }
}

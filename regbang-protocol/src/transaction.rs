//! Register bus transactions
//!
//! A transaction is built immediately before it is encoded and dropped
//! afterwards. Writes carry a 4-bit byte-enable mask selecting which of the
//! four data bytes the bus writes; reads carry only an address.

use crate::error::CodecError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Transfer direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Read,
    Write,
}

// Wire format values
const DIRECTION_READ: u8 = 0x00;
const DIRECTION_WRITE: u8 = 0x01;

impl Direction {
    /// Parse a direction from its wire format byte
    pub fn from_byte(byte: u8) -> Result<Self, CodecError> {
        match byte {
            DIRECTION_READ => Ok(Direction::Read),
            DIRECTION_WRITE => Ok(Direction::Write),
            other => Err(CodecError::UnsupportedDirection(other)),
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Direction::Read => DIRECTION_READ,
            Direction::Write => DIRECTION_WRITE,
        }
    }
}

/// 4-bit write byte-enable mask
///
/// Bit `n` enables data byte `n` (bit 0 = least significant byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct ByteEnable(u8);

impl ByteEnable {
    /// All four bytes enabled
    pub const ALL: ByteEnable = ByteEnable(0x0F);

    /// Create a mask, rejecting bits outside the low nibble
    pub const fn new(mask: u8) -> Result<Self, CodecError> {
        if mask & !0x0F != 0 {
            return Err(CodecError::InvalidByteEnable(mask));
        }
        Ok(ByteEnable(mask))
    }

    /// Raw mask bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check whether data byte `index` (0-3) is enabled
    pub const fn is_enabled(self, index: u8) -> bool {
        index < 4 && self.0 & (1 << index) != 0
    }
}

impl Default for ByteEnable {
    fn default() -> Self {
        Self::ALL
    }
}

impl TryFrom<u8> for ByteEnable {
    type Error = CodecError;

    fn try_from(mask: u8) -> Result<Self, Self::Error> {
        Self::new(mask)
    }
}

impl From<ByteEnable> for u8 {
    fn from(be: ByteEnable) -> u8 {
        be.0
    }
}

/// A single register bus transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Transaction {
    /// 32-bit register read
    Read { address: u32 },
    /// 32-bit register write with byte enables
    Write {
        address: u32,
        data: u32,
        byte_enable: ByteEnable,
    },
}

impl Transaction {
    /// Build a read
    pub const fn read(address: u32) -> Self {
        Transaction::Read { address }
    }

    /// Build a write, validating the byte-enable mask
    pub const fn write(address: u32, data: u32, byte_enable: u8) -> Result<Self, CodecError> {
        match ByteEnable::new(byte_enable) {
            Ok(byte_enable) => Ok(Transaction::Write {
                address,
                data,
                byte_enable,
            }),
            Err(e) => Err(e),
        }
    }

    /// Build a write with all four bytes enabled
    pub const fn write_word(address: u32, data: u32) -> Self {
        Transaction::Write {
            address,
            data,
            byte_enable: ByteEnable::ALL,
        }
    }

    /// Build a transaction from loosely typed parts
    ///
    /// `data` is ignored for reads. A read must not carry a byte enable;
    /// a write without one gets [`ByteEnable::ALL`].
    pub fn from_parts(
        direction: Direction,
        address: u32,
        data: u32,
        byte_enable: Option<u8>,
    ) -> Result<Self, CodecError> {
        match (direction, byte_enable) {
            (Direction::Read, None) => Ok(Transaction::Read { address }),
            (Direction::Read, Some(mask)) => Err(CodecError::InvalidByteEnable(mask)),
            (Direction::Write, None) => Ok(Transaction::write_word(address, data)),
            (Direction::Write, Some(mask)) => Transaction::write(address, data, mask),
        }
    }

    /// Transfer direction
    pub fn direction(&self) -> Direction {
        match self {
            Transaction::Read { .. } => Direction::Read,
            Transaction::Write { .. } => Direction::Write,
        }
    }

    /// Target register address
    pub fn address(&self) -> u32 {
        match *self {
            Transaction::Read { address } | Transaction::Write { address, .. } => address,
        }
    }

    /// Write data, `None` for reads
    pub fn data(&self) -> Option<u32> {
        match *self {
            Transaction::Read { .. } => None,
            Transaction::Write { data, .. } => Some(data),
        }
    }

    /// Byte-enable mask, `None` for reads
    pub fn byte_enable(&self) -> Option<ByteEnable> {
        match *self {
            Transaction::Read { .. } => None,
            Transaction::Write { byte_enable, .. } => Some(byte_enable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_roundtrip() {
        for dir in [Direction::Read, Direction::Write] {
            assert_eq!(Direction::from_byte(dir.to_byte()), Ok(dir));
        }
        assert_eq!(
            Direction::from_byte(0x02),
            Err(CodecError::UnsupportedDirection(0x02))
        );
    }

    #[test]
    fn test_byte_enable_rejects_upper_nibble() {
        assert_eq!(ByteEnable::new(0x10), Err(CodecError::InvalidByteEnable(0x10)));
        assert_eq!(ByteEnable::new(0xFF), Err(CodecError::InvalidByteEnable(0xFF)));
        assert_eq!(ByteEnable::new(0x0F), Ok(ByteEnable::ALL));
    }

    #[test]
    fn test_byte_enable_lanes() {
        let be = ByteEnable::new(0b0101).unwrap();
        assert!(be.is_enabled(0));
        assert!(!be.is_enabled(1));
        assert!(be.is_enabled(2));
        assert!(!be.is_enabled(3));
        assert!(!be.is_enabled(4));
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(
            Transaction::from_parts(Direction::Read, 0x8000_0000, 0, None),
            Ok(Transaction::read(0x8000_0000))
        );
        assert_eq!(
            Transaction::from_parts(Direction::Read, 0x8000_0000, 0, Some(0xF)),
            Err(CodecError::InvalidByteEnable(0xF))
        );
        assert_eq!(
            Transaction::from_parts(Direction::Write, 0x10, 0x1234, None),
            Ok(Transaction::write_word(0x10, 0x1234))
        );
        assert_eq!(
            Transaction::from_parts(Direction::Write, 0x10, 0x1234, Some(0x1F)),
            Err(CodecError::InvalidByteEnable(0x1F))
        );
    }

    #[test]
    fn test_accessors() {
        let tx = Transaction::write(0x8002_0004, 0xB800_0010, 0x3).unwrap();
        assert_eq!(tx.direction(), Direction::Write);
        assert_eq!(tx.address(), 0x8002_0004);
        assert_eq!(tx.data(), Some(0xB800_0010));
        assert_eq!(tx.byte_enable().map(u8::from), Some(0x3));

        let rd = Transaction::read(0x8000_0010);
        assert_eq!(rd.direction(), Direction::Read);
        assert_eq!(rd.data(), None);
        assert_eq!(rd.byte_enable(), None);
    }
}

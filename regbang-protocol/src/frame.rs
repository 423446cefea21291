//! Frame encoding and decoding for register bus transactions.
//!
//! Frame format (canonical layout):
//! - PREAMBLE (1 byte): 0xA5 synchronization byte
//! - VERSION (1 byte): 0x01
//! - DIRECTION (1 byte): 0x01 write, 0x00 read
//! - CONTROL (1 byte): byte-enable nibble for writes, 0x0F for reads
//! - RESERVED (0 or 1 byte): 0x00, only when the layout asks for it
//! - ADDRESS (4 bytes): little-endian
//! - DATA (4 bytes, writes only): little-endian

use heapless::Vec;

use crate::error::{CodecError, FramingError};
use crate::transaction::{ByteEnable, Direction, Transaction};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Frame synchronization byte
pub const FRAME_PREAMBLE: u8 = 0xA5;

/// Protocol version byte
pub const FRAME_VERSION: u8 = 0x01;

/// Control byte sent with every read
pub const READ_CONTROL: u8 = 0x0F;

/// Value of the optional reserved header byte
pub const RESERVED_BYTE: u8 = 0x00;

/// Maximum complete frame size (4 header + reserved + address + data)
pub const MAX_FRAME_SIZE: usize = 4 + 1 + 4 + 4;

/// Header layout variant
///
/// Deployed receivers disagree on whether a reserved zero byte follows the
/// control byte. The canonical layout has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameLayout {
    /// Insert the reserved byte in read frames
    pub read_reserved: bool,
    /// Insert the reserved byte in write frames
    pub write_reserved: bool,
}

impl FrameLayout {
    /// No reserved byte in either direction
    pub const CANONICAL: FrameLayout = FrameLayout {
        read_reserved: false,
        write_reserved: false,
    };

    /// Whether frames in `direction` carry the reserved byte
    pub const fn has_reserved(&self, direction: Direction) -> bool {
        match direction {
            Direction::Read => self.read_reserved,
            Direction::Write => self.write_reserved,
        }
    }

    /// Header length (up to and including the reserved byte)
    pub const fn header_len(&self, direction: Direction) -> usize {
        4 + self.has_reserved(direction) as usize
    }

    /// Complete frame length for `direction`
    pub const fn frame_len(&self, direction: Direction) -> usize {
        let payload = match direction {
            Direction::Read => 4,
            Direction::Write => 8,
        };
        self.header_len(direction) + payload
    }
}

impl Transaction {
    /// Control byte for this transaction
    pub fn control_byte(&self) -> u8 {
        match self {
            Transaction::Read { .. } => READ_CONTROL,
            Transaction::Write { byte_enable, .. } => byte_enable.bits() & 0x0F,
        }
    }

    /// Encode this transaction into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, layout: FrameLayout, buffer: &mut [u8]) -> Result<usize, CodecError> {
        let direction = self.direction();
        let frame_len = layout.frame_len(direction);
        if buffer.len() < frame_len {
            return Err(CodecError::BufferTooSmall);
        }

        buffer[0] = FRAME_PREAMBLE;
        buffer[1] = FRAME_VERSION;
        buffer[2] = direction.to_byte();
        buffer[3] = self.control_byte();

        let mut pos = 4;
        if layout.has_reserved(direction) {
            buffer[pos] = RESERVED_BYTE;
            pos += 1;
        }

        buffer[pos..pos + 4].copy_from_slice(&self.address().to_le_bytes());
        pos += 4;

        if let Some(data) = self.data() {
            buffer[pos..pos + 4].copy_from_slice(&data.to_le_bytes());
            pos += 4;
        }

        Ok(pos)
    }

    /// Encode this transaction into a heapless Vec
    pub fn encode_to_vec(&self, layout: FrameLayout) -> Result<Vec<u8, MAX_FRAME_SIZE>, CodecError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(layout, &mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| CodecError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// State machine for parsing incoming frames
#[derive(Debug, Clone)]
pub struct FrameParser {
    layout: FrameLayout,
    state: ParseState,
    direction: Direction,
    control: u8,
    address: u32,
    data: u32,
    /// Bytes consumed of the current multi-byte field
    field_pos: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for PREAMBLE byte
    WaitingForPreamble,
    /// Got PREAMBLE, waiting for VERSION
    WaitingForVersion,
    /// Got VERSION, waiting for DIRECTION
    WaitingForDirection,
    /// Got DIRECTION, waiting for CONTROL
    WaitingForControl,
    /// Waiting for the reserved zero byte
    WaitingForReserved,
    /// Reading address bytes
    ReadingAddress,
    /// Reading data bytes (writes only)
    ReadingData,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new(FrameLayout::CANONICAL)
    }
}

impl FrameParser {
    /// Create a new frame parser for the given layout
    pub fn new(layout: FrameLayout) -> Self {
        Self {
            layout,
            state: ParseState::WaitingForPreamble,
            direction: Direction::Read,
            control: 0,
            address: 0,
            data: 0,
            field_pos: 0,
        }
    }

    /// Layout this parser expects
    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForPreamble;
        self.direction = Direction::Read;
        self.control = 0;
        self.address = 0;
        self.data = 0;
        self.field_pos = 0;
    }

    /// True when no frame is partially parsed
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::WaitingForPreamble
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(transaction))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error. The
    /// parser resets after every error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Transaction>, CodecError> {
        let result = self.step(byte);
        if result.is_err() {
            self.reset();
        }
        result
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete transaction found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Transaction>, CodecError> {
        for &byte in bytes {
            if let Some(tx) = self.feed(byte)? {
                return Ok(Some(tx));
            }
        }
        Ok(None)
    }

    fn step(&mut self, byte: u8) -> Result<Option<Transaction>, CodecError> {
        match self.state {
            ParseState::WaitingForPreamble => {
                if byte != FRAME_PREAMBLE {
                    return Err(FramingError::Preamble(byte).into());
                }
                self.state = ParseState::WaitingForVersion;
                Ok(None)
            }
            ParseState::WaitingForVersion => {
                if byte != FRAME_VERSION {
                    return Err(FramingError::Version(byte).into());
                }
                self.state = ParseState::WaitingForDirection;
                Ok(None)
            }
            ParseState::WaitingForDirection => {
                self.direction = Direction::from_byte(byte)?;
                self.state = ParseState::WaitingForControl;
                Ok(None)
            }
            ParseState::WaitingForControl => {
                match self.direction {
                    Direction::Read if byte != READ_CONTROL => {
                        return Err(CodecError::InvalidByteEnable(byte));
                    }
                    Direction::Write => {
                        ByteEnable::new(byte)?;
                    }
                    Direction::Read => {}
                }
                self.control = byte;
                self.state = if self.layout.has_reserved(self.direction) {
                    ParseState::WaitingForReserved
                } else {
                    ParseState::ReadingAddress
                };
                Ok(None)
            }
            ParseState::WaitingForReserved => {
                if byte != RESERVED_BYTE {
                    return Err(FramingError::Reserved(byte).into());
                }
                self.state = ParseState::ReadingAddress;
                Ok(None)
            }
            ParseState::ReadingAddress => {
                self.address |= (byte as u32) << (8 * self.field_pos);
                self.field_pos += 1;
                if self.field_pos < 4 {
                    return Ok(None);
                }
                self.field_pos = 0;
                match self.direction {
                    Direction::Read => {
                        let tx = Transaction::read(self.address);
                        self.reset();
                        Ok(Some(tx))
                    }
                    Direction::Write => {
                        self.state = ParseState::ReadingData;
                        Ok(None)
                    }
                }
            }
            ParseState::ReadingData => {
                self.data |= (byte as u32) << (8 * self.field_pos);
                self.field_pos += 1;
                if self.field_pos < 4 {
                    return Ok(None);
                }
                let tx = Transaction::write(self.address, self.data, self.control)?;
                self.reset();
                Ok(Some(tx))
            }
        }
    }
}

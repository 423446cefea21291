//! Codec errors
//!
//! All errors are reported to the caller synchronously. None are retried:
//! a point-to-point serial line has no in-protocol recovery, so the decoders
//! reset and wait for the next idle-to-start transition.

use core::fmt;

/// Framing violations on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramingError {
    /// Start bit was high at its centre sample
    StartBit,
    /// Stop bit was low
    StopBit,
    /// First frame byte was not the preamble
    Preamble(u8),
    /// Second frame byte was not the supported version
    Version(u8),
    /// Reserved header byte was not zero
    Reserved(u8),
    /// Stream ended inside a byte or a frame
    Truncated,
}

/// Errors that can occur while encoding or decoding transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Bit- or byte-level framing violation
    Framing(FramingError),
    /// Direction byte is neither read nor write
    UnsupportedDirection(u8),
    /// Byte enable on a read, or bits outside the low nibble
    InvalidByteEnable(u8),
    /// Buffer too small for encoding
    BufferTooSmall,
}

impl From<FramingError> for CodecError {
    fn from(err: FramingError) -> Self {
        CodecError::Framing(err)
    }
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramingError::StartBit => f.write_str("start bit not low at centre"),
            FramingError::StopBit => f.write_str("stop bit not high"),
            FramingError::Preamble(b) => write!(f, "bad preamble byte 0x{b:02X}"),
            FramingError::Version(b) => write!(f, "unsupported version byte 0x{b:02X}"),
            FramingError::Reserved(b) => write!(f, "reserved byte is 0x{b:02X}, expected 0x00"),
            FramingError::Truncated => f.write_str("stream ended mid-frame"),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Framing(e) => write!(f, "framing error: {e}"),
            CodecError::UnsupportedDirection(b) => write!(f, "unsupported direction 0x{b:02X}"),
            CodecError::InvalidByteEnable(b) => write!(f, "invalid byte enable 0x{b:02X}"),
            CodecError::BufferTooSmall => f.write_str("buffer too small"),
        }
    }
}

impl core::error::Error for FramingError {}

impl core::error::Error for CodecError {}

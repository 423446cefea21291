//! Transaction recovery from a sampled serial line

use regbang_hal::Logic;

use crate::error::{CodecError, FramingError};
use crate::frame::{FrameLayout, FrameParser};
use crate::sampler::SampleDecoder;
use crate::transaction::Transaction;

/// Live decoder: samples in, transactions out
///
/// Any error resets both the byte and frame stages; decoding resumes at the
/// next idle-to-start transition.
#[derive(Debug, Clone)]
pub struct TransactionDecoder {
    bytes: SampleDecoder,
    frames: FrameParser,
}

impl TransactionDecoder {
    /// Create a decoder for `oversample` samples per bit
    pub fn new(oversample: u32, layout: FrameLayout) -> Self {
        Self {
            bytes: SampleDecoder::new(oversample),
            frames: FrameParser::new(layout),
        }
    }

    /// True when neither a byte nor a frame is partially received
    pub fn is_idle(&self) -> bool {
        self.bytes.is_idle() && self.frames.is_idle()
    }

    /// Drop any partial byte or frame
    pub fn reset(&mut self) {
        self.bytes.reset();
        self.frames.reset();
    }

    /// Feed one sample
    pub fn feed(&mut self, sample: Logic) -> Result<Option<Transaction>, CodecError> {
        let byte = match self.bytes.feed(sample) {
            Ok(Some(byte)) => byte,
            Ok(None) => return Ok(None),
            Err(e) => {
                self.frames.reset();
                return Err(e.into());
            }
        };
        self.frames.feed(byte)
    }

    /// Signal the end of the sample stream
    ///
    /// A partially received byte or frame is reported as
    /// [`FramingError::Truncated`] and discarded.
    pub fn finish(&mut self) -> Result<(), CodecError> {
        if self.is_idle() {
            return Ok(());
        }
        self.reset();
        Err(FramingError::Truncated.into())
    }
}

/// Decode exactly one transaction from a complete sample stream
///
/// Samples after the first complete frame are ignored. A stream that ends
/// before a frame completes (including one with no frame at all) fails with
/// [`FramingError::Truncated`]; no partial transaction is ever returned.
///
/// The line is assumed idle just before the first sample: the stream should
/// open with idle-high samples or with the first start bit. Leading low or
/// indeterminate samples are read as a start edge.
pub fn decode<I>(samples: I, oversample: u32, layout: FrameLayout) -> Result<Transaction, CodecError>
where
    I: IntoIterator<Item = Logic>,
{
    let mut decoder = TransactionDecoder::new(oversample, layout);
    for sample in samples {
        if let Some(tx) = decoder.feed(sample)? {
            return Ok(tx);
        }
    }
    decoder.finish()?;
    Err(FramingError::Truncated.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitcell::{byte_cells, encode};
    use regbang_hal::BitTiming;

    fn samples_for(tx: &Transaction, oversample: u32) -> impl Iterator<Item = Logic> {
        encode(tx, FrameLayout::CANONICAL, BitTiming::default())
            .unwrap()
            .samples(oversample)
    }

    #[test]
    fn test_decode_write() {
        let tx = Transaction::write(0x8002_0004, 0xB800_0010, 0xF).unwrap();
        assert_eq!(decode(samples_for(&tx, 1), 1, FrameLayout::CANONICAL), Ok(tx));
    }

    #[test]
    fn test_decode_read_with_idle_padding() {
        let tx = Transaction::read(0x8000_0000);
        let lead = core::iter::repeat(Logic::High).take(500);
        let tail = core::iter::repeat(Logic::High).take(50);
        let stream = lead.chain(samples_for(&tx, 16)).chain(tail);

        assert_eq!(decode(stream, 16, FrameLayout::CANONICAL), Ok(tx));
    }

    #[test]
    fn test_decode_stream_opening_undriven_fails() {
        let tx = Transaction::read(0x8000_0000);
        let lead = core::iter::repeat(Logic::Unknown)
            .take(40)
            .chain(core::iter::repeat(Logic::High).take(200));
        assert!(decode(lead.chain(samples_for(&tx, 16)), 16, FrameLayout::CANONICAL).is_err());

        // The same frame after an idle lead-in decodes
        let lead = core::iter::repeat(Logic::High).take(240);
        assert_eq!(decode(lead.chain(samples_for(&tx, 16)), 16, FrameLayout::CANONICAL), Ok(tx));
    }

    #[test]
    fn test_decode_with_indeterminate_lows() {
        // Every low sample replaced by X or Z decodes to the same transaction
        let tx = Transaction::write(0x10, 0xDEAD_BEEF, 0x3).unwrap();
        let stream = samples_for(&tx, 4).enumerate().map(|(i, s)| match (s, i % 2) {
            (Logic::Low, 0) => Logic::Unknown,
            (Logic::Low, _) => Logic::HighZ,
            (other, _) => other,
        });

        assert_eq!(decode(stream, 4, FrameLayout::CANONICAL), Ok(tx));
    }

    #[test]
    fn test_decode_truncated() {
        let tx = Transaction::write_word(0x8000_0010, 0x0BCB_0001);
        let total = 12 * 10 * 2;
        let stream = samples_for(&tx, 2).take(total - 30);

        assert_eq!(
            decode(stream, 2, FrameLayout::CANONICAL),
            Err(CodecError::Framing(FramingError::Truncated))
        );
    }

    #[test]
    fn test_decode_empty_stream() {
        let stream = core::iter::repeat(Logic::High).take(100);
        assert_eq!(
            decode(stream, 1, FrameLayout::CANONICAL),
            Err(CodecError::Framing(FramingError::Truncated))
        );
    }

    #[test]
    fn test_decode_bad_stop_bit_returns_no_transaction() {
        let tx = Transaction::read(0x8000_0000);
        // Clear the stop bit of the last byte (cell index 79)
        let stream = samples_for(&tx, 1)
            .enumerate()
            .map(|(i, s)| if i == 79 { Logic::Low } else { s });

        assert_eq!(
            decode(stream, 1, FrameLayout::CANONICAL),
            Err(CodecError::Framing(FramingError::StopBit))
        );
    }

    #[test]
    fn test_decode_bad_preamble() {
        let stream = byte_cells(0x5A).into_iter().map(Logic::from);
        assert_eq!(
            decode(stream, 1, FrameLayout::CANONICAL),
            Err(CodecError::Framing(FramingError::Preamble(0x5A)))
        );
    }

    #[test]
    fn test_live_decoder_recovers() {
        let mut decoder = TransactionDecoder::new(1, FrameLayout::CANONICAL);

        // Garbage byte fails the preamble check
        let mut errors = 0;
        for level in byte_cells(0x00) {
            if decoder.feed(Logic::from(level)).is_err() {
                errors += 1;
            }
        }
        assert_eq!(errors, 1);
        assert!(decoder.is_idle());

        let tx = Transaction::read(0x8000_0010);
        let mut decoded = None;
        for sample in samples_for(&tx, 1) {
            if let Some(t) = decoder.feed(sample).unwrap() {
                decoded = Some(t);
            }
        }
        assert_eq!(decoded, Some(tx));
        assert_eq!(decoder.finish(), Ok(()));
    }

    #[test]
    fn test_finish_mid_frame() {
        let mut decoder = TransactionDecoder::new(1, FrameLayout::CANONICAL);
        for level in byte_cells(0xA5) {
            decoder.feed(Logic::from(level)).unwrap();
        }
        assert!(!decoder.is_idle());
        assert_eq!(
            decoder.finish(),
            Err(CodecError::Framing(FramingError::Truncated))
        );
        assert!(decoder.is_idle());
    }
}

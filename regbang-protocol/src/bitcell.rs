//! Bit-level serialization
//!
//! Every byte becomes ten bit cells: a low start bit, eight data bits
//! least-significant first, and a high stop bit. Bytes follow each other
//! with no gap and no parity. The line idles high before the first start
//! bit and after the last stop bit; idle time is not part of the cell
//! sequence.

use heapless::Vec;
use regbang_hal::{BitTiming, Logic};

use crate::error::CodecError;
use crate::frame::{FrameLayout, MAX_FRAME_SIZE};
use crate::transaction::Transaction;

pub use regbang_hal::uart::CELLS_PER_BYTE;

/// One transmitted level held for one bit period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitCell {
    /// Line level (true = high)
    pub level: bool,
    /// Hold time in picoseconds
    pub duration_ps: u64,
}

/// Data bits of `byte` in transmission order (LSB first)
pub fn data_bits(byte: u8) -> [bool; 8] {
    core::array::from_fn(|i| (byte >> i) & 1 != 0)
}

/// Line levels of one framed byte: start, 8 data bits, stop
pub fn byte_cells(byte: u8) -> [bool; CELLS_PER_BYTE as usize] {
    core::array::from_fn(|i| match i {
        0 => false,
        9 => true,
        n => (byte >> (n - 1)) & 1 != 0,
    })
}

/// Serialize a transaction into bit cells
pub fn encode(
    transaction: &Transaction,
    layout: FrameLayout,
    timing: BitTiming,
) -> Result<BitCells, CodecError> {
    let bytes = transaction.encode_to_vec(layout)?;
    Ok(BitCells::new(bytes, timing))
}

/// Iterator over the bit cells of a frame
#[derive(Debug, Clone)]
pub struct BitCells {
    bytes: Vec<u8, MAX_FRAME_SIZE>,
    timing: BitTiming,
    /// Index of the next cell across the whole frame
    next: usize,
}

impl BitCells {
    /// Cells for an already encoded frame
    pub fn new(bytes: Vec<u8, MAX_FRAME_SIZE>, timing: BitTiming) -> Self {
        Self {
            bytes,
            timing,
            next: 0,
        }
    }

    /// Frame bytes being serialized
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bit timing of every cell
    pub fn timing(&self) -> BitTiming {
        self.timing
    }

    /// Total line time of the whole frame in picoseconds
    pub fn total_duration_ps(&self) -> u64 {
        self.timing.frame_duration_ps(self.bytes.len())
    }

    /// Expand the remaining cells into `oversample` samples each
    pub fn samples(self, oversample: u32) -> impl Iterator<Item = Logic> {
        let oversample = oversample.max(1) as usize;
        self.flat_map(move |cell| core::iter::repeat(Logic::from(cell.level)).take(oversample))
    }

    fn total_cells(&self) -> usize {
        self.bytes.len() * CELLS_PER_BYTE as usize
    }
}

impl Iterator for BitCells {
    type Item = BitCell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total_cells() {
            return None;
        }
        let byte = self.bytes[self.next / CELLS_PER_BYTE as usize];
        let level = byte_cells(byte)[self.next % CELLS_PER_BYTE as usize];
        self.next += 1;
        Some(BitCell {
            level,
            duration_ps: self.timing.period_ps(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_cells() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitCells {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_bits_lsb_first() {
        let bits = data_bits(0b1011_0100);
        assert_eq!(bits, [false, false, true, false, true, true, false, true]);
    }

    #[test]
    fn test_byte_cells_framing() {
        let cells = byte_cells(0xA5);
        assert!(!cells[0]);
        assert!(cells[9]);
        // 0xA5 = 1010_0101, LSB first
        assert_eq!(
            &cells[1..9],
            &[true, false, true, false, false, true, false, true]
        );
    }

    #[test]
    fn test_encode_cell_count_and_duration() {
        let timing = BitTiming::default();
        let tx = Transaction::write_word(0x8002_0004, 0xB800_0010);
        let cells = encode(&tx, FrameLayout::CANONICAL, timing).unwrap();

        assert_eq!(cells.len(), 120);
        assert_eq!(cells.total_duration_ps(), 120 * 8_680_556);

        let sum: u64 = cells.clone().map(|c| c.duration_ps).sum();
        assert_eq!(sum, cells.total_duration_ps());
        assert!(cells.clone().all(|c| c.duration_ps == timing.period_ps()));
    }

    #[test]
    fn test_encode_starts_with_preamble() {
        let tx = Transaction::read(0x8000_0000);
        let cells = encode(&tx, FrameLayout::CANONICAL, BitTiming::default()).unwrap();
        let levels: Vec<bool, 10> = cells.take(10).map(|c| c.level).collect();
        assert_eq!(levels.as_slice(), &byte_cells(0xA5));
    }

    #[test]
    fn test_samples_oversampled() {
        let tx = Transaction::read(0);
        let cells = encode(&tx, FrameLayout::CANONICAL, BitTiming::default()).unwrap();
        assert_eq!(cells.clone().samples(4).count(), 8 * 10 * 4);
        // First four samples are the start bit
        assert!(cells.samples(4).take(4).all(|s| s == Logic::Low));
    }
}

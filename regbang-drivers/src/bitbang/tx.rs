//! Blocking bit-banged transmitter

use embedded_hal::delay::DelayNs;
use regbang_hal::{BitTiming, OutputPin};
use regbang_protocol::bitcell::byte_cells;
use regbang_protocol::{CodecError, FrameLayout, Transaction};

use super::StepClock;

/// Bit-banged transaction transmitter
///
/// Each bit cell is one pin update followed by one bit-period delay, so a
/// frame of `n` bytes blocks for `10 * n` bit periods. The transmitter
/// keeps the current line level itself; the pin is only ever written.
pub struct BitBangTx<P, D> {
    pin: P,
    delay: D,
    timing: BitTiming,
    layout: FrameLayout,
    clock: StepClock,
    /// Authoritative line level (true = high)
    level: bool,
}

impl<P: OutputPin, D: DelayNs> BitBangTx<P, D> {
    /// Create a transmitter and drive the line to idle (high)
    pub fn new(pin: P, delay: D, timing: BitTiming, layout: FrameLayout) -> Self {
        let mut tx = Self {
            pin,
            delay,
            timing,
            layout,
            clock: StepClock::per_bit(timing),
            level: true,
        };
        tx.pin.set_high();
        tx
    }

    /// Current line level
    pub fn level(&self) -> bool {
        self.level
    }

    /// Bit timing in use
    pub fn timing(&self) -> BitTiming {
        self.timing
    }

    /// Frame layout in use
    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    /// Drive one bit cell
    pub fn send_bit(&mut self, high: bool) {
        self.level = high;
        self.pin.set_state(high);
        let ns = self.clock.next_ns();
        self.delay.delay_ns(ns);
    }

    /// Send one byte: start bit, 8 data bits LSB first, stop bit
    pub fn send_byte(&mut self, byte: u8) {
        for level in byte_cells(byte) {
            self.send_bit(level);
        }
    }

    /// Send a 32-bit word, least significant byte first
    pub fn send_word(&mut self, word: u32) {
        for byte in word.to_le_bytes() {
            self.send_byte(byte);
        }
    }

    /// Send raw frame bytes back to back
    pub fn send_frame(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.send_byte(byte);
        }
    }

    /// Encode and send one transaction
    pub fn transact(&mut self, transaction: &Transaction) -> Result<(), CodecError> {
        let bytes = transaction.encode_to_vec(self.layout)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("tx {} ({} bytes)", transaction, bytes.len());

        self.send_frame(&bytes);
        Ok(())
    }

    /// Send a sequence of transactions
    pub fn run(&mut self, script: &[Transaction]) -> Result<(), CodecError> {
        for transaction in script {
            self.transact(transaction)?;
        }
        Ok(())
    }

    /// Write a 32-bit register
    pub fn write32(&mut self, address: u32, data: u32, byte_enable: u8) -> Result<(), CodecError> {
        let transaction = Transaction::write(address, data, byte_enable)?;
        self.transact(&transaction)
    }

    /// Issue a 32-bit register read
    ///
    /// The response path is not part of this line, so nothing is returned.
    pub fn read32(&mut self, address: u32) -> Result<(), CodecError> {
        self.transact(&Transaction::read(address))
    }

    /// Return the line to idle and release the pin and delay
    pub fn release(mut self) -> (P, D) {
        self.level = true;
        self.pin.set_high();
        (self.pin, self.delay)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    /// Mock GPIO pin recording every write
    struct MockPin {
        writes: Vec<bool>,
    }

    impl MockPin {
        fn new() -> Self {
            Self { writes: Vec::new() }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.writes.push(true);
        }

        fn set_low(&mut self) {
            self.writes.push(false);
        }
    }

    /// Mock delay accumulating nanoseconds
    struct MockDelay {
        total_ns: u64,
        calls: usize,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
            self.calls += 1;
        }
    }

    fn transmitter() -> BitBangTx<MockPin, MockDelay> {
        BitBangTx::new(
            MockPin::new(),
            MockDelay { total_ns: 0, calls: 0 },
            BitTiming::default(),
            FrameLayout::CANONICAL,
        )
    }

    /// Pin writes after the initial idle drive
    fn cells(tx: &BitBangTx<MockPin, MockDelay>) -> &[bool] {
        &tx.pin.writes[1..]
    }

    #[test]
    fn test_starts_idle_high() {
        let tx = transmitter();
        assert!(tx.level());
        assert_eq!(tx.pin.writes.as_slice(), &[true]);
    }

    #[test]
    fn test_send_byte_bit_order() {
        let mut tx = transmitter();
        tx.send_byte(0b1011_0100);

        assert_eq!(
            cells(&tx),
            &[false, false, false, true, false, true, true, false, true, true]
        );
        assert_eq!(tx.delay.calls, 10);
        assert!(tx.level());
    }

    #[test]
    fn test_send_word_byte_order() {
        let mut tx = transmitter();
        tx.send_word(0x8000_0010);

        let bytes: Vec<u8> = cells(&tx)
            .chunks(10)
            .map(|c| {
                assert!(!c[0] && c[9]);
                c[1..9]
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &b)| acc | ((b as u8) << i))
            })
            .collect();
        assert_eq!(bytes, [0x10, 0x00, 0x00, 0x80]);
    }

    #[test]
    fn test_write32_timing() {
        let mut tx = transmitter();
        tx.write32(0x8002_0004, 0xB800_0010, 0xF).unwrap();

        // 12 bytes * 10 cells
        assert_eq!(cells(&tx).len(), 120);
        assert_eq!(tx.delay.calls, 120);

        let exact_ps = BitTiming::default().frame_duration_ps(12);
        let actual_ps = tx.delay.total_ns * 1000;
        assert!(exact_ps.abs_diff(actual_ps) < 1000);
    }

    #[test]
    fn test_write32_rejects_wide_byte_enable() {
        let mut tx = transmitter();
        assert_eq!(
            tx.write32(0x8000_0010, 0, 0x10),
            Err(CodecError::InvalidByteEnable(0x10))
        );
        // Nothing was driven beyond idle
        assert!(cells(&tx).is_empty());
    }

    #[test]
    fn test_read32_frame_length() {
        let mut tx = transmitter();
        tx.read32(0x8000_0000).unwrap();
        assert_eq!(cells(&tx).len(), 80);
    }

    #[test]
    fn test_run_script() {
        let mut tx = transmitter();
        let script = [
            Transaction::write_word(0x8000_0010, 0x0BCB_0001),
            Transaction::read(0x8000_0010),
        ];
        tx.run(&script).unwrap();
        assert_eq!(cells(&tx).len(), 120 + 80);
    }

    #[test]
    fn test_release_idles_line() {
        let mut tx = transmitter();
        tx.send_bit(false);
        let (pin, _delay) = tx.release();
        assert_eq!(pin.writes.last(), Some(&true));
    }
}

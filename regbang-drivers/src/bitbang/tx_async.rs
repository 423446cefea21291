//! Async bit-banged transmitter
//!
//! Same line behaviour as [`super::BitBangTx`], but each bit cell is a
//! suspension point on an async delay instead of a busy wait.

use embedded_hal_async::delay::DelayNs;
use regbang_hal::{BitTiming, OutputPin};
use regbang_protocol::bitcell::byte_cells;
use regbang_protocol::{CodecError, FrameLayout, Transaction};

use super::StepClock;

/// Async bit-banged transaction transmitter
///
/// Once a frame starts it runs to completion; dropping the future mid-frame
/// leaves a partial frame on the line that receivers report as a framing
/// error.
pub struct AsyncBitBangTx<P, D> {
    pin: P,
    delay: D,
    layout: FrameLayout,
    clock: StepClock,
    level: bool,
}

impl<P: OutputPin, D: DelayNs> AsyncBitBangTx<P, D> {
    /// Create a transmitter and drive the line to idle (high)
    pub fn new(pin: P, delay: D, timing: BitTiming, layout: FrameLayout) -> Self {
        let mut tx = Self {
            pin,
            delay,
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

    /// Drive one bit cell
    pub async fn send_bit(&mut self, high: bool) {
        self.level = high;
        self.pin.set_state(high);
        let ns = self.clock.next_ns();
        self.delay.delay_ns(ns).await;
    }

    /// Send one byte: start bit, 8 data bits LSB first, stop bit
    pub async fn send_byte(&mut self, byte: u8) {
        for level in byte_cells(byte) {
            self.send_bit(level).await;
        }
    }

    /// Send raw frame bytes back to back
    pub async fn send_frame(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.send_byte(byte).await;
        }
    }

    /// Encode and send one transaction
    pub async fn transact(&mut self, transaction: &Transaction) -> Result<(), CodecError> {
        let bytes = transaction.encode_to_vec(self.layout)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("tx {} ({} bytes)", transaction, bytes.len());

        self.send_frame(&bytes).await;
        Ok(())
    }

    /// Send a sequence of transactions
    pub async fn run(&mut self, script: &[Transaction]) -> Result<(), CodecError> {
        for transaction in script {
            self.transact(transaction).await?;
        }
        Ok(())
    }

    /// Write a 32-bit register
    pub async fn write32(
        &mut self,
        address: u32,
        data: u32,
        byte_enable: u8,
    ) -> Result<(), CodecError> {
        let transaction = Transaction::write(address, data, byte_enable)?;
        self.transact(&transaction).await
    }

    /// Issue a 32-bit register read
    pub async fn read32(&mut self, address: u32) -> Result<(), CodecError> {
        self.transact(&Transaction::read(address)).await
    }

    /// Release the pin and delay
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use embassy_futures::block_on;
    use std::vec::Vec;

    struct MockPin {
        writes: Vec<bool>,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.writes.push(true);
        }

        fn set_low(&mut self) {
            self.writes.push(false);
        }
    }

    /// Async delay that records each suspension
    struct MockDelay {
        suspensions: Vec<u32>,
    }

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.suspensions.push(ns);
        }
    }

    fn transmitter() -> AsyncBitBangTx<MockPin, MockDelay> {
        AsyncBitBangTx::new(
            MockPin { writes: Vec::new() },
            MockDelay {
                suspensions: Vec::new(),
            },
            BitTiming::from_baud(1_000_000).unwrap(),
            FrameLayout::CANONICAL,
        )
    }

    #[test]
    fn test_one_suspension_per_cell() {
        let mut tx = transmitter();
        block_on(tx.read32(0x8000_0000)).unwrap();

        let (pin, delay) = tx.release();
        assert_eq!(delay.suspensions.len(), 80);
        assert!(delay.suspensions.iter().all(|&ns| ns == 1_000));
        // Idle drive plus one write per cell
        assert_eq!(pin.writes.len(), 81);
    }

    #[test]
    fn test_matches_blocking_waveform() {
        let script = [
            Transaction::write(0x8002_0010, 0x0000_7FFF, 0x3).unwrap(),
            Transaction::read(0x8002_0010),
        ];

        let mut tx = transmitter();
        block_on(tx.run(&script)).unwrap();
        let (async_pin, _) = tx.release();

        let mut expected = std::vec![true];
        for t in &script {
            for byte in t.encode_to_vec(FrameLayout::CANONICAL).unwrap() {
                expected.extend_from_slice(&byte_cells(byte));
            }
        }
        assert_eq!(async_pin.writes, expected);
    }

    #[test]
    fn test_write32_rejects_wide_byte_enable() {
        let mut tx = transmitter();
        assert_eq!(
            block_on(tx.write32(0, 0, 0xF0)),
            Err(CodecError::InvalidByteEnable(0xF0))
        );
        assert!(tx.level());
    }
}

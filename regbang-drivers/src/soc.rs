//! Target SoC register map and status pins
//!
//! The target exposes a serial-to-bus bridge on input bit 0. Behind it sit
//! a UART control block and a two-channel PWM generator. Its 8-bit output
//! bus reports:
//!
//! ```text
//! bit  7          6:5          4:3      2       1         0
//!      uart_tx_en pwm_en[1:0]  pwm[1:0] spi_cs  spi_sclk  uart_tx
//! ```

use regbang_hal::logic::{parse_word, LogicError};
use regbang_protocol::Transaction;

/// Bus base addresses and register offsets
pub mod map {
    /// UART control block base
    pub const UART_BASE: u32 = 0x8000_0000;
    /// PWM generator base
    pub const PWM_BASE: u32 = 0x8002_0000;

    /// UART control register
    pub const UART_CTRL: u32 = 0x0000_0010;
    /// PWM configuration register
    pub const PWM_CFG: u32 = 0x0000_0004;
    /// PWM enable register
    pub const PWM_EN: u32 = 0x0000_0008;
    /// PWM phase register
    pub const PWM_PHASE: u32 = 0x0000_0010;
}

/// Input bit carrying the bridge's serial receive line
pub const RX_BIT: u8 = 0;

/// UART control value enabling the block
pub const UART_ENABLE: u32 = 0x0BCB_0001;
/// PWM configuration used at bring-up
pub const PWM_CONFIG: u32 = 0xB800_0010;
/// PWM phase used at bring-up
pub const PWM_PHASE: u32 = 0x0000_7FFF;
/// PWM enable value
pub const PWM_ENABLE: u32 = 0x0000_0001;

/// Bring-up sequence: enable the UART, configure and enable the PWM
pub const fn bringup_script() -> [Transaction; 4] {
    [
        Transaction::write_word(map::UART_BASE + map::UART_CTRL, UART_ENABLE),
        Transaction::write_word(map::PWM_BASE + map::PWM_CFG, PWM_CONFIG),
        Transaction::write_word(map::PWM_BASE + map::PWM_PHASE, PWM_PHASE),
        Transaction::write_word(map::PWM_BASE + map::PWM_EN, PWM_ENABLE),
    ]
}

/// Decoded output bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputStatus(u8);

impl OutputStatus {
    /// Wrap a raw output bus value
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Parse a sampled logic vector (MSB first), reading X/Z as 0
    ///
    /// The bus is 8 bits wide; longer vectors are rejected.
    pub fn from_logic_str(s: &str) -> Result<Self, LogicError> {
        if s.chars().filter(|&c| c != '_').count() > 8 {
            return Err(LogicError::TooWide);
        }
        Ok(Self(parse_word(s)? as u8))
    }

    /// Raw bus value
    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn uart_tx(self) -> bool {
        self.0 & 0x01 != 0
    }

    pub const fn spi_sclk(self) -> bool {
        self.0 & 0x02 != 0
    }

    pub const fn spi_cs(self) -> bool {
        self.0 & 0x04 != 0
    }

    /// PWM outputs, bit 0 = channel 0
    pub const fn pwm(self) -> u8 {
        (self.0 >> 3) & 0b11
    }

    /// PWM channel enables, bit 0 = channel 0
    pub const fn pwm_enable(self) -> u8 {
        (self.0 >> 5) & 0b11
    }

    pub const fn uart_tx_enable(self) -> bool {
        self.0 & 0x80 != 0
    }

    /// True if any PWM channel is enabled
    pub const fn pwm_enabled(self) -> bool {
        self.pwm_enable() != 0
    }
}

impl From<u8> for OutputStatus {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regbang_protocol::FrameLayout;

    #[test]
    fn test_bringup_addresses() {
        let script = bringup_script();
        let addresses = script.map(|t| t.address());
        assert_eq!(
            addresses,
            [0x8000_0010, 0x8002_0004, 0x8002_0010, 0x8002_0008]
        );
    }

    #[test]
    fn test_bringup_pwm_config_frame() {
        let cfg = bringup_script()[1];
        let bytes = cfg.encode_to_vec(FrameLayout::CANONICAL).unwrap();
        assert_eq!(
            bytes.as_slice(),
            &[0xA5, 0x01, 0x01, 0x0F, 0x04, 0x00, 0x02, 0x80, 0x10, 0x00, 0x00, 0xB8]
        );
    }

    #[test]
    fn test_status_fields() {
        let status = OutputStatus::new(0b1110_1011);
        assert!(status.uart_tx());
        assert!(status.spi_sclk());
        assert!(!status.spi_cs());
        assert_eq!(status.pwm(), 0b01);
        assert_eq!(status.pwm_enable(), 0b11);
        assert!(status.uart_tx_enable());
        assert!(status.pwm_enabled());
    }

    #[test]
    fn test_pwm_enable_matches_bench_check() {
        // (uo >> 3) & 0b1100 selects bits 6:5
        for raw in 0..=u8::MAX {
            let status = OutputStatus::from(raw);
            assert_eq!(status.pwm_enabled(), ((raw >> 3) & 0b1100) != 0);
        }
    }

    #[test]
    fn test_status_from_indeterminate_bus() {
        let status = OutputStatus::from_logic_str("x01xxzz1").unwrap();
        assert_eq!(status.raw(), 0b0010_0001);
        assert!(status.pwm_enabled());
        assert!(status.uart_tx());

        let idle = OutputStatus::from_logic_str("xxxxxxxx").unwrap();
        assert!(!idle.pwm_enabled());
    }

    #[test]
    fn test_status_rejects_wide_vector() {
        assert_eq!(
            OutputStatus::from_logic_str("1_0000_0001"),
            Err(LogicError::TooWide)
        );
        assert_eq!(
            OutputStatus::from_logic_str("000000001"),
            Err(LogicError::TooWide)
        );
        assert_eq!(OutputStatus::from_logic_str("0110_1001").unwrap().raw(), 0x69);
        assert_eq!(OutputStatus::from_logic_str("101").unwrap().raw(), 0b101);
    }
}

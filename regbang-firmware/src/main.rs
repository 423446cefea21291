//! regbang - SoC bring-up firmware
//!
//! Runs on an RP2040 wired to a target SoC's serial register bus. At boot
//! it bit-bangs the SoC bring-up sequence onto GPIO0, then keeps watching
//! the SoC's 8-bit output port on GPIO8-15.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;
use regbang_hal_rp2040::{RpOutput, StatusBus};
use {defmt_rtt as _, panic_probe as _};

mod tasks;

/// Link settings compiled from link.toml
pub mod link {
    include!(concat!(env!("OUT_DIR"), "/link.rs"));
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("regbang firmware starting...");

    let p = embassy_rp::init(Default::default());

    let tx = RpOutput::new(p.PIN_0.into());
    let status_pins: [Peri<'static, AnyPin>; 8] = [
        p.PIN_8.into(),
        p.PIN_9.into(),
        p.PIN_10.into(),
        p.PIN_11.into(),
        p.PIN_12.into(),
        p.PIN_13.into(),
        p.PIN_14.into(),
        p.PIN_15.into(),
    ];
    let status = StatusBus::new(status_pins);

    info!(
        "Link: {} baud, read_reserved={}, write_reserved={}",
        link::BAUD,
        link::READ_RESERVED,
        link::WRITE_RESERVED
    );

    spawner.spawn(tasks::bringup_task(tx)).unwrap();
    spawner.spawn(tasks::status_task(status)).unwrap();
}

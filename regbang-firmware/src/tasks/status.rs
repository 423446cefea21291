//! Status port monitor task
//!
//! Polls the SoC's output port and reports every change.

use defmt::*;
use embassy_time::{Duration, Ticker};
use regbang_drivers::OutputStatus;
use regbang_hal_rp2040::StatusBus;

use crate::link;

#[embassy_executor::task]
pub async fn status_task(bus: StatusBus) {
    info!("Status monitor started");

    let mut ticker = Ticker::every(Duration::from_millis(link::STATUS_POLL_MS));
    let mut last: Option<OutputStatus> = None;

    loop {
        let status = OutputStatus::new(bus.read());
        if last != Some(status) {
            report(status);
            last = Some(status);
        }
        ticker.next().await;
    }
}

fn report(status: OutputStatus) {
    info!(
        "Status {=u8:#04x}: uart_tx={} sclk={} cs={} pwm={=u8:#04b} pwm_en={=u8:#04b}",
        status.raw(),
        status.uart_tx(),
        status.spi_sclk(),
        status.spi_cs(),
        status.pwm(),
        status.pwm_enable()
    );
    if status.pwm_enabled() {
        info!("PWM running");
    } else {
        warn!("PWM not running");
    }
}

//! SoC bring-up task
//!
//! Writes the bring-up sequence over the serial register bus once at boot.

use defmt::*;
use embassy_time::{Delay, Duration, Timer};
use regbang_drivers::{soc, AsyncBitBangTx};
use regbang_hal::BitTiming;
use regbang_hal_rp2040::RpOutput;
use regbang_protocol::FrameLayout;

use crate::link;

/// Time for the SoC to leave reset before the first frame
const SETTLE: Duration = Duration::from_millis(10);

#[embassy_executor::task]
pub async fn bringup_task(tx: RpOutput) {
    let Some(timing) = BitTiming::from_baud(link::BAUD) else {
        error!("Invalid baud rate {}", link::BAUD);
        return;
    };
    let layout = FrameLayout {
        read_reserved: link::READ_RESERVED,
        write_reserved: link::WRITE_RESERVED,
    };

    // Line idles high while the SoC settles
    let mut bus = AsyncBitBangTx::new(tx, Delay, timing, layout);
    Timer::after(SETTLE).await;

    info!("Bring-up: {} ns/bit", timing.period_ns());
    for (i, transaction) in soc::bringup_script().iter().enumerate() {
        match bus.transact(transaction).await {
            Ok(()) => debug!("Bring-up step {} sent", i),
            Err(e) => {
                warn!("Bring-up step {} failed: {}", i, e);
                return;
            }
        }
    }
    info!("Bring-up complete");
}

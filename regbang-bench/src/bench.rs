//! Loopback bench
//!
//! Transmits every configured transaction through the bit-banged
//! transmitter onto a simulated input port, then samples the recorded
//! waveform and decodes it back. A run passes when every frame decodes to
//! the transaction that produced it and takes `10 * bytes` bit periods of
//! line time.

use std::path::Path;

use log::{debug, info, warn};
use regbang_drivers::{BitBangTx, ShadowPort};
use regbang_hal::BitTiming;
use regbang_protocol::{decode, Transaction, TransactionDecoder};

use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::sim::{SimClock, SimDelay, SimPort, Trace};

/// Result of replaying one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Position in the script
    pub index: usize,
    /// Transaction as transmitted
    pub sent: Transaction,
    /// Transaction as decoded from the trace
    pub decoded: Transaction,
    /// Frame length in bytes
    pub frame_len: usize,
    /// Time of the start bit's falling edge
    pub start_ps: u64,
    /// Line time of the whole frame
    pub duration_ps: u64,
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub outcomes: Vec<Outcome>,
    /// Virtual time at the end of the run
    pub total_ps: u64,
    /// Recorded input port writes
    pub trace: Trace,
}

impl BenchReport {
    /// Total frame bytes put on the line
    pub fn bytes_sent(&self) -> usize {
        self.outcomes.iter().map(|o| o.frame_len).sum()
    }
}

/// Frame position on the virtual timeline
struct Window {
    start_ps: u64,
    end_ps: u64,
    frame_len: usize,
}

/// Time of the first sample when decoding a frame that starts at `start_ps`
///
/// Half a bit of lead-in lands in idle or in the previous stop bit, even when
/// delay rounding made that stop bit up to a nanosecond short. The grid is
/// skewed by a quarter sample so no sample falls on a bit boundary, whose
/// exact time also moves with rounding.
fn sample_origin(start_ps: u64, period_ps: u64, oversample: u32) -> u64 {
    let skew = period_ps / (4 * oversample.max(1) as u64);
    let lead = period_ps / 2;
    if start_ps >= lead {
        start_ps - lead + skew
    } else {
        // First frame on a line that was never idle in the trace
        start_ps + skew
    }
}

/// Loopback bench
#[derive(Debug, Clone)]
pub struct Bench {
    config: BenchConfig,
    script: Vec<Transaction>,
    timing: BitTiming,
}

impl Bench {
    /// Validate a configuration and build its script
    pub fn new(config: BenchConfig) -> Result<Self> {
        config.validate()?;
        let timing = config.link.timing()?;
        let script = config.script()?;
        Ok(Self {
            config,
            script,
            timing,
        })
    }

    /// Load a bench from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(BenchConfig::load(path)?)
    }

    /// Transactions this bench replays
    pub fn script(&self) -> &[Transaction] {
        &self.script
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Transmit, sample and decode the whole script
    pub fn run(&self) -> Result<BenchReport> {
        let link = self.config.link;
        let period_ps = self.timing.period_ps();
        info!(
            "bench: {} transactions at {} baud ({} ps/bit), {}x oversampling",
            self.script.len(),
            link.baud,
            period_ps,
            link.oversample
        );

        let clock = SimClock::new();
        // RX idles high from the start
        let mut port = ShadowPort::new(SimPort::new(clock.clone()), 1 << link.rx_bit);
        let windows = self.transmit(&clock, &mut port)?;
        let trace = port.into_inner().trace().clone();

        let mut outcomes = Vec::with_capacity(self.script.len());
        for (index, (sent, window)) in self.script.iter().zip(&windows).enumerate() {
            let from = sample_origin(window.start_ps, period_ps, link.oversample);
            let samples = trace.sample(link.rx_bit, from, window.end_ps, period_ps, link.oversample);
            let decoded = decode(samples, link.oversample, link.layout())?;

            if decoded != *sent {
                warn!("transaction {}: sent {:?}, decoded {:?}", index, sent, decoded);
                return Err(BenchError::Mismatch {
                    index,
                    sent: *sent,
                    decoded,
                });
            }
            debug!("transaction {}: {:?} ok", index, decoded);

            outcomes.push(Outcome {
                index,
                sent: *sent,
                decoded,
                frame_len: window.frame_len,
                start_ps: window.start_ps,
                duration_ps: window.end_ps - window.start_ps,
            });
        }

        self.check_full_trace(&trace)?;

        let report = BenchReport {
            outcomes,
            total_ps: clock.now_ps(),
            trace,
        };
        info!(
            "bench: {} transactions, {} bytes, {} ps of line time",
            report.outcomes.len(),
            report.bytes_sent(),
            report.total_ps
        );
        Ok(report)
    }

    /// Drive every transaction onto the port, recording frame windows
    fn transmit(&self, clock: &SimClock, port: &mut ShadowPort<SimPort>) -> Result<Vec<Window>> {
        let link = self.config.link;
        let layout = link.layout();
        let period_ps = self.timing.period_ps();
        let mut windows = Vec::with_capacity(self.script.len());

        for (index, transaction) in self.script.iter().enumerate() {
            clock.advance_ps(link.idle_bits as u64 * period_ps);
            let start_ps = clock.now_ps();
            {
                let mut tx = BitBangTx::new(
                    port.pin(link.rx_bit),
                    SimDelay::new(clock.clone()),
                    self.timing,
                    layout,
                );
                tx.transact(transaction)?;
            }
            let end_ps = clock.now_ps();

            let frame_len = layout.frame_len(transaction.direction());
            let expected_ps = self.timing.frame_duration_ps(frame_len);
            let actual_ps = end_ps - start_ps;
            if actual_ps.abs_diff(expected_ps) >= period_ps {
                warn!(
                    "transaction {}: line time {} ps, expected {} ps",
                    index, actual_ps, expected_ps
                );
                return Err(BenchError::Timing {
                    index,
                    actual_ps,
                    expected_ps,
                });
            }

            windows.push(Window {
                start_ps,
                end_ps,
                frame_len,
            });
        }
        Ok(windows)
    }

    /// Decode the whole trace in one pass and compare with the script
    fn check_full_trace(&self, trace: &Trace) -> Result<()> {
        let link = self.config.link;
        let period_ps = self.timing.period_ps();
        let samples = trace.sample(
            link.rx_bit,
            sample_origin(0, period_ps, link.oversample),
            trace.end_ps() + period_ps,
            period_ps,
            link.oversample,
        );

        let mut decoder = TransactionDecoder::new(link.oversample, link.layout());
        let mut decoded = Vec::with_capacity(self.script.len());
        for sample in samples {
            if let Some(transaction) = decoder.feed(sample)? {
                decoded.push(transaction);
            }
        }
        decoder.finish()?;

        if decoded.len() != self.script.len() {
            return Err(BenchError::Count {
                expected: self.script.len(),
                decoded: decoded.len(),
            });
        }
        if let Some((index, (sent, got))) = self
            .script
            .iter()
            .zip(&decoded)
            .enumerate()
            .find(|(_, (sent, got))| sent != got)
        {
            return Err(BenchError::Mismatch {
                index,
                sent: *sent,
                decoded: *got,
            });
        }
        Ok(())
    }
}

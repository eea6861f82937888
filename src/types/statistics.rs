//! Run statistics for the tagging pipeline
//!
//! Collected while records are built and the signature table is scanned, and
//! printed as the final summary of a run.

use serde::Serialize;
use std::time::{Duration, Instant};

/// Common trait for all statistics collectors
pub trait StatisticsCollector {
    /// Total processing duration
    fn duration(&self) -> Duration;

    /// Processing rate (items per second)
    fn processing_rate(&self) -> f64;

    /// Finalize statistics collection
    fn finish(&mut self);

    /// One-line summary
    fn summary(&self) -> String;
}

/// Common timing information for all statistics
#[derive(Debug, Clone)]
pub struct TimingInfo {
    pub start_time: Instant,
    pub processing_duration: Duration,
}

impl Default for TimingInfo {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            processing_duration: Duration::default(),
        }
    }
}

impl TimingInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(&mut self) {
        self.processing_duration = self.start_time.elapsed();
    }

    pub fn elapsed(&self) -> Duration {
        if self.processing_duration.is_zero() {
            self.start_time.elapsed()
        } else {
            self.processing_duration
        }
    }
}

/// Signature table scan counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NonceScanStats {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub transactions_seen: usize,
    pub transactions_flagged: usize,
}

/// Whole-run counters
#[derive(Debug, Clone)]
pub struct TaggingStats {
    pub addresses_processed: usize,
    pub addresses_attributed: usize,
    pub addresses_without_outgoing: usize,
    pub multisig_addresses: usize,
    pub addressless_outputs_skipped: usize,
    pub key_collisions: usize,
    pub nonce_scan: NonceScanStats,
    pub timing: TimingInfo,
}

impl Default for TaggingStats {
    fn default() -> Self {
        Self {
            addresses_processed: 0,
            addresses_attributed: 0,
            addresses_without_outgoing: 0,
            multisig_addresses: 0,
            addressless_outputs_skipped: 0,
            key_collisions: 0,
            nonce_scan: NonceScanStats::default(),
            timing: TimingInfo::new(),
        }
    }
}

impl TaggingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribution_rate(&self) -> f64 {
        if self.addresses_processed > 0 {
            (self.addresses_attributed as f64 / self.addresses_processed as f64) * 100.0
        } else {
            0.0
        }
    }
}

impl StatisticsCollector for TaggingStats {
    fn duration(&self) -> Duration {
        self.timing.elapsed()
    }

    fn processing_rate(&self) -> f64 {
        let secs = self.duration().as_secs_f64();
        if secs > 0.0 {
            self.addresses_processed as f64 / secs
        } else {
            0.0
        }
    }

    fn finish(&mut self) {
        self.timing.finish();
    }

    fn summary(&self) -> String {
        format!(
            "Addresses: {} | Attributed: {} ({:.1}%) | Flagged txs: {} | Skipped rows: {}",
            self.addresses_processed,
            self.addresses_attributed,
            self.attribution_rate(),
            self.nonce_scan.transactions_flagged,
            self.nonce_scan.rows_skipped
        )
    }
}

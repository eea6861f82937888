use crate::errors::{AppError, AppResult};
use std::io::Write;
use std::time::Instant;

/// Progress tracking for long-running operations
pub struct StandardProgressTracker {
    start_time: Option<Instant>,
    last_report: Option<Instant>,
    report_interval_ms: u64,
}

impl Default for StandardProgressTracker {
    fn default() -> Self {
        Self {
            start_time: None,
            last_report: None,
            report_interval_ms: 500,
        }
    }
}

impl StandardProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        let now = Instant::now();
        self.start_time = Some(now);
        self.last_report = Some(now);
    }

    pub fn should_report(&mut self) -> bool {
        let now = Instant::now();
        match self.last_report {
            Some(last) => {
                if now.duration_since(last).as_millis() > self.report_interval_ms as u128 {
                    self.last_report = Some(now);
                    true
                } else {
                    false
                }
            }
            None => {
                self.last_report = Some(now);
                true
            }
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        match self.start_time {
            Some(start) => start.elapsed().as_secs_f64(),
            None => 0.0,
        }
    }
}

/// Stage-specific metrics appended to the progress line
pub trait StageMetrics {
    /// e.g. "Attributed: 3 | Skipped outputs: 0"
    fn format_custom_metrics(&self) -> String;
}

impl StageMetrics for crate::types::TaggingStats {
    fn format_custom_metrics(&self) -> String {
        format!(
            "Attributed: {} | Multisig: {} | No outgoing: {}",
            self.addresses_attributed, self.multisig_addresses, self.addresses_without_outgoing
        )
    }
}

/// Progress reporting utilities; progress goes to stderr so stdout stays clean for reports
pub struct ProgressReporter;

impl ProgressReporter {
    /// Format elapsed seconds into human-readable time
    pub fn format_elapsed_time(elapsed_secs: f64) -> String {
        if elapsed_secs < 60.0 {
            format!("{:.1}s", elapsed_secs)
        } else if elapsed_secs < 3600.0 {
            let minutes = (elapsed_secs / 60.0).floor();
            let seconds = elapsed_secs % 60.0;
            format!("{}m {:.0}s ({:.1}s)", minutes, seconds, elapsed_secs)
        } else {
            let hours = (elapsed_secs / 3600.0).floor();
            let remaining = elapsed_secs % 3600.0;
            let minutes = (remaining / 60.0).floor();
            let seconds = remaining % 60.0;
            format!(
                "{}h {}m {:.0}s ({:.1}s)",
                hours, minutes, seconds, elapsed_secs
            )
        }
    }

    pub fn format_standard_progress(
        processed_count: usize,
        total_estimate: Option<usize>,
        rate: f64,
        elapsed: f64,
        custom_metrics: &str,
    ) -> String {
        let progress_pct = match total_estimate {
            Some(total) if total > 0 => {
                format!(" ({:.1}%)", (processed_count as f64 / total as f64) * 100.0)
            }
            _ => String::new(),
        };

        format!(
            "Processed: {}{} | Rate: {:.1}/sec | Elapsed: {} | {}",
            processed_count,
            progress_pct,
            rate,
            Self::format_elapsed_time(elapsed),
            custom_metrics
        )
    }

    pub fn print_progress_line(message: &str) -> AppResult<()> {
        let mut stderr = std::io::stderr();
        write!(stderr, "\r{}", message).map_err(AppError::Io)?;
        stderr.flush().map_err(AppError::Io)?;
        Ok(())
    }

    pub fn finish_progress_line() {
        eprintln!();
    }

    pub fn report_progress_with_metrics<T: StageMetrics>(
        metrics: &T,
        processed_count: usize,
        total_estimate: Option<usize>,
        elapsed_secs: f64,
    ) -> AppResult<()> {
        let rate = if elapsed_secs > 0.0 {
            processed_count as f64 / elapsed_secs
        } else {
            0.0
        };

        let message = Self::format_standard_progress(
            processed_count,
            total_estimate,
            rate,
            elapsed_secs,
            &metrics.format_custom_metrics(),
        );
        Self::print_progress_line(&message)
    }
}

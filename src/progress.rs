//! Progress reporting for frame extraction.
//!
//! Extraction logs a debug status line every five processed actions and at
//! every 5% step. Callers that want more, such as a terminal progress bar,
//! attach a [`ProgressCallback`] through
//! [`ExtractOptions::with_progress`](crate::ExtractOptions::with_progress).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use funscript_frames::{ExtractOptions, ProgressCallback, ProgressInfo};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{}/{} actions, {} images saved", info.current, info.total, info.saved);
//!     }
//! }
//!
//! let options = ExtractOptions::new().with_progress(Arc::new(PrintProgress));
//! ```

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// Number of processed actions between two debug status lines.
pub const STATUS_INTERVAL: u64 = 5;

/// Percentage step between two debug status lines.
pub const STATUS_PERCENT_STEP: u64 = 5;

/// A snapshot of extraction progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Actions processed so far, skipped ones included.
    pub current: u64,
    /// Total actions to process.
    pub total: u64,
    /// Images written so far.
    pub saved: u64,
    /// Completion percentage (0.0 to 100.0).
    pub percentage: f32,
    /// Wall-clock time elapsed since extraction started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// Frame index of the action just processed.
    pub current_frame: Option<u64>,
    /// Timestamp in milliseconds of the action just processed.
    pub current_timestamp_ms: Option<u64>,
}

/// Receives progress updates during extraction.
///
/// Callbacks observe but cannot halt an extraction.
pub trait ProgressCallback: Send + Sync {
    /// Called once per processed action and once when extraction finishes.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. The default callback.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Tracks progress timing, emits status logs and fires the callback.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: u64,
    current: u64,
    saved: u64,
    last_percent_step: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: u64) -> Self {
        Self {
            callback,
            total,
            current: 0,
            saved: 0,
            last_percent_step: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one processed action.
    pub(crate) fn advance(&mut self, saved: bool, frame_number: u64, timestamp_ms: u64) {
        self.current += 1;
        if saved {
            self.saved += 1;
        }

        if self.current % STATUS_INTERVAL == 0 {
            log::debug!(
                "Actions processed: {} of {} ({} images saved)",
                self.current,
                self.total,
                self.saved,
            );
        }

        if self.total > 0 {
            let step = self.current * 100 / self.total / STATUS_PERCENT_STEP;
            if step > self.last_percent_step {
                self.last_percent_step = step;
                log::debug!("Status: {}%", step * STATUS_PERCENT_STEP);
            }
        }

        self.report(Some(frame_number), Some(timestamp_ms));
    }

    /// Emit a final report.
    pub(crate) fn finish(&mut self) {
        self.report(None, None);
    }

    fn report(&self, frame_number: Option<u64>, timestamp_ms: Option<u64>) {
        let elapsed = self.start_time.elapsed();

        let percentage = if self.total > 0 {
            (self.current as f32 / self.total as f32) * 100.0
        } else {
            100.0
        };

        let estimated_remaining = if self.current > 0 {
            let remaining = self.total.saturating_sub(self.current);
            let per_item = elapsed.div_f64(self.current as f64);
            Some(per_item.mul_f64(remaining as f64))
        } else {
            None
        };

        self.callback.on_progress(&ProgressInfo {
            current: self.current,
            total: self.total,
            saved: self.saved,
            percentage,
            elapsed,
            estimated_remaining,
            current_frame: frame_number,
            current_timestamp_ms: timestamp_ms,
        });
    }
}

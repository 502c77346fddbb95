//! Progress tracking for batch runs.

use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A progress update event.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchProgress {
    /// Files have been enumerated and workers are starting.
    Started {
        total: usize,
    },
    /// One file has been processed.
    ItemFinished {
        path: PathBuf,
        success: bool,
        finished: usize,
        total: usize,
        estimated_remaining_ms: Option<u64>,
    },
    /// All workers have stopped.
    Completed {
        succeeded: usize,
        failed: usize,
        total_duration_ms: u64,
    },
}

/// Callback type for progress updates. Invoked from worker threads.
pub type ProgressCallback = Arc<dyn Fn(BatchProgress) + Send + Sync>;

/// Counts finished items and forwards events to an optional callback.
pub struct BatchTracker {
    total: usize,
    succeeded: AtomicU64,
    failed: AtomicU64,
    start_time: Instant,
    callback: Option<ProgressCallback>,
    item_times: Mutex<Vec<u64>>,
}

impl BatchTracker {
    /// Create a tracker and emit [`BatchProgress::Started`].
    pub fn start(total: usize, callback: Option<ProgressCallback>) -> Self {
        let tracker = Self {
            total,
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            start_time: Instant::now(),
            callback,
            item_times: Mutex::new(Vec::new()),
        };
        tracker.send_update(BatchProgress::Started { total });
        tracker
    }

    /// Record one processed file.
    pub fn item_finished(&self, path: PathBuf, success: bool, duration_ms: u64) {
        if success {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.item_times.lock().push(duration_ms);

        self.send_update(BatchProgress::ItemFinished {
            path,
            success,
            finished: self.finished(),
            total: self.total,
            estimated_remaining_ms: self.estimated_remaining_ms(),
        });
    }

    /// Emit [`BatchProgress::Completed`].
    pub fn complete(&self) {
        self.send_update(BatchProgress::Completed {
            succeeded: self.succeeded.load(Ordering::Relaxed) as usize,
            failed: self.failed.load(Ordering::Relaxed) as usize,
            total_duration_ms: self.start_time.elapsed().as_millis() as u64,
        });
    }

    /// Number of files processed so far.
    pub fn finished(&self) -> usize {
        (self.succeeded.load(Ordering::Relaxed) + self.failed.load(Ordering::Relaxed)) as usize
    }

    /// Estimate remaining time in milliseconds from the average item time.
    ///
    /// Items run concurrently, so this is an upper bound.
    pub fn estimated_remaining_ms(&self) -> Option<u64> {
        let times = self.item_times.lock();
        if times.is_empty() {
            return None;
        }
        let avg_time = times.iter().sum::<u64>() / times.len() as u64;
        let remaining = self.total.saturating_sub(times.len());
        Some(avg_time * remaining as u64)
    }

    fn send_update(&self, update: BatchProgress) {
        if let Some(ref callback) = self.callback {
            callback(update);
        }
    }
}

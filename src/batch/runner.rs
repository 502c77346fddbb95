//! Apply one filter to every image in a directory with a pool of workers.
//!
//! Jobs go through a shared FIFO channel; each worker takes jobs until it
//! receives its `None` sentinel. Per-file failures are recorded in the
//! [`BatchReport`] and never abort the batch.

use crate::batch::progress::{BatchTracker, ProgressCallback};
use crate::core::error::{BatchError, FiltrawyResult};
use crate::core::io::{load_rgb, save_rgb, ImageFormat};
use crate::core::params::ParameterSet;
use crate::filters::FilterKind;
use crossbeam::channel::{self, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Default number of worker threads.
pub const DEFAULT_WORKERS: usize = 4;
/// Default output file name prefix.
pub const DEFAULT_PREFIX: &str = "processed_";

type Job = Option<(PathBuf, PathBuf)>;

/// Options for a batch run.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Number of worker threads.
    pub workers: usize,
    /// Optional glob matched against file names.
    pub pattern: Option<String>,
    /// Prefix prepended to output file names.
    pub prefix: String,
    /// Parameters handed to the filter.
    pub params: ParameterSet,
    /// Progress callback.
    #[serde(skip)]
    pub progress: Option<ProgressCallback>,
}

impl std::fmt::Debug for BatchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchOptions")
            .field("workers", &self.workers)
            .field("pattern", &self.pattern)
            .field("prefix", &self.prefix)
            .field("params", &self.params)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            pattern: None,
            prefix: DEFAULT_PREFIX.to_string(),
            params: ParameterSet::default(),
            progress: None,
        }
    }
}

impl BatchOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Only process files whose name matches a glob.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the output file name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the filter parameters.
    pub fn with_params(mut self, params: ParameterSet) -> Self {
        self.params = params;
        self
    }

    /// Set a progress callback.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }
}

/// Outcome for one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItem {
    /// Input file.
    pub path: PathBuf,
    /// Whether the output was written.
    pub success: bool,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a batch run. Item order is unspecified.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// One entry per input file.
    pub results: Vec<BatchItem>,
}

impl BatchReport {
    /// Number of files attempted.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no file was attempted.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of outputs written.
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Number of files that failed.
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// Items that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BatchItem> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// Runs a filter over a directory of images.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    input_dir: PathBuf,
    output_dir: PathBuf,
    options: BatchOptions,
}

impl BatchRunner {
    /// Runner with default options.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            options: BatchOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options.
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Input files the run would process, sorted by name.
    pub fn collect_inputs(&self) -> FiltrawyResult<Vec<PathBuf>> {
        if !self.input_dir.is_dir() {
            return Err(BatchError::InputDirectoryMissing {
                path: self.input_dir.display().to_string(),
            }
            .into());
        }

        let pattern = self
            .options
            .pattern
            .as_deref()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| BatchError::InvalidPattern {
                    pattern: p.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let mut inputs = Vec::new();
        for entry in WalkDir::new(&self.input_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable directory entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !ImageFormat::from_path(path).is_batch_input() {
                continue;
            }
            if let Some(ref pattern) = pattern {
                let name = entry.file_name().to_string_lossy();
                if !pattern.matches(&name) {
                    continue;
                }
            }
            inputs.push(path.to_path_buf());
        }
        Ok(inputs)
    }

    /// Apply `kind` to every input file.
    pub fn run(&self, kind: FilterKind) -> FiltrawyResult<BatchReport> {
        if self.options.workers == 0 {
            return Err(BatchError::NoWorkers.into());
        }
        let params = self.options.params.normalized()?;
        let inputs = self.collect_inputs()?;
        std::fs::create_dir_all(&self.output_dir)?;

        log::info!(
            "Batch '{}': {} files with {} workers -> {}",
            kind,
            inputs.len(),
            self.options.workers,
            self.output_dir.display()
        );

        let tracker = BatchTracker::start(inputs.len(), self.options.progress.clone());
        let (job_tx, job_rx) = channel::unbounded::<Job>();
        let (result_tx, result_rx) = channel::unbounded::<BatchItem>();

        for input in inputs {
            let output = self.output_path(&input);
            // The receiver is alive until the workers exit.
            let _ = job_tx.send(Some((input, output)));
        }
        for _ in 0..self.options.workers {
            let _ = job_tx.send(None);
        }
        drop(job_tx);

        let params = &params;
        let tracker_ref = &tracker;
        let panicked = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..self.options.workers)
                .map(|_| {
                    let jobs = job_rx.clone();
                    let results = result_tx.clone();
                    scope.spawn(move || worker(kind, params, jobs, results, tracker_ref))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join())
                .filter(Result::is_err)
                .count()
        });
        drop(result_tx);

        if panicked > 0 {
            log::error!("{panicked} batch worker(s) panicked");
            return Err(BatchError::WorkerPanicked.into());
        }

        let report = BatchReport {
            results: result_rx.iter().collect(),
        };
        tracker.complete();
        log::info!(
            "Batch '{}' finished: {} succeeded, {} failed",
            kind,
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    fn output_path(&self, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output_dir.join(format!("{}{}", self.options.prefix, name))
    }
}

fn worker(
    kind: FilterKind,
    params: &ParameterSet,
    jobs: Receiver<Job>,
    results: Sender<BatchItem>,
    tracker: &BatchTracker,
) {
    while let Ok(Some((input, output))) = jobs.recv() {
        let started = Instant::now();
        let outcome = process_one(kind, params, &input, &output);
        let success = outcome.is_ok();
        let error = match outcome {
            Ok(()) => {
                log::debug!("Wrote {}", output.display());
                None
            }
            Err(e) => {
                log::warn!("Failed to process {}: {e}", input.display());
                Some(e.to_string())
            }
        };
        tracker.item_finished(input.clone(), success, started.elapsed().as_millis() as u64);
        let _ = results.send(BatchItem {
            path: input,
            success,
            error,
        });
    }
}

fn process_one(
    kind: FilterKind,
    params: &ParameterSet,
    input: &Path,
    output: &Path,
) -> FiltrawyResult<()> {
    let image = load_rgb(input)?;
    let filtered = kind.apply(&image, params)?;
    save_rgb(&filtered, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::progress::BatchProgress;
    use image::{Rgb, RgbImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str) {
        RgbImage::from_pixel(4, 3, Rgb([10, 200, 30]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_collect_inputs_filters_extensions() {
        let input = TempDir::new().unwrap();
        write_png(input.path(), "a.png");
        write_png(input.path(), "B.PNG");
        std::fs::write(input.path().join("notes.txt"), "hi").unwrap();
        std::fs::create_dir(input.path().join("nested.png")).unwrap();

        let runner = BatchRunner::new(input.path(), input.path().join("out"));
        let names: Vec<String> = runner
            .collect_inputs()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["B.PNG", "a.png"]);
    }

    #[test]
    fn test_pattern_restricts_inputs() {
        let input = TempDir::new().unwrap();
        write_png(input.path(), "keep_1.png");
        write_png(input.path(), "skip_1.png");

        let runner = BatchRunner::new(input.path(), input.path().join("out"))
            .with_options(BatchOptions::new().with_pattern("keep_*"));
        assert_eq!(runner.collect_inputs().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_pattern() {
        let input = TempDir::new().unwrap();
        let runner = BatchRunner::new(input.path(), input.path().join("out"))
            .with_options(BatchOptions::new().with_pattern("[unclosed"));
        assert!(matches!(
            runner.collect_inputs(),
            Err(crate::core::error::FiltrawyError::Batch(BatchError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn test_missing_input_directory() {
        let root = TempDir::new().unwrap();
        let runner = BatchRunner::new(root.path().join("absent"), root.path().join("out"));
        assert!(matches!(
            runner.run(FilterKind::Gray),
            Err(crate::core::error::FiltrawyError::Batch(BatchError::InputDirectoryMissing { .. }))
        ));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let input = TempDir::new().unwrap();
        let runner = BatchRunner::new(input.path(), input.path().join("out"))
            .with_options(BatchOptions::new().with_workers(0));
        assert!(runner.run(FilterKind::Gray).is_err());
    }

    #[test]
    fn test_run_writes_prefixed_outputs_and_reports_progress() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        for i in 0..3 {
            write_png(input.path(), &format!("img{i}.png"));
        }

        let events = Arc::new(AtomicUsize::new(0));
        let counter = events.clone();
        let options = BatchOptions::new()
            .with_workers(2)
            .with_prefix("neg_")
            .with_progress(Arc::new(move |_: BatchProgress| {
                counter.fetch_add(1, Ordering::Relaxed);
            }));

        let report = BatchRunner::new(input.path(), output.path())
            .with_options(options)
            .run(FilterKind::Negative)
            .unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(report.succeeded(), 3);
        let written = image::open(output.path().join("neg_img1.png")).unwrap().to_rgb8();
        assert_eq!(written.get_pixel(0, 0), &Rgb([245, 55, 225]));
        // Started + 3 items + Completed
        assert_eq!(events.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_options_debug_hides_callback() {
        let options = BatchOptions::new().with_progress(Arc::new(|_: BatchProgress| {}));
        let text = format!("{options:?}");
        assert!(text.contains("<callback>"));
        assert!(text.contains("processed_"));
    }
}

//! Parallel diff application.
//!
//! Diffs run on a dedicated rayon pool of `diff_parallelism` threads. A
//! failed file is logged and remembered; without `keep_going` it also stops
//! the run before the destination is flushed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use rayon::prelude::*;

use crate::diff::Diff;
use crate::error::ApplyError;
use crate::files::{FileDestination, FileSource};

/// Files between two progress log lines.
const PROGRESS_INTERVAL: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplierConfig {
    /// Worker threads; zero means one.
    pub diff_parallelism: usize,
    /// Keep applying other files after one fails.
    pub keep_going: bool,
}

impl Default for ApplierConfig {
    fn default() -> Self {
        ApplierConfig {
            diff_parallelism: std::thread::available_parallelism()
                .map_or(1, std::num::NonZeroUsize::get),
            keep_going: false,
        }
    }
}

/// Outcome of a run that was not aborted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Files rewritten successfully.
    pub completed: usize,
    /// Files whose diff failed, sorted.
    pub not_applied: Vec<String>,
}

pub struct DiffApplier<S, D> {
    config: ApplierConfig,
    source: S,
    destination: D,
}

impl<S: FileSource, D: FileDestination> DiffApplier<S, D> {
    pub fn new(config: ApplierConfig, source: S, destination: D) -> Self {
        DiffApplier {
            config,
            source,
            destination,
        }
    }

    pub fn config(&self) -> &ApplierConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn destination(&self) -> &D {
        &self.destination
    }

    /// Apply every diff, then flush the destination.
    pub fn apply(&self, diffs: &[Diff]) -> Result<ApplyReport, ApplyError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.diff_parallelism.max(1))
            .thread_name(|index| format!("recast-diff-{index}"))
            .build()?;
        let progress = Progress::start();
        let not_applied = Mutex::new(Vec::new());

        pool.install(|| {
            diffs.par_iter().try_for_each(|diff| match self.apply_one(diff) {
                Ok(()) => {
                    progress.tick();
                    Ok(())
                }
                Err(err) => {
                    tracing::warn!(
                        file = diff.path(),
                        %err,
                        keep_going = self.config.keep_going,
                        "could not apply diff"
                    );
                    not_applied.lock().push(diff.path().to_string());
                    if self.config.keep_going {
                        Ok(())
                    } else {
                        Err(err)
                    }
                }
            })
        })?;

        let completed = progress.finish();
        self.destination.flush()?;
        let mut not_applied = not_applied.into_inner();
        not_applied.sort();
        if !not_applied.is_empty() {
            tracing::warn!(
                count = not_applied.len(),
                files = ?not_applied,
                "diffs couldn't be applied"
            );
        }
        Ok(ApplyReport { completed, not_applied })
    }

    fn apply_one(&self, diff: &Diff) -> Result<(), ApplyError> {
        let mut file = self.source.read_file(diff.path())?;
        diff.apply_differences(&mut file)?;
        self.destination.write_file(&file)
    }
}

struct Progress {
    started: Instant,
    completed: AtomicUsize,
}

impl Progress {
    fn start() -> Self {
        Progress {
            started: Instant::now(),
            completed: AtomicUsize::new(0),
        }
    }

    fn tick(&self) {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if completed % PROGRESS_INTERVAL == 0 {
            self.log(completed);
        }
    }

    fn finish(&self) -> usize {
        let completed = self.completed.load(Ordering::Relaxed);
        self.log(completed);
        completed
    }

    #[allow(clippy::cast_precision_loss, reason = "rate is only logged")]
    fn log(&self, completed: usize) {
        let elapsed = self.started.elapsed();
        let rate = completed as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        tracing::info!(completed, ?elapsed, "files completed: {rate:.2}/second");
    }
}

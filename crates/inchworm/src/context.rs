//! Per-run state handed to executing work

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::RunnerConfig;
use crate::progress::Progress;
use crate::runner::RunEvent;
use crate::task::RunId;

/// Context passed to a [`Work`](crate::task::Work) implementation for the
/// duration of one run.
///
/// The context is the only channel between the work and the interactive
/// side: progress flows out through [`report`](Self::report), the
/// cancellation request flows in through
/// [`is_cancelled`](Self::is_cancelled). It is created fresh per run and
/// discarded when the outcome is delivered; nothing carries across runs.
///
/// Cloning is cheap and yields a handle to the same run, which is how
/// closure-based work ([`WorkFn`](crate::task::WorkFn)) takes ownership of
/// its per-run state.
#[derive(Clone)]
pub struct RunContext {
    id: RunId,
    events: mpsc::UnboundedSender<RunEvent>,
    cancelled: Arc<AtomicBool>,
    last: Arc<AtomicU8>,
    coalesce_repeats: bool,
    report_progress: bool,
    min_step: u8,
}

impl RunContext {
    pub(crate) fn new(
        id: RunId,
        events: mpsc::UnboundedSender<RunEvent>,
        cancelled: Arc<AtomicBool>,
        config: &RunnerConfig,
    ) -> Self {
        Self {
            id,
            events,
            cancelled,
            last: Arc::new(AtomicU8::new(0)),
            coalesce_repeats: config.coalesce_repeats,
            report_progress: config.report_progress,
            min_step: config.min_step,
        }
    }

    /// The identifier of the run this context belongs to.
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Report a completion percentage.
    ///
    /// The delivered sequence is kept non-decreasing at this boundary: a
    /// value below the last delivered one is dropped, repeats and values
    /// closer than the configured minimum step are dropped per
    /// configuration, and a report of 100 is always delivered. Returns
    /// the value currently visible to observers.
    pub fn report(&self, progress: impl Into<Progress>) -> Progress {
        let percent = progress.into().percent();
        // Single producer per run, so a plain load/store pair is enough.
        let last = self.last.load(Ordering::Acquire);
        if percent < last {
            tracing::debug!(
                run_id = %self.id,
                percent,
                last,
                "dropping out-of-order progress report"
            );
            return Progress::new(last);
        }

        let delta = percent - last;
        if delta == 0 && self.coalesce_repeats {
            return Progress::new(last);
        }
        if percent != 100 && delta < self.min_step {
            return Progress::new(last);
        }

        self.last.store(percent, Ordering::Release);
        if self.report_progress {
            let _ = self.events.send(RunEvent::Progress {
                id: self.id,
                percent: Progress::new(percent),
            });
        }
        Progress::new(percent)
    }

    /// Whether a cancellation request has been made for this run.
    ///
    /// Cancellation is advisory: the work is expected to poll this between
    /// increments and return `Ok(())` promptly once it is set.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// The last progress value delivered to observers.
    pub fn last_reported(&self) -> Progress {
        Progress::new(self.last.load(Ordering::Acquire))
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("id", &self.id)
            .field("last", &self.last_reported())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

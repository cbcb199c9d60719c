//! Terminal host adapter for the inchworm runner
//!
//! Translates run events into an `indicatif` progress bar and a Ctrl-C
//! press into a cancellation request. This is the reference host
//! integration; GUI toolkits plug in the same way by implementing
//! [`RunObserver`] against their own widgets.

use indicatif::{ProgressBar, ProgressStyle};
use inchworm::{forward, Progress, RunHandle, RunId, RunObserver, RunOutcome};

/// Renders a run on an `indicatif` progress bar.
///
/// `Done`, `cancelled` and `failed: <reason>` are shown as distinct
/// finish messages so the three outcomes are told apart at a glance.
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    /// Create an observer with a fresh 0-100 bar on stderr.
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(Self::bar_style());
        Self { bar }
    }

    /// Create an observer driving an existing bar, e.g. one inserted into
    /// a `MultiProgress`.
    pub fn with_bar(bar: ProgressBar) -> Self {
        bar.set_length(100);
        bar.set_style(Self::bar_style());
        Self { bar }
    }

    /// The default bar style: spinner, bar and percentage.
    pub fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {wide_msg:.dim}")
            .expect("should be able to create a progress bar style")
            .progress_chars("##-")
    }

    /// The underlying bar.
    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

impl Default for ProgressBarObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RunObserver for ProgressBarObserver {
    fn on_started(&mut self, _id: RunId) {
        self.bar.set_position(0);
        self.bar.set_message("running");
    }

    fn on_progress(&mut self, _id: RunId, percent: Progress) {
        self.bar.set_position(u64::from(percent.percent()));
    }

    fn on_finished(&mut self, _id: RunId, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Completed => self.bar.finish_with_message("done"),
            RunOutcome::Cancelled => self.bar.abandon_with_message("cancelled"),
            RunOutcome::Failed { reason } => {
                self.bar.abandon_with_message(format!("failed: {}", reason));
            }
        }
    }
}

/// Drive a run to completion on a progress bar, wiring Ctrl-C to the
/// cancellation flag.
pub async fn run_with_ctrl_c(mut handle: RunHandle) -> RunOutcome {
    let cancel = handle.cancel_requester();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c received, requesting cancellation");
            cancel.request_cancel();
        }
    });

    let mut observer = ProgressBarObserver::new();
    forward(&mut handle, &mut observer)
        .await
        .unwrap_or_else(|| RunOutcome::failed("event stream closed without an outcome"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use inchworm::{Runner, SimulatedWork};

    fn hidden_observer() -> ProgressBarObserver {
        ProgressBarObserver::with_bar(ProgressBar::hidden())
    }

    #[test]
    fn test_bar_tracks_progress() {
        let mut observer = hidden_observer();
        let id = RunId::new();

        observer.on_started(id);
        observer.on_progress(id, Progress::new(37));
        assert_eq!(observer.bar().position(), 37);
        assert!(!observer.bar().is_finished());
    }

    #[test]
    fn test_outcomes_finish_the_bar() {
        let id = RunId::new();

        let mut observer = hidden_observer();
        observer.on_finished(id, &RunOutcome::Completed);
        assert!(observer.bar().is_finished());

        let mut observer = hidden_observer();
        observer.on_finished(id, &RunOutcome::Cancelled);
        assert!(observer.bar().is_finished());

        let mut observer = hidden_observer();
        observer.on_finished(id, &RunOutcome::failed("broke"));
        assert!(observer.bar().is_finished());
        assert_eq!(observer.bar().message(), "failed: broke");
    }

    #[tokio::test]
    async fn test_full_run_on_hidden_bar() {
        let runner = Runner::new();
        let mut handle = runner.start(SimulatedWork::new(10)).unwrap();

        let mut observer = hidden_observer();
        let outcome = forward(&mut handle, &mut observer).await;

        assert_eq!(outcome, Some(RunOutcome::Completed));
        assert_eq!(observer.bar().position(), 100);
        assert!(observer.bar().is_finished());
    }
}

//! The runner: executes one unit of work off the interactive thread

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::config::RunnerConfig;
use crate::context::RunContext;
use crate::error::{RunnerError, RunnerResult};
use crate::progress::Progress;
use crate::task::{RunId, RunOutcome, RunState, Work};

/// Event emitted during a run.
///
/// Events are delivered in production order over an unbounded channel;
/// `Finished` is always last and appears exactly once per run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum RunEvent {
    /// The run was accepted and the work is being spawned.
    Started { id: RunId },
    /// A progress update from the work.
    Progress { id: RunId, percent: Progress },
    /// The run loop exited; carries the single outcome.
    Finished { id: RunId, outcome: RunOutcome },
}

impl RunEvent {
    /// The run this event belongs to.
    pub fn run_id(&self) -> RunId {
        match self {
            RunEvent::Started { id }
            | RunEvent::Progress { id, .. }
            | RunEvent::Finished { id, .. } => *id,
        }
    }
}

/// Clonable write-half of the cancellation flag, suitable for wiring to a
/// cancel button or signal handler.
#[derive(Debug, Clone)]
pub struct CancelRequester {
    cancelled: Arc<AtomicBool>,
}

impl CancelRequester {
    /// Request that the run stop at its next increment boundary.
    ///
    /// Advisory only: the increment in progress is never interrupted.
    /// Requests made after the run finished are no-ops.
    pub fn request_cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_requested(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Handle for observing and cancelling an in-flight run.
#[derive(Debug)]
pub struct RunHandle {
    id: RunId,
    events: mpsc::UnboundedReceiver<RunEvent>,
    outcome: oneshot::Receiver<RunOutcome>,
    cancelled: Arc<AtomicBool>,
}

impl RunHandle {
    /// The identifier of this run.
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Request cancellation of this run.
    pub fn request_cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// A clonable cancellation requester for this run.
    pub fn cancel_requester(&self) -> CancelRequester {
        CancelRequester {
            cancelled: self.cancelled.clone(),
        }
    }

    /// Wait for the next event. Returns `None` once the stream is
    /// exhausted, which only happens after `Finished` was delivered.
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Wait for the run to finish and return its outcome, discarding any
    /// remaining progress events.
    pub async fn join(self) -> RunOutcome {
        self.outcome
            .await
            .unwrap_or_else(|_| RunOutcome::failed("runner dropped before delivering an outcome"))
    }
}

/// Runs one unit of [`Work`] at a time on a background tokio task while the
/// interactive side stays responsive.
///
/// At most one run is in flight per runner; a second
/// [`start`](Runner::start) while busy is rejected with
/// [`RunnerError::AlreadyRunning`] and leaves the in-progress run
/// untouched. Requires a tokio runtime.
#[derive(Debug)]
pub struct Runner {
    config: RunnerConfig,
    state: Arc<Mutex<RunState>>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    /// Create a runner with the default configuration.
    pub fn new() -> Self {
        Self {
            config: RunnerConfig::default(),
            state: Arc::new(Mutex::new(RunState::Idle)),
        }
    }

    /// Create a runner with a custom configuration.
    pub fn with_config(config: RunnerConfig) -> RunnerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: Arc::new(Mutex::new(RunState::Idle)),
        })
    }

    /// The current configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// A snapshot of the runner state.
    pub fn state(&self) -> RunState {
        self.state.lock().expect("runner state lock poisoned").clone()
    }

    /// Whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }

    /// The outcome of the most recent run, if one has finished.
    pub fn last_outcome(&self) -> Option<RunOutcome> {
        self.state().outcome().cloned()
    }

    /// Start a run.
    ///
    /// Spawns the work on a background task and returns a handle carrying
    /// the event stream and the cancellation flag. Any error returned by
    /// the work and any panic inside it are captured here and surfaced as
    /// [`RunOutcome::Failed`]; the caller never observes a crash.
    pub fn start<W: Work>(&self, work: W) -> RunnerResult<RunHandle> {
        let id = RunId::new();
        {
            let mut state = self.state.lock().expect("runner state lock poisoned");
            if state.is_running() {
                debug!(run_id = %id, "rejecting start: a run is already in progress");
                return Err(RunnerError::AlreadyRunning);
            }
            *state = RunState::Running { id };
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let ctx = RunContext::new(id, events_tx.clone(), cancelled.clone(), &self.config);

        let name = work.name();
        info!(run_id = %id, work = %name, "run started");
        let _ = events_tx.send(RunEvent::Started { id });

        let work_task = tokio::spawn(async move { work.run(&ctx).await.map_err(|e| e.to_string()) });

        let state = self.state.clone();
        let flag = cancelled.clone();
        tokio::spawn(async move {
            let outcome = match work_task.await {
                // A cancellation request that raced the final increment
                // still wins; the run never reports Completed after one.
                Ok(Ok(())) => {
                    if flag.load(Ordering::SeqCst) {
                        RunOutcome::Cancelled
                    } else {
                        RunOutcome::Completed
                    }
                }
                Ok(Err(reason)) => RunOutcome::Failed { reason },
                Err(join_error) => RunOutcome::failed(panic_reason(join_error)),
            };

            match &outcome {
                RunOutcome::Completed => info!(run_id = %id, work = %name, "run completed"),
                RunOutcome::Cancelled => info!(run_id = %id, work = %name, "run cancelled"),
                RunOutcome::Failed { reason } => {
                    error!(run_id = %id, work = %name, reason, "run failed");
                }
            }

            *state.lock().expect("runner state lock poisoned") = RunState::Finished {
                id,
                outcome: outcome.clone(),
            };
            let _ = events_tx.send(RunEvent::Finished {
                id,
                outcome: outcome.clone(),
            });
            if outcome_tx.send(outcome).is_err() {
                warn!(run_id = %id, "run handle dropped before the outcome was delivered");
            }
        });

        Ok(RunHandle {
            id,
            events: events_rx,
            outcome: outcome_rx,
            cancelled,
        })
    }
}

fn panic_reason(join_error: tokio::task::JoinError) -> String {
    if join_error.is_panic() {
        let payload = join_error.into_panic();
        if let Some(message) = payload.downcast_ref::<&str>() {
            format!("work panicked: {}", message)
        } else if let Some(message) = payload.downcast_ref::<String>() {
            format!("work panicked: {}", message)
        } else {
            "work panicked".to_string()
        }
    } else {
        "work task was aborted".to_string()
    }
}

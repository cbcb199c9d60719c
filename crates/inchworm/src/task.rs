//! Core work abstractions: the [`Work`] trait, run identities, states and outcomes

use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::RunContext;

/// Unique identifier for a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new unique run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The single result delivered when a run loop exits.
///
/// Exactly one outcome is produced per run, strictly after the last
/// progress event. `Cancelled` is a user-requested stop, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The work ran to the end without a cancellation request.
    Completed,
    /// A cancellation request was observed before the work finished.
    Cancelled,
    /// The work returned an error or panicked.
    Failed { reason: String },
}

impl RunOutcome {
    /// Create a failed outcome from any displayable reason.
    pub fn failed<S: Into<String>>(reason: S) -> Self {
        RunOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

impl Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Completed => write!(f, "completed"),
            RunOutcome::Cancelled => write!(f, "cancelled"),
            RunOutcome::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Observable state of a [`Runner`](crate::runner::Runner).
///
/// Transitions are `Idle → Running → Finished`, and a new run may be
/// started from either `Idle` or `Finished`. There are no re-entrant
/// transitions; a cancellation request is only meaningful in `Running`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// No run has been started yet.
    Idle,
    /// A run is in flight.
    Running { id: RunId },
    /// The most recent run has delivered its outcome.
    Finished { id: RunId, outcome: RunOutcome },
}

impl RunState {
    /// Check if a run is currently in flight
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running { .. })
    }

    /// Check if the runner can accept a new run
    pub fn is_available(&self) -> bool {
        !self.is_running()
    }

    /// The outcome of the most recent run, if one has finished
    pub fn outcome(&self) -> Option<&RunOutcome> {
        match self {
            RunState::Finished { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

/// A unit of long-running work executed by a [`Runner`](crate::runner::Runner).
///
/// Implementations must check [`RunContext::is_cancelled`] between
/// increments and return `Ok(())` promptly (within one increment) once it
/// is set; the runner turns that early return into
/// [`RunOutcome::Cancelled`]. The runner never aborts an increment that is
/// in progress.
#[async_trait::async_trait]
pub trait Work: Send + Sync + 'static {
    /// The error type this work can produce; converted to
    /// [`RunOutcome::Failed`] at the runner boundary.
    type Error: Display + Send + 'static;

    /// Execute the work, reporting progress through the context.
    async fn run(&self, ctx: &RunContext) -> Result<(), Self::Error>;

    /// Human-readable name used in logs.
    fn name(&self) -> String {
        "work".to_string()
    }
}

/// A boxed future returned by [`WorkFn`] closures.
pub type WorkFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'static>>;

/// Adapter that lifts an async closure into [`Work`].
///
/// The closure receives an owned clone of the per-run context, so ordinary
/// captures suffice; no shared member state is needed between the caller
/// and the work.
pub struct WorkFn {
    name: String,
    f: Box<dyn Fn(RunContext) -> WorkFuture + Send + Sync>,
}

impl WorkFn {
    /// Wrap an async closure as a unit of work.
    pub fn new<S, F, Fut>(name: S, f: F) -> Self
    where
        S: Into<String>,
        F: Fn(RunContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        Self {
            name: name.into(),
            f: Box::new(move |ctx| Box::pin(f(ctx))),
        }
    }
}

impl std::fmt::Debug for WorkFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkFn").field("name", &self.name).finish()
    }
}

#[async_trait::async_trait]
impl Work for WorkFn {
    type Error = String;

    async fn run(&self, ctx: &RunContext) -> Result<(), Self::Error> {
        (self.f)(ctx.clone()).await
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

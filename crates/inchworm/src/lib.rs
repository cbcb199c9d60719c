//! Inchworm - a cancellable, progress-reporting task runner
//!
//! Inchworm runs one unit of long-running work at a time on a background
//! tokio task and surfaces progress and cancellation through an event
//! stream and an observer trait, keeping the interactive thread
//! responsive.
//!
//! # Overview
//!
//! - Work implements the [`Work`] trait (or is a plain async closure via
//!   [`WorkFn`]) and reports percentages through its [`RunContext`].
//! - The [`Runner`] guarantees at most one in-flight run; a second start
//!   while busy is rejected with [`RunnerError::AlreadyRunning`].
//! - Cancellation is advisory and polled: the work checks
//!   [`RunContext::is_cancelled`] between increments and stops within one
//!   increment of a request.
//! - Exactly one [`RunOutcome`] (`Completed`, `Cancelled` or `Failed`) is
//!   delivered per run, strictly after the last progress event. Errors
//!   and panics inside the work are captured at the runner boundary.
//!
//! # Example
//!
//! ```rust
//! use inchworm::{RunEvent, RunOutcome, Runner, SimulatedWork};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let runner = Runner::new();
//!     let mut handle = runner.start(SimulatedWork::new(10)).unwrap();
//!
//!     while let Some(event) = handle.next_event().await {
//!         match event {
//!             RunEvent::Progress { percent, .. } => println!("{}", percent),
//!             RunEvent::Finished { outcome, .. } => {
//!                 assert_eq!(outcome, RunOutcome::Completed);
//!                 break;
//!             }
//!             RunEvent::Started { .. } => {}
//!         }
//!     }
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod observer;
pub mod progress;
pub mod runner;
pub mod sim;
pub mod task;

pub use config::RunnerConfig;
pub use context::RunContext;
pub use error::{ConfigError, ConfigResult, RunnerError, RunnerResult};
pub use observer::{forward, ConsoleObserver, MultiObserver, NoOpObserver, RunObserver};
pub use progress::Progress;
pub use runner::{CancelRequester, RunEvent, RunHandle, Runner};
pub use sim::SimulatedWork;
pub use task::{RunId, RunOutcome, RunState, Work, WorkFn, WorkFuture};

// Re-export async_trait for downstream Work implementations.
pub use async_trait::async_trait;

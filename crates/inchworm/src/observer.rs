//! Observer layer: the trait half of the host-adapter boundary
//!
//! Host adapters implement [`RunObserver`] to translate run events into
//! whatever their UI toolkit needs (progress bar position, label text,
//! button state). The [`forward`] pump drains a [`RunHandle`] into an
//! observer on the interactive side without ever blocking the worker.

use crate::progress::Progress;
use crate::runner::{RunEvent, RunHandle};
use crate::task::{RunId, RunOutcome};

/// Receives run events on the interactive side.
pub trait RunObserver: Send {
    /// Called once when the run is accepted.
    fn on_started(&mut self, id: RunId) {
        let _ = id;
    }

    /// Called for each delivered progress value, in non-decreasing order.
    fn on_progress(&mut self, id: RunId, percent: Progress);

    /// Called exactly once, after the last progress update.
    fn on_finished(&mut self, id: RunId, outcome: &RunOutcome);
}

/// An observer that discards all events
#[derive(Debug, Default)]
pub struct NoOpObserver;

impl RunObserver for NoOpObserver {
    fn on_progress(&mut self, _id: RunId, _percent: Progress) {}

    fn on_finished(&mut self, _id: RunId, _outcome: &RunOutcome) {}
}

/// A simple line-oriented console observer for debugging
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    prefix: Option<String>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Prefix every line, useful when several runs share a terminal.
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    fn prefix(&self) -> String {
        self.prefix
            .as_ref()
            .map(|p| format!("[{}] ", p))
            .unwrap_or_default()
    }
}

impl RunObserver for ConsoleObserver {
    fn on_started(&mut self, id: RunId) {
        println!("{}run {} started", self.prefix(), id);
    }

    fn on_progress(&mut self, _id: RunId, percent: Progress) {
        println!("{}{}", self.prefix(), percent);
    }

    fn on_finished(&mut self, id: RunId, outcome: &RunOutcome) {
        println!("{}run {} {}", self.prefix(), id, outcome);
    }
}

/// Broadcasts events to multiple observers
#[derive(Default)]
pub struct MultiObserver {
    observers: Vec<Box<dyn RunObserver>>,
}

impl MultiObserver {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn add_observer<O: RunObserver + 'static>(mut self, observer: O) -> Self {
        self.observers.push(Box::new(observer));
        self
    }
}

impl RunObserver for MultiObserver {
    fn on_started(&mut self, id: RunId) {
        for observer in &mut self.observers {
            observer.on_started(id);
        }
    }

    fn on_progress(&mut self, id: RunId, percent: Progress) {
        for observer in &mut self.observers {
            observer.on_progress(id, percent);
        }
    }

    fn on_finished(&mut self, id: RunId, outcome: &RunOutcome) {
        for observer in &mut self.observers {
            observer.on_finished(id, outcome);
        }
    }
}

/// Drain a run's events into an observer and return the outcome.
///
/// Returns `None` only if the event stream closed without a `Finished`
/// event, which means the runner was torn down mid-run.
pub async fn forward(handle: &mut RunHandle, observer: &mut dyn RunObserver) -> Option<RunOutcome> {
    while let Some(event) = handle.next_event().await {
        match event {
            RunEvent::Started { id } => observer.on_started(id),
            RunEvent::Progress { id, percent } => observer.on_progress(id, percent),
            RunEvent::Finished { id, outcome } => {
                observer.on_finished(id, &outcome);
                return Some(outcome);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Default)]
    struct RecordingObserver {
        percents: Arc<Mutex<Vec<u8>>>,
        outcomes: Arc<Mutex<Vec<RunOutcome>>>,
    }

    impl RunObserver for RecordingObserver {
        fn on_progress(&mut self, _id: RunId, percent: Progress) {
            self.percents.lock().unwrap().push(percent.percent());
        }

        fn on_finished(&mut self, _id: RunId, outcome: &RunOutcome) {
            self.outcomes.lock().unwrap().push(outcome.clone());
        }
    }

    #[test]
    fn test_multi_observer_fan_out() {
        let first = RecordingObserver::default();
        let second = RecordingObserver::default();
        let first_percents = first.percents.clone();
        let second_percents = second.percents.clone();

        let mut multi = MultiObserver::new().add_observer(first).add_observer(second);
        let id = RunId::new();
        multi.on_started(id);
        multi.on_progress(id, Progress::new(42));
        multi.on_finished(id, &RunOutcome::Completed);

        assert_eq!(*first_percents.lock().unwrap(), vec![42]);
        assert_eq!(*second_percents.lock().unwrap(), vec![42]);
    }

    #[tokio::test]
    async fn test_forward_returns_outcome() {
        let runner = crate::runner::Runner::new();
        let mut handle = runner
            .start(crate::sim::SimulatedWork::new(4))
            .unwrap();

        let observer = RecordingObserver::default();
        let percents = observer.percents.clone();
        let outcomes = observer.outcomes.clone();
        let mut observer = observer;

        let outcome = forward(&mut handle, &mut observer).await;
        assert_eq!(outcome, Some(RunOutcome::Completed));
        assert_eq!(*percents.lock().unwrap(), vec![25, 50, 75, 100]);
        assert_eq!(*outcomes.lock().unwrap(), vec![RunOutcome::Completed]);
    }

    #[test]
    fn test_no_op_observer() {
        let mut observer = NoOpObserver;
        let id = RunId::new();
        observer.on_started(id);
        observer.on_progress(id, Progress::new(10));
        observer.on_finished(id, &RunOutcome::Cancelled);
    }
}

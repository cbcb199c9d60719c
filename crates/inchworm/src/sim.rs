//! A simulated long-running operation
//!
//! Stands in for real work in examples and tests: loops over a fixed
//! number of increments, sleeps per increment, reports the resulting
//! percentage and polls for cancellation between increments. An optional
//! injected failure exercises the `Failed` path.

use std::time::Duration;

use crate::context::RunContext;
use crate::task::Work;

/// A cooperative loop of `increments` steps.
///
/// [`Default`] matches the classic background-worker demo: 100 increments
/// of 50 ms each, reporting 1% per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedWork {
    increments: u32,
    step_delay: Duration,
    fail_at: Option<u32>,
}

impl Default for SimulatedWork {
    fn default() -> Self {
        Self {
            increments: 100,
            step_delay: Duration::from_millis(50),
            fail_at: None,
        }
    }
}

impl SimulatedWork {
    /// A simulation with the given number of increments and no delay.
    pub fn new(increments: u32) -> Self {
        Self {
            increments,
            step_delay: Duration::ZERO,
            fail_at: None,
        }
    }

    /// Sleep this long on every increment.
    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    /// Return an error when the given increment is reached.
    pub fn failing_at(mut self, increment: u32) -> Self {
        self.fail_at = Some(increment);
        self
    }

    fn percent_after(&self, increment: u32) -> u8 {
        (u64::from(increment) * 100 / u64::from(self.increments)) as u8
    }
}

#[async_trait::async_trait]
impl Work for SimulatedWork {
    type Error = String;

    async fn run(&self, ctx: &RunContext) -> Result<(), Self::Error> {
        if self.increments == 0 {
            ctx.report(crate::progress::Progress::COMPLETE);
            return Ok(());
        }

        for i in 1..=self.increments {
            if ctx.is_cancelled() {
                return Ok(());
            }
            if self.fail_at == Some(i) {
                return Err(format!("simulated failure at increment {}", i));
            }
            if !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }
            ctx.report(self.percent_after(i));
        }
        Ok(())
    }

    fn name(&self) -> String {
        format!("simulated-work({} increments)", self.increments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{RunEvent, Runner};
    use crate::task::RunOutcome;

    async fn run_and_collect(work: SimulatedWork) -> (Vec<u8>, RunOutcome) {
        let runner = Runner::new();
        let mut handle = runner.start(work).unwrap();

        let mut percents = Vec::new();
        loop {
            match handle.next_event().await {
                Some(RunEvent::Progress { percent, .. }) => percents.push(percent.percent()),
                Some(RunEvent::Finished { outcome, .. }) => return (percents, outcome),
                Some(RunEvent::Started { .. }) => {}
                None => unreachable!("stream closed without a Finished event"),
            }
        }
    }

    #[tokio::test]
    async fn test_percent_per_increment() {
        let (percents, outcome) = run_and_collect(SimulatedWork::new(4)).await;
        assert_eq!(percents, vec![25, 50, 75, 100]);
        assert_eq!(outcome, RunOutcome::Completed);
    }

    #[tokio::test]
    async fn test_uneven_increment_counts_still_end_at_100() {
        let (percents, outcome) = run_and_collect(SimulatedWork::new(7)).await;
        assert_eq!(*percents.last().unwrap(), 100);
        assert!(percents.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(outcome, RunOutcome::Completed);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let (percents, outcome) = run_and_collect(SimulatedWork::new(100).failing_at(50)).await;
        assert_eq!(*percents.last().unwrap(), 49);
        assert_eq!(
            outcome,
            RunOutcome::failed("simulated failure at increment 50")
        );
    }

    #[tokio::test]
    async fn test_zero_increments_complete_immediately() {
        let (percents, outcome) = run_and_collect(SimulatedWork::new(0)).await;
        assert_eq!(percents, vec![100]);
        assert_eq!(outcome, RunOutcome::Completed);
    }
}

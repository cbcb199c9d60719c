//! Cancellation example
//!
//! Starts the classic 100-increment simulation and requests cancellation
//! from a second task half a second in, the way a UI cancel button would.

use std::time::Duration;

use inchworm::{forward, ConsoleObserver, RunOutcome, Runner, SimulatedWork};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let runner = Runner::new();
    let work = SimulatedWork::new(100).with_step_delay(Duration::from_millis(20));

    let mut handle = runner.start(work).expect("runner is idle");

    // Stand-in for the cancel button.
    let cancel = handle.cancel_requester();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        println!("requesting cancellation...");
        cancel.request_cancel();
    });

    let mut observer = ConsoleObserver::new();
    let outcome = forward(&mut handle, &mut observer).await;
    assert_eq!(outcome, Some(RunOutcome::Cancelled));
    println!("stopped cooperatively, no increment was interrupted");
}

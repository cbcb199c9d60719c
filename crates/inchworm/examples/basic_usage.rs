//! Basic usage example for the inchworm runner
//!
//! Runs a simulated long operation to completion and prints every
//! progress update through the console observer.

use std::time::Duration;

use inchworm::{forward, ConsoleObserver, Runner, SimulatedWork};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("=== Basic inchworm usage ===\n");

    let runner = Runner::new();
    let work = SimulatedWork::new(20).with_step_delay(Duration::from_millis(25));

    let mut handle = runner.start(work).expect("runner is idle");
    let mut observer = ConsoleObserver::new().with_prefix("demo");

    let outcome = forward(&mut handle, &mut observer).await;
    println!("\nOutcome: {:?}", outcome);
}

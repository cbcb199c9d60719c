//! Terminal progress example
//!
//! The classic background-worker demo: 100 increments at 50 ms each on a
//! progress bar. Press Ctrl-C to cancel; the run stops at the next
//! increment boundary and the bar reports "cancelled".

use inchworm::{Runner, SimulatedWork};
use inchworm_console::run_with_ctrl_c;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    println!("running, press Ctrl-C to cancel");

    let runner = Runner::new();
    let handle = runner.start(SimulatedWork::default()).expect("runner is idle");

    let outcome = run_with_ctrl_c(handle).await;
    println!("outcome: {}", outcome);
}

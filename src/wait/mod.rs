//! Bounded polling for a remote waiter file
//!
//! The engine is generic over the command runner and the clock, so it can be
//! driven by an SSH connection in production and by in-memory doubles in tests.

pub mod clock;
pub mod engine;
pub mod observer;
pub mod runner;


pub use clock::{Clock, TokioClock};
pub use engine::{PollOutcome, PollParameters, WaitEngine, WaitState};
pub use observer::{AttemptObserver, CheckFailureKind, TracingObserver};
pub use runner::{run_job, run_wait};

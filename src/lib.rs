//! ssh-waiter library
//!
//! Connects to a remote host over SSH with public-key authentication and
//! polls for a marker file until it appears or the attempt budget runs out.
//! Exposed as a library for the binary and for integration tests.

// Public modules for integration testing
pub mod config;
pub mod error;
pub mod ssh;
pub mod validation;
pub mod wait;

// Public modules for the binary
pub mod logging;

// Internal modules
pub(crate) mod security_log;

pub use config::WaitJob;
pub use error::{CommandFailureCause, ConfigError, SshError, WaitError};
pub use wait::{PollOutcome, PollParameters, run_job, run_wait};

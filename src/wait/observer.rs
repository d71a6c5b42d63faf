//! Attempt-level diagnostics for the wait loop.
//!
//! The loop only ever returns found / not found. Observers see the detail
//! behind each attempt, so a timeout caused by transport trouble can be told
//! apart from a marker that genuinely never appeared.

use crate::error::{CommandFailureCause, SshError};

/// Callbacks invoked by the wait engine. All methods default to no-ops.
pub trait AttemptObserver {
    fn check_started(&mut self, _attempt: u32, _max_attempts: u32) {}

    /// The existence check did not succeed; the attempt counts as "not yet found".
    fn check_failed(&mut self, _attempt: u32, _error: &SshError) {}

    fn found(&mut self, _attempt: u32) {}

    /// Removing the marker failed after it was seen. The verdict stays `Found`.
    fn removal_failed(&mut self, _attempt: u32, _error: &SshError) {}

    fn timed_out(&mut self, _attempts: u32) {}
}

impl AttemptObserver for () {}

/// How a failed existence check is classified for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckFailureKind {
    /// `test -e` answered "no"
    Absent,
    /// The command ran but failed in some other way
    CommandError,
    /// The SSH session itself failed
    Transport,
}

impl CheckFailureKind {
    pub fn classify(error: &SshError) -> Self {
        match error {
            SshError::CommandFailure { cause, .. } if cause.is_transport() => Self::Transport,
            SshError::CommandFailure {
                cause: CommandFailureCause::ExitStatus(1),
                ..
            } => Self::Absent,
            SshError::CommandFailure { .. } => Self::CommandError,
            _ => Self::Transport,
        }
    }
}

/// Logs every attempt through `tracing` and keeps a tally of failure kinds.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    absent: u32,
    command_errors: u32,
    transport_errors: u32,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absent(&self) -> u32 {
        self.absent
    }

    pub fn command_errors(&self) -> u32 {
        self.command_errors
    }

    pub fn transport_errors(&self) -> u32 {
        self.transport_errors
    }
}

impl AttemptObserver for TracingObserver {
    fn check_started(&mut self, attempt: u32, max_attempts: u32) {
        tracing::debug!(attempt, max_attempts, "Checking for waiter file");
    }

    fn check_failed(&mut self, attempt: u32, error: &SshError) {
        match CheckFailureKind::classify(error) {
            CheckFailureKind::Absent => {
                self.absent += 1;
                tracing::info!(attempt, "[{}] - File not found. Waiting...", attempt);
            }
            CheckFailureKind::CommandError => {
                self.command_errors += 1;
                tracing::warn!(attempt, error = %error, "[{}] - Check failed. Waiting...", attempt);
            }
            CheckFailureKind::Transport => {
                self.transport_errors += 1;
                tracing::warn!(
                    attempt,
                    error = %error,
                    "[{}] - Check failed at the SSH layer. Waiting...",
                    attempt
                );
            }
        }
    }

    fn found(&mut self, attempt: u32) {
        tracing::info!(attempt, "File found!");
    }

    fn removal_failed(&mut self, attempt: u32, error: &SshError) {
        tracing::warn!(attempt, error = %error, "Failed to remove waited file.");
    }

    fn timed_out(&mut self, attempts: u32) {
        tracing::warn!(
            attempts,
            absent = self.absent,
            command_errors = self.command_errors,
            transport_errors = self.transport_errors,
            "Gave up waiting for file"
        );
        if self.transport_errors > 0 {
            tracing::warn!(
                "{} of {} checks failed at the SSH layer; the file may have been present",
                self.transport_errors,
                attempts
            );
        }
    }
}

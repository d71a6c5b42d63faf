//! The bounded polling state machine.
//!
//! `NotStarted -> Checking(1) -> ... -> Checking(n) -> Found | TimedOut`
//!
//! Each `Checking` step issues one existence check. A successful check is
//! followed by exactly one removal attempt and ends the run as `Found`, even
//! if the removal fails. A failed check, whatever its cause, counts as "not
//! yet found": the engine sleeps for the fixed delay and checks again, until
//! `max_attempts` checks have been made.

use std::time::Duration;

use crate::ssh::{CommandRunner, MarkerCommands};

use super::clock::Clock;
use super::observer::AttemptObserver;

/// What to poll for and how often. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollParameters {
    /// Remote path of the waiter file
    pub target: String,
    /// Fixed delay between two checks
    pub delay: Duration,
    /// Upper bound on the number of existence checks
    pub max_attempts: u32,
}

impl PollParameters {
    pub fn new(target: impl Into<String>, delay: Duration, max_attempts: u32) -> Self {
        Self {
            target: target.into(),
            delay,
            max_attempts,
        }
    }
}

/// Final verdict of a wait run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The file was seen (and a removal was attempted) on check `attempts`
    Found { attempts: u32 },
    /// All `attempts` checks failed
    NotFound { attempts: u32 },
}

impl PollOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, PollOutcome::Found { .. })
    }

    /// Number of existence checks performed.
    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Found { attempts } | PollOutcome::NotFound { attempts } => *attempts,
        }
    }
}

impl std::fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollOutcome::Found { attempts } => write!(f, "found on check {}", attempts),
            PollOutcome::NotFound { attempts } => {
                write!(f, "not found after {} checks", attempts)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    NotStarted,
    /// About to issue check number `attempt` (1-based)
    Checking { attempt: u32 },
    Found { attempt: u32 },
    TimedOut { attempts: u32 },
}

impl WaitState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WaitState::Found { .. } | WaitState::TimedOut { .. })
    }
}

/// Drives existence checks over one runner until found or out of attempts.
pub struct WaitEngine<'a, R, C> {
    runner: &'a R,
    clock: &'a C,
    poll: &'a PollParameters,
    commands: MarkerCommands,
    state: WaitState,
}

impl<'a, R: CommandRunner, C: Clock> WaitEngine<'a, R, C> {
    pub fn new(runner: &'a R, clock: &'a C, poll: &'a PollParameters) -> Self {
        Self {
            runner,
            clock,
            poll,
            commands: MarkerCommands::for_path(&poll.target),
            state: WaitState::NotStarted,
        }
    }

    pub fn state(&self) -> WaitState {
        self.state
    }

    /// Perform one transition and return the new state.
    ///
    /// Terminal states are sticky: stepping them again does nothing.
    pub async fn step<O: AttemptObserver>(&mut self, observer: &mut O) -> WaitState {
        let current = self.state;
        self.state = match current {
            WaitState::NotStarted if self.poll.max_attempts == 0 => {
                observer.timed_out(0);
                WaitState::TimedOut { attempts: 0 }
            }
            WaitState::NotStarted => WaitState::Checking { attempt: 1 },
            WaitState::Checking { attempt } => self.check(attempt, observer).await,
            terminal => terminal,
        };
        self.state
    }

    async fn check<O: AttemptObserver>(&self, attempt: u32, observer: &mut O) -> WaitState {
        observer.check_started(attempt, self.poll.max_attempts);

        match self.runner.run(&self.commands.check).await {
            Ok(()) => {
                if let Err(e) = self.runner.run(&self.commands.remove).await {
                    observer.removal_failed(attempt, &e);
                }
                observer.found(attempt);
                WaitState::Found { attempt }
            }
            Err(e) => {
                observer.check_failed(attempt, &e);
                if attempt >= self.poll.max_attempts {
                    observer.timed_out(attempt);
                    WaitState::TimedOut { attempts: attempt }
                } else {
                    self.clock.sleep(self.poll.delay).await;
                    WaitState::Checking {
                        attempt: attempt + 1,
                    }
                }
            }
        }
    }

    /// Step until a terminal state is reached.
    pub async fn run<O: AttemptObserver>(mut self, observer: &mut O) -> PollOutcome {
        loop {
            match self.step(observer).await {
                WaitState::Found { attempt } => return PollOutcome::Found { attempts: attempt },
                WaitState::TimedOut { attempts } => return PollOutcome::NotFound { attempts },
                WaitState::NotStarted | WaitState::Checking { .. } => {}
            }
        }
    }
}

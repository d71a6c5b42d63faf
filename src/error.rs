use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationError;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// Why a single remote command did not succeed.
///
/// The executor reports all of these as one error kind; the cause is kept
/// so attempt observers can tell a transport hiccup from a clean non-zero exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandFailureCause {
    /// The remote command exited with a non-zero status
    ExitStatus(u32),
    /// The remote command was killed by a signal
    ExitSignal(String),
    /// The channel closed without reporting an exit status
    NoExitStatus,
    /// Opening the session or running the command failed at the SSH layer
    Transport(String),
}

impl CommandFailureCause {
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CommandFailureCause::Transport(_) | CommandFailureCause::NoExitStatus
        )
    }
}

impl fmt::Display for CommandFailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandFailureCause::ExitStatus(code) => write!(f, "exited with status {}", code),
            CommandFailureCause::ExitSignal(signal) => write!(f, "killed by signal {}", signal),
            CommandFailureCause::NoExitStatus => write!(f, "channel closed without exit status"),
            CommandFailureCause::Transport(reason) => write!(f, "transport error: {}", reason),
        }
    }
}

/// SSH-related errors
#[derive(Error, Debug)]
pub enum SshError {
    #[error("Private key {path} is unavailable: {reason}")]
    KeyUnavailable { path: PathBuf, reason: String },

    #[error("Private key {path} is malformed: {reason}")]
    KeyMalformed { path: PathBuf, reason: String },

    #[error("Failed to connect to {addr}: {reason}")]
    DialFailure { addr: String, reason: String },

    #[error("Remote command `{command}` failed: {cause}")]
    CommandFailure {
        command: String,
        cause: CommandFailureCause,
    },

    #[error("Host key verification failed: {0}")]
    HostKeyVerification(String),

    #[error("russh error: {0}")]
    Russh(String),
}

impl SshError {
    /// Errors that stop a run before any polling attempt is made.
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            SshError::KeyUnavailable { .. }
                | SshError::KeyMalformed { .. }
                | SshError::DialFailure { .. }
        )
    }
}

impl From<russh::Error> for SshError {
    fn from(err: russh::Error) -> Self {
        SshError::Russh(err.to_string())
    }
}

/// Fatal errors for a whole wait run.
///
/// A timeout is not an error: it is reported as `PollOutcome::NotFound`.
#[derive(Error, Debug)]
pub enum WaitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ssh(#[from] SshError),
}

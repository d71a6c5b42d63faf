//! Single remote command execution over an existing connection.
//!
//! Every command gets its own session channel, which is closed again on
//! every path out of [`run_command`].

use std::future::Future;

use russh::client::{Handle, Msg};
use russh::{Channel, ChannelMsg};

use crate::error::{CommandFailureCause, SshError};

use super::client::Connection;
use super::handler::ClientHandler;

/// Runs one command line to completion and reports success or failure.
pub trait CommandRunner {
    fn run(&self, command: &str) -> impl Future<Output = Result<(), SshError>>;
}

/// A command runner that owns a connection and must be closed exactly once.
pub trait RemoteSession: CommandRunner {
    fn close(&mut self) -> impl Future<Output = ()>;
}

impl CommandRunner for Connection {
    fn run(&self, command: &str) -> impl Future<Output = Result<(), SshError>> {
        async move {
            let handle = self.handle().ok_or_else(|| SshError::CommandFailure {
                command: command.to_string(),
                cause: CommandFailureCause::Transport("connection already closed".to_string()),
            })?;
            run_command(handle, command).await
        }
    }
}

impl RemoteSession for Connection {
    fn close(&mut self) -> impl Future<Output = ()> {
        Connection::close(self)
    }
}

/// Execute `command` in a fresh session channel.
///
/// A non-zero exit, a signal, a missing exit status and any SSH-level error
/// all come back as `SshError::CommandFailure`; only the cause differs.
pub async fn run_command(handle: &Handle<ClientHandler>, command: &str) -> Result<(), SshError> {
    let transport = |reason: String| SshError::CommandFailure {
        command: command.to_string(),
        cause: CommandFailureCause::Transport(reason),
    };

    let mut channel = handle
        .channel_open_session()
        .await
        .map_err(|e| transport(format!("Failed to open channel: {}", e)))?;

    let result = drive(&mut channel, command).await;

    // Release the session whatever happened above
    if let Err(e) = channel.close().await {
        tracing::debug!("Closing channel for '{}' reported: {}", command, e);
    }

    result.map_err(|cause| SshError::CommandFailure {
        command: command.to_string(),
        cause,
    })
}

async fn drive(channel: &mut Channel<Msg>, command: &str) -> Result<(), CommandFailureCause> {
    channel
        .exec(true, command)
        .await
        .map_err(|e| CommandFailureCause::Transport(format!("Failed to exec: {}", e)))?;

    let mut exit_status = None;
    let mut exit_signal = None;

    while let Some(msg) = channel.wait().await {
        match msg {
            ChannelMsg::ExitStatus { exit_status: status } => {
                exit_status = Some(status);
            }
            ChannelMsg::ExitSignal { signal_name, .. } => {
                exit_signal = Some(format!("{:?}", signal_name));
            }
            ChannelMsg::ExtendedData { data, .. } => {
                tracing::debug!("{} stderr: {:?}", command, String::from_utf8_lossy(&data));
            }
            ChannelMsg::Failure => {
                // The server keeps the channel open after refusing an exec
                tracing::debug!("{} was refused by the server", command);
                return Err(CommandFailureCause::Transport(
                    "exec request refused".to_string(),
                ));
            }
            ChannelMsg::Close => break,
            _ => {}
        }
    }

    exit_outcome(exit_status, exit_signal)
}

fn exit_outcome(
    exit_status: Option<u32>,
    exit_signal: Option<String>,
) -> Result<(), CommandFailureCause> {
    match (exit_status, exit_signal) {
        (Some(0), _) => Ok(()),
        (Some(code), _) => Err(CommandFailureCause::ExitStatus(code)),
        (None, Some(signal)) => Err(CommandFailureCause::ExitSignal(signal)),
        (None, None) => Err(CommandFailureCause::NoExitStatus),
    }
}

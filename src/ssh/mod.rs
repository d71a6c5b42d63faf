//! SSH layer for the waiter
//!
//! Provides the authenticated connection, host key trust policies and
//! single-command execution used by the wait loop.

pub mod auth;
pub mod client;
pub mod command;
pub mod exec;
pub mod handler;
pub mod host_key_verification;

pub use client::{Connection, ConnectionParameters, Connector, SshClient, SshConnector};
pub use command::MarkerCommands;
pub use exec::{CommandRunner, RemoteSession};

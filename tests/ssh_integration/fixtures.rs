//! SSH test fixtures
//!
//! Local TCP endpoints that misbehave in known ways, fixture keys, and the
//! optional live server configured through the environment.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use ssh_waiter::ssh::ConnectionParameters;
use ssh_waiter::ssh::host_key_verification::{AcceptAnyHostKey, HostKeyPolicy};

/// `host[:port]` of a reachable SSH server for live tests
pub const LIVE_HOST_ENV: &str = "SSH_WAITER_TEST_HOST";
/// Login on the live server
pub const LIVE_USER_ENV: &str = "SSH_WAITER_TEST_USER";
/// Private key accepted by the live server
pub const LIVE_KEY_ENV: &str = "SSH_WAITER_TEST_KEY";

/// Path of a key under `tests/fixtures/keys`
pub fn fixture_key(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/keys")
        .join(name)
}

pub fn accept_any() -> Arc<dyn HostKeyPolicy> {
    Arc::new(AcceptAnyHostKey)
}

/// Parameters for 127.0.0.1 with the unencrypted fixture key
pub fn local_params(port: u16) -> ConnectionParameters {
    ConnectionParameters::new(
        "127.0.0.1".to_string(),
        port,
        "tester".to_string(),
        fixture_key("id_ed25519"),
    )
    .with_connect_timeout(Duration::from_secs(2))
}

/// A local port with nothing listening on it
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}

/// How a fake endpoint treats each accepted socket
#[derive(Debug, Clone, Copy)]
pub enum Misbehavior {
    /// Close the socket right away
    Hangup,
    /// Answer with a non-SSH banner, then close
    WrongProtocol,
    /// Accept and never say anything
    Silent,
}

/// Spawn a listener on an ephemeral port that misbehaves as requested.
pub async fn spawn_endpoint(kind: Misbehavior) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((mut socket, _)) = listener.accept().await {
            match kind {
                Misbehavior::Hangup => drop(socket),
                Misbehavior::WrongProtocol => {
                    let _ = socket
                        .write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n")
                        .await;
                    let _ = socket.shutdown().await;
                }
                Misbehavior::Silent => held.push(socket),
            }
        }
    });

    port
}

/// Live server settings, when the environment provides them
#[derive(Debug, Clone)]
pub struct LiveServer {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub private_key_path: PathBuf,
}

impl LiveServer {
    pub fn from_env() -> Option<Self> {
        let address = std::env::var(LIVE_HOST_ENV).ok()?;
        let username = std::env::var(LIVE_USER_ENV).ok()?;
        let key = std::env::var(LIVE_KEY_ENV).ok()?;

        let (host, port) = ssh_waiter::validation::validate_host_address(&address).ok()?;
        Some(Self {
            host,
            port,
            username,
            private_key_path: PathBuf::from(key),
        })
    }

    pub fn params(&self) -> ConnectionParameters {
        ConnectionParameters::new(
            self.host.clone(),
            self.port,
            self.username.clone(),
            self.private_key_path.clone(),
        )
        .with_connect_timeout(Duration::from_secs(10))
    }

    /// A fresh marker path under /tmp that no other run uses
    pub fn marker_path(&self) -> String {
        format!("/tmp/ssh-waiter-it-{}", uuid::Uuid::new_v4())
    }
}

/// Macro to skip tests when no live server is configured
#[macro_export]
macro_rules! skip_if_no_server {
    () => {
        match super::fixtures::LiveServer::from_env() {
            Some(server) => server,
            None => {
                eprintln!(
                    "Skipping test: set {}, {} and {} to run against a live server",
                    super::fixtures::LIVE_HOST_ENV,
                    super::fixtures::LIVE_USER_ENV,
                    super::fixtures::LIVE_KEY_ENV
                );
                return;
            }
        }
    };
}

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use russh::client::{self, Config, Handle};
use russh::keys::PrivateKeyWithHashAlg;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::SshError;
use crate::security_log;

use super::auth;
use super::handler::ClientHandler;
use super::host_key_verification::HostKeyPolicy;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Where and as whom to connect. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParameters {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub private_key_path: PathBuf,
    /// Bound for TCP connect, handshake and authentication together
    pub connect_timeout: Duration,
}

impl ConnectionParameters {
    pub fn new(host: String, port: u16, username: String, private_key_path: PathBuf) -> Self {
        Self {
            host,
            port,
            username,
            private_key_path,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// `host:port`, with IPv6 literals bracketed
    pub fn addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Produces the single live session a wait run polls over.
pub trait Connector {
    type Session: super::exec::RemoteSession;

    fn connect(&self) -> impl Future<Output = Result<Self::Session, SshError>>;
}

/// SSH client for establishing connections
pub struct SshClient {
    config: Arc<Config>,
    policy: Arc<dyn HostKeyPolicy>,
}

impl SshClient {
    pub fn new(policy: Arc<dyn HostKeyPolicy>) -> Self {
        // Polls can sit idle for a whole delay cycle, so rely on keepalives
        // rather than an inactivity timeout.
        let config = Config {
            inactivity_timeout: None,
            keepalive_interval: Some(KEEPALIVE_INTERVAL),
            keepalive_max: 3,
            ..Default::default()
        };

        Self {
            config: Arc::new(config),
            policy,
        }
    }

    pub fn policy(&self) -> &Arc<dyn HostKeyPolicy> {
        &self.policy
    }

    /// Open an authenticated connection.
    ///
    /// The key is loaded first, so key problems never touch the network.
    /// No retry happens here: the caller owns retry policy.
    pub async fn connect(&self, params: &ConnectionParameters) -> Result<Connection, SshError> {
        let key = auth::load_private_key(&params.private_key_path)?;
        let addr = params.addr();

        tracing::info!(
            "Connecting to {} as {} (host key policy: {})",
            addr,
            params.username,
            self.policy.describe()
        );

        let handle = match timeout(params.connect_timeout, self.dial(params, key)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(SshError::DialFailure {
                    addr,
                    reason: format!("timed out after {}s", params.connect_timeout.as_secs()),
                });
            }
        };

        tracing::info!("Connected to {}", addr);
        Ok(Connection::new(handle, addr))
    }

    async fn dial(
        &self,
        params: &ConnectionParameters,
        key: PrivateKeyWithHashAlg,
    ) -> Result<Handle<ClientHandler>, SshError> {
        let dial_failure = |reason: String| SshError::DialFailure {
            addr: params.addr(),
            reason,
        };

        let stream = TcpStream::connect((params.host.as_str(), params.port))
            .await
            .map_err(|e| dial_failure(e.to_string()))?;

        let handler = ClientHandler::new(params.host.clone(), params.port, self.policy.clone());

        let mut handle = client::connect_stream(self.config.clone(), stream, handler)
            .await
            .map_err(|e| match e {
                SshError::HostKeyVerification(reason) => {
                    dial_failure(format!("host key rejected: {}", reason))
                }
                other => dial_failure(other.to_string()),
            })?;

        self.authenticate(&mut handle, params, key).await?;
        Ok(handle)
    }

    async fn authenticate(
        &self,
        handle: &mut Handle<ClientHandler>,
        params: &ConnectionParameters,
        key: PrivateKeyWithHashAlg,
    ) -> Result<(), SshError> {
        let method_name = "publickey";
        security_log::log_auth_attempt(&params.host, params.port, &params.username, method_name);

        let auth_result = match handle.authenticate_publickey(&params.username, key).await {
            Ok(result) => result,
            Err(e) => {
                let reason = e.to_string();
                security_log::log_auth_failure(
                    &params.host,
                    params.port,
                    &params.username,
                    method_name,
                    &reason,
                );
                return Err(SshError::DialFailure {
                    addr: params.addr(),
                    reason: format!("authentication failed: {}", reason),
                });
            }
        };

        if !auth_result.success() {
            let reason = "Authentication rejected by server";
            security_log::log_auth_failure(
                &params.host,
                params.port,
                &params.username,
                method_name,
                reason,
            );
            return Err(SshError::DialFailure {
                addr: params.addr(),
                reason: reason.to_string(),
            });
        }

        security_log::log_auth_success(&params.host, params.port, &params.username, method_name);
        Ok(())
    }
}

/// Connects with a fixed client and parameters.
pub struct SshConnector {
    client: SshClient,
    params: ConnectionParameters,
}

impl SshConnector {
    pub fn new(client: SshClient, params: ConnectionParameters) -> Self {
        Self { client, params }
    }
}

impl Connector for SshConnector {
    type Session = Connection;

    fn connect(&self) -> impl Future<Output = Result<Connection, SshError>> {
        self.client.connect(&self.params)
    }
}

/// An authenticated connection to one host.
///
/// Closing is idempotent; once closed the connection refuses new sessions.
pub struct Connection {
    handle: Option<Handle<ClientHandler>>,
    addr: String,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("addr", &self.addr)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Connection {
    fn new(handle: Handle<ClientHandler>, addr: String) -> Self {
        Self {
            handle: Some(handle),
            addr,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    pub(crate) fn handle(&self) -> Option<&Handle<ClientHandler>> {
        self.handle.as_ref()
    }

    /// Disconnect. Safe to call more than once.
    pub async fn close(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        if let Err(e) = handle
            .disconnect(russh::Disconnect::ByApplication, "", "")
            .await
        {
            tracing::debug!("Disconnect from {} reported: {}", self.addr, e);
        }
        tracing::info!("Disconnected from {}", self.addr);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.handle.is_some() {
            tracing::warn!("Connection to {} dropped without close", self.addr);
        }
    }
}

use std::sync::Arc;

use russh::client::Handler;
use russh::keys::PublicKey;

use crate::error::SshError;

use super::host_key_verification::{HostKeyDecision, HostKeyInfo, HostKeyPolicy};

/// SSH client handler implementation
pub struct ClientHandler {
    host: String,
    port: u16,
    policy: Arc<dyn HostKeyPolicy>,
}

impl ClientHandler {
    pub fn new(host: String, port: u16, policy: Arc<dyn HostKeyPolicy>) -> Self {
        Self { host, port, policy }
    }
}

impl Handler for ClientHandler {
    type Error = SshError;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        let info = HostKeyInfo::from_key(&self.host, self.port, server_public_key);

        tracing::debug!(
            "Checking {} host key for {}:{} with {} policy - {}",
            info.key_type,
            self.host,
            self.port,
            self.policy.describe(),
            info.fingerprint
        );

        match self.policy.verify(&info) {
            HostKeyDecision::Accept => Ok(true),
            HostKeyDecision::Reject(reason) => Err(SshError::HostKeyVerification(reason)),
        }
    }
}

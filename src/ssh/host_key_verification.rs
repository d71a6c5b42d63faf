//! Host key trust policies for SSH connections.
//!
//! The handler computes a [`HostKeyInfo`] for the server key and asks the
//! configured [`HostKeyPolicy`] whether to continue. The default policy
//! accepts any key; a pinned SHA-256 fingerprint can be configured instead.

use russh::keys::{HashAlg, PublicKey};

use crate::security_log;

/// Information about a host key presented by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostKeyInfo {
    pub host: String,
    pub port: u16,
    pub fingerprint: String,
    pub key_type: String,
}

impl HostKeyInfo {
    pub fn from_key(host: &str, port: u16, key: &PublicKey) -> Self {
        Self {
            host: host.to_string(),
            port,
            fingerprint: key.fingerprint(HashAlg::Sha256).to_string(),
            key_type: key.algorithm().as_str().to_string(),
        }
    }
}

/// Outcome of a trust check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostKeyDecision {
    /// Continue the handshake
    Accept,
    /// Abort the connection with the given reason
    Reject(String),
}

/// Decides whether a server's host key is trusted.
pub trait HostKeyPolicy: Send + Sync {
    fn verify(&self, info: &HostKeyInfo) -> HostKeyDecision;

    /// Short name used in logs.
    fn describe(&self) -> &'static str;
}

/// Accepts every host key without verification.
///
/// This matches the tool's historical behavior. Each acceptance is recorded
/// as a security event so unverified connections show up in audits.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAnyHostKey;

impl HostKeyPolicy for AcceptAnyHostKey {
    fn verify(&self, info: &HostKeyInfo) -> HostKeyDecision {
        security_log::log_host_key_unverified(&info.host, info.port, &info.fingerprint);
        HostKeyDecision::Accept
    }

    fn describe(&self) -> &'static str {
        "accept-any"
    }
}

/// Accepts only a host key whose SHA-256 fingerprint matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedFingerprint {
    expected: String,
}

impl PinnedFingerprint {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }
}

impl HostKeyPolicy for PinnedFingerprint {
    fn verify(&self, info: &HostKeyInfo) -> HostKeyDecision {
        if info.fingerprint == self.expected {
            security_log::log_host_key_pinned_match(&info.host, info.port, &info.fingerprint);
            HostKeyDecision::Accept
        } else {
            security_log::log_host_key_mismatch(
                &info.host,
                info.port,
                &self.expected,
                &info.fingerprint,
            );
            HostKeyDecision::Reject(format!(
                "{} key for {}:{} has fingerprint {}, expected {}",
                info.key_type, info.host, info.port, info.fingerprint, self.expected
            ))
        }
    }

    fn describe(&self) -> &'static str {
        "pinned-fingerprint"
    }
}

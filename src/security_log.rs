//! Security event logging for audit trails.
//!
//! Provides structured logging functions for security-relevant events such as
//! authentication attempts and host key decisions.
//!
//! All security events are logged with `target: "security"` to allow filtering
//! in production environments.
//!
//! # Example
//!
//! Filter security events only:
//! ```bash
//! RUST_LOG=security=info ssh-waiter --scriptfile job.json
//! ```

use tracing::{info, warn};

/// Log an SSH authentication attempt.
///
/// Called before attempting to authenticate with a remote host.
pub fn log_auth_attempt(host: &str, port: u16, username: &str, method: &str) {
    info!(
        target: "security",
        event = "auth_attempt",
        host = %host,
        port = port,
        username = %username,
        method = %method,
        "SSH authentication attempt"
    );
}

/// Log a successful SSH authentication.
pub fn log_auth_success(host: &str, port: u16, username: &str, method: &str) {
    info!(
        target: "security",
        event = "auth_success",
        host = %host,
        port = port,
        username = %username,
        method = %method,
        "SSH authentication succeeded"
    );
}

/// Log a failed SSH authentication attempt.
pub fn log_auth_failure(host: &str, port: u16, username: &str, method: &str, reason: &str) {
    warn!(
        target: "security",
        event = "auth_failure",
        host = %host,
        port = port,
        username = %username,
        method = %method,
        reason = %reason,
        "SSH authentication failed"
    );
}

/// Log a host key accepted without any verification.
pub fn log_host_key_unverified(host: &str, port: u16, fingerprint: &str) {
    warn!(
        target: "security",
        event = "host_key_unverified",
        host = %host,
        port = port,
        fingerprint = %fingerprint,
        "Host key accepted WITHOUT verification - configure hostKeyFingerprint to pin it"
    );
}

/// Log a host key that matched the pinned fingerprint.
pub fn log_host_key_pinned_match(host: &str, port: u16, fingerprint: &str) {
    info!(
        target: "security",
        event = "host_key_verified",
        host = %host,
        port = port,
        fingerprint = %fingerprint,
        "Host key matches pinned fingerprint"
    );
}

/// Log a host key that did not match the pinned fingerprint.
pub fn log_host_key_mismatch(host: &str, port: u16, expected: &str, actual: &str) {
    warn!(
        target: "security",
        event = "host_key_mismatch",
        host = %host,
        port = port,
        expected = %expected,
        actual = %actual,
        "HOST KEY MISMATCH - rejecting connection"
    );
}

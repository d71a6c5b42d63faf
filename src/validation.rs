//! Input validation for wait job configuration values.
//!
//! Provides validation functions for host addresses, usernames, remote paths
//! and timing values so that a loaded job is fully checked before any
//! connection attempt is made.

use std::net::IpAddr;

use regex::Regex;
use std::sync::LazyLock;

/// Port used when the configured host address has no `:port` suffix.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Validation error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

// Pre-compiled regex patterns for validation
static DNS_LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$").unwrap());

static FINGERPRINT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^SHA256:[A-Za-z0-9+/]{43}=?$").unwrap());

/// Split and validate a `host:port` address.
///
/// Accepts `host:port`, `[ipv6]:port`, a bare host (port 22) and a bare
/// IPv6 literal (port 22).
///
/// # Errors
///
/// Returns `ValidationError` if the host or the port part is invalid.
pub fn validate_host_address(address: &str) -> Result<(String, u16), ValidationError> {
    let address = address.trim();

    if address.is_empty() {
        return Err(ValidationError::new("hostname", "Host address is required"));
    }

    // Bracketed IPv6 literal, optionally followed by :port
    if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest.split_once(']').ok_or_else(|| {
            ValidationError::new("hostname", format!("Unterminated '[' in '{}'", address))
        })?;
        if host.parse::<IpAddr>().is_err() {
            return Err(ValidationError::new(
                "hostname",
                format!("'{}' is not a valid IP address", host),
            ));
        }
        let port = match tail.strip_prefix(':') {
            Some(port) => validate_port(port)?,
            None if tail.is_empty() => DEFAULT_SSH_PORT,
            None => {
                return Err(ValidationError::new(
                    "hostname",
                    format!("Unexpected text after ']' in '{}'", address),
                ));
            }
        };
        return Ok((host.to_string(), port));
    }

    // Unbracketed IPv6 literal cannot carry a port
    if address.matches(':').count() > 1 {
        return match address.parse::<IpAddr>() {
            Ok(_) => Ok((address.to_string(), DEFAULT_SSH_PORT)),
            Err(_) => Err(ValidationError::new(
                "hostname",
                format!("Invalid host address '{}': use [addr]:port for IPv6", address),
            )),
        };
    }

    let (host, port) = match address.rsplit_once(':') {
        Some((host, port)) => (host, validate_port(port)?),
        None => (address, DEFAULT_SSH_PORT),
    };

    validate_hostname(host)?;
    Ok((host.trim().to_string(), port))
}

/// Validate a hostname (DNS name or IP address).
///
/// Accepts:
/// - IPv4 addresses (e.g., "192.168.1.1")
/// - IPv6 addresses (e.g., "::1", "2001:db8::1")
/// - DNS hostnames (RFC 1123 compliant)
///
/// # Errors
///
/// Returns `ValidationError` if the hostname is empty, too long, or malformed.
pub fn validate_hostname(hostname: &str) -> Result<(), ValidationError> {
    let hostname = hostname.trim();

    if hostname.is_empty() {
        return Err(ValidationError::new("hostname", "Hostname is required"));
    }

    // Check total length (DNS max is 253 characters)
    if hostname.len() > 253 {
        return Err(ValidationError::new(
            "hostname",
            "Hostname exceeds maximum length of 253 characters",
        ));
    }

    if hostname.parse::<IpAddr>().is_ok() {
        return Ok(());
    }

    validate_dns_hostname(hostname)
}

/// Validate a DNS hostname according to RFC 1123.
fn validate_dns_hostname(hostname: &str) -> Result<(), ValidationError> {
    for label in hostname.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(ValidationError::new(
                "hostname",
                "Hostname labels must be 1-63 characters",
            ));
        }

        if !DNS_LABEL_REGEX.is_match(label) {
            return Err(ValidationError::new(
                "hostname",
                format!(
                    "Invalid hostname label '{}': must start and end with alphanumeric, may contain hyphens",
                    label
                ),
            ));
        }
    }

    Ok(())
}

/// Validate a port number string and parse it.
///
/// # Errors
///
/// Returns `ValidationError` if the port is not a valid number in range 1-65535.
pub fn validate_port(port_str: &str) -> Result<u16, ValidationError> {
    let port_str = port_str.trim();

    if port_str.is_empty() {
        return Err(ValidationError::new("port", "Port is required"));
    }

    match port_str.parse::<u16>() {
        Ok(port) if port >= 1 => Ok(port),
        Ok(_) => Err(ValidationError::new("port", "Port must be between 1 and 65535")),
        Err(_) => Err(ValidationError::new(
            "port",
            format!("Invalid port number: '{}'", port_str),
        )),
    }
}

/// Validate the remote login name.
///
/// The name goes to the server as-is, so `svc@corp.example.com`,
/// `DOMAIN\user` and long directory names are all accepted. It is required
/// and may not contain whitespace or control characters.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::new("userid", "User id is required"));
    }

    if username
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(ValidationError::new(
            "userid",
            "User id must not contain whitespace or control characters",
        ));
    }

    Ok(())
}

/// Validate the remote waiter file path.
///
/// Any byte sequence a shell can carry inside single quotes is allowed;
/// NUL and line breaks are rejected.
pub fn validate_remote_path(path: &str) -> Result<(), ValidationError> {
    if path.trim().is_empty() {
        return Err(ValidationError::new("waiterFilename", "Waiter filename is required"));
    }

    if path.contains(['\0', '\n', '\r']) {
        return Err(ValidationError::new(
            "waiterFilename",
            "Waiter filename must not contain NUL or line breaks",
        ));
    }

    Ok(())
}

/// Validate that a required text field is present.
pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, format!("{} is required", field)));
    }
    Ok(())
}

/// Validate a strictly positive count or number of seconds.
pub fn validate_positive(field: &str, value: i64) -> Result<u32, ValidationError> {
    if value < 1 {
        return Err(ValidationError::new(
            field,
            format!("{} must be at least 1 (got {})", field, value),
        ));
    }

    u32::try_from(value).map_err(|_| {
        ValidationError::new(field, format!("{} is too large (got {})", field, value))
    })
}

/// Validate an OpenSSH style SHA-256 host key fingerprint (`SHA256:<base64>`).
pub fn validate_fingerprint(fingerprint: &str) -> Result<(), ValidationError> {
    if !FINGERPRINT_REGEX.is_match(fingerprint.trim()) {
        return Err(ValidationError::new(
            "hostKeyFingerprint",
            "Fingerprint must look like 'SHA256:' followed by 43 base64 characters",
        ));
    }
    Ok(())
}

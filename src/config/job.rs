//! Wait job configuration: the file format and its validated form.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ssh::client::ConnectionParameters;
use crate::ssh::host_key_verification::{AcceptAnyHostKey, HostKeyPolicy, PinnedFingerprint};
use crate::validation;
use crate::wait::PollParameters;

use super::paths;

/// Default bound for TCP connect, SSH handshake and authentication
pub const DEFAULT_CONNECT_TIMEOUT_SECS: i64 = 30;

const UTF8_BOM: &str = "\u{feff}";

fn default_connect_timeout() -> i64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

/// On-disk job description.
///
/// Field names follow the JSON files the tool has always consumed. Missing
/// fields deserialize to empty values so that validation can name them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobFile {
    #[serde(rename = "scriptName", default)]
    pub name: String,
    #[serde(rename = "hostname", default)]
    pub host: String,
    #[serde(rename = "userid", default)]
    pub user: String,
    #[serde(rename = "privatekeyfile", default)]
    pub private_key_file: String,
    #[serde(rename = "waiterFilename", default)]
    pub waiter_filename: String,
    #[serde(rename = "waitTimeSecs", default)]
    pub wait_time_secs: i64,
    #[serde(rename = "waitCycles", default)]
    pub wait_cycles: i64,
    #[serde(
        rename = "hostKeyFingerprint",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub host_key_fingerprint: Option<String>,
    #[serde(rename = "connectTimeoutSecs", default = "default_connect_timeout")]
    pub connect_timeout_secs: i64,
}

/// A fully validated wait job. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitJob {
    pub name: String,
    pub connection: ConnectionParameters,
    pub poll: PollParameters,
    pub host_key_fingerprint: Option<String>,
}

impl WaitJob {
    /// Load and validate a job file.
    ///
    /// `.toml` files are parsed as TOML, everything else as JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!("Loading wait job from: {:?}", path);

        let raw = std::fs::read(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let content = String::from_utf8_lossy(&raw);

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml_str(&content, path)
        } else {
            Self::from_json_str(&content, path)
        }
    }

    /// Parse a JSON job, ignoring a leading byte-order mark.
    pub fn from_json_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let file: JobFile = serde_json::from_str(strip_bom(content)).map_err(|e| {
            ConfigError::ParseJson {
                path: origin.to_path_buf(),
                source: e,
            }
        })?;
        Self::try_from(file)
    }

    /// Parse a TOML job, ignoring a leading byte-order mark.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let file: JobFile =
            toml::from_str(strip_bom(content)).map_err(|e| ConfigError::ParseToml {
                path: origin.to_path_buf(),
                source: e,
            })?;
        Self::try_from(file)
    }

    /// Host trust policy selected by this job.
    pub fn host_key_policy(&self) -> Arc<dyn HostKeyPolicy> {
        match &self.host_key_fingerprint {
            Some(fingerprint) => Arc::new(PinnedFingerprint::new(fingerprint.clone())),
            None => Arc::new(AcceptAnyHostKey),
        }
    }
}

impl TryFrom<JobFile> for WaitJob {
    type Error = ConfigError;

    fn try_from(file: JobFile) -> Result<Self, Self::Error> {
        validation::validate_required("scriptName", &file.name)?;
        let (host, port) = validation::validate_host_address(&file.host)?;
        validation::validate_username(&file.user)?;
        validation::validate_required("privatekeyfile", &file.private_key_file)?;
        validation::validate_remote_path(&file.waiter_filename)?;
        let delay_secs = validation::validate_positive("waitTimeSecs", file.wait_time_secs)?;
        let max_attempts = validation::validate_positive("waitCycles", file.wait_cycles)?;
        let connect_timeout_secs =
            validation::validate_positive("connectTimeoutSecs", file.connect_timeout_secs)?;

        let host_key_fingerprint = match file.host_key_fingerprint {
            Some(fp) if !fp.trim().is_empty() => {
                validation::validate_fingerprint(&fp)?;
                Some(fp.trim().to_string())
            }
            _ => None,
        };

        let private_key_path: PathBuf = paths::expand_tilde(file.private_key_file.trim());

        let connection =
            ConnectionParameters::new(host, port, file.user.trim().to_string(), private_key_path)
                .with_connect_timeout(Duration::from_secs(u64::from(connect_timeout_secs)));

        let poll = PollParameters::new(
            file.waiter_filename,
            Duration::from_secs(u64::from(delay_secs)),
            max_attempts,
        );

        Ok(Self {
            name: file.name.trim().to_string(),
            connection,
            poll,
            host_key_fingerprint,
        })
    }
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix(UTF8_BOM).unwrap_or(content)
}

//! Common test utilities

#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with an isolated directory for job files
pub struct TestEnvironment {
    pub config_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let config_dir = TempDir::new().expect("Failed to create temp dir");
        Self { config_dir }
    }

    /// Write a job file into the environment and return its path
    pub fn write_job(&self, file_name: &str, contents: &str) -> PathBuf {
        let path = self.config_dir.path().join(file_name);
        std::fs::write(&path, contents).expect("Failed to write job file");
        path
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

/// Path of a key under `tests/fixtures/keys`
pub fn fixture_key(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/keys")
        .join(name)
}

/// A job in the original JSON layout
pub fn job_json(hostname: &str, key: &str, waiter: &str, wait_secs: i64, cycles: i64) -> String {
    serde_json::json!({
        "scriptName": "integration",
        "hostname": hostname,
        "userid": "tester",
        "privatekeyfile": key,
        "waiterFilename": waiter,
        "waitTimeSecs": wait_secs,
        "waitCycles": cycles,
        "connectTimeoutSecs": 2
    })
    .to_string()
}

/// A local port with nothing listening on it
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}

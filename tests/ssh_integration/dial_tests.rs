//! Dial failures: every way the network side can fail before polling starts

use std::time::{Duration, Instant};

use ssh_waiter::error::SshError;
use ssh_waiter::ssh::{SshClient, SshConnector};
use ssh_waiter::wait::{PollParameters, TokioClock, run_wait};

use super::fixtures::{Misbehavior, accept_any, closed_port, local_params, spawn_endpoint};

fn expect_dial_failure(result: Result<ssh_waiter::ssh::Connection, SshError>) -> String {
    match result {
        Err(SshError::DialFailure { addr, reason }) => {
            assert!(addr.starts_with("127.0.0.1:"), "unexpected addr {}", addr);
            reason
        }
        Err(other) => panic!("expected DialFailure, got {:?}", other),
        Ok(conn) => panic!("expected DialFailure, connected to {:?}", conn),
    }
}

#[tokio::test]
async fn test_refused_port_is_dial_failure() {
    let client = SshClient::new(accept_any());
    let params = local_params(closed_port().await);

    expect_dial_failure(client.connect(&params).await);
}

#[tokio::test]
async fn test_immediate_hangup_is_dial_failure() {
    let client = SshClient::new(accept_any());
    let params = local_params(spawn_endpoint(Misbehavior::Hangup).await);

    expect_dial_failure(client.connect(&params).await);
}

#[tokio::test]
async fn test_non_ssh_server_is_dial_failure() {
    let client = SshClient::new(accept_any());
    let params = local_params(spawn_endpoint(Misbehavior::WrongProtocol).await);

    expect_dial_failure(client.connect(&params).await);
}

#[tokio::test]
async fn test_silent_server_hits_connect_timeout() {
    let client = SshClient::new(accept_any());
    let params = local_params(spawn_endpoint(Misbehavior::Silent).await)
        .with_connect_timeout(Duration::from_secs(1));
    let start = Instant::now();

    let reason = expect_dial_failure(client.connect(&params).await);

    assert!(reason.contains("timed out"), "reason was {}", reason);
    assert!(start.elapsed() >= Duration::from_secs(1));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_dial_failure_skips_polling() {
    let connector = SshConnector::new(
        SshClient::new(accept_any()),
        local_params(closed_port().await),
    );
    let poll = PollParameters::new("/tmp/ready", Duration::from_secs(60), 100);
    let start = Instant::now();

    let err = run_wait(&connector, &poll, &TokioClock, &mut ())
        .await
        .unwrap_err();

    assert!(matches!(err, SshError::DialFailure { .. }));
    // No delay cycle was entered
    assert!(start.elapsed() < Duration::from_secs(30));
}

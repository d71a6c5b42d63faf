//! End-to-end runs against a real SSH server

use std::sync::Arc;
use std::time::Duration;

use ssh_waiter::error::{CommandFailureCause, SshError};
use ssh_waiter::ssh::command::quote_remote_path;
use ssh_waiter::ssh::host_key_verification::PinnedFingerprint;
use ssh_waiter::ssh::{CommandRunner, MarkerCommands, SshClient, SshConnector};
use ssh_waiter::wait::{PollOutcome, PollParameters, TokioClock, TracingObserver, run_wait};

use super::fixtures::accept_any;

#[tokio::test]
async fn test_existing_marker_is_found_and_removed() {
    let server = skip_if_no_server!();
    let marker = server.marker_path();
    let commands = MarkerCommands::for_path(&marker);
    let client = SshClient::new(accept_any());

    let mut setup = client.connect(&server.params()).await.expect("connect");
    setup
        .run(&format!("touch {}", quote_remote_path(&marker)))
        .await
        .expect("create marker");

    let connector = SshConnector::new(SshClient::new(accept_any()), server.params());
    let poll = PollParameters::new(marker.clone(), Duration::from_secs(1), 3);
    let mut observer = TracingObserver::new();

    let outcome = run_wait(&connector, &poll, &TokioClock, &mut observer)
        .await
        .expect("run");
    assert_eq!(outcome, PollOutcome::Found { attempts: 1 });

    // The marker is gone afterwards
    match setup.run(&commands.check).await {
        Err(SshError::CommandFailure {
            cause: CommandFailureCause::ExitStatus(1),
            ..
        }) => {}
        other => panic!("marker should be removed, got {:?}", other),
    }
    setup.close().await;
}

#[tokio::test]
async fn test_absent_marker_times_out() {
    let server = skip_if_no_server!();
    let connector = SshConnector::new(SshClient::new(accept_any()), server.params());
    let poll = PollParameters::new(server.marker_path(), Duration::from_secs(1), 3);
    let mut observer = TracingObserver::new();
    let start = std::time::Instant::now();

    let outcome = run_wait(&connector, &poll, &TokioClock, &mut observer)
        .await
        .expect("run");

    assert_eq!(outcome, PollOutcome::NotFound { attempts: 3 });
    assert_eq!(observer.absent(), 3);
    assert_eq!(observer.transport_errors(), 0);
    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[tokio::test]
async fn test_wrong_pinned_fingerprint_is_dial_failure() {
    let server = skip_if_no_server!();
    let policy = Arc::new(PinnedFingerprint::new(
        "SHA256:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".to_string(),
    ));

    let err = SshClient::new(policy)
        .connect(&server.params())
        .await
        .unwrap_err();

    match err {
        SshError::DialFailure { reason, .. } => assert!(reason.contains("host key")),
        other => panic!("expected DialFailure, got {:?}", other),
    }
}

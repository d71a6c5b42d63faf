//! One complete wait run: connect, poll, close.

use tracing::Instrument;

use crate::config::WaitJob;
use crate::error::{SshError, WaitError};
use crate::ssh::{Connector, RemoteSession, SshClient, SshConnector};

use super::clock::{Clock, TokioClock};
use super::engine::{PollOutcome, PollParameters, WaitEngine};
use super::observer::{AttemptObserver, TracingObserver};

/// Acquire one session, poll over it, and release it.
///
/// A connect error is returned before any check is issued. Once connected,
/// the session is closed exactly once whatever the polling outcome.
pub async fn run_wait<K, C, O>(
    connector: &K,
    poll: &PollParameters,
    clock: &C,
    observer: &mut O,
) -> Result<PollOutcome, SshError>
where
    K: Connector,
    C: Clock,
    O: AttemptObserver,
{
    let mut session = connector.connect().await?;

    let outcome = WaitEngine::new(&session, clock, poll).run(observer).await;

    session.close().await;
    Ok(outcome)
}

/// Run a loaded job against the real SSH stack.
pub async fn run_job(job: &WaitJob) -> Result<PollOutcome, WaitError> {
    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("wait", job = %job.name, run_id = %run_id);

    async {
        tracing::info!(
            "Waiting for {} on {} ({} checks, {}s apart)",
            job.poll.target,
            job.connection.addr(),
            job.poll.max_attempts,
            job.poll.delay.as_secs()
        );

        let client = SshClient::new(job.host_key_policy());
        let connector = SshConnector::new(client, job.connection.clone());
        let mut observer = TracingObserver::new();

        let outcome = run_wait(&connector, &job.poll, &TokioClock, &mut observer).await?;
        tracing::info!("Wait finished: {}", outcome);
        Ok::<_, WaitError>(outcome)
    }
    .instrument(span)
    .await
}

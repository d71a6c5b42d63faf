use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ssh_waiter::config::{WaitJob, paths};
use ssh_waiter::WaitError;

/// Wait for a marker file on a remote host over SSH, then remove it.
#[derive(Parser, Debug)]
#[command(name = "ssh-waiter", version, about)]
struct Cli {
    /// Job configuration file (JSON, or TOML with a .toml extension)
    #[arg(long, default_value = "configTest01.json")]
    scriptfile: PathBuf,

    /// Also write a daily rolling log file into this directory
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Validate the configuration and print it, don't connect
    #[arg(long)]
    check_config: bool,
}

/// Process exit status for each way a run can end
const EXIT_FOUND: u8 = 0;
const EXIT_TIMED_OUT: u8 = 1;
const EXIT_FATAL: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_dir = paths::log_dir(cli.log_dir.as_deref()).and_then(|dir| {
        paths::ensure_log_dir(&dir)
            .map_err(|e| eprintln!("Cannot use log directory {}: {}", dir.display(), e))
            .ok()
    });
    let _guard = ssh_waiter::logging::init_logging(log_dir.clone());

    tracing::info!("Starting ssh-waiter v{}", env!("CARGO_PKG_VERSION"));
    if let Some(dir) = &log_dir {
        tracing::info!("Logging to {}", dir.display());
    }
    tracing::debug!(?cli, "parsed CLI arguments");

    let job = match WaitJob::load(&cli.scriptfile) {
        Ok(job) => job,
        Err(e) => return fatal(&WaitError::from(e)),
    };

    if cli.check_config {
        println!("Configuration {} is valid:", cli.scriptfile.display());
        println!("  job:          {}", job.name);
        println!("  host:         {}", job.connection.addr());
        println!("  user:         {}", job.connection.username);
        println!("  key:          {}", job.connection.private_key_path.display());
        println!("  waiter file:  {}", job.poll.target);
        println!(
            "  polling:      {} checks, {}s apart",
            job.poll.max_attempts,
            job.poll.delay.as_secs()
        );
        println!("  host key:     {}", job.host_key_policy().describe());
        return ExitCode::from(EXIT_FOUND);
    }

    match ssh_waiter::run_job(&job).await {
        Ok(outcome) if outcome.is_found() => {
            tracing::info!("Waiter file found after {} checks", outcome.attempts());
            ExitCode::from(EXIT_FOUND)
        }
        Ok(outcome) => {
            tracing::warn!("Waiter file not found after {} checks", outcome.attempts());
            ExitCode::from(EXIT_TIMED_OUT)
        }
        Err(e) => fatal(&e),
    }
}

fn fatal(error: &WaitError) -> ExitCode {
    tracing::error!("{}", error);
    ExitCode::from(EXIT_FATAL)
}

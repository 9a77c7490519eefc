use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use hibp_range_check::{BatchRunner, CompromiseEvaluator, NoopReporter, PwnedApiClient, Sha1Hasher};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod output;
mod progress_bar;

use cli::{CheckArgs, Cli, Command};
use progress_bar::BarReporter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Check(args) => check(args).await,
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

async fn check(args: CheckArgs) -> ExitCode {
    if let Some(path) = &args.local_db {
        warn!(path = %path.display(), "--local-db is not supported yet, using the range API");
    }
    if args.strength {
        warn!("--strength is not supported yet");
    }

    let client = match PwnedApiClient::new(&args.client_config()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to set up range API client");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let runner = BatchRunner::new(
        CompromiseEvaluator::new(Sha1Hasher::new(), client),
        args.batch_options(),
    );

    info!(
        passwords = args.passwords.len(),
        concurrency = runner.limiter().capacity(),
        api = %args.api_url,
        "checking passwords"
    );

    let result = if args.no_progress {
        runner.check_passwords(&args.passwords, &NoopReporter).await
    } else {
        runner.check_passwords(&args.passwords, &BarReporter::new()).await
    };

    info!(
        checked = result.len() - result.failed_count(),
        compromised = result.compromised_count(),
        failed = result.failed_count(),
        "batch complete"
    );

    let written = output::write_report(&mut io::stdout().lock(), &mut io::stderr().lock(), &result);
    if let Err(e) = written {
        error!(error = %e, "failed to write results");
        return ExitCode::FAILURE;
    }

    if result.is_complete() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

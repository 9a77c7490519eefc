use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use hibp_range_check::{
    BatchOptions, ClientConfig, DEFAULT_API_URL, DEFAULT_CONCURRENCY, DEFAULT_GROUP_SIZE,
    RetryPolicy,
};

#[derive(Parser, Debug)]
#[command(name = "hibp-check", version)]
#[command(about = "Check passwords against Have I Been Pwned without sending them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check one or more passwords against the breach corpus
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Passwords to check
    #[arg(required = true, value_name = "PASSWORD")]
    pub passwords: Vec<String>,

    /// Base URL of the range API
    #[arg(long, env = "HIBP_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Maximum number of range queries in flight
    #[arg(short = 'j', long, default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_positive)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Retries for transient failures (timeouts, 429, 5xx)
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Ask the service to pad responses
    #[arg(long)]
    pub padding: bool,

    /// Stop checking remaining passwords after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Disable progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Check against a local dataset directory (not supported yet)
    #[arg(long, value_name = "DIR")]
    pub local_db: Option<PathBuf>,

    /// Also rate password strength (not supported yet)
    #[arg(long)]
    pub strength: bool,
}

impl CheckArgs {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            add_padding: self.padding,
            retry: RetryPolicy::with_retries(self.retries),
            pool_max_idle_per_host: self.concurrency,
            ..Default::default()
        }
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            concurrency: self.concurrency,
            group_size: DEFAULT_GROUP_SIZE,
            fail_fast: self.fail_fast,
        }
    }
}

fn parse_positive(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

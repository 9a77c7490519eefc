//! Checks passwords against the Have I Been Pwned breach corpus without
//! disclosing them.
//!
//! Each password is hashed locally with SHA-1. Only the first 5 hex characters
//! of the hash are sent to the [range API], which answers with every known
//! suffix for that prefix. The remaining 35 characters are matched locally, so
//! neither the password nor its full hash ever leaves the process.
//!
//! [range API]: https://haveibeenpwned.com/API/v3#SearchingPwnedPasswordsByRange
//!
//! # Components
//!
//! - [`Sha1Hasher`] produces a [`PasswordHash`] and splits it into a
//!   [`HashPrefix`] and a suffix.
//! - [`PwnedApiClient`] implements [`RangeSource`] over HTTP.
//! - [`CompromiseEvaluator`] classifies a single password.
//! - [`BatchRunner`] checks many passwords with at most
//!   [`BatchOptions::concurrency`] queries in flight, returning results in
//!   input order.
//!
//! # Failures
//!
//! A range query that fails is never reported as `Safe`. Single checks return
//! an [`Error`]; batch checks record a [`CheckFailure`] for the affected
//! password and keep every other result.
//!
//! # Example
//!
//! ```no_run
//! use hibp_range_check::{
//!     BatchOptions, BatchRunner, ClientConfig, CompromiseEvaluator, NoopReporter, PwnedApiClient,
//!     Sha1Hasher,
//! };
//!
//! # async fn run() -> Result<(), hibp_range_check::Error> {
//! let client = PwnedApiClient::new(&ClientConfig::default())?;
//! let runner = BatchRunner::new(
//!     CompromiseEvaluator::new(Sha1Hasher::new(), client),
//!     BatchOptions::default(),
//! );
//!
//! let result = runner.check_passwords(&["password123", "5ecureP@ssw0rd"], &NoopReporter).await;
//! for outcome in &result {
//!     match outcome {
//!         Ok(check) => println!("{:?}: {}", check.status(), check.count()),
//!         Err(failure) => eprintln!("check failed: {}", failure.error),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod error;
pub mod evaluator;
pub mod hasher;
pub mod limiter;
pub mod progress;
pub mod range;

pub use batch::{
    BatchOptions, BatchResult, BatchRunner, CheckFailure, CheckOutcome, DEFAULT_CONCURRENCY,
    DEFAULT_GROUP_SIZE,
};
pub use error::Error;
pub use evaluator::{CheckResult, CompromiseEvaluator, Password, Status, match_count};
pub use hasher::{HashPrefix, PREFIX_LEN, PasswordHash, SUFFIX_LEN, Sha1Hasher};
pub use limiter::{Limiter, LimiterPermit};
pub use progress::{CompletionEvent, NoopReporter, ProgressReporter, UnitOutcome};
pub use range::{
    BreachRecord, ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT, PwnedApiClient, RangeSource,
    RetryPolicy, parse_range_body, parse_range_bytes,
};

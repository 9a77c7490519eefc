//! Bounded-concurrency checking of many passwords.
//!
//! Every password is an independent unit submitted to a shared [`Limiter`].
//! Units complete in any order; results are put back into input order before
//! they are returned. Grouping only shapes progress events and has no effect
//! on scheduling.

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::Error;
use crate::evaluator::{CheckResult, CompromiseEvaluator, Password};
use crate::limiter::Limiter;
use crate::progress::{CompletionEvent, ProgressReporter, UnitOutcome};
use crate::range::RangeSource;

/// Maximum number of range queries in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Number of passwords per progress group.
pub const DEFAULT_GROUP_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub concurrency: usize,
    pub group_size: usize,
    /// Cancel outstanding checks after the first failure.
    pub fail_fast: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            group_size: DEFAULT_GROUP_SIZE,
            fail_fast: false,
        }
    }
}

/// A password whose check could not be completed.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct CheckFailure {
    pub password: Password,
    pub error: Error,
}

pub type CheckOutcome = Result<CheckResult, CheckFailure>;

/// One outcome per input password, in input order.
#[derive(Debug, Default)]
pub struct BatchResult {
    outcomes: Vec<CheckOutcome>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<CheckOutcome> {
        self.outcomes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CheckOutcome> {
        self.outcomes.iter()
    }

    pub fn successes(&self) -> impl Iterator<Item = &CheckResult> {
        self.outcomes.iter().filter_map(|outcome| outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckFailure> {
        self.outcomes.iter().filter_map(|outcome| outcome.as_ref().err())
    }

    pub fn compromised_count(&self) -> usize {
        self.successes().filter(|result| result.is_compromised()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// True when every password was checked.
    pub fn is_complete(&self) -> bool {
        self.failed_count() == 0
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a CheckOutcome;
    type IntoIter = std::slice::Iter<'a, CheckOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

/// Runs a [`CompromiseEvaluator`] across many passwords under a [`Limiter`].
#[derive(Debug)]
pub struct BatchRunner<S> {
    evaluator: CompromiseEvaluator<S>,
    limiter: Limiter,
    group_size: usize,
    fail_fast: bool,
}

impl<S: RangeSource> BatchRunner<S> {
    pub fn new(evaluator: CompromiseEvaluator<S>, options: BatchOptions) -> Self {
        Self {
            evaluator,
            limiter: Limiter::new(options.concurrency),
            group_size: options.group_size.max(1),
            fail_fast: options.fail_fast,
        }
    }

    pub fn evaluator(&self) -> &CompromiseEvaluator<S> {
        &self.evaluator
    }

    pub fn limiter(&self) -> &Limiter {
        &self.limiter
    }

    /// Checks every password, returning outcomes in input order.
    ///
    /// A failed check is recorded as a [`CheckFailure`] for that password and
    /// does not discard the other results.
    pub async fn check_passwords<P, R>(&self, passwords: &[P], reporter: &R) -> BatchResult
    where
        P: AsRef<str>,
        R: ProgressReporter + ?Sized,
    {
        let total = passwords.len();
        let group_size = self.group_size;
        reporter.on_batch_start(total);

        let mut group_remaining: Vec<usize> = (0..total.div_ceil(group_size))
            .map(|group| group_size.min(total - group * group_size))
            .collect();

        let cancel = CancellationToken::new();
        let mut pending: FuturesUnordered<_> = passwords
            .iter()
            .enumerate()
            .map(|(index, password)| self.run_unit(index, password.as_ref(), &cancel))
            .collect();

        let mut outcomes = Vec::with_capacity(total);
        let mut completed = 0;
        while let Some((index, outcome)) = pending.next().await {
            completed += 1;

            let unit = match &outcome {
                Ok(result) if result.is_compromised() => {
                    UnitOutcome::Compromised { count: result.count() }
                }
                Ok(_) => UnitOutcome::Safe,
                Err(failure) => {
                    self.record_failure(index, &failure.error, &cancel);
                    UnitOutcome::Failed
                }
            };

            let group = index / group_size;
            let event = CompletionEvent { index, group, completed, total, outcome: unit };
            reporter.on_complete(&event);
            group_remaining[group] -= 1;
            if group_remaining[group] == 0 {
                reporter.on_group_complete(group);
            }

            outcomes.push((index, outcome));
        }
        drop(pending);

        outcomes.sort_unstable_by_key(|(index, _)| *index);
        reporter.on_batch_finish();

        BatchResult { outcomes: outcomes.into_iter().map(|(_, outcome)| outcome).collect() }
    }

    async fn run_unit(
        &self,
        index: usize,
        password: &str,
        cancel: &CancellationToken,
    ) -> (usize, CheckOutcome) {
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            result = self.limiter.run(self.evaluator.check_password(password)) => result,
        };

        (index, result.map_err(|error| CheckFailure { password: password.into(), error }))
    }

    fn record_failure(&self, index: usize, error: &Error, cancel: &CancellationToken) {
        if matches!(error, Error::Cancelled) {
            debug!(index, "check cancelled");
            return;
        }
        warn!(index, prefix = ?error.prefix(), %error, "password check failed");
        if self.fail_fast && !cancel.is_cancelled() {
            warn!("cancelling remaining checks");
            cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = BatchOptions::default();
        assert_eq!(options.concurrency, 5);
        assert_eq!(options.group_size, 5);
        assert!(!options.fail_fast);
    }

    #[test]
    fn test_empty_batch_result() {
        let result = BatchResult::default();
        assert!(result.is_empty());
        assert!(result.is_complete());
        assert_eq!(result.compromised_count(), 0);
    }
}

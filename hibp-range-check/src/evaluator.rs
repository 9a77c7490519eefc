use std::fmt;

use tracing::{debug, instrument};

use crate::error::Error;
use crate::hasher::{PasswordHash, Sha1Hasher};
use crate::range::{BreachRecord, RangeSource};

/// A plaintext password. `Debug` output is redacted so it never reaches logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for Password {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Password {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Compromised,
    Safe,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Compromised => f.write_str("Compromised"),
            Status::Safe => f.write_str("Safe"),
        }
    }
}

/// Outcome of checking one password. The status is derived from the count,
/// so `Compromised` holds exactly when `count > 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    password: Password,
    count: u64,
}

impl CheckResult {
    pub fn new(password: impl Into<Password>, count: u64) -> Self {
        Self { password: password.into(), count }
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn status(&self) -> Status {
        if self.count > 0 { Status::Compromised } else { Status::Safe }
    }

    pub fn is_compromised(&self) -> bool {
        self.status() == Status::Compromised
    }
}

/// Sums the counts of records whose suffix equals `suffix` exactly.
pub fn match_count(records: &[BreachRecord], suffix: &str) -> u64 {
    records
        .iter()
        .filter(|record| record.suffix == suffix)
        .fold(0u64, |total, record| total.saturating_add(record.count))
}

/// Classifies passwords by hashing locally and querying a [`RangeSource`].
#[derive(Debug)]
pub struct CompromiseEvaluator<S> {
    hasher: Sha1Hasher,
    source: S,
}

impl<S: RangeSource> CompromiseEvaluator<S> {
    pub fn new(hasher: Sha1Hasher, source: S) -> Self {
        Self { hasher, source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Checks one password. A failed range query is returned as an error,
    /// never as a `Safe` result.
    pub async fn check_password(&self, password: &str) -> Result<CheckResult, Error> {
        let hash = self.hasher.hash(password);
        let count = self.check_hash(&hash).await?;
        Ok(CheckResult::new(password, count))
    }

    /// Returns the total breach count for an already computed hash.
    #[instrument(level = "debug", skip_all, fields(prefix = %hash.prefix()))]
    pub async fn check_hash(&self, hash: &PasswordHash) -> Result<u64, Error> {
        let records = self.source.fetch_range(&hash.prefix()).await?;
        let count = match_count(&records, hash.suffix());
        debug!(records = records.len(), compromised = count > 0, "evaluated range");
        Ok(count)
    }
}

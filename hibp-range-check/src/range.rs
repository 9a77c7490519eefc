//! Range queries against the Pwned Passwords k-anonymity API.
//!
//! Only the 5 character hash prefix leaves the process. The service answers
//! with every known suffix sharing that prefix, one `SUFFIX:COUNT` record per
//! line, and the caller does the matching locally.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Error;
use crate::hasher::{HashPrefix, SUFFIX_LEN};

/// Public range API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.pwnedpasswords.com";

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Base delay for exponential backoff (doubles each retry)
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

pub const DEFAULT_USER_AGENT: &str = concat!("hibp-range-check/", env!("CARGO_PKG_VERSION"));

/// One `SUFFIX:COUNT` line of a range response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreachRecord {
    pub suffix: String,
    pub count: u64,
}

/// Parses a range response body into records.
///
/// Accepts `\r\n` or `\n` separators and skips blank lines. A missing or
/// malformed count yields a record with count 0, but any other line that is
/// not a 35 character hex suffix fails the whole response: a page that is not
/// a range listing must never read as "no matches".
pub fn parse_range_body(prefix: &HashPrefix, body: &str) -> Result<Vec<BreachRecord>, Error> {
    let mut records = Vec::new();
    for (number, line) in body.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_range_line(line).ok_or_else(|| Error::InvalidResponse {
            prefix: *prefix,
            reason: format!("line {} is not a SUFFIX:COUNT record", number + 1),
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Parses a raw response body, rejecting anything that is not UTF-8.
pub fn parse_range_bytes(prefix: &HashPrefix, body: &[u8]) -> Result<Vec<BreachRecord>, Error> {
    let body = std::str::from_utf8(body).map_err(|e| Error::InvalidResponse {
        prefix: *prefix,
        reason: format!("body is not valid UTF-8 ({e})"),
    })?;
    parse_range_body(prefix, body)
}

/// Parses a single `SUFFIX:COUNT` line. Returns `None` unless the suffix is
/// exactly [`SUFFIX_LEN`] hex characters.
pub fn parse_range_line(line: &str) -> Option<BreachRecord> {
    let line = line.trim();
    let (suffix, count) = match line.split_once(':') {
        Some((suffix, count)) => (suffix.trim(), count.trim().parse::<u64>().ok()),
        None => (line, None),
    };

    if suffix.len() != SUFFIX_LEN || !suffix.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    if count.is_none() {
        debug!("range record without a valid count, treating as 0");
    }

    Some(BreachRecord { suffix: suffix.to_ascii_uppercase(), count: count.unwrap_or(0) })
}

/// Anything that can answer a range query for a hash prefix.
pub trait RangeSource: Send + Sync {
    fn fetch_range(
        &self,
        prefix: &HashPrefix,
    ) -> impl Future<Output = Result<Vec<BreachRecord>, Error>> + Send;
}

/// Retry behaviour for transient failures. The default makes exactly one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const fn none() -> Self {
        Self { max_retries: 0, base_delay: RETRY_BASE_DELAY }
    }

    pub const fn with_retries(max_retries: u32) -> Self {
        Self { max_retries, base_delay: RETRY_BASE_DELAY }
    }

    /// Backoff before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(10);
        self.base_delay.checked_mul(factor).unwrap_or(Duration::MAX)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Ask the service to pad responses with zero-count records.
    pub add_padding: bool,
    pub retry: RetryPolicy,
    pub pool_max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            add_padding: false,
            retry: RetryPolicy::none(),
            pool_max_idle_per_host: crate::batch::DEFAULT_CONCURRENCY,
        }
    }
}

/// HTTP client for the range API.
#[derive(Debug, Clone)]
pub struct PwnedApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    add_padding: bool,
    retry: RetryPolicy,
}

impl PwnedApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(Error::ClientBuild)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            add_padding: config.add_padding,
            retry: config.retry,
        })
    }

    pub fn range_url(&self, prefix: &HashPrefix) -> String {
        format!("{}/range/{}", self.base_url, prefix)
    }

    async fn fetch_once(&self, url: &str, prefix: HashPrefix) -> Result<Vec<BreachRecord>, Error> {
        let mut request = self.client.get(url);
        if self.add_padding {
            request = request.header("Add-Padding", "true");
        }

        let response = request
            .send()
            .await
            .map_err(|source| Error::from_request(prefix, source, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus { prefix, status: status.as_u16() });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| Error::from_request(prefix, source, self.timeout))?;

        parse_range_bytes(&prefix, &body)
    }
}

impl RangeSource for PwnedApiClient {
    async fn fetch_range(&self, prefix: &HashPrefix) -> Result<Vec<BreachRecord>, Error> {
        let prefix = *prefix;
        let url = self.range_url(&prefix);

        let max_retries = self.retry.max_retries;
        let mut attempt = 0;
        loop {
            match self.fetch_once(&url, prefix).await {
                Ok(records) => {
                    debug!(%prefix, records = records.len(), "range query complete");
                    return Ok(records);
                }
                Err(e) if e.is_transient() && attempt < max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay_for(attempt);
                    warn!(%prefix, attempt, ?delay, error = %e, "range query failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_transient() && max_retries > 0 => {
                    return Err(Error::RetriesExhausted {
                        prefix,
                        retries: max_retries,
                        source: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}

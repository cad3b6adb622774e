//! Outbound HTTP client shared by the vendor adapters
//!
//! A single `HttpClient` owns one `reqwest::Client`, an optional
//! `Authenticator` and an optional token bucket. Paths are joined onto the
//! vendor base URL unless they are already absolute (Workable hands back a
//! full `paging.next` URL).
//!
//! Only idempotent methods are repeated. A POST that creates a candidate is
//! sent once, whatever the outcome.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Reported to callers when a final 429 carries no usable `Retry-After`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Growth of the delay between repeated attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BackoffType {
    Constant,
    Linear,
    #[default]
    Exponential,
}

/// Retry budget and delays for idempotent requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: u32,
    pub backoff: BackoffType,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Ceiling for any wait, including a vendor `Retry-After`
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: BackoffType::Exponential,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Default delays with a custom retry budget
    pub fn attempts(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffType, initial: Duration, max: Duration) -> Self {
        self.backoff = backoff;
        self.initial_delay = initial;
        self.max_delay = max;
        self
    }

    /// Delay before retry number `retry` (zero based)
    pub fn delay(&self, retry: u32) -> Duration {
        let scaled = match self.backoff {
            BackoffType::Constant => self.initial_delay,
            BackoffType::Linear => self.initial_delay.saturating_mul(retry.saturating_add(1)),
            BackoffType::Exponential => self
                .initial_delay
                .saturating_mul(2u32.saturating_pow(retry)),
        };
        scaled.min(self.max_delay)
    }

    fn budget_for(&self, method: &Method) -> u32 {
        if method.is_idempotent() {
            self.max_retries
        } else {
            0
        }
    }
}

/// Per-vendor client settings
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Vendor API root; relative paths are joined onto it
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// `None` disables outbound throttling
    pub rate_limit: Option<RateLimiterConfig>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            rate_limit: None,
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

impl HttpClientConfig {
    /// Client rooted at `base_url` with default timeout and retries
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: Option<RateLimiterConfig>) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}

/// Query, headers and JSON body of one call
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Sent in insertion order; Zoho `criteria` must precede `page`
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Result of sending one attempt
enum Attempt {
    Done(Response),
    Retry { delay: Duration, reason: String },
    Failed(Error),
}

/// Vendor HTTP client with auth, retries and optional throttling
pub struct HttpClient {
    inner: Client,
    config: HttpClientConfig,
    auth: Option<Authenticator>,
    limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Fails when reqwest rejects the timeout or user agent
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let inner = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;
        let limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            inner,
            config,
            auth: None,
            limiter,
        })
    }

    /// Client whose requests are signed by `auth`; token exchanges reuse the
    /// same connection pool
    pub fn with_auth(config: HttpClientConfig, auth: AuthConfig) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.auth = Some(Authenticator::with_client(auth, client.inner.clone()));
        Ok(client)
    }

    pub async fn get_with_config(&self, url: &str, options: RequestConfig) -> Result<Response> {
        self.request(Method::GET, url, options).await
    }

    pub async fn post(&self, url: &str, body: Value) -> Result<Response> {
        self.request(Method::POST, url, RequestConfig::new().json(body))
            .await
    }

    pub async fn put(&self, url: &str, body: Value) -> Result<Response> {
        self.request(Method::PUT, url, RequestConfig::new().json(body))
            .await
    }

    /// Send a request, repeating idempotent ones on 429, 500/502/503/504,
    /// timeouts and connection failures.
    ///
    /// A 429 is repeated only when its `Retry-After` fits within
    /// `max_delay`; otherwise it fails at once with `Error::RateLimited`.
    ///
    /// Any 4xx/5xx left after the budget is spent becomes
    /// `Error::HttpStatus` carrying the vendor body.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        options: RequestConfig,
    ) -> Result<Response> {
        let url = self.build_url(url);
        let budget = self.config.retry.budget_for(&method);
        let mut retry = 0;

        loop {
            if let Some(limiter) = &self.limiter {
                limiter.wait().await;
            }

            let sent = self
                .prepare(method.clone(), &url, &options)
                .await?
                .send()
                .await;

            match self.judge(sent, retry, retry < budget).await {
                Attempt::Done(response) => {
                    debug!(%method, %url, status = response.status().as_u16(), "vendor call");
                    return Ok(response);
                }
                Attempt::Failed(err) => return Err(err),
                Attempt::Retry { delay, reason } => {
                    warn!(
                        "{method} {url}: {reason}, retry {}/{budget} in {delay:?}",
                        retry + 1
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
            }
        }
    }

    /// Send a request and deserialize the JSON body
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        options: RequestConfig,
    ) -> Result<T> {
        Ok(self.request(method, url, options).await?.json::<T>().await?)
    }

    /// Absolute URLs pass through; anything else hangs off the base URL
    pub fn build_url(&self, path: &str) -> String {
        if Url::parse(path).is_ok() {
            return path.to_string();
        }
        match self.config.base_url.as_deref() {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }

    async fn prepare(
        &self,
        method: Method,
        url: &str,
        options: &RequestConfig,
    ) -> Result<RequestBuilder> {
        let mut builder = options
            .headers
            .iter()
            .fold(self.inner.request(method, url), |b, (name, value)| {
                b.header(name.as_str(), value.as_str())
            });

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        match &self.auth {
            Some(auth) => auth.apply(builder).await,
            None => Ok(builder),
        }
    }

    async fn judge(
        &self,
        sent: reqwest::Result<Response>,
        retry: u32,
        may_retry: bool,
    ) -> Attempt {
        let response = match sent {
            Ok(response) => response,
            Err(e) if may_retry && (e.is_timeout() || e.is_connect()) => {
                return Attempt::Retry {
                    delay: self.config.retry.delay(retry),
                    reason: format!("transport error ({e})"),
                };
            }
            Err(e) if e.is_timeout() => {
                return Attempt::Failed(Error::Timeout {
                    timeout_ms: u64::try_from(self.config.timeout.as_millis())
                        .unwrap_or(u64::MAX),
                });
            }
            Err(e) => return Attempt::Failed(Error::Http(e)),
        };

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let asked = retry_after_secs(response.headers());
            let delay = asked.map_or_else(|| self.config.retry.delay(retry), Duration::from_secs);
            // never sleep past max_delay
            return if may_retry && delay <= self.config.retry.max_delay {
                Attempt::Retry {
                    delay,
                    reason: "rate limited (429)".to_string(),
                }
            } else {
                Attempt::Failed(Error::RateLimited {
                    retry_after_seconds: asked.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
                })
            };
        }

        if may_retry && transient(status) {
            return Attempt::Retry {
                delay: self.config.retry.delay(retry),
                reason: format!("status {}", status.as_u16()),
            };
        }

        if status.is_client_error() || status.is_server_error() {
            return Attempt::Failed(Error::HttpStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Attempt::Done(response)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("retry", &self.config.retry)
            .field("has_authenticator", &self.auth.is_some())
            .field("has_rate_limiter", &self.limiter.is_some())
            .finish_non_exhaustive()
    }
}

fn transient(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Seconds from a numeric `Retry-After`
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

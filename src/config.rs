//! Process configuration
//!
//! `Settings` is read once at startup from command-line flags, falling back
//! to environment variables (a `.env` file is loaded first by `main`). It is
//! immutable afterwards and passed by reference to everything that needs it.

use crate::error::{Error, Result};
use crate::http::{BackoffType, HttpClientConfig, RateLimiterConfig, RetryPolicy};
use clap::Args;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_PROVIDER: &str = "greenhouse";
pub const DEFAULT_BASE_URL: &str = "https://api.mockats.com";
pub const DEFAULT_ZOHO_BASE_URL: &str = "https://recruit.zoho.com/recruit/v2";
pub const DEFAULT_ZOHO_TOKEN_URL: &str = "https://accounts.zoho.com/oauth/v2/token";
pub const DEFAULT_ZOHO_PORTAL_URL: &str = "https://recruit.zoho.com/recruit";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 10_000;

/// Provider names accepted by `ATS_PROVIDER`
pub const SUPPORTED_PROVIDERS: &[&str] = &["greenhouse", "workable", "zoho"];

// ============================================================================
// Provider selection
// ============================================================================

/// The vendor backing this deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Greenhouse,
    Workable,
    Zoho,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Greenhouse => "greenhouse",
            ProviderKind::Workable => "workable",
            ProviderKind::Zoho => "zoho",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "greenhouse" => Ok(ProviderKind::Greenhouse),
            "workable" => Ok(ProviderKind::Workable),
            "zoho" => Ok(ProviderKind::Zoho),
            _ => Err(Error::provider_not_found(s.trim().to_lowercase())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Deployment settings
#[derive(Args, Clone)]
pub struct Settings {
    /// ATS backend: greenhouse, workable or zoho
    #[arg(long = "provider", env = "ATS_PROVIDER", default_value = DEFAULT_PROVIDER, global = true)]
    pub provider: String,

    /// API key (Greenhouse Harvest key or Workable token)
    #[arg(long, env = "ATS_API_KEY", default_value = "", hide_env_values = true, global = true)]
    pub api_key: String,

    /// Base URL of the Greenhouse or Workable API
    #[arg(long, env = "ATS_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Account id (Greenhouse On-Behalf-Of user)
    #[arg(long, env = "ATS_ACCOUNT_ID", default_value = "", global = true)]
    pub account_id: String,

    /// Zoho OAuth client id
    #[arg(long, env = "ZOHO_CLIENT_ID", default_value = "", global = true)]
    pub zoho_client_id: String,

    /// Zoho OAuth client secret
    #[arg(long, env = "ZOHO_CLIENT_SECRET", default_value = "", hide_env_values = true, global = true)]
    pub zoho_client_secret: String,

    /// Zoho OAuth refresh token
    #[arg(long, env = "ZOHO_REFRESH_TOKEN", default_value = "", hide_env_values = true, global = true)]
    pub zoho_refresh_token: String,

    /// Zoho Recruit API base URL
    #[arg(long, env = "ZOHO_BASE_URL", default_value = DEFAULT_ZOHO_BASE_URL, global = true)]
    pub zoho_base_url: String,

    /// Zoho accounts token endpoint
    #[arg(long, env = "ZOHO_TOKEN_URL", default_value = DEFAULT_ZOHO_TOKEN_URL, global = true)]
    pub zoho_token_url: String,

    /// Zoho Recruit portal URL used for job links
    #[arg(long, env = "ZOHO_PORTAL_URL", default_value = DEFAULT_ZOHO_PORTAL_URL, global = true)]
    pub zoho_portal_url: String,

    /// Outbound request timeout in seconds
    #[arg(long, env = "ATS_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS, global = true)]
    pub http_timeout_secs: u64,

    /// Retries for idempotent vendor calls
    #[arg(long, env = "ATS_MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES, global = true)]
    pub max_retries: u32,

    /// Growth of the delay between retries
    #[arg(long, env = "ATS_RETRY_BACKOFF", value_enum, default_value_t = BackoffType::Exponential, global = true)]
    pub retry_backoff: BackoffType,

    /// Delay before the first retry, in milliseconds
    #[arg(long, env = "ATS_RETRY_INITIAL_DELAY_MS", default_value_t = DEFAULT_RETRY_INITIAL_DELAY_MS, global = true)]
    pub retry_initial_delay_ms: u64,

    /// Longest wait between retries, vendor `Retry-After` included
    #[arg(long, env = "ATS_RETRY_MAX_DELAY_MS", default_value_t = DEFAULT_RETRY_MAX_DELAY_MS, global = true)]
    pub retry_max_delay_ms: u64,

    /// Outbound requests per second (unset = unlimited)
    #[arg(long, env = "ATS_RATE_LIMIT_RPS", global = true)]
    pub rate_limit_rps: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            account_id: String::new(),
            zoho_client_id: String::new(),
            zoho_client_secret: String::new(),
            zoho_refresh_token: String::new(),
            zoho_base_url: DEFAULT_ZOHO_BASE_URL.to_string(),
            zoho_token_url: DEFAULT_ZOHO_TOKEN_URL.to_string(),
            zoho_portal_url: DEFAULT_ZOHO_PORTAL_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: BackoffType::Exponential,
            retry_initial_delay_ms: DEFAULT_RETRY_INITIAL_DELAY_MS,
            retry_max_delay_ms: DEFAULT_RETRY_MAX_DELAY_MS,
            rate_limit_rps: None,
        }
    }
}

impl Settings {
    /// Resolve the configured provider name
    pub fn provider_kind(&self) -> Result<ProviderKind> {
        self.provider.parse()
    }

    /// Log configuration problems; never fails so the process can still
    /// start and report errors per request.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Err(e) = self.provider_kind() {
            warnings.push(format!(
                "{e} Supported providers: {}",
                SUPPORTED_PROVIDERS.join(", ")
            ));
        }

        match self.provider_kind() {
            Ok(ProviderKind::Zoho) => {
                if self.zoho_client_id.is_empty()
                    || self.zoho_client_secret.is_empty()
                    || self.zoho_refresh_token.is_empty()
                {
                    warnings.push(
                        "ZOHO_CLIENT_ID, ZOHO_CLIENT_SECRET and ZOHO_REFRESH_TOKEN must all be set for Zoho"
                            .to_string(),
                    );
                }
            }
            _ => {
                if self.api_key.is_empty() {
                    warnings.push("ATS_API_KEY is not set".to_string());
                }
            }
        }

        for warning in &warnings {
            warn!("{warning}");
        }

        warnings
    }

    /// Outbound HTTP client settings for a vendor rooted at `base_url`
    pub fn http_config(&self, base_url: &str) -> HttpClientConfig {
        HttpClientConfig::new(base_url)
            .with_timeout(Duration::from_secs(self.http_timeout_secs))
            .with_retry(RetryPolicy::attempts(self.max_retries).with_backoff(
                self.retry_backoff,
                Duration::from_millis(self.retry_initial_delay_ms),
                Duration::from_millis(self.retry_max_delay_ms),
            ))
            .with_rate_limit(self.rate_limit_rps.map(RateLimiterConfig::per_second))
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("provider", &self.provider)
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("account_id", &self.account_id)
            .field("zoho_client_id", &self.zoho_client_id)
            .field("zoho_client_secret", &redact(&self.zoho_client_secret))
            .field("zoho_refresh_token", &redact(&self.zoho_refresh_token))
            .field("zoho_base_url", &self.zoho_base_url)
            .field("zoho_token_url", &self.zoho_token_url)
            .field("zoho_portal_url", &self.zoho_portal_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .field("retry_initial_delay_ms", &self.retry_initial_delay_ms)
            .field("retry_max_delay_ms", &self.retry_max_delay_ms)
            .field("rate_limit_rps", &self.rate_limit_rps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        settings: Settings,
    }

    #[test_case("zoho", ProviderKind::Zoho ; "lower case")]
    #[test_case("Zoho", ProviderKind::Zoho ; "mixed case")]
    #[test_case(" GREENHOUSE ", ProviderKind::Greenhouse ; "padded upper case")]
    #[test_case("workable", ProviderKind::Workable ; "workable")]
    fn test_provider_kind_parse(input: &str, expected: ProviderKind) {
        assert_eq!(input.parse::<ProviderKind>().unwrap(), expected);
    }

    #[test]
    fn test_unsupported_provider() {
        let settings = Settings {
            provider: "Lever".to_string(),
            ..Default::default()
        };
        let err = settings.provider_kind().unwrap_err();
        assert!(matches!(err, Error::ProviderNotFound { .. }));
        assert_eq!(err.to_string(), "ATS provider 'lever' is not supported.");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_supported_providers_all_parse() {
        for name in SUPPORTED_PROVIDERS {
            let kind: ProviderKind = name.parse().unwrap();
            assert_eq!(kind.as_str(), *name);
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = TestCli::try_parse_from([
            "test",
            "--provider",
            "zoho",
            "--zoho-base-url",
            "http://localhost:9999/recruit/v2",
            "--max-retries",
            "0",
            "--rate-limit-rps",
            "5",
            "--retry-backoff",
            "linear",
            "--retry-max-delay-ms",
            "1500",
        ])
        .unwrap();

        assert_eq!(cli.settings.provider_kind().unwrap(), ProviderKind::Zoho);
        assert_eq!(
            cli.settings.zoho_base_url,
            "http://localhost:9999/recruit/v2"
        );
        assert_eq!(cli.settings.max_retries, 0);
        assert_eq!(cli.settings.rate_limit_rps, Some(5));
        assert_eq!(cli.settings.retry_backoff, BackoffType::Linear);
        assert_eq!(cli.settings.retry_max_delay_ms, 1500);
        assert_eq!(cli.settings.zoho_portal_url, DEFAULT_ZOHO_PORTAL_URL);
    }

    #[test]
    fn test_validate_warns_without_failing() {
        let warnings = Settings::default().validate();
        assert_eq!(warnings, vec!["ATS_API_KEY is not set".to_string()]);

        let settings = Settings {
            provider: "zoho".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.validate().len(), 1);

        let settings = Settings {
            provider: "lever".to_string(),
            api_key: "key".to_string(),
            ..Default::default()
        };
        let warnings = settings.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("greenhouse, workable, zoho"));
    }

    #[test]
    fn test_http_config() {
        let settings = Settings {
            http_timeout_secs: 5,
            max_retries: 1,
            retry_backoff: BackoffType::Constant,
            retry_initial_delay_ms: 50,
            retry_max_delay_ms: 2_000,
            rate_limit_rps: Some(10),
            ..Default::default()
        };
        let config = settings.http_config("https://harvest.greenhouse.io/v1");

        assert_eq!(
            config.base_url.as_deref(),
            Some("https://harvest.greenhouse.io/v1")
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.backoff, BackoffType::Constant);
        assert_eq!(config.retry.delay(3), Duration::from_millis(50));
        assert_eq!(config.retry.max_delay, Duration::from_secs(2));
        assert!(config.rate_limit.is_some());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = Settings {
            api_key: "harvest-secret".to_string(),
            zoho_refresh_token: "1000.refresh".to_string(),
            ..Default::default()
        };
        let debug = format!("{settings:?}");
        assert!(!debug.contains("harvest-secret"));
        assert!(!debug.contains("1000.refresh"));
        assert!(debug.contains("[REDACTED]"));
    }
}

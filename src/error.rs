//! Error types for ats-bridge
//!
//! Every vendor failure is translated into one of the taxonomy variants
//! (validation, provider-not-found, authentication, resource-not-found,
//! provider) before it leaves an adapter. The remaining variants are
//! transport and plumbing errors; they never reach a caller verbatim.

use thiserror::Error;

/// The main error type for ats-bridge
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Taxonomy (client-facing)
    // ============================================================================
    #[error("{message}")]
    Validation { message: String },

    #[error("ATS provider '{provider}' is not supported.")]
    ProviderNotFound { provider: String },

    #[error("{message}")]
    Authentication { message: String },

    #[error("{message}")]
    ResourceNotFound { message: String },

    #[error("{message}")]
    Provider { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // Data Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error (400)
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a provider-not-found error (400)
    pub fn provider_not_found(provider: impl Into<String>) -> Self {
        Self::ProviderNotFound {
            provider: provider.into(),
        }
    }

    /// Create an authentication error (401)
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a resource-not-found error (404)
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            message: message.into(),
        }
    }

    /// Create a generic provider error (500)
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// HTTP status carried by this error when rendered to a caller
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation { .. } | Error::ProviderNotFound { .. } => 400,
            Error::Authentication { .. } => 401,
            Error::ResourceNotFound { .. } => 404,
            _ => 500,
        }
    }

    /// Whether the message may be shown to the caller
    pub fn is_client_facing(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. }
                | Error::ProviderNotFound { .. }
                | Error::Authentication { .. }
                | Error::ResourceNotFound { .. }
                | Error::Provider { .. }
        )
    }

    /// Translate a transport error into a `Provider` error at an adapter
    /// boundary. Errors already in the taxonomy pass through untouched.
    #[must_use]
    pub fn into_provider(self, context: &str) -> Self {
        if self.is_client_facing() {
            self
        } else {
            Self::provider(format!("{context}: {self}"))
        }
    }
}

/// Result type alias for ats-bridge
pub type Result<T> = std::result::Result<T, Error>;

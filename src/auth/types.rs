//! Auth configuration types

use serde::Deserialize;
use std::fmt;

/// Authorization scheme Zoho expects in front of its access tokens
pub const ZOHO_TOKEN_SCHEME: &str = "Zoho-oauthtoken";

/// Authentication configuration for one vendor
#[derive(Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// HTTP Basic authentication (Greenhouse sends the API key as user name)
    Basic {
        /// Username
        username: String,
        /// Password
        password: Option<String>,
    },

    /// Static bearer token
    Bearer {
        /// The bearer token
        token: String,
    },

    /// OAuth2 Refresh Token flow
    Oauth2Refresh {
        /// Token endpoint URL
        token_url: String,
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Refresh token
        refresh_token: String,
        /// Scheme placed before the access token in the Authorization header
        scheme: String,
    },
}

impl AuthConfig {
    /// Refresh-token flow sending `Authorization: Zoho-oauthtoken <token>`
    pub fn zoho(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self::Oauth2Refresh {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            scheme: ZOHO_TOKEN_SCHEME.to_string(),
        }
    }

    /// Short name of the auth type, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            AuthConfig::None => "none",
            AuthConfig::Basic { .. } => "basic",
            AuthConfig::Bearer { .. } => "bearer",
            AuthConfig::Oauth2Refresh { .. } => "oauth2_refresh",
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthConfig::None => f.write_str("None"),
            AuthConfig::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            AuthConfig::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
            AuthConfig::Oauth2Refresh {
                token_url,
                client_id,
                scheme,
                ..
            } => f
                .debug_struct("Oauth2Refresh")
                .field("token_url", token_url)
                .field("client_id", client_id)
                .field("client_secret", &"***")
                .field("refresh_token", &"***")
                .field("scheme", scheme)
                .finish(),
        }
    }
}

/// Tokens returned by an authorization-code exchange
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    /// Short-lived access token
    #[serde(default)]
    pub access_token: Option<String>,
    /// Long-lived refresh token to put in the configuration
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// API domain the tokens are valid for
    #[serde(default)]
    pub api_domain: Option<String>,
}

//! Request signing and the OAuth2 token exchanges
//!
//! An access token obtained through the refresh flow is trusted for the
//! lifetime of the authenticator. There is no expiry check and no retry on
//! 401; a fresh provider instance means a fresh exchange.

use super::types::{AuthConfig, TokenGrant};
use crate::error::{Error, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

/// Applies one vendor's credentials to outbound requests
pub struct Authenticator {
    config: AuthConfig,
    /// Set by the first successful refresh exchange
    token: OnceCell<String>,
    client: Client,
}

impl Authenticator {
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Token exchanges go through `client`
    pub fn with_client(config: AuthConfig, client: Client) -> Self {
        Self {
            config,
            token: OnceCell::new(),
            client,
        }
    }

    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let signed = match &self.config {
            AuthConfig::None => req,
            AuthConfig::Basic { username, password } => req.basic_auth(username, password.as_deref()),
            AuthConfig::Bearer { token } => req.bearer_auth(token),
            AuthConfig::Oauth2Refresh { scheme, .. } => {
                let token = self.refreshed_token().await?;
                req.header(AUTHORIZATION, format!("{scheme} {token}"))
            }
        };
        Ok(signed)
    }

    /// Whether the refresh exchange has already succeeded
    pub fn has_cached_token(&self) -> bool {
        self.token.initialized()
    }

    /// Concurrent callers wait on the same exchange; a failed exchange
    /// leaves the cell empty
    async fn refreshed_token(&self) -> Result<&str> {
        let token = self
            .token
            .get_or_try_init(|| async {
                match &self.config {
                    AuthConfig::Oauth2Refresh {
                        token_url,
                        client_id,
                        client_secret,
                        refresh_token,
                        ..
                    } => {
                        debug!("Exchanging refresh token at {token_url}");
                        let (status, body) = post_token_form(
                            &self.client,
                            token_url,
                            &[
                                ("refresh_token", refresh_token.as_str()),
                                ("client_id", client_id.as_str()),
                                ("client_secret", client_secret.as_str()),
                                ("grant_type", "refresh_token"),
                            ],
                            "Token request failed",
                        )
                        .await?;
                        access_token_from(status, &body)
                    }
                    other => Err(Error::authentication(format!(
                        "Token refresh not supported for auth type '{}'",
                        other.kind()
                    ))),
                }
            })
            .await?;
        Ok(token.as_str())
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .field("has_cached_token", &self.has_cached_token())
            .finish_non_exhaustive()
    }
}

/// POST parameters as a query string (Zoho accounts style); returns the
/// status and the raw body
async fn post_token_form(
    client: &Client,
    token_url: &str,
    params: &[(&str, &str)],
    failure: &str,
) -> Result<(StatusCode, String)> {
    let response = client
        .post(token_url)
        .query(params)
        .send()
        .await
        .map_err(|e| Error::authentication(format!("{failure}: {e}")))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::authentication(format!("{failure}: {e}")))?;
    Ok((status, body))
}

fn access_token_from(status: StatusCode, body: &str) -> Result<String> {
    let data: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    match data.get("access_token").and_then(Value::as_str) {
        Some(token) if status.is_success() => Ok(token.to_string()),
        _ => {
            let reason = match data.get("error").and_then(Value::as_str) {
                Some(vendor) => vendor.to_string(),
                None if status.is_success() => "Unknown error".to_string(),
                None => format!("HTTP {}", status.as_u16()),
            };
            Err(Error::authentication(format!(
                "Failed to get access token: {reason}"
            )))
        }
    }
}

/// Trade a one-time Zoho grant code for a refresh token.
///
/// Run once when onboarding a client; the refresh token then goes into
/// `ZOHO_REFRESH_TOKEN`.
pub async fn exchange_authorization_code(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    grant_code: &str,
    redirect_uri: &str,
) -> Result<TokenGrant> {
    let (status, body) = post_token_form(
        client,
        token_url,
        &[
            ("code", grant_code),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ],
        "Grant exchange failed",
    )
    .await?;

    match serde_json::from_str::<TokenGrant>(&body) {
        Ok(grant) if status.is_success() && grant.refresh_token.is_some() => Ok(grant),
        _ => Err(Error::authentication(format!(
            "Could not find refresh token in response (HTTP {}): {body}",
            status.as_u16()
        ))),
    }
}

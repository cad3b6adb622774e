//! Authentication module
//!
//! Supports: Basic (Greenhouse), static bearer (Workable), OAuth2 refresh
//! token exchange (Zoho).
//!
//! The `Authenticator` applies credentials to outbound requests and owns the
//! access-token cache for the refresh flow. One authenticator belongs to one
//! provider instance, so the cache never outlives a request.

mod authenticator;
mod types;

pub use authenticator::{exchange_authorization_code, Authenticator};
pub use types::{AuthConfig, TokenGrant, ZOHO_TOKEN_SCHEME};

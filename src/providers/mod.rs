//! ATS provider adapters
//!
//! Every vendor implements [`AtsProvider`]; the rest of the crate only sees
//! normalized [`Job`] and [`Application`] records. [`create_provider`] picks
//! the adapter named by the deployment settings.

mod greenhouse;
mod workable;
mod zoho;

pub use greenhouse::GreenhouseProvider;
pub use workable::WorkableProvider;
pub use zoho::ZohoProvider;

use crate::config::{ProviderKind, Settings};
use crate::error::{Error, Result};
use crate::types::{Application, CandidateApplication, Job};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::debug;

// ============================================================================
// Provider contract
// ============================================================================

/// Operations every ATS backend supports
#[async_trait]
pub trait AtsProvider: Send + Sync {
    /// Provider name as accepted by `ATS_PROVIDER`
    fn name(&self) -> &'static str;

    /// All job openings, normalized
    async fn get_jobs(&self) -> Result<Vec<Job>>;

    /// Create a candidate and return the vendor's candidate id.
    ///
    /// When the vendor reports that the candidate already exists the
    /// existing id is looked up and returned instead.
    async fn create_candidate(&self, candidate: &CandidateApplication) -> Result<String>;

    /// Link a candidate to a job opening, returning the application id
    async fn attach_candidate_to_job(&self, candidate_id: &str, job_id: &str) -> Result<String>;

    /// Applications for one job, normalized
    async fn get_applications(&self, job_id: &str) -> Result<Vec<Application>>;

    /// Map a raw vendor job record; missing fields fall back to defaults
    fn normalize_job(&self, raw: &Value) -> Job;

    /// Map a raw vendor application record; missing fields fall back to defaults
    fn normalize_application(&self, raw: &Value) -> Application;
}

/// Build the provider selected by `settings.provider`
pub fn create_provider(settings: &Settings) -> Result<Box<dyn AtsProvider>> {
    let kind = settings.provider_kind()?;
    debug!("Creating {kind} provider");

    Ok(match kind {
        ProviderKind::Greenhouse => Box::new(GreenhouseProvider::new(settings)?),
        ProviderKind::Workable => Box::new(WorkableProvider::new(settings)?),
        ProviderKind::Zoho => Box::new(ZohoProvider::new(settings)?),
    })
}

// ============================================================================
// Raw record helpers
// ============================================================================

/// Non-empty string field
pub(crate) fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// String or number rendered as a string; `null` and other shapes are absent
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The record's `id`, stringified
pub(crate) fn id_field(record: &Value) -> Option<String> {
    record.get("id").and_then(scalar_string)
}

/// Join first and last name, or `None` when both are blank
pub(crate) fn join_names(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let joined = format!("{} {}", first.unwrap_or(""), last.unwrap_or(""));
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Read a JSON body; `204 No Content` and an empty body yield `None`
pub(crate) async fn read_json(response: Response) -> Result<Option<Value>> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(&text)?))
}

/// Bytes kept verbatim in a path segment (RFC 3986 unreserved)
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// `raw` escaped as exactly one path segment. Blank and dot-only values
/// would change the path itself and are rejected.
pub(crate) fn path_segment(raw: &str, field: &str) -> Result<String> {
    if raw.trim().is_empty() || raw.chars().all(|c| c == '.') {
        return Err(Error::validation(format!("Invalid {field}: '{raw}'")));
    }
    Ok(utf8_percent_encode(raw, PATH_SEGMENT).to_string())
}

/// Array stored under `key`, or empty
pub(crate) fn array_field(body: &Value, key: &str) -> Vec<Value> {
    body.get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Translate a failed API-key call: a rejected key is an authentication
/// error, anything else outside the taxonomy becomes a provider error.
pub(crate) fn api_key_error(err: Error, context: &str) -> Error {
    match err {
        Error::HttpStatus { status: 401, .. } => {
            Error::authentication(format!("{context}: invalid API credentials"))
        }
        other => other.into_provider(context),
    }
}

/// Status and body of a 4xx failure
pub(crate) fn client_error_body(err: &Error) -> Option<(u16, &str)> {
    match err {
        Error::HttpStatus { status, body } if (400..500).contains(status) => {
            Some((*status, body.as_str()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests;

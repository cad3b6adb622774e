//! Normalized records shared by every provider
//!
//! These are the only shapes that cross the provider boundary; vendor field
//! names never leave an adapter.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder for absent location, email and last name values
pub const NOT_AVAILABLE: &str = "N/A";

/// Candidate name used when a vendor record carries none
pub const UNKNOWN_CANDIDATE: &str = "Unknown";

/// Application status used when a vendor record carries none
pub const DEFAULT_APPLICATION_STATUS: &str = "APPLIED";

// ============================================================================
// Jobs
// ============================================================================

/// Whether a job accepts applications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Open,
    Closed,
}

/// A job opening, normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub location: String,
    pub status: JobStatus,
    pub external_url: String,
}

// ============================================================================
// Applications
// ============================================================================

/// A candidate's application to one job, normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub candidate_name: String,
    pub email: String,
    pub status: String,
}

// ============================================================================
// Inbound candidate payload
// ============================================================================

/// Body of `POST /candidates` as received; nothing is required yet
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub job_id: Option<String>,
}

impl ApplyRequest {
    /// Check required fields in order and build a [`CandidateApplication`].
    ///
    /// A field that is absent, `null` or blank counts as missing; the first
    /// missing one is reported.
    pub fn validate(self) -> Result<CandidateApplication> {
        let name = required(self.name, "name")?;
        let email = required(self.email, "email")?;
        let job_id = required(self.job_id, "job_id")?;
        let phone = self.phone.filter(|p| !p.trim().is_empty());

        Ok(CandidateApplication {
            name,
            email,
            phone,
            job_id,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::validation(format!("Missing required field: {field}"))),
    }
}

/// Accept `"42"` and `42` alike for identifiers
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// A validated application request; the required fields are always present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateApplication {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub job_id: String,
}

impl CandidateApplication {
    /// First token of the name
    pub fn first_name(&self) -> &str {
        self.split_name().0
    }

    /// Everything after the first space, or `"N/A"`
    pub fn last_name(&self) -> &str {
        self.split_name().1.unwrap_or(NOT_AVAILABLE)
    }

    fn split_name(&self) -> (&str, Option<&str>) {
        match self.name.split_once(' ') {
            Some((first, rest)) => (first, Some(rest)),
            None => (self.name.as_str(), None),
        }
    }
}

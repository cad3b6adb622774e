//! Zoho Recruit adapter
//!
//! OAuth2 refresh-token authentication, page-indexed listings and the
//! create-or-find candidate protocol over Zoho's batch result format:
//!
//! ```text
//! {"data": [{"status": "success", "details": {"id": "..."}}]}
//! {"data": [{"status": "error", "code": "DUPLICATE_DATA", "message": "..."}]}
//! ```

use super::{
    array_field, client_error_body, id_field, join_names, read_json, str_field, AtsProvider,
};
use crate::auth::AuthConfig;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::paginate_all;
use crate::types::{
    Application, CandidateApplication, Job, JobStatus, DEFAULT_APPLICATION_STATUS, NOT_AVAILABLE,
    UNKNOWN_CANDIDATE,
};
use async_trait::async_trait;
use reqwest::Response;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

const API_ERROR: &str = "Zoho API Error";
const OPEN_STATUS: &str = "In-progress";
const DUPLICATE_CODE: &str = "DUPLICATE_DATA";
const DUPLICATE_MESSAGE: &str = "Duplicate values";

/// Zoho Recruit v2 provider
#[derive(Debug)]
pub struct ZohoProvider {
    client: HttpClient,
    portal_url: String,
}

impl ZohoProvider {
    pub fn new(settings: &Settings) -> Result<Self> {
        let auth = AuthConfig::zoho(
            &settings.zoho_token_url,
            &settings.zoho_client_id,
            &settings.zoho_client_secret,
            &settings.zoho_refresh_token,
        );

        Ok(Self {
            client: HttpClient::with_auth(settings.http_config(&settings.zoho_base_url), auth)?,
            portal_url: settings.zoho_portal_url.trim_end_matches('/').to_string(),
        })
    }

    /// Field metadata of a Zoho module (`settings/fields?module=...`)
    pub async fn module_fields(&self, module: &str) -> Result<Vec<Value>> {
        let response = self
            .client
            .get_with_config(
                "settings/fields",
                RequestConfig::new().query("module", module),
            )
            .await
            .map_err(|e| e.into_provider(API_ERROR))?;

        let body = read_json(response)
            .await
            .map_err(|e| e.into_provider(API_ERROR))?;

        Ok(body.map(|b| array_field(&b, "fields")).unwrap_or_default())
    }

    async fn fetch_jobs_page(&self, page: u32) -> Result<Vec<Value>> {
        let response = self
            .client
            .get_with_config(
                "JobOpenings",
                RequestConfig::new().query("page", page.to_string()),
            )
            .await
            .map_err(|e| e.into_provider(API_ERROR))?;

        let body = read_json(response).await.map_err(|e| match e {
            Error::JsonParse(_) => Error::provider("Zoho API Error: Received invalid JSON response"),
            other => other.into_provider(API_ERROR),
        })?;

        Ok(body.map(|b| array_field(&b, "data")).unwrap_or_default())
    }

    async fn fetch_applications_page(&self, job_id: &str, page: u32) -> Result<Vec<Value>> {
        let config = RequestConfig::new()
            .query("criteria", format!("($Job_Opening_Id:equals:{job_id})"))
            .query("page", page.to_string());

        let outcome = match self.client.get_with_config("Applications/search", config).await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(body) => Ok(body.map(|b| array_field(&b, "data")).unwrap_or_default()),
            Err(e @ Error::Authentication { .. }) => Err(e),
            Err(e) => {
                warn!("Failed to fetch applications for job {job_id} page {page}: {e}");
                Ok(Vec::new())
            }
        }
    }

    /// Id of the first candidate whose email matches exactly
    async fn search_candidate_by_email(&self, email: &str) -> Result<String> {
        let response = self
            .client
            .get_with_config(
                "Candidates/search",
                RequestConfig::new().query("criteria", format!("Email:equals:{email}")),
            )
            .await
            .map_err(|e| e.into_provider("Zoho Search Error"))?;

        let body = read_json(response)
            .await
            .map_err(|e| e.into_provider("Zoho Search Error"))?;

        let existing = body
            .as_ref()
            .and_then(|b| b.get("data"))
            .and_then(Value::as_array)
            .and_then(|candidates| candidates.first())
            .and_then(id_field);

        match existing {
            Some(id) => {
                debug!("Found existing Zoho candidate {id}");
                Ok(id)
            }
            None => Err(Error::not_found(format!(
                "Could not find existing candidate with email {email} despite duplicate error."
            ))),
        }
    }
}

/// Body of a batch write. Zoho reports some per-record failures with a 4xx
/// status; those bodies are returned for inspection like successful ones.
async fn batch_body(sent: Result<Response>) -> Result<Value> {
    match sent {
        Ok(response) => Ok(read_json(response)
            .await
            .map_err(|e| e.into_provider(API_ERROR))?
            .unwrap_or(Value::Null)),
        Err(err) => {
            if let Some((_, body)) = client_error_body(&err) {
                if let Ok(parsed) = serde_json::from_str::<Value>(body) {
                    if first_result(&parsed).is_some() {
                        return Ok(parsed);
                    }
                }
            }
            Err(err.into_provider(API_ERROR))
        }
    }
}

/// First entry of a batch result
fn first_result(body: &Value) -> Option<&Value> {
    body.get("data")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
}

fn details_id(entry: &Value) -> Option<String> {
    entry.get("details").and_then(id_field)
}

fn is_duplicate(entry: &Value) -> bool {
    entry.get("code").and_then(Value::as_str) == Some(DUPLICATE_CODE)
        || entry
            .get("message")
            .and_then(Value::as_str)
            .is_some_and(|m| m.contains(DUPLICATE_MESSAGE))
}

fn entry_message(entry: &Value) -> &str {
    entry.get("message").and_then(Value::as_str).unwrap_or("")
}

#[async_trait]
impl AtsProvider for ZohoProvider {
    fn name(&self) -> &'static str {
        "zoho"
    }

    async fn get_jobs(&self) -> Result<Vec<Job>> {
        let raw = paginate_all(|page| self.fetch_jobs_page(page)).await?;
        debug!("Fetched {} Zoho job openings", raw.len());
        Ok(raw.iter().map(|r| self.normalize_job(r)).collect())
    }

    async fn create_candidate(&self, candidate: &CandidateApplication) -> Result<String> {
        let mut record = Map::new();
        record.insert("First_Name".into(), json!(candidate.first_name()));
        record.insert("Last_Name".into(), json!(candidate.last_name()));
        record.insert("Email".into(), json!(candidate.email));
        if let Some(phone) = &candidate.phone {
            record.insert("Mobile".into(), json!(phone));
        }

        let sent = self
            .client
            .post("Candidates", json!({ "data": [record] }))
            .await;
        let body = batch_body(sent).await?;

        let Some(entry) = first_result(&body) else {
            return Err(Error::provider(
                "Zoho API Error: candidate creation returned no result",
            ));
        };

        match entry.get("status").and_then(Value::as_str) {
            Some("error") if is_duplicate(entry) => {
                debug!(
                    "Zoho candidate {} already exists, searching for existing id",
                    candidate.email
                );
                self.search_candidate_by_email(&candidate.email).await
            }
            Some("error") => Err(Error::validation(format!(
                "Zoho Candidate Creation Error: {}",
                entry_message(entry)
            ))),
            _ => details_id(entry).ok_or_else(|| {
                Error::provider("Zoho API Error: candidate creation returned no id")
            }),
        }
    }

    async fn attach_candidate_to_job(&self, candidate_id: &str, job_id: &str) -> Result<String> {
        let payload = json!({
            "data": [{
                "ids": [candidate_id],
                "jobids": [job_id],
                "status": "Associated"
            }]
        });

        let sent = self
            .client
            .put("Candidates/actions/associate", payload)
            .await;
        let body = batch_body(sent).await.inspect_err(|e| {
            warn!("Zoho association of candidate {candidate_id} with job {job_id} failed: {e}");
        })?;

        if let Some(entry) = first_result(&body) {
            if entry.get("status").and_then(Value::as_str) == Some("error") {
                return Err(Error::validation(format!(
                    "Zoho Association Error: {}",
                    entry_message(entry)
                )));
            }
        }

        Ok(format!("{candidate_id}_{job_id}"))
    }

    async fn get_applications(&self, job_id: &str) -> Result<Vec<Application>> {
        let raw = paginate_all(|page| self.fetch_applications_page(job_id, page)).await?;
        Ok(raw.iter().map(|r| self.normalize_application(r)).collect())
    }

    fn normalize_job(&self, raw: &Value) -> Job {
        let id = id_field(raw).unwrap_or_default();

        Job {
            external_url: format!("{}/ViewJob.na?digest={id}", self.portal_url),
            title: str_field(raw, "Posting_Title").unwrap_or_default().to_string(),
            location: str_field(raw, "City").unwrap_or(NOT_AVAILABLE).to_string(),
            status: if raw.get("Status").and_then(Value::as_str) == Some(OPEN_STATUS) {
                JobStatus::Open
            } else {
                JobStatus::Closed
            },
            id,
        }
    }

    fn normalize_application(&self, raw: &Value) -> Application {
        let candidate_name = str_field(raw, "Full_Name")
            .map(str::to_string)
            .or_else(|| join_names(str_field(raw, "First_Name"), str_field(raw, "Last_Name")))
            .unwrap_or_else(|| UNKNOWN_CANDIDATE.to_string());

        Application {
            id: id_field(raw).unwrap_or_default(),
            candidate_name,
            email: str_field(raw, "Email").unwrap_or(NOT_AVAILABLE).to_string(),
            status: str_field(raw, "Application_Status")
                .unwrap_or(DEFAULT_APPLICATION_STATUS)
                .to_string(),
        }
    }
}

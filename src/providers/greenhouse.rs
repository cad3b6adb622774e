//! Greenhouse Harvest v1 adapter
//!
//! HTTP Basic auth with the API key as user name. Writes carry an
//! `On-Behalf-Of` user id when an account id is configured.

use super::{
    api_key_error, id_field, join_names, path_segment, scalar_string, str_field, AtsProvider,
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
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

const API_ERROR: &str = "Greenhouse API Error";
const PER_PAGE: &str = "100";
const JOB_URL: &str = "https://app.greenhouse.io/plans";

/// Greenhouse Harvest provider
#[derive(Debug)]
pub struct GreenhouseProvider {
    client: HttpClient,
    on_behalf_of: Option<String>,
}

impl GreenhouseProvider {
    pub fn new(settings: &Settings) -> Result<Self> {
        let auth = AuthConfig::Basic {
            username: settings.api_key.clone(),
            password: None,
        };

        Ok(Self {
            client: HttpClient::with_auth(settings.http_config(&settings.base_url), auth)?,
            on_behalf_of: Some(settings.account_id.clone()).filter(|a| !a.is_empty()),
        })
    }

    fn write_config(&self, body: Value) -> RequestConfig {
        let config = RequestConfig::new().json(body);
        match &self.on_behalf_of {
            Some(user) => config.header("On-Behalf-Of", user),
            None => config,
        }
    }

    async fn fetch_page(&self, path: &str, config: RequestConfig) -> Result<Vec<Value>> {
        let body: Value = self
            .client
            .request_json(Method::GET, path, config)
            .await
            .map_err(|e| api_key_error(e, API_ERROR))?;

        Ok(body.as_array().cloned().unwrap_or_default())
    }

    async fn post_for_id(&self, path: &str, body: Value) -> Result<String> {
        let created: Value = self
            .client
            .request_json(Method::POST, path, self.write_config(body))
            .await
            .map_err(|e| api_key_error(e, API_ERROR))?;

        id_field(&created).ok_or_else(|| Error::provider(format!("{API_ERROR}: response had no id")))
    }
}

/// Ids are numeric in Harvest; keep other values as strings
fn numeric_or_string(id: &str) -> Value {
    id.parse::<u64>().map_or_else(|_| json!(id), |n| json!(n))
}

fn applies_to_job(raw: &Value, job_id: &str) -> bool {
    raw.get("jobs")
        .and_then(Value::as_array)
        .is_some_and(|jobs| {
            jobs.iter()
                .filter_map(id_field)
                .any(|id| id == job_id)
        })
}

#[async_trait]
impl AtsProvider for GreenhouseProvider {
    fn name(&self) -> &'static str {
        "greenhouse"
    }

    async fn get_jobs(&self) -> Result<Vec<Job>> {
        let raw = paginate_all(|page| {
            let config = RequestConfig::new()
                .query("page", page.to_string())
                .query("per_page", PER_PAGE);
            self.fetch_page("jobs", config)
        })
        .await?;

        Ok(raw.iter().map(|r| self.normalize_job(r)).collect())
    }

    async fn create_candidate(&self, candidate: &CandidateApplication) -> Result<String> {
        let mut body = json!({
            "first_name": candidate.first_name(),
            "last_name": candidate.last_name(),
            "email_addresses": [{"value": candidate.email, "type": "personal"}],
        });
        if let Some(phone) = &candidate.phone {
            body["phone_numbers"] = json!([{"value": phone, "type": "mobile"}]);
        }

        let id = self.post_for_id("candidates", body).await?;
        debug!("Created Greenhouse candidate {id}");
        Ok(id)
    }

    async fn attach_candidate_to_job(&self, candidate_id: &str, job_id: &str) -> Result<String> {
        let path = format!(
            "candidates/{}/applications",
            path_segment(candidate_id, "candidate_id")?
        );
        self.post_for_id(
            &path,
            json!({ "job_id": numeric_or_string(job_id) }),
        )
        .await
    }

    async fn get_applications(&self, job_id: &str) -> Result<Vec<Application>> {
        let raw = paginate_all(|page| {
            let config = RequestConfig::new()
                .query("job_id", job_id)
                .query("page", page.to_string())
                .query("per_page", PER_PAGE);
            self.fetch_page("applications", config)
        })
        .await?;

        Ok(raw
            .iter()
            .filter(|r| applies_to_job(r, job_id))
            .map(|r| self.normalize_application(r))
            .collect())
    }

    fn normalize_job(&self, raw: &Value) -> Job {
        let id = id_field(raw).unwrap_or_default();
        let office = raw
            .get("offices")
            .and_then(Value::as_array)
            .and_then(|offices| offices.first())
            .and_then(|office| str_field(office, "name"));
        let location = office
            .or_else(|| raw.get("location").and_then(|l| str_field(l, "name")))
            .unwrap_or(NOT_AVAILABLE);

        Job {
            external_url: format!("{JOB_URL}/{id}"),
            title: str_field(raw, "name").unwrap_or_default().to_string(),
            location: location.to_string(),
            status: if raw.get("status").and_then(Value::as_str) == Some("open") {
                JobStatus::Open
            } else {
                JobStatus::Closed
            },
            id,
        }
    }

    fn normalize_application(&self, raw: &Value) -> Application {
        let candidate = raw.get("candidate").unwrap_or(&Value::Null);
        let candidate_name = join_names(
            str_field(candidate, "first_name"),
            str_field(candidate, "last_name"),
        )
        .unwrap_or_else(|| UNKNOWN_CANDIDATE.to_string());
        let email = candidate
            .get("email_addresses")
            .and_then(Value::as_array)
            .and_then(|emails| emails.first())
            .and_then(|e| e.get("value"))
            .and_then(scalar_string)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Application {
            id: id_field(raw).unwrap_or_default(),
            candidate_name,
            email,
            status: str_field(raw, "status")
                .unwrap_or(DEFAULT_APPLICATION_STATUS)
                .to_string(),
        }
    }
}

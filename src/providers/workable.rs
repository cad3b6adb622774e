//! Workable SPI v3 adapter
//!
//! Static bearer token. Listings follow the absolute `paging.next` URL, but
//! only while it stays on the configured API origin.
//! Creating a candidate under a job already places them in its pipeline,
//! so attaching needs no vendor call.

use super::{
    api_key_error, client_error_body, id_field, join_names, path_segment, str_field, AtsProvider,
};
use crate::auth::AuthConfig;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{paginate_with_cursor, CursorPage};
use crate::types::{
    Application, CandidateApplication, Job, JobStatus, DEFAULT_APPLICATION_STATUS, NOT_AVAILABLE,
    UNKNOWN_CANDIDATE,
};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use url::{Origin, Url};

const API_ERROR: &str = "Workable API Error";
const PAGE_LIMIT: &str = "100";

/// Workable provider
#[derive(Debug)]
pub struct WorkableProvider {
    client: HttpClient,
    /// `None` when `ATS_BASE_URL` is not absolute; then no cursor is followed
    origin: Option<Origin>,
}

impl WorkableProvider {
    pub fn new(settings: &Settings) -> Result<Self> {
        let auth = AuthConfig::Bearer {
            token: settings.api_key.clone(),
        };

        Ok(Self {
            client: HttpClient::with_auth(settings.http_config(&settings.base_url), auth)?,
            origin: Url::parse(&settings.base_url).ok().map(|u| u.origin()),
        })
    }

    /// The bearer token must not leave the API origin
    fn check_cursor(&self, next: &str) -> Result<()> {
        match Url::parse(next) {
            Ok(url) if self.origin.as_ref() != Some(&url.origin()) => Err(Error::provider(
                format!("{API_ERROR}: paging URL {next} is outside the configured API"),
            )),
            _ => Ok(()),
        }
    }

    /// One page of `key` records; the first request goes to `path`, later
    /// ones to the cursor URL verbatim.
    async fn fetch_page(
        &self,
        path: &str,
        key: &str,
        cursor: Option<String>,
    ) -> Result<CursorPage<Value>> {
        let config = match cursor {
            Some(_) => RequestConfig::new(),
            None => RequestConfig::new().query("limit", PAGE_LIMIT),
        };
        let url = match cursor {
            Some(next) => {
                self.check_cursor(&next)?;
                next
            }
            None => path.to_string(),
        };

        let body: Value = self
            .client
            .request_json(Method::GET, &url, config)
            .await
            .map_err(|e| api_key_error(e, API_ERROR))?;

        let items = body
            .get(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let next = body
            .get("paging")
            .and_then(|p| str_field(p, "next"))
            .map(str::to_string);

        Ok(CursorPage::new(items, next))
    }

    async fn find_candidate_by_email(&self, email: &str) -> Result<String> {
        let body: Value = self
            .client
            .request_json(
                Method::GET,
                "candidates",
                RequestConfig::new().query("email", email),
            )
            .await
            .map_err(|e| api_key_error(e, API_ERROR))?;

        body.get("candidates")
            .and_then(Value::as_array)
            .and_then(|c| c.first())
            .and_then(id_field)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "Could not find existing candidate with email {email} despite duplicate error."
                ))
            })
    }
}

/// A 409/422 whose body says the candidate already exists
fn is_existing_candidate(err: &Error) -> bool {
    client_error_body(err).is_some_and(|(status, body)| {
        matches!(status, 409 | 422) && body.to_lowercase().contains("exist")
    })
}

#[async_trait]
impl AtsProvider for WorkableProvider {
    fn name(&self) -> &'static str {
        "workable"
    }

    async fn get_jobs(&self) -> Result<Vec<Job>> {
        let raw = paginate_with_cursor(|cursor| self.fetch_page("jobs", "jobs", cursor)).await?;
        Ok(raw.iter().map(|r| self.normalize_job(r)).collect())
    }

    async fn create_candidate(&self, candidate: &CandidateApplication) -> Result<String> {
        let mut details = json!({
            "name": candidate.name,
            "firstname": candidate.first_name(),
            "lastname": candidate.last_name(),
            "email": candidate.email,
        });
        if let Some(phone) = &candidate.phone {
            details["phone"] = json!(phone);
        }
        let body = json!({ "sourced": false, "candidate": details });

        let path = format!(
            "jobs/{}/candidates",
            path_segment(&candidate.job_id, "job_id")?
        );
        match self
            .client
            .request_json::<Value>(Method::POST, &path, RequestConfig::new().json(body))
            .await
        {
            Ok(created) => created
                .get("candidate")
                .and_then(id_field)
                .ok_or_else(|| Error::provider(format!("{API_ERROR}: response had no candidate id"))),
            Err(e) if is_existing_candidate(&e) => {
                debug!(
                    "Workable candidate {} already exists, searching for existing id",
                    candidate.email
                );
                self.find_candidate_by_email(&candidate.email).await
            }
            Err(Error::HttpStatus { status: 422, body }) => Err(Error::validation(format!(
                "Workable Candidate Creation Error: {body}"
            ))),
            Err(e) => Err(api_key_error(e, API_ERROR)),
        }
    }

    async fn attach_candidate_to_job(&self, candidate_id: &str, job_id: &str) -> Result<String> {
        Ok(format!("{candidate_id}_{job_id}"))
    }

    async fn get_applications(&self, job_id: &str) -> Result<Vec<Application>> {
        let path = format!("jobs/{}/candidates", path_segment(job_id, "job_id")?);
        let path = path.as_str();
        let raw =
            paginate_with_cursor(move |cursor| self.fetch_page(path, "candidates", cursor)).await?;

        Ok(raw
            .iter()
            .filter(|r| {
                r.get("job")
                    .and_then(|j| str_field(j, "shortcode"))
                    .is_some_and(|shortcode| shortcode == job_id)
            })
            .map(|r| self.normalize_application(r))
            .collect())
    }

    fn normalize_job(&self, raw: &Value) -> Job {
        let location = raw.get("location").and_then(|l| {
            str_field(l, "location_str").or_else(|| str_field(l, "city"))
        });

        Job {
            id: str_field(raw, "shortcode")
                .map(str::to_string)
                .or_else(|| id_field(raw))
                .unwrap_or_default(),
            title: str_field(raw, "title").unwrap_or_default().to_string(),
            location: location.unwrap_or(NOT_AVAILABLE).to_string(),
            status: if raw.get("state").and_then(Value::as_str) == Some("published") {
                JobStatus::Open
            } else {
                JobStatus::Closed
            },
            external_url: str_field(raw, "url")
                .or_else(|| str_field(raw, "application_url"))
                .unwrap_or_default()
                .to_string(),
        }
    }

    fn normalize_application(&self, raw: &Value) -> Application {
        let candidate_name = str_field(raw, "name")
            .map(str::to_string)
            .or_else(|| join_names(str_field(raw, "firstname"), str_field(raw, "lastname")))
            .unwrap_or_else(|| UNKNOWN_CANDIDATE.to_string());

        Application {
            id: id_field(raw).unwrap_or_default(),
            candidate_name,
            email: str_field(raw, "email").unwrap_or(NOT_AVAILABLE).to_string(),
            status: str_field(raw, "stage")
                .unwrap_or(DEFAULT_APPLICATION_STATUS)
                .to_string(),
        }
    }
}

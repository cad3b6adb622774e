//! Tests for the provider adapters

use super::*;
use crate::types::{ApplyRequest, JobStatus};
use base64::Engine as _;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

fn zoho_settings(server: &MockServer) -> Settings {
    Settings {
        provider: "zoho".to_string(),
        zoho_client_id: "test_id".to_string(),
        zoho_client_secret: "test_secret".to_string(),
        zoho_refresh_token: "test_refresh".to_string(),
        zoho_base_url: format!("{}/recruit/v2", server.uri()),
        zoho_token_url: format!("{}/oauth/v2/token", server.uri()),
        max_retries: 0,
        ..Default::default()
    }
}

async fn zoho(server: &MockServer) -> ZohoProvider {
    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(query_param("refresh_token", "test_refresh"))
        .and(query_param("client_id", "test_id"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "mock_access_token"})),
        )
        .expect(1)
        .mount(server)
        .await;

    ZohoProvider::new(&zoho_settings(server)).unwrap()
}

fn candidate(name: &str, phone: Option<&str>) -> CandidateApplication {
    ApplyRequest {
        name: Some(name.to_string()),
        email: Some("john@example.com".to_string()),
        phone: phone.map(str::to_string),
        job_id: Some("42".to_string()),
    }
    .validate()
    .unwrap()
}

const AUTH: &str = "Zoho-oauthtoken mock_access_token";

// ============================================================================
// Factory
// ============================================================================

#[test_case("greenhouse" ; "greenhouse")]
#[test_case("workable" ; "workable")]
#[test_case("zoho" ; "zoho")]
fn test_create_provider(name: &str) {
    let settings = Settings {
        provider: name.to_uppercase(),
        ..Default::default()
    };
    assert_eq!(create_provider(&settings).unwrap().name(), name);
}

#[test]
fn test_create_provider_unsupported() {
    let settings = Settings {
        provider: "lever".to_string(),
        ..Default::default()
    };
    let err = create_provider(&settings).err().unwrap();
    assert!(matches!(err, Error::ProviderNotFound { .. }));
    assert_eq!(err.status_code(), 400);
}

// ============================================================================
// Zoho: jobs
// ============================================================================

#[tokio::test]
async fn test_zoho_get_jobs_pages_until_no_content() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("GET"))
        .and(path("/recruit/v2/JobOpenings"))
        .and(query_param("page", "1"))
        .and(header("Authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "123", "Posting_Title": "Software Engineer", "City": "San Francisco", "Status": "In-progress"},
                {"id": 124, "Posting_Title": "Designer", "Status": "Filled"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recruit/v2/JobOpenings"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = provider.get_jobs().await.unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].title, "Software Engineer");
    assert_eq!(jobs[0].status, JobStatus::Open);
    assert_eq!(
        jobs[0].external_url,
        "https://recruit.zoho.com/recruit/ViewJob.na?digest=123"
    );
    assert_eq!(jobs[1].id, "124");
    assert_eq!(jobs[1].location, "N/A");
    assert_eq!(jobs[1].status, JobStatus::Closed);
}

#[tokio::test]
async fn test_zoho_get_jobs_stops_on_empty_body() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("GET"))
        .and(path("/recruit/v2/JobOpenings"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "123", "Posting_Title": "Software Engineer", "Status": "In-progress"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recruit/v2/JobOpenings"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = provider.get_jobs().await.unwrap();

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, "123");
}

#[tokio::test]
async fn test_zoho_get_jobs_server_error() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("GET"))
        .and(path("/recruit/v2/JobOpenings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = provider.get_jobs().await.unwrap_err();
    assert!(matches!(err, Error::Provider { .. }));
    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().starts_with("Zoho API Error"));
}

#[tokio::test]
async fn test_zoho_get_jobs_invalid_json() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("GET"))
        .and(path("/recruit/v2/JobOpenings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = provider.get_jobs().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Zoho API Error: Received invalid JSON response"
    );
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_zoho_token_without_access_token_is_401() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "invalid_code"})))
        .mount(&server)
        .await;

    let provider = ZohoProvider::new(&zoho_settings(&server)).unwrap();
    let err = provider.get_jobs().await.unwrap_err();

    assert!(matches!(err, Error::Authentication { .. }));
    assert_eq!(err.status_code(), 401);
    assert_eq!(err.to_string(), "Failed to get access token: invalid_code");
}

#[tokio::test]
async fn test_zoho_token_fetched_once_per_instance() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("GET"))
        .and(path("/recruit/v2/JobOpenings"))
        .and(header("Authorization", AUTH))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    assert!(provider.get_jobs().await.unwrap().is_empty());
    assert!(provider.get_jobs().await.unwrap().is_empty());
}

// ============================================================================
// Zoho: create-or-find
// ============================================================================

#[tokio::test]
async fn test_zoho_create_candidate_success() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("POST"))
        .and(path("/recruit/v2/Candidates"))
        .and(header("Authorization", AUTH))
        .and(body_json(json!({
            "data": [{"First_Name": "John", "Last_Name": "Doe", "Email": "john@example.com"}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": [{"status": "success", "code": "SUCCESS", "details": {"id": "cand_123"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = provider
        .create_candidate(&candidate("John Doe", None))
        .await
        .unwrap();
    assert_eq!(id, "cand_123");
}

#[tokio::test]
async fn test_zoho_create_candidate_single_name_with_phone() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("POST"))
        .and(path("/recruit/v2/Candidates"))
        .and(body_json(json!({
            "data": [{
                "First_Name": "Cher",
                "Last_Name": "N/A",
                "Email": "john@example.com",
                "Mobile": "555-0100"
            }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": [{"status": "success", "details": {"id": 9001}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = provider
        .create_candidate(&candidate("Cher", Some("555-0100")))
        .await
        .unwrap();
    assert_eq!(id, "9001");
}

async fn mount_email_search(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/recruit/v2/Candidates/search"))
        .and(query_param("criteria", "Email:equals:john@example.com"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_zoho_duplicate_resolves_existing_id() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("POST"))
        .and(path("/recruit/v2/Candidates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"status": "error", "code": "DUPLICATE_DATA", "message": "duplicate data"}]
        })))
        .mount(&server)
        .await;
    mount_email_search(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "existing_7"}]})),
    )
    .await;

    let id = provider
        .create_candidate(&candidate("John Doe", None))
        .await
        .unwrap();
    assert_eq!(id, "existing_7");
}

#[tokio::test]
async fn test_zoho_duplicate_reported_with_http_400() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("POST"))
        .and(path("/recruit/v2/Candidates"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "data": [{"status": "error", "code": "INVALID_DATA", "message": "Duplicate values found for Email"}]
        })))
        .mount(&server)
        .await;
    mount_email_search(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 77}, {"id": 78}]})),
    )
    .await;

    let id = provider
        .create_candidate(&candidate("John Doe", None))
        .await
        .unwrap();
    assert_eq!(id, "77");
}

#[tokio::test]
async fn test_zoho_duplicate_without_match_is_404() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("POST"))
        .and(path("/recruit/v2/Candidates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"status": "error", "code": "DUPLICATE_DATA", "message": "duplicate data"}]
        })))
        .mount(&server)
        .await;
    mount_email_search(&server, ResponseTemplate::new(204)).await;

    let err = provider
        .create_candidate(&candidate("John Doe", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ResourceNotFound { .. }));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_zoho_other_creation_error_is_400() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("POST"))
        .and(path("/recruit/v2/Candidates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"status": "error", "code": "MANDATORY_NOT_FOUND", "message": "required field not found"}]
        })))
        .mount(&server)
        .await;

    let err = provider
        .create_candidate(&candidate("John Doe", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(
        err.to_string(),
        "Zoho Candidate Creation Error: required field not found"
    );
}

#[tokio::test]
async fn test_zoho_create_without_id_is_500() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("POST"))
        .and(path("/recruit/v2/Candidates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{}]})))
        .mount(&server)
        .await;

    let err = provider
        .create_candidate(&candidate("John Doe", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Provider { .. }));
}

// ============================================================================
// Zoho: association
// ============================================================================

#[tokio::test]
async fn test_zoho_attach_success() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("PUT"))
        .and(path("/recruit/v2/Candidates/actions/associate"))
        .and(body_json(json!({
            "data": [{"ids": ["cand_123"], "jobids": ["42"], "status": "Associated"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"status": "success", "code": "SUCCESS"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = provider
        .attach_candidate_to_job("cand_123", "42")
        .await
        .unwrap();
    assert_eq!(id, "cand_123_42");
}

#[tokio::test]
async fn test_zoho_attach_error_entry_is_400() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("PUT"))
        .and(path("/recruit/v2/Candidates/actions/associate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"status": "error", "message": "Job opening is closed"}]
        })))
        .mount(&server)
        .await;

    let err = provider
        .attach_candidate_to_job("cand_123", "42")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(err.to_string(), "Zoho Association Error: Job opening is closed");
}

#[tokio::test]
async fn test_zoho_attach_transport_failure_is_500() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("PUT"))
        .and(path("/recruit/v2/Candidates/actions/associate"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = provider
        .attach_candidate_to_job("cand_123", "42")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 500);
}

// ============================================================================
// Zoho: applications
// ============================================================================

#[tokio::test]
async fn test_zoho_applications_page_failure_degrades_to_empty() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("GET"))
        .and(path("/recruit/v2/Applications/search"))
        .and(query_param("criteria", "($Job_Opening_Id:equals:42)"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "a1", "Full_Name": "Jane Roe", "Email": "jane@x.com", "Application_Status": "Interview-Scheduled"},
                {"id": "a2", "First_Name": "Sam"}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recruit/v2/Applications/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let apps = provider.get_applications("42").await.unwrap();

    assert_eq!(apps.len(), 2);
    assert_eq!(apps[0].candidate_name, "Jane Roe");
    assert_eq!(apps[0].status, "Interview-Scheduled");
    assert_eq!(apps[1].candidate_name, "Sam");
    assert_eq!(apps[1].email, "N/A");
    assert_eq!(apps[1].status, "APPLIED");
}

#[tokio::test]
async fn test_zoho_applications_first_page_failure_is_empty_list() {
    let server = MockServer::start().await;
    let provider = zoho(&server).await;

    Mock::given(method("GET"))
        .and(path("/recruit/v2/Applications/search"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    assert!(provider.get_applications("42").await.unwrap().is_empty());
}

// ============================================================================
// Zoho: normalization
// ============================================================================

#[test_case(json!({"Full_Name": "Jane Roe", "First_Name": "X"}), "Jane Roe" ; "full name wins")]
#[test_case(json!({"Full_Name": "", "First_Name": "Jane", "Last_Name": "Roe"}), "Jane Roe" ; "empty full name falls back")]
#[test_case(json!({"Last_Name": "Roe"}), "Roe" ; "last name only")]
#[test_case(json!({}), "Unknown" ; "nothing")]
fn test_zoho_application_name(raw: Value, expected: &str) {
    let provider = ZohoProvider::new(&Settings::default()).unwrap();
    assert_eq!(provider.normalize_application(&raw).candidate_name, expected);
}

#[test]
fn test_zoho_normalize_job_defaults() {
    let settings = Settings {
        zoho_portal_url: "https://recruit.zoho.eu/recruit/".to_string(),
        ..Default::default()
    };
    let provider = ZohoProvider::new(&settings).unwrap();
    let job = provider.normalize_job(&json!({"id": 5}));

    assert_eq!(job.id, "5");
    assert_eq!(job.title, "");
    assert_eq!(job.location, "N/A");
    assert_eq!(job.status, JobStatus::Closed);
    assert_eq!(
        job.external_url,
        "https://recruit.zoho.eu/recruit/ViewJob.na?digest=5"
    );
}

// ============================================================================
// Greenhouse
// ============================================================================

fn greenhouse_settings(server: &MockServer) -> Settings {
    Settings {
        provider: "greenhouse".to_string(),
        api_key: "harvest-key".to_string(),
        account_id: "1001".to_string(),
        base_url: format!("{}/v1", server.uri()),
        max_retries: 0,
        ..Default::default()
    }
}

fn basic_auth_header() -> String {
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode("harvest-key:")
    )
}

#[tokio::test]
async fn test_greenhouse_get_jobs() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/jobs"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .and(header("Authorization", basic_auth_header().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 11, "name": "Backend Engineer", "status": "open", "offices": [{"name": "Berlin"}]},
            {"id": 12, "name": "Recruiter", "status": "closed", "location": {"name": "Remote"}}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/jobs"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let provider = GreenhouseProvider::new(&greenhouse_settings(&server)).unwrap();
    let jobs = provider.get_jobs().await.unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id, "11");
    assert_eq!(jobs[0].location, "Berlin");
    assert_eq!(jobs[0].status, JobStatus::Open);
    assert_eq!(jobs[0].external_url, "https://app.greenhouse.io/plans/11");
    assert_eq!(jobs[1].location, "Remote");
    assert_eq!(jobs[1].status, JobStatus::Closed);
}

#[tokio::test]
async fn test_greenhouse_create_and_attach() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/candidates"))
        .and(header("On-Behalf-Of", "1001"))
        .and(body_json(json!({
            "first_name": "John",
            "last_name": "Doe",
            "email_addresses": [{"value": "john@example.com", "type": "personal"}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 555})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/candidates/555/applications"))
        .and(body_json(json!({"job_id": 42})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9876})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GreenhouseProvider::new(&greenhouse_settings(&server)).unwrap();
    let candidate_id = provider
        .create_candidate(&candidate("John Doe", None))
        .await
        .unwrap();
    let application_id = provider
        .attach_candidate_to_job(&candidate_id, "42")
        .await
        .unwrap();

    assert_eq!(candidate_id, "555");
    assert_eq!(application_id, "9876");
}

#[tokio::test]
async fn test_greenhouse_applications_filtered_by_job() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/applications"))
        .and(query_param("job_id", "42"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "status": "active",
                "jobs": [{"id": 42}],
                "candidate": {"first_name": "Jane", "last_name": "Roe", "email_addresses": [{"value": "jane@x.com"}]}
            },
            {"id": 2, "status": "active", "jobs": [{"id": 43}]}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/applications"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let provider = GreenhouseProvider::new(&greenhouse_settings(&server)).unwrap();
    let apps = provider.get_applications("42").await.unwrap();

    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].id, "1");
    assert_eq!(apps[0].candidate_name, "Jane Roe");
    assert_eq!(apps[0].email, "jane@x.com");
    assert_eq!(apps[0].status, "active");
}

#[tokio::test]
async fn test_greenhouse_rejected_key_is_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/jobs"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid Basic Auth credentials"})))
        .mount(&server)
        .await;

    let provider = GreenhouseProvider::new(&greenhouse_settings(&server)).unwrap();
    let err = provider.get_jobs().await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
}

// ============================================================================
// Workable
// ============================================================================

fn workable_settings(server: &MockServer) -> Settings {
    Settings {
        provider: "workable".to_string(),
        api_key: "workable-token".to_string(),
        base_url: format!("{}/spi/v3", server.uri()),
        max_retries: 0,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_workable_get_jobs_follows_next_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spi/v3/jobs"))
        .and(query_param("limit", "100"))
        .and(header("Authorization", "Bearer workable-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [{"id": "61884e", "shortcode": "GROOV001", "title": "Groove Tester", "state": "published",
                      "location": {"location_str": "Athens, Greece"}, "url": "https://acme.workable.com/jobs/1"}],
            "paging": {"next": format!("{}/spi/v3/jobs?since_id=2", server.uri())}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/spi/v3/jobs"))
        .and(query_param("since_id", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [{"id": "61884f", "title": "Archived", "state": "archived", "location": {"city": "Boston"},
                      "application_url": "https://acme.workable.com/jobs/2/apply"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = WorkableProvider::new(&workable_settings(&server)).unwrap();
    let jobs = provider.get_jobs().await.unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id, "GROOV001");
    assert_eq!(jobs[0].location, "Athens, Greece");
    assert_eq!(jobs[0].status, JobStatus::Open);
    assert_eq!(jobs[1].id, "61884f");
    assert_eq!(jobs[1].location, "Boston");
    assert_eq!(jobs[1].status, JobStatus::Closed);
    assert_eq!(jobs[1].external_url, "https://acme.workable.com/jobs/2/apply");
}

#[tokio::test]
async fn test_workable_existing_candidate_is_looked_up() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/spi/v3/jobs/42/candidates"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"error": "Candidate already exists for this job"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/spi/v3/candidates"))
        .and(query_param("email", "john@example.com"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"candidates": [{"id": "ce4da98"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = WorkableProvider::new(&workable_settings(&server)).unwrap();
    let id = provider
        .create_candidate(&candidate("John Doe", None))
        .await
        .unwrap();
    assert_eq!(id, "ce4da98");

    let application_id = provider.attach_candidate_to_job(&id, "42").await.unwrap();
    assert_eq!(application_id, "ce4da98_42");
}

#[tokio::test]
async fn test_workable_applications_drop_other_jobs() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spi/v3/jobs/GROOV001/candidates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                {"id": "c1", "name": "Jane Roe", "email": "jane@x.com", "stage": "Interview", "job": {"shortcode": "GROOV001"}},
                {"id": "c2", "firstname": "Sam", "lastname": "Lee", "job": {"shortcode": "OTHER"}},
                {"id": "c3", "firstname": "Ana", "lastname": ""}
            ]
        })))
        .mount(&server)
        .await;

    let provider = WorkableProvider::new(&workable_settings(&server)).unwrap();
    let apps = provider.get_applications("GROOV001").await.unwrap();

    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].id, "c1");
    assert_eq!(apps[0].status, "Interview");
}

#[tokio::test]
async fn test_workable_job_id_is_one_path_segment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spi/v3/jobs/A%2FB/candidates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"id": "c1", "name": "Jane Roe", "job": {"shortcode": "A/B"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = WorkableProvider::new(&workable_settings(&server)).unwrap();
    let apps = provider.get_applications("A/B").await.unwrap();

    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].candidate_name, "Jane Roe");
}

#[test_case(".." ; "parent segment")]
#[test_case("." ; "current segment")]
#[test_case("  " ; "blank")]
#[tokio::test]
async fn test_workable_dot_job_id_is_rejected(job_id: &str) {
    let server = MockServer::start().await;
    let provider = WorkableProvider::new(&workable_settings(&server)).unwrap();

    let err = provider.get_applications(job_id).await.unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_workable_paging_url_on_other_host_is_not_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spi/v3/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [{"id": "1", "title": "Groove Tester", "state": "published"}],
            "paging": {"next": "https://collector.example.net/spi/v3/jobs?since_id=2"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = WorkableProvider::new(&workable_settings(&server)).unwrap();
    let err = provider.get_jobs().await.unwrap_err();

    assert!(matches!(err, Error::Provider { .. }));
    assert!(err.to_string().contains("collector.example.net"));
}

#[test_case("GROOV001", "GROOV001" ; "plain shortcode")]
#[test_case("A/B", "A%2FB" ; "slash")]
#[test_case("x?y#z", "x%3Fy%23z" ; "query and fragment")]
#[test_case("v1.2-a_b~", "v1.2-a_b~" ; "unreserved kept")]
fn test_path_segment_escaping(raw: &str, expected: &str) {
    assert_eq!(path_segment(raw, "job_id").unwrap(), expected);
}

//! HTTP server mode
//!
//! Routes:
//! - `GET /jobs`
//! - `POST /candidates`
//! - `GET /applications?job_id=...`
//! - `GET /health`
//!
//! Every request builds its own service (and so its own provider) from the
//! shared settings.

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::response::Envelope;
use crate::services::{ApplicationService, CandidateService, JobsService};
use crate::types::ApplyRequest;

/// Query string of `GET /applications`
#[derive(Debug, Deserialize)]
struct ApplicationsQuery {
    job_id: Option<String>,
}

/// Build the application router
pub fn build_router(settings: Arc<Settings>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/jobs", get(list_jobs))
        .route("/candidates", post(create_candidate))
        .route("/applications", get(list_applications))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(settings)
}

/// Start the HTTP server
pub async fn serve(settings: Arc<Settings>, port: u16) -> Result<()> {
    let app = build_router(settings.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(
        "Starting HTTP server on http://{} (provider: {})",
        addr,
        settings.provider
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> Envelope {
    Envelope::error(404, "Not Found")
}

/// `GET /jobs`
async fn list_jobs(State(settings): State<Arc<Settings>>) -> Result<Envelope> {
    let jobs = JobsService::new(&settings)?.list_jobs().await?;
    Ok(Envelope::success(200, &jobs))
}

/// `POST /candidates`
async fn create_candidate(
    State(settings): State<Arc<Settings>>,
    body: Bytes,
) -> Result<Envelope> {
    let service = CandidateService::new(&settings)?;

    let request: ApplyRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ApplyRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| Error::validation(format!("Invalid JSON body: {e}")))?
    };

    let application_id = service.apply_to_job(request).await?;

    Ok(Envelope::success(
        201,
        &json!({
            "message": "Candidate applied successfully",
            "application_id": application_id
        }),
    ))
}

/// `GET /applications?job_id=...`
async fn list_applications(
    State(settings): State<Arc<Settings>>,
    Query(query): Query<ApplicationsQuery>,
) -> Result<Envelope> {
    let applications = ApplicationService::new(&settings)?
        .list_applications(query.job_id.as_deref())
        .await?;
    Ok(Envelope::success(200, &applications))
}

//! # ats-bridge
//!
//! One normalized HTTP API for jobs, candidates and applications in front of
//! an Applicant Tracking System chosen at deployment time.
//!
//! ## Features
//!
//! - **Providers**: Greenhouse (Harvest), Workable (SPI v3), Zoho Recruit
//! - **Auth**: HTTP Basic, bearer token, OAuth2 refresh-token exchange
//! - **Pagination**: page-number and cursor collection with a fetch ceiling
//! - **Create-or-find**: duplicate candidates resolve to the existing record
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ats_bridge::{services::JobsService, Settings};
//!
//! #[tokio::main]
//! async fn main() -> ats_bridge::Result<()> {
//!     let settings = Settings {
//!         provider: "zoho".to_string(),
//!         ..Default::default()
//!     };
//!     let jobs = JobsService::new(&settings)?.list_jobs().await?;
//!     println!("{}", serde_json::to_string_pretty(&jobs)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  axum server / CLI   GET /jobs  POST /candidates  ...     │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │ Envelope
//! ┌────────────────────────────┴─────────────────────────────┐
//! │  services   JobsService  CandidateService  ApplicationSvc │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │ dyn AtsProvider
//! ┌──────────────┬─────────────┴──────┬──────────────────────┐
//! │  Greenhouse  │     Workable       │        Zoho          │
//! ├──────────────┴────────────────────┴──────────────────────┤
//! │  http (retry, rate limit)  auth  pagination              │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error taxonomy
pub mod error;

/// Normalized records
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Deployment settings
pub mod config;

/// ATS provider adapters
pub mod providers;

/// Orchestration over providers
pub mod services;

/// Response envelope
pub mod response;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::Settings;
pub use error::{Error, Result};
pub use providers::{create_provider, AtsProvider};
pub use response::Envelope;
pub use types::{Application, ApplyRequest, CandidateApplication, Job, JobStatus};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

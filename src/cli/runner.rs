//! CLI runner - executes commands

use crate::auth::exchange_authorization_code;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cli::server::serve;
use crate::error::Result;
use crate::providers::ZohoProvider;
use crate::services::{ApplicationService, CandidateService, JobsService};
use crate::types::ApplyRequest;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        let settings = &self.cli.settings;

        match &self.cli.command {
            Commands::Serve { port } => serve(Arc::new(settings.clone()), *port).await,

            Commands::Jobs => {
                let jobs = JobsService::new(settings)?.list_jobs().await?;
                self.emit(&jobs)
            }

            Commands::Applications { job_id } => {
                let applications = ApplicationService::new(settings)?
                    .list_applications(Some(job_id))
                    .await?;
                self.emit(&applications)
            }

            Commands::Apply {
                name,
                email,
                phone,
                job_id,
            } => {
                let request = ApplyRequest {
                    name: Some(name.clone()),
                    email: Some(email.clone()),
                    phone: phone.clone(),
                    job_id: Some(job_id.clone()),
                };
                let application_id = CandidateService::new(settings)?
                    .apply_to_job(request)
                    .await?;
                self.emit(&json!({
                    "message": "Candidate applied successfully",
                    "application_id": application_id
                }))
            }

            Commands::ZohoToken {
                client_id,
                client_secret,
                grant_code,
                redirect_uri,
                token_url,
            } => {
                eprintln!("Exchanging grant code at: {token_url}");
                let grant = exchange_authorization_code(
                    &reqwest::Client::new(),
                    token_url,
                    client_id,
                    client_secret,
                    grant_code,
                    redirect_uri,
                )
                .await?;

                self.emit(&json!({
                    "refresh_token": grant.refresh_token,
                    "access_token": grant.access_token,
                    "api_domain": grant.api_domain,
                }))?;
                eprintln!("Add the refresh token to your .env file as ZOHO_REFRESH_TOKEN.");
                Ok(())
            }

            Commands::ZohoFields { modules } => {
                let provider = ZohoProvider::new(settings)?;
                for module in modules {
                    let fields = provider.module_fields(module).await?;
                    let interesting: Vec<Value> = fields
                        .iter()
                        .filter(|f| is_lookup_or_job_field(f))
                        .map(|f| {
                            json!({
                                "label": f.get("field_label"),
                                "api_name": f.get("api_name"),
                                "data_type": f.get("data_type"),
                            })
                        })
                        .collect();

                    self.emit(&json!({ "module": module, "fields": interesting }))?;
                }
                Ok(())
            }
        }
    }

    /// Print a value to stdout in the selected format
    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let output = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{output}");
        Ok(())
    }
}

/// Lookup fields, or fields whose label mentions a job or opening
fn is_lookup_or_job_field(field: &Value) -> bool {
    let label = field
        .get("field_label")
        .and_then(Value::as_str)
        .unwrap_or("");

    field.get("data_type").and_then(Value::as_str) == Some("lookup")
        || label.contains("Job")
        || label.contains("Opening")
}

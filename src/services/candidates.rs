use crate::config::Settings;
use crate::error::Result;
use crate::providers::{create_provider, AtsProvider};
use crate::types::ApplyRequest;
use tracing::{info, warn};

/// Creates candidates and applies them to jobs
pub struct CandidateService {
    provider: Box<dyn AtsProvider>,
}

impl CandidateService {
    /// Build over the provider selected by `settings`
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self::with_provider(create_provider(settings)?))
    }

    pub fn with_provider(provider: Box<dyn AtsProvider>) -> Self {
        Self { provider }
    }

    /// Validate the request, create (or find) the candidate, then attach
    /// them to the job. Returns the application id.
    ///
    /// Nothing is sent to the vendor unless `name`, `email` and `job_id` are
    /// all present. A failed attach leaves the candidate in the vendor.
    pub async fn apply_to_job(&self, request: ApplyRequest) -> Result<String> {
        let application = request.validate()?;

        let candidate_id = self.provider.create_candidate(&application).await?;

        let application_id = self
            .provider
            .attach_candidate_to_job(&candidate_id, &application.job_id)
            .await
            .inspect_err(|e| {
                warn!(
                    "Candidate {candidate_id} was created in {} but not attached to job {}: {e}",
                    self.provider.name(),
                    application.job_id
                );
            })?;

        info!(
            "Applied candidate {candidate_id} to job {} ({application_id})",
            application.job_id
        );
        Ok(application_id)
    }
}

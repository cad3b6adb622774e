use crate::config::Settings;
use crate::error::{Error, Result};
use crate::providers::{create_provider, AtsProvider};
use crate::types::Application;

/// Lists applications for a job
pub struct ApplicationService {
    provider: Box<dyn AtsProvider>,
}

impl ApplicationService {
    /// Build over the provider selected by `settings`
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self::with_provider(create_provider(settings)?))
    }

    pub fn with_provider(provider: Box<dyn AtsProvider>) -> Self {
        Self { provider }
    }

    /// Applications for `job_id`; an absent or blank id is rejected before
    /// any vendor call.
    pub async fn list_applications(&self, job_id: Option<&str>) -> Result<Vec<Application>> {
        let job_id = job_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::validation("job_id query parameter is required."))?;

        self.provider.get_applications(job_id).await
    }
}

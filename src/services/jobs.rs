use crate::config::Settings;
use crate::error::Result;
use crate::providers::{create_provider, AtsProvider};
use crate::types::Job;

/// Lists normalized jobs
pub struct JobsService {
    provider: Box<dyn AtsProvider>,
}

impl JobsService {
    /// Build over the provider selected by `settings`
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self::with_provider(create_provider(settings)?))
    }

    pub fn with_provider(provider: Box<dyn AtsProvider>) -> Self {
        Self { provider }
    }

    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        self.provider.get_jobs().await
    }
}

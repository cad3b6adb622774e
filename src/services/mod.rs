//! Orchestration over the provider contract
//!
//! Services validate caller input and sequence provider calls. Each one owns
//! its provider; building a service per request gives every request a fresh
//! provider and token cache.

mod applications;
mod candidates;
mod jobs;

pub use applications::ApplicationService;
pub use candidates::CandidateService;
pub use jobs::JobsService;

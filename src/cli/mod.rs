//! CLI module
//!
//! # Commands
//!
//! - `serve` - Start the HTTP server
//! - `jobs` - List normalized jobs
//! - `applications` - List applications for a job
//! - `apply` - Create a candidate and apply them to a job
//! - `zoho-token` - Exchange a Zoho grant code for a refresh token
//! - `zoho-fields` - Inspect Zoho module fields

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{build_router, serve};

//! CLI commands and argument parsing

use crate::config::{Settings, DEFAULT_ZOHO_TOKEN_URL};
use clap::{Parser, Subcommand};

/// Normalized jobs/candidates/applications API over an ATS backend
#[derive(Parser, Debug)]
#[command(name = "ats-bridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    /// Output format for one-shot commands
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "8080")]
        port: u16,
    },

    /// List normalized jobs
    Jobs,

    /// List applications for a job
    Applications {
        /// Job id in the configured ATS
        #[arg(long)]
        job_id: String,
    },

    /// Create a candidate and apply them to a job
    Apply {
        /// Full name; the first word becomes the first name
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        job_id: String,
    },

    /// Exchange a Zoho grant code for a refresh token
    ZohoToken {
        /// Zoho OAuth client id
        #[arg(long)]
        client_id: String,

        /// Zoho OAuth client secret
        #[arg(long)]
        client_secret: String,

        /// One-time grant code from the Zoho API console
        #[arg(long)]
        grant_code: String,

        /// Redirect URI registered for the client
        #[arg(long)]
        redirect_uri: String,

        /// Zoho accounts token endpoint
        #[arg(long, default_value = DEFAULT_ZOHO_TOKEN_URL)]
        token_url: String,
    },

    /// Print lookup and job-related fields of Zoho modules
    ZohoFields {
        /// Modules to inspect
        #[arg(long, value_delimiter = ',', default_value = "Candidates,JobOpenings")]
        modules: Vec<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}

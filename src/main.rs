//! ats-bridge CLI
//!
//! Serves the normalized API or runs one-shot commands against the
//! configured ATS.

use ats_bridge::cli::{Cli, Runner};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.settings.validate();

    Runner::new(cli).run().await?;
    Ok(())
}

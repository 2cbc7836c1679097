//! Binary crate for the `forecast` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive prompting
//! - Human-friendly output formatting

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;
mod prompt;
mod render;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

/// Initialize the global tracing subscriber on stderr, so stdout only carries
/// prompts and the report.
///
/// - Uses `RUST_LOG` if set (e.g. `RUST_LOG=forecast_cli=debug,forecast_core=debug`)
/// - Otherwise only warnings from our crates are shown.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("forecast_cli=warn,forecast_core=warn"));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

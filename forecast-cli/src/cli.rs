use std::io::{self, IsTerminal, Write};

use anyhow::Context;
use clap::Parser;
use forecast_core::{
    Config, ConfigError, WeatherProvider, config::DEFAULT_ENV_FILE, provider::provider_from_config,
};
use tracing::{debug, info};

use crate::{
    prompt::{InquirePrompter, LinePrompter, Prompter, collect_query},
    render,
};

/// Top-level CLI struct. Everything else is asked interactively.
#[derive(Debug, Parser)]
#[command(
    name = "forecast",
    version,
    about = "Interactive weather forecast client for WeatherAPI.com",
    long_about = "Interactive weather forecast client for WeatherAPI.com.\n\n\
                  Reads the API key from WEATHER_TOKEN (a .env file in the working \
                  directory is loaded first, if present), then asks for a location, \
                  a number of forecast days and whether to include air quality and alerts."
)]
pub struct Cli {}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let load = || Config::load(DEFAULT_ENV_FILE);

        if io::stdin().is_terminal() {
            let mut prompter = InquirePrompter::new();
            start_session(load, provider_from_config, &mut prompter, &mut io::stdout()).await
        } else {
            let mut prompter = LinePrompter::new(io::stdin().lock(), io::stdout());
            start_session(load, provider_from_config, &mut prompter, &mut io::stdout()).await
        }
    }
}

/// Resolve configuration and build the provider, then run the session.
/// A missing key fails here, before the first prompt.
pub async fn start_session<L, F, P, W>(
    load_config: L,
    make_provider: F,
    prompter: &mut P,
    out: &mut W,
) -> anyhow::Result<()>
where
    L: FnOnce() -> Result<Config, ConfigError>,
    F: FnOnce(&Config) -> Box<dyn WeatherProvider>,
    P: Prompter + ?Sized,
    W: Write,
{
    let config = load_config().context("Failed to load configuration")?;
    debug!(?config, "Configuration loaded");

    let provider = make_provider(&config);
    run_session(prompter, provider.as_ref(), out).await
}

/// One full run: prompt, fetch once, print.
pub async fn run_session<P, W>(
    prompter: &mut P,
    provider: &dyn WeatherProvider,
    out: &mut W,
) -> anyhow::Result<()>
where
    P: Prompter + ?Sized,
    W: Write,
{
    let query = collect_query(prompter)?;
    info!(?query, "Collected query");

    let report = provider
        .get_report(&query)
        .await
        .with_context(|| format!("Failed to get weather for '{}'", query.location))?;

    render::write_report(out, &report, &query).context("Failed to write report")?;
    out.flush().context("Failed to flush report")?;

    Ok(())
}

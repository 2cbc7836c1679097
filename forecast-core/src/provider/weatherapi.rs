use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    decode::DecodeStrategy,
    error::WeatherError,
    model::WeatherReport,
    query::ForecastQuery,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1/";

#[derive(Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    decoder: DecodeStrategy,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            decoder: DecodeStrategy::default(),
            http: Client::new(),
        }
    }

    /// Point the provider at another host, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn with_decoder(mut self, decoder: DecodeStrategy) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn request_url(&self, query: &ForecastQuery) -> Result<Url, WeatherError> {
        let base = Url::parse(&self.base_url)
            .map_err(|err| WeatherError::InvalidUrl(format!("{}: {err}", self.base_url)))?;
        query.to_url(&base, &self.api_key)
    }
}

impl fmt::Debug for WeatherApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiProvider")
            .field("base_url", &self.base_url)
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn get_report(&self, query: &ForecastQuery) -> Result<WeatherReport, WeatherError> {
        let endpoint = query.endpoint().name();
        let url = self.request_url(query)?;

        // The URL carries the API key, so only log the query itself.
        debug!(endpoint, location = %query.location, days = query.days, "Requesting WeatherAPI.com");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| WeatherError::Body { endpoint, source })?;

        if !status.is_success() {
            let api_message = api_error_message(&body);
            warn!(
                endpoint,
                %status,
                api_message = ?api_message,
                body = %log_excerpt(&body),
                "WeatherAPI.com request failed"
            );

            return Err(WeatherError::Status { endpoint, status, api_message, body });
        }

        debug!(endpoint, bytes = body.len(), "Received WeatherAPI.com response");

        self.decoder.decode(&body).map_err(|source| WeatherError::Decode { endpoint, source })
    }
}

/// `{"error": {"code": 1006, "message": "No matching location found."}}`
#[derive(Debug, Deserialize)]
struct WaErrorEnvelope {
    error: WaErrorBody,
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    message: String,
}

fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<WaErrorEnvelope>(body).ok().map(|envelope| envelope.error.message)
}

/// Short form of an error body for the log line. The error itself keeps it whole.
fn log_excerpt(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

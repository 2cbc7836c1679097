use reqwest::StatusCode;
use thiserror::Error;

/// Failures while talking to WeatherAPI.com. All of them are fatal for a run.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid WeatherAPI base URL {0}")]
    InvalidUrl(String),

    #[error("Failed to send request to WeatherAPI.com ({endpoint})")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read WeatherAPI {endpoint} response body")]
    Body {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error(
        "WeatherAPI {endpoint} request failed with status {status}{}: {body}",
        api_hint(.api_message)
    )]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        api_message: Option<String>,
        body: String,
    },

    #[error("Failed to decode WeatherAPI {endpoint} response")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: DecodeError,
    },
}

/// Problems turning a response body into a [`crate::WeatherReport`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Response body is not valid JSON: {0}")]
    Json(String),

    #[error("Response is missing the `{0}` section")]
    MissingSection(&'static str),

    #[error("Malformed `{section}` section: {detail}")]
    Section { section: &'static str, detail: String },

    #[error("Field `{field}` is not of expected type {expected}")]
    FieldType { field: String, expected: &'static str },
}

fn api_hint(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(" ({message})"),
        None => String::new(),
    }
}

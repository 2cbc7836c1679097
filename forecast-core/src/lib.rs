//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration (API key from the environment / a `.env` file)
//! - The query model and its URL encoding
//! - The WeatherAPI.com provider and response decoding
//! - Shared domain models and errors
//!
//! It is used by `forecast-cli`, but does no terminal I/O of its own.

pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod provider;
pub mod query;

pub use config::{Config, ConfigError};
pub use decode::DecodeStrategy;
pub use error::{DecodeError, WeatherError};
pub use model::{AirQuality, Alert, Astro, Current, ForecastDay, Location, WeatherReport};
pub use provider::WeatherProvider;
pub use query::{DaysAnswer, Endpoint, ForecastQuery, parse_days, parse_flag};
pub use reqwest::StatusCode;

use crate::{
    Config, ForecastQuery, WeatherError, WeatherReport, provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

/// Source of weather reports. One call is one network round trip.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_report(&self, query: &ForecastQuery) -> Result<WeatherReport, WeatherError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    Box::new(WeatherApiProvider::new(config.api_key().to_owned()))
}

use reqwest::Url;

use crate::error::WeatherError;

pub const DEFAULT_DAYS: u8 = 1;
pub const MAX_DAYS: u8 = 10;

/// WeatherAPI.com endpoint a query is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Current => "current",
            Endpoint::Forecast => "forecast",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Current => "current.json",
            Endpoint::Forecast => "forecast.json",
        }
    }
}

/// Everything the user asked for in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery {
    pub location: String,
    pub days: u8,
    pub air_quality: bool,
    pub alerts: bool,
}

impl ForecastQuery {
    pub fn new(location: impl Into<String>) -> Self {
        Self { location: location.into(), days: DEFAULT_DAYS, air_quality: false, alerts: false }
    }

    pub fn with_days(mut self, days: u8) -> Self {
        self.days = days;
        self
    }

    pub fn with_air_quality(mut self, enabled: bool) -> Self {
        self.air_quality = enabled;
        self
    }

    pub fn with_alerts(mut self, enabled: bool) -> Self {
        self.alerts = enabled;
        self
    }

    /// Alerts are only served by `forecast.json`, so a single-day query
    /// without alerts can use the lighter `current.json`.
    pub fn endpoint(&self) -> Endpoint {
        if self.days > 1 || self.alerts { Endpoint::Forecast } else { Endpoint::Current }
    }

    /// Query parameters in the order they are sent.
    pub fn query_pairs(&self, api_key: &str) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("key", api_key.to_string()), ("q", self.location.clone())];

        match self.endpoint() {
            Endpoint::Forecast => {
                pairs.push(("days", self.days.to_string()));
                pairs.push(("aqi", yes_no(self.air_quality).to_string()));
                pairs.push(("alerts", yes_no(self.alerts).to_string()));
            }
            Endpoint::Current => {
                pairs.push(("aqi", yes_no(self.air_quality).to_string()));
            }
        }

        pairs
    }

    /// Full request URL with every value percent-encoded.
    ///
    /// `base` must end with a `/` so the endpoint path is appended to it.
    pub fn to_url(&self, base: &Url, api_key: &str) -> Result<Url, WeatherError> {
        let mut url = base
            .join(self.endpoint().path())
            .map_err(|err| WeatherError::InvalidUrl(format!("{base}: {err}")))?;
        url.query_pairs_mut().extend_pairs(self.query_pairs(api_key));
        Ok(url)
    }
}

/// Outcome of interpreting the "number of days" answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaysAnswer {
    pub days: u8,
    pub warning: Option<String>,
}

/// Accepts `1..=10`; anything else falls back to one day with a warning.
pub fn parse_days(input: &str) -> DaysAnswer {
    let trimmed = input.trim();

    match trimmed.parse::<u8>() {
        Ok(days) if (1..=MAX_DAYS).contains(&days) => DaysAnswer { days, warning: None },
        _ => DaysAnswer {
            days: DEFAULT_DAYS,
            warning: Some(format!(
                "Invalid number of days '{trimmed}', expected 1-{MAX_DAYS}. Defaulting to {DEFAULT_DAYS}."
            )),
        },
    }
}

/// Only a case-insensitive "yes" enables a flag.
pub fn parse_flag(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("yes")
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

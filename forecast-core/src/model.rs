/// Decoded WeatherAPI.com response, limited to what gets printed.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: Location,
    pub current: Current,
    /// Daily records in the order the server returned them.
    pub forecast: Vec<ForecastDay>,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Current {
    pub temp_c: f64,
    pub condition: String,
    pub air_quality: Option<AirQuality>,
}

/// Pollutant concentrations (μg/m³) and the two categorical indices.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQuality {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub us_epa_index: u8,
    pub gb_defra_index: u8,
}

impl AirQuality {
    /// Human label for the US EPA index (1..=6).
    pub fn epa_label(&self) -> Option<&'static str> {
        match self.us_epa_index {
            1 => Some("Good"),
            2 => Some("Moderate"),
            3 => Some("Unhealthy for sensitive groups"),
            4 => Some("Unhealthy"),
            5 => Some("Very unhealthy"),
            6 => Some("Hazardous"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    /// `YYYY-MM-DD`, as sent by the server.
    pub date: String,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub condition: String,
    pub astro: Option<Astro>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
}

/// Timestamps are kept verbatim; no timezone handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub headline: String,
    pub description: String,
    pub effective: String,
    pub expires: String,
}

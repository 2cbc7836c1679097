//! Turning WeatherAPI.com response bodies into [`WeatherReport`]s.
//!
//! Two strategies are available:
//! - [`DecodeStrategy::Strict`] declares the expected shape per top-level
//!   section and reports the first broken section by name. `location` and
//!   `current` are required; `forecast`, `alerts` and `current.air_quality`
//!   are dropped (with a warning) when absent or malformed.
//! - [`DecodeStrategy::Dynamic`] walks an untyped JSON tree and extracts each
//!   field on demand, failing on the first field with an unexpected type.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use crate::{
    error::DecodeError,
    model::{AirQuality, Alert, Astro, Current, ForecastDay, Location, WeatherReport},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeStrategy {
    #[default]
    Strict,
    Dynamic,
}

impl DecodeStrategy {
    pub fn decode(self, body: &str) -> Result<WeatherReport, DecodeError> {
        match self {
            DecodeStrategy::Strict => decode_strict(body),
            DecodeStrategy::Dynamic => decode_dynamic(body),
        }
    }
}

pub fn decode_strict(body: &str) -> Result<WeatherReport, DecodeError> {
    let mut root = parse_json(body)?;

    let location: WaLocation = required_section(&mut root, "location")?;

    let mut current_value =
        take_section(&mut root, "current").ok_or(DecodeError::MissingSection("current"))?;
    let air_quality_value = current_value.as_object_mut().and_then(|obj| obj.remove("air_quality"));
    let current: WaCurrent = section_from_value("current", current_value)?;

    let air_quality: Option<AirQuality> =
        optional_section::<WaAirQuality>("current.air_quality", air_quality_value).map(Into::into);
    let forecast: Vec<ForecastDay> = optional_section::<WaForecast>("forecast", take_section(&mut root, "forecast"))
        .map(|f| f.forecastday.into_iter().map(Into::into).collect())
        .unwrap_or_default();
    let alerts: Vec<Alert> = optional_section::<WaAlerts>("alerts", take_section(&mut root, "alerts"))
        .map(|a| a.alert.into_iter().map(Into::into).collect())
        .unwrap_or_default();

    Ok(WeatherReport {
        location: location.into(),
        current: Current { temp_c: current.temp_c, condition: current.condition.text, air_quality },
        forecast,
        alerts,
    })
}

pub fn decode_dynamic(body: &str) -> Result<WeatherReport, DecodeError> {
    let root = parse_json(body)?;
    let root = Node::root(&root);

    let location = root.child("location")?;
    let current = root.child("current")?;

    let air_quality = match current.optional_child("air_quality") {
        Some(aq) => Some(AirQuality {
            co: aq.f64("co")?,
            no2: aq.f64("no2")?,
            o3: aq.f64("o3")?,
            so2: aq.f64("so2")?,
            pm2_5: aq.f64("pm2_5")?,
            pm10: aq.f64("pm10")?,
            us_epa_index: aq.u8("us-epa-index")?,
            gb_defra_index: aq.u8("gb-defra-index")?,
        }),
        None => None,
    };

    let mut forecast = Vec::new();
    if let Some(section) = root.optional_child("forecast") {
        for day in section.optional_array("forecastday")? {
            let summary = day.child("day")?;
            let astro = match day.optional_child("astro") {
                Some(astro) => Some(Astro { sunrise: astro.str("sunrise")?, sunset: astro.str("sunset")? }),
                None => None,
            };
            forecast.push(ForecastDay {
                date: day.str("date")?,
                max_temp_c: summary.f64("maxtemp_c")?,
                min_temp_c: summary.f64("mintemp_c")?,
                condition: summary.child("condition")?.str("text")?,
                astro,
            });
        }
    }

    let mut alerts = Vec::new();
    if let Some(section) = root.optional_child("alerts") {
        for alert in section.optional_array("alert")? {
            alerts.push(Alert {
                headline: alert.str("headline")?,
                description: alert.str("desc")?,
                effective: alert.str("effective")?,
                expires: alert.str("expires")?,
            });
        }
    }

    Ok(WeatherReport {
        location: Location {
            name: location.str("name")?,
            region: location.str("region")?,
            country: location.str("country")?,
        },
        current: Current {
            temp_c: current.f64("temp_c")?,
            condition: current.child("condition")?.str("text")?,
            air_quality,
        },
        forecast,
        alerts,
    })
}

fn parse_json(body: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(body).map_err(|err| DecodeError::Json(err.to_string()))
}

/// Detach a top-level section; `null` counts as absent.
fn take_section(root: &mut Value, name: &str) -> Option<Value> {
    root.get_mut(name).map(Value::take).filter(|value| !value.is_null())
}

fn section_from_value<T: DeserializeOwned>(
    section: &'static str,
    value: Value,
) -> Result<T, DecodeError> {
    serde_json::from_value(value)
        .map_err(|err| DecodeError::Section { section, detail: err.to_string() })
}

fn required_section<T: DeserializeOwned>(
    root: &mut Value,
    section: &'static str,
) -> Result<T, DecodeError> {
    let value = take_section(root, section).ok_or(DecodeError::MissingSection(section))?;
    section_from_value(section, value)
}

fn optional_section<T: DeserializeOwned>(section: &'static str, value: Option<Value>) -> Option<T> {
    match section_from_value(section, value?) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(section, error = %err, "Ignoring malformed optional section");
            None
        }
    }
}

/// Cursor into an untyped JSON tree that remembers its dotted path.
#[derive(Debug, Clone)]
struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    fn root(value: &'a Value) -> Self {
        Self { value, path: String::new() }
    }

    fn path_of(&self, key: &str) -> String {
        if self.path.is_empty() { key.to_string() } else { format!("{}.{key}", self.path) }
    }

    fn get(&self, key: &str, expected: &'static str) -> Result<&'a Value, DecodeError> {
        self.value.get(key).ok_or_else(|| self.mismatch(key, expected))
    }

    fn mismatch(&self, key: &str, expected: &'static str) -> DecodeError {
        DecodeError::FieldType { field: self.path_of(key), expected }
    }

    fn child(&self, key: &str) -> Result<Node<'a>, DecodeError> {
        let value = self.get(key, "object")?;
        if !value.is_object() {
            return Err(self.mismatch(key, "object"));
        }
        Ok(Node { value, path: self.path_of(key) })
    }

    fn optional_child(&self, key: &str) -> Option<Node<'a>> {
        match self.value.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(Node { value, path: self.path_of(key) }),
        }
    }

    /// Elements of an array field; a missing or `null` field is an empty array.
    fn optional_array(&self, key: &str) -> Result<Vec<Node<'a>>, DecodeError> {
        let items = match self.value.get(key) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(value) => value.as_array().ok_or_else(|| self.mismatch(key, "array"))?,
        };
        let path = self.path_of(key);

        Ok(items
            .iter()
            .enumerate()
            .map(|(i, value)| Node { value, path: format!("{path}[{i}]") })
            .collect())
    }

    fn str(&self, key: &str) -> Result<String, DecodeError> {
        self.get(key, "string")?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.mismatch(key, "string"))
    }

    fn f64(&self, key: &str) -> Result<f64, DecodeError> {
        self.get(key, "number")?.as_f64().ok_or_else(|| self.mismatch(key, "number"))
    }

    fn u8(&self, key: &str) -> Result<u8, DecodeError> {
        self.get(key, "integer")?
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(|| self.mismatch(key, "integer"))
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    region: String,
    country: String,
}

impl From<WaLocation> for Location {
    fn from(wa: WaLocation) -> Self {
        Self { name: wa.name, region: wa.region, country: wa.country }
    }
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaAirQuality {
    co: f64,
    no2: f64,
    o3: f64,
    so2: f64,
    pm2_5: f64,
    pm10: f64,
    #[serde(rename = "us-epa-index")]
    us_epa_index: u8,
    #[serde(rename = "gb-defra-index")]
    gb_defra_index: u8,
}

impl From<WaAirQuality> for AirQuality {
    fn from(wa: WaAirQuality) -> Self {
        Self {
            co: wa.co,
            no2: wa.no2,
            o3: wa.o3,
            so2: wa.so2,
            pm2_5: wa.pm2_5,
            pm10: wa.pm10,
            us_epa_index: wa.us_epa_index,
            gb_defra_index: wa.gb_defra_index,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaAstro {
    sunrise: String,
    sunset: String,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    day: WaDay,
    astro: Option<WaAstro>,
}

impl From<WaForecastDay> for ForecastDay {
    fn from(wa: WaForecastDay) -> Self {
        Self {
            date: wa.date,
            max_temp_c: wa.day.maxtemp_c,
            min_temp_c: wa.day.mintemp_c,
            condition: wa.day.condition.text,
            astro: wa.astro.map(|a| Astro { sunrise: a.sunrise, sunset: a.sunset }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    #[serde(default)]
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaAlert {
    headline: String,
    desc: String,
    effective: String,
    expires: String,
}

impl From<WaAlert> for Alert {
    fn from(wa: WaAlert) -> Self {
        Self { headline: wa.headline, description: wa.desc, effective: wa.effective, expires: wa.expires }
    }
}

#[derive(Debug, Deserialize)]
struct WaAlerts {
    #[serde(default)]
    alert: Vec<WaAlert>,
}

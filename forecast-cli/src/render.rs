use std::io::{self, Write};

use chrono::NaiveDate;
use forecast_core::{AirQuality, Alert, ForecastDay, ForecastQuery, WeatherReport};

/// Print the report sections the user asked for and the server returned.
pub fn write_report<W: Write>(
    out: &mut W,
    report: &WeatherReport,
    query: &ForecastQuery,
) -> io::Result<()> {
    let location = &report.location;
    writeln!(out, "Location: {}, {}, {}", location.name, location.region, location.country)?;
    writeln!(out, "Temperature: {:.2}°C", report.current.temp_c)?;
    writeln!(out, "Condition: {}", report.current.condition)?;

    if let Some(aq) = report.current.air_quality.as_ref().filter(|_| query.air_quality) {
        write_air_quality(out, aq)?;
    }

    if shows_forecast(report, query) {
        write_forecast(out, &report.forecast)?;
    }

    if query.alerts && !report.alerts.is_empty() {
        write_alerts(out, &report.alerts)?;
    }

    Ok(())
}

/// The forecast block is only worth printing for multi-day requests.
fn shows_forecast(report: &WeatherReport, query: &ForecastQuery) -> bool {
    query.days > 1 && !report.forecast.is_empty()
}

fn write_air_quality<W: Write>(out: &mut W, aq: &AirQuality) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Air Quality:")?;
    match aq.epa_label() {
        Some(label) => writeln!(out, "  US EPA Index: {} ({label})", aq.us_epa_index)?,
        None => writeln!(out, "  US EPA Index: {}", aq.us_epa_index)?,
    }
    writeln!(out, "  GB DEFRA Index: {}", aq.gb_defra_index)?;

    for (name, value) in [
        ("CO", aq.co),
        ("NO2", aq.no2),
        ("O3", aq.o3),
        ("SO2", aq.so2),
        ("PM2.5", aq.pm2_5),
        ("PM10", aq.pm10),
    ] {
        writeln!(out, "  {name}: {value:.2} μg/m³")?;
    }

    Ok(())
}

fn write_forecast<W: Write>(out: &mut W, days: &[ForecastDay]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Forecast:")?;

    for day in days {
        writeln!(out, "  {}", day_header(&day.date))?;
        writeln!(out, "    Max: {:.2}°C, Min: {:.2}°C", day.max_temp_c, day.min_temp_c)?;
        writeln!(out, "    Condition: {}", day.condition)?;
        if let Some(astro) = &day.astro {
            writeln!(out, "    Sunrise: {}, Sunset: {}", astro.sunrise, astro.sunset)?;
        }
    }

    Ok(())
}

fn write_alerts<W: Write>(out: &mut W, alerts: &[Alert]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Alerts:")?;

    for alert in alerts {
        writeln!(out, "  {}", alert.headline)?;
        writeln!(out, "    Description: {}", alert.description)?;
        writeln!(out, "    Effective: {}", alert.effective)?;
        writeln!(out, "    Expires: {}", alert.expires)?;
    }

    Ok(())
}

/// `2024-05-01` -> `Wednesday, May 1`; unparseable dates are shown as-is.
fn day_header(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%A, %B %-d").to_string())
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_core::{Astro, Current, Location};

    fn report() -> WeatherReport {
        WeatherReport {
            location: Location {
                name: "Austin".into(),
                region: "Texas".into(),
                country: "United States of America".into(),
            },
            current: Current {
                temp_c: 21.1,
                condition: "Partly cloudy".into(),
                air_quality: Some(AirQuality {
                    co: 223.6,
                    no2: 11.3,
                    o3: 52.9,
                    so2: 2.4,
                    pm2_5: 6.1,
                    pm10: 9.8,
                    us_epa_index: 2,
                    gb_defra_index: 1,
                }),
            },
            forecast: vec![
                ForecastDay {
                    date: "2024-05-01".into(),
                    max_temp_c: 29.4,
                    min_temp_c: 20.2,
                    condition: "Patchy rain nearby".into(),
                    astro: Some(Astro { sunrise: "06:48 AM".into(), sunset: "08:12 PM".into() }),
                },
                ForecastDay {
                    date: "2024-05-02".into(),
                    max_temp_c: 30.1,
                    min_temp_c: 21.0,
                    condition: "Sunny".into(),
                    astro: None,
                },
            ],
            alerts: vec![Alert {
                headline: "Flood Watch".into(),
                description: "Low water crossings may flood.".into(),
                effective: "2024-05-01T04:02:00-05:00".into(),
                expires: "2024-05-02T07:00:00-05:00".into(),
            }],
        }
    }

    fn render(report: &WeatherReport, query: &ForecastQuery) -> String {
        let mut out = Vec::new();
        write_report(&mut out, report, query).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn current_conditions_only() {
        let out = render(&report(), &ForecastQuery::new("Austin"));

        assert_eq!(
            out,
            "Location: Austin, Texas, United States of America\n\
             Temperature: 21.10°C\n\
             Condition: Partly cloudy\n"
        );
    }

    #[test]
    fn every_section_in_order() {
        let query = ForecastQuery::new("Austin").with_days(2).with_air_quality(true).with_alerts(true);
        let out = render(&report(), &query);

        let expected = "\
Location: Austin, Texas, United States of America
Temperature: 21.10°C
Condition: Partly cloudy

Air Quality:
  US EPA Index: 2 (Moderate)
  GB DEFRA Index: 1
  CO: 223.60 μg/m³
  NO2: 11.30 μg/m³
  O3: 52.90 μg/m³
  SO2: 2.40 μg/m³
  PM2.5: 6.10 μg/m³
  PM10: 9.80 μg/m³

Forecast:
  Wednesday, May 1
    Max: 29.40°C, Min: 20.20°C
    Condition: Patchy rain nearby
    Sunrise: 06:48 AM, Sunset: 08:12 PM
  Thursday, May 2
    Max: 30.10°C, Min: 21.00°C
    Condition: Sunny

Alerts:
  Flood Watch
    Description: Low water crossings may flood.
    Effective: 2024-05-01T04:02:00-05:00
    Expires: 2024-05-02T07:00:00-05:00
";
        assert_eq!(out, expected);
    }

    #[test]
    fn unrequested_sections_are_hidden_even_when_returned() {
        let query = ForecastQuery::new("Austin").with_days(2);
        let out = render(&report(), &query);

        assert!(out.contains("Forecast:"));
        assert!(!out.contains("Air Quality:"));
        assert!(!out.contains("Alerts:"));
    }

    #[test]
    fn requested_but_missing_sections_are_skipped() {
        let mut report = report();
        report.current.air_quality = None;
        report.forecast.clear();
        report.alerts.clear();

        let query = ForecastQuery::new("Austin").with_days(5).with_air_quality(true).with_alerts(true);
        let out = render(&report, &query);

        assert!(!out.contains("Air Quality:"));
        assert!(!out.contains("Forecast:"));
        assert!(!out.contains("Alerts:"));
    }

    #[test]
    fn single_day_request_never_prints_forecast() {
        let query = ForecastQuery::new("Austin").with_alerts(true);
        let out = render(&report(), &query);

        assert!(!out.contains("Forecast:"));
        assert!(out.contains("Alerts:"));
    }

    #[test]
    fn out_of_scale_epa_index_has_no_label() {
        let mut report = report();
        if let Some(aq) = report.current.air_quality.as_mut() {
            aq.us_epa_index = 9;
        }

        let out = render(&report, &ForecastQuery::new("Austin").with_air_quality(true));
        assert!(out.contains("  US EPA Index: 9\n"));
    }

    #[test]
    fn day_header_formats_or_falls_back() {
        assert_eq!(day_header("2024-05-03"), "Friday, May 3");
        assert_eq!(day_header("tomorrow"), "tomorrow");
    }
}

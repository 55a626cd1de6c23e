use super::{get_json, FALLBACK_RADIATION_MJ};
use crate::error::{CropCastError, Result};
use crate::models::WeatherDay;
use chrono::NaiveDate;
use serde::Deserialize;

/// Longest horizon the Open-Meteo forecast endpoint serves.
pub const MAX_FORECAST_DAYS: u32 = 16;

const DAILY_FIELDS: &str = "temperature_2m_min,temperature_2m_max,precipitation_sum,\
shortwave_radiation_sum,et0_fao_evapotranspiration";

pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    #[serde(default)]
    daily: Option<OmDaily>,
}

#[derive(Debug, Default, Deserialize)]
struct OmDaily {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    shortwave_radiation_sum: Vec<Option<f64>>,
    #[serde(default)]
    et0_fao_evapotranspiration: Vec<Option<f64>>,
}

fn at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten().filter(|v| v.is_finite())
}

impl OpenMeteoClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Daily forecast for up to [`MAX_FORECAST_DAYS`] days.
    pub async fn fetch_daily(&self, lat: f64, lon: f64, days: u32) -> Result<Vec<WeatherDay>> {
        let days = days.clamp(1, MAX_FORECAST_DAYS);
        let url = format!(
            "{}?latitude={}&longitude={}&daily={}&forecast_days={}&timezone=auto",
            self.base_url, lat, lon, DAILY_FIELDS, days
        );

        let response: OmResponse = get_json(&self.client, &url, "Open-Meteo").await?;
        let forecast = Self::convert_response(response, days as usize);
        if forecast.is_empty() {
            return Err(CropCastError::DataSourceUnavailable(
                "Open-Meteo returned no daily forecast".to_string(),
            ));
        }
        Ok(forecast)
    }

    fn convert_response(response: OmResponse, limit: usize) -> Vec<WeatherDay> {
        let daily = response.daily.unwrap_or_default();
        daily
            .time
            .iter()
            .take(limit)
            .enumerate()
            .filter_map(|(i, raw_date)| {
                let day_part = raw_date.get(..10).unwrap_or(raw_date.as_str());
                let date = match NaiveDate::parse_from_str(day_part, "%Y-%m-%d") {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!(date = %raw_date, "Open-Meteo day has unparseable date: {}", e);
                        return None;
                    }
                };
                let (Some(tmin), Some(tmax)) = (
                    at(&daily.temperature_2m_min, i),
                    at(&daily.temperature_2m_max, i),
                ) else {
                    tracing::warn!(%date, "Open-Meteo day missing temperatures, skipping");
                    return None;
                };
                Some(WeatherDay {
                    date,
                    tmin: tmin.min(tmax),
                    tmax: tmax.max(tmin),
                    rain: at(&daily.precipitation_sum, i).unwrap_or(0.0).max(0.0),
                    rad: at(&daily.shortwave_radiation_sum, i)
                        .unwrap_or(FALLBACK_RADIATION_MJ)
                        .max(0.0),
                    et0: at(&daily.et0_fao_evapotranspiration, i).map(|v| v.max(0.0)),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str, limit: usize) -> Vec<WeatherDay> {
        let response: OmResponse = serde_json::from_str(json).unwrap();
        OpenMeteoClient::convert_response(response, limit)
    }

    #[test]
    fn converts_daily_arrays() {
        let days = parse(
            r#"{"daily": {
                "time": ["2025-03-01", "2025-03-02"],
                "temperature_2m_min": [19.1, 18.4],
                "temperature_2m_max": [30.2, 29.8],
                "precipitation_sum": [0.0, 4.5],
                "shortwave_radiation_sum": [21.3, null],
                "et0_fao_evapotranspiration": [4.8]
            }}"#,
            16,
        );
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].rad, 21.3);
        assert_eq!(days[0].et0, Some(4.8));
        assert_eq!(days[1].rain, 4.5);
        assert_eq!(days[1].rad, FALLBACK_RADIATION_MJ);
        assert_eq!(days[1].et0, None);
    }

    #[test]
    fn days_without_temperatures_are_dropped() {
        let days = parse(
            r#"{"daily": {
                "time": ["2025-03-01", "2025-03-02"],
                "temperature_2m_min": [null, 18.4],
                "temperature_2m_max": [30.2, 29.8]
            }}"#,
            16,
        );
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(days[0].rain, 0.0);
    }

    #[test]
    fn respects_limit_and_missing_daily_block() {
        let days = parse(
            r#"{"daily": {
                "time": ["2025-03-01", "2025-03-02", "2025-03-03"],
                "temperature_2m_min": [1, 2, 3],
                "temperature_2m_max": [10, 11, 12]
            }}"#,
            2,
        );
        assert_eq!(days.len(), 2);
        assert!(parse("{}", 16).is_empty());
    }

    #[test]
    fn client_creation() {
        let client = OpenMeteoClient::new(reqwest::Client::new(), "http://localhost/forecast");
        assert_eq!(client.base_url, "http://localhost/forecast");
    }
}

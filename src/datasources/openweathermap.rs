use super::{get_json, FALLBACK_RADIATION_MJ};
use crate::config::OpenWeatherMapConfig;
use crate::error::{CropCastError, Result};
use crate::models::WeatherDay;
use chrono::DateTime;
use serde::Deserialize;

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
}

// One Call 3.0 response structures
#[derive(Debug, Deserialize)]
struct OwmOneCallResponse {
    #[serde(default)]
    daily: Vec<OwmDaily>,
}

#[derive(Debug, Deserialize)]
struct OwmDaily {
    dt: i64,
    temp: Option<OwmTemp>,
    #[serde(default)]
    rain: Option<f64>,
    #[serde(default)]
    snow: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmTemp {
    min: Option<f64>,
    max: Option<f64>,
}

impl OpenWeatherMapClient {
    pub fn new(client: reqwest::Client, config: OpenWeatherMapConfig) -> Self {
        Self { client, config }
    }

    pub fn is_usable(&self) -> bool {
        self.config.is_usable()
    }

    /// Fetch the One Call daily forecast (metric units).
    ///
    /// One Call carries no radiation or reference ET; radiation takes the
    /// fallback value and ET0 is left to the engine's estimate.
    pub async fn fetch_daily(&self, lat: f64, lon: f64, days: u32) -> Result<Vec<WeatherDay>> {
        if !self.is_usable() {
            return Err(CropCastError::DataSourceUnavailable(
                "OpenWeatherMap is not configured with a usable API key".to_string(),
            ));
        }

        let url = format!(
            "{}?lat={}&lon={}&exclude=minutely,hourly,alerts&units=metric&appid={}",
            self.config.url, lat, lon, self.config.api_key
        );
        let response: OwmOneCallResponse = get_json(&self.client, &url, "OpenWeatherMap").await?;

        let forecast = Self::convert_response(response, days.max(1) as usize);
        if forecast.is_empty() {
            return Err(CropCastError::DataSourceUnavailable(
                "OpenWeatherMap returned no daily forecast".to_string(),
            ));
        }
        Ok(forecast)
    }

    fn convert_response(response: OwmOneCallResponse, limit: usize) -> Vec<WeatherDay> {
        response
            .daily
            .iter()
            .take(limit)
            .filter_map(|d| {
                let date = DateTime::from_timestamp(d.dt, 0)?.date_naive();
                let temp = d.temp.as_ref();
                let (Some(tmin), Some(tmax)) = (
                    temp.and_then(|t| t.min).filter(|v| v.is_finite()),
                    temp.and_then(|t| t.max).filter(|v| v.is_finite()),
                ) else {
                    tracing::warn!(%date, "OpenWeatherMap day missing temperatures, skipping");
                    return None;
                };
                // Snow water equivalent counts as inflow
                let precipitation = d.rain.unwrap_or(0.0) + d.snow.unwrap_or(0.0);
                Some(WeatherDay {
                    date,
                    tmin: tmin.min(tmax),
                    tmax: tmax.max(tmin),
                    rain: precipitation.max(0.0),
                    rad: FALLBACK_RADIATION_MJ,
                    et0: None,
                })
            })
            .collect()
    }
}

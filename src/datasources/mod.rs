pub mod csv_file;
pub mod openmeteo;
pub mod openweathermap;

pub use csv_file::{load_weather_csv, parse_weather_csv, parse_weather_csv_str};
pub use openmeteo::OpenMeteoClient;
pub use openweathermap::OpenWeatherMapClient;

use crate::config::WeatherConfig;
use crate::error::{CropCastError, Result};
use crate::models::WeatherDay;
use chrono::Days;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Shortwave radiation used when a provider does not report it (MJ/m²/day).
pub const FALLBACK_RADIATION_MJ: f64 = 18.0;

pub const MAX_HORIZON_DAYS: u32 = 365;

const HTTP_ATTEMPTS: u32 = 3;

/// Location and horizon for a live forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveWeather {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_hours")]
    pub hours: u32,
}

fn default_hours() -> u32 {
    48
}

impl LiveWeather {
    pub fn new(lat: f64, lon: f64, hours: u32) -> Self {
        Self { lat, lon, hours }
    }

    /// Whole days covering `hours`, clamped to [1, 365].
    pub fn horizon_days(&self) -> u32 {
        self.hours.div_ceil(24).clamp(1, MAX_HORIZON_DAYS)
    }

    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lon) {
            return Err(CropCastError::InvalidInput(format!(
                "live weather location ({}, {}) is out of range",
                self.lat, self.lon
            )));
        }
        Ok(())
    }
}

/// Where a simulation's weather series comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherSource {
    File(PathBuf),
    Live(LiveWeather),
}

impl WeatherSource {
    pub async fn load(&self, config: &WeatherConfig) -> Result<Vec<WeatherDay>> {
        match self {
            WeatherSource::File(path) => {
                let days = load_weather_csv(path)?;
                tracing::info!(path = %path.display(), days = days.len(), "Loaded weather file");
                Ok(days)
            }
            WeatherSource::Live(live) => LiveWeatherService::new(config)?.forecast(live).await,
        }
    }
}

/// Live forecast: OpenWeatherMap when a real key is configured, Open-Meteo otherwise
/// or on any OpenWeatherMap failure.
pub struct LiveWeatherService {
    openweathermap: Option<OpenWeatherMapClient>,
    openmeteo: OpenMeteoClient,
}

impl LiveWeatherService {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("cropcast/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let openweathermap = config
            .openweathermap
            .clone()
            .filter(|c| c.is_usable())
            .map(|c| OpenWeatherMapClient::new(client.clone(), c));

        Ok(Self {
            openweathermap,
            openmeteo: OpenMeteoClient::new(client, config.open_meteo_url.clone()),
        })
    }

    pub async fn forecast(&self, live: &LiveWeather) -> Result<Vec<WeatherDay>> {
        live.validate()?;
        let days = live.horizon_days();

        if let Some(owm) = &self.openweathermap {
            match owm.fetch_daily(live.lat, live.lon, days).await {
                Ok(forecast) => {
                    tracing::info!(days = forecast.len(), "Weather forecast from OpenWeatherMap");
                    return Ok(pad_forward(forecast, days as usize));
                }
                Err(e) => {
                    tracing::warn!("OpenWeatherMap unavailable, falling back to Open-Meteo: {}", e);
                }
            }
        }

        let forecast = self.openmeteo.fetch_daily(live.lat, live.lon, days).await?;
        tracing::info!(days = forecast.len(), requested = days, "Weather forecast from Open-Meteo");
        Ok(pad_forward(forecast, days as usize))
    }
}

/// Extend a short forecast to `days` entries by repeating the last day on
/// consecutive dates.
pub fn pad_forward(mut forecast: Vec<WeatherDay>, days: usize) -> Vec<WeatherDay> {
    let Some(last) = forecast.last().cloned() else {
        return forecast;
    };
    let mut offset = 1u64;
    while forecast.len() < days {
        let Some(date) = last.date.checked_add_days(Days::new(offset)) else {
            break;
        };
        forecast.push(WeatherDay {
            date,
            ..last.clone()
        });
        offset += 1;
    }
    forecast
}

/// GET a JSON document, retrying transport and status failures.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    provider: &str,
) -> Result<T> {
    let mut last_error = String::new();
    for attempt in 1..=HTTP_ATTEMPTS {
        match client.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                return response.json::<T>().await.map_err(|e| {
                    CropCastError::DataSourceUnavailable(format!(
                        "Failed to parse {} response: {}",
                        provider,
                        e.without_url()
                    ))
                });
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                last_error = format!("{} returned {}: {}", provider, status, body);
            }
            Err(e) => {
                // URL may carry an API key
                last_error = format!("{}: {}", provider, e.without_url());
            }
        }
        tracing::debug!(attempt, provider, "Weather request failed: {}", last_error);
    }
    Err(CropCastError::DataSourceUnavailable(format!(
        "{} (after {} attempts)",
        last_error, HTTP_ATTEMPTS
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> WeatherDay {
        WeatherDay::new(NaiveDate::from_ymd_opt(2025, 3, d).unwrap(), 18.0, 29.0, 1.5, 20.0)
    }

    #[test]
    fn horizon_rounds_up_and_clamps() {
        assert_eq!(LiveWeather::new(0.0, 0.0, 0).horizon_days(), 1);
        assert_eq!(LiveWeather::new(0.0, 0.0, 24).horizon_days(), 1);
        assert_eq!(LiveWeather::new(0.0, 0.0, 25).horizon_days(), 2);
        assert_eq!(LiveWeather::new(0.0, 0.0, 24 * 400).horizon_days(), 365);
    }

    #[test]
    fn pad_forward_repeats_last_day() {
        let padded = pad_forward(vec![day(1), day(2)], 5);
        assert_eq!(padded.len(), 5);
        assert_eq!(padded[4].date, NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        assert_eq!(padded[4].tmax, 29.0);
        assert_eq!(padded[3].rain, 1.5);
    }

    #[test]
    fn pad_forward_leaves_long_or_empty_series() {
        assert_eq!(pad_forward(vec![day(1), day(2), day(3)], 2).len(), 3);
        assert!(pad_forward(Vec::new(), 4).is_empty());
    }

    #[test]
    fn out_of_range_location_rejected() {
        assert!(LiveWeather::new(95.0, 0.0, 48).validate().is_err());
        assert!(LiveWeather::new(6.5, 3.4, 48).validate().is_ok());
    }

    #[test]
    fn service_skips_placeholder_key() {
        let config = WeatherConfig {
            openweathermap: Some(crate::config::OpenWeatherMapConfig {
                api_key: "YOUR_OPENWEATHER_API_KEY_HERE".into(),
                url: crate::config::DEFAULT_OPENWEATHERMAP_URL.into(),
                enabled: true,
            }),
            ..WeatherConfig::default()
        };
        let service = LiveWeatherService::new(&config).unwrap();
        assert!(service.openweathermap.is_none());
    }

    #[tokio::test]
    async fn file_source_loads_csv() {
        let path = std::env::temp_dir().join(format!("cropcast-weather-{}.csv", std::process::id()));
        std::fs::write(&path, "date,tmin,tmax,rain,rad\n2025-03-01,19,30,0,18\n").unwrap();
        let days = WeatherSource::File(path.clone())
            .load(&WeatherConfig::default())
            .await
            .unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(days.len(), 1);
    }
}

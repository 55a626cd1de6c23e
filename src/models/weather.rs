use crate::error::{CropCastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of weather forcing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    /// Minimum air temperature (°C)
    pub tmin: f64,
    /// Maximum air temperature (°C)
    pub tmax: f64,
    /// Rainfall (mm)
    pub rain: f64,
    /// Incoming shortwave radiation (MJ/m²/day)
    pub rad: f64,
    /// Reference evapotranspiration (mm); estimated by the engine when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub et0: Option<f64>,
}

impl WeatherDay {
    pub fn new(date: NaiveDate, tmin: f64, tmax: f64, rain: f64, rad: f64) -> Self {
        Self {
            date,
            tmin,
            tmax,
            rain,
            rad,
            et0: None,
        }
    }

    pub fn with_et0(mut self, et0: f64) -> Self {
        self.et0 = Some(et0);
        self
    }
}

/// Unvalidated weather record as it arrives in a scenario payload.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherEntry {
    pub date: String,
    pub tmin: f64,
    pub tmax: f64,
    #[serde(default)]
    pub rain: f64,
    pub rad: f64,
    #[serde(default)]
    pub et0: Option<f64>,
}

impl WeatherEntry {
    fn validate(&self, index: usize) -> Result<WeatherDay> {
        let reject = |reason: String| {
            CropCastError::InvalidInput(format!("weather[{}] ({}): {}", index, self.date, reason))
        };

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|e| reject(format!("invalid date: {}", e)))?;

        let mut values = vec![
            ("tmin", self.tmin),
            ("tmax", self.tmax),
            ("rain", self.rain),
            ("rad", self.rad),
        ];
        if let Some(et0) = self.et0 {
            values.push(("et0", et0));
        }
        if let Some((name, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(reject(format!("{} is not a finite number", name)));
        }
        if let Some((name, _)) = values.iter().skip(2).find(|(_, v)| *v < 0.0) {
            return Err(reject(format!("{} must not be negative", name)));
        }
        if self.tmin > self.tmax {
            return Err(reject(format!(
                "tmin {:.1} exceeds tmax {:.1}",
                self.tmin, self.tmax
            )));
        }

        Ok(WeatherDay {
            date,
            tmin: self.tmin,
            tmax: self.tmax,
            rain: self.rain,
            rad: self.rad,
            et0: self.et0,
        })
    }
}

/// Strict validation for request-style payloads: one bad entry rejects the batch.
pub fn validate_weather_entries(entries: &[WeatherEntry]) -> Result<Vec<WeatherDay>> {
    if entries.is_empty() {
        return Err(CropCastError::InvalidInput(
            "weather series is empty".to_string(),
        ));
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| e.validate(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, tmin: f64, tmax: f64) -> WeatherEntry {
        WeatherEntry {
            date: date.to_string(),
            tmin,
            tmax,
            rain: 1.0,
            rad: 18.0,
            et0: Some(4.0),
        }
    }

    #[test]
    fn valid_entries_pass() {
        let days = validate_weather_entries(&[
            entry("2025-03-01", 19.0, 30.0),
            entry("2025-03-02", 19.5, 30.6),
        ])
        .unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(days[0].et0, Some(4.0));
    }

    #[test]
    fn one_bad_entry_rejects_everything() {
        let err = validate_weather_entries(&[
            entry("2025-03-01", 19.0, 30.0),
            entry("2025-13-02", 19.5, 30.6),
        ])
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("weather[1]"), "unexpected message: {}", msg);
        assert!(msg.contains("invalid date"));
    }

    #[test]
    fn inverted_temperatures_rejected() {
        let err = validate_weather_entries(&[entry("2025-03-01", 31.0, 20.0)]).unwrap_err();
        assert!(err.to_string().contains("exceeds tmax"));
    }

    #[test]
    fn negative_rain_rejected() {
        let mut e = entry("2025-03-01", 19.0, 30.0);
        e.rain = -1.0;
        let err = validate_weather_entries(&[e]).unwrap_err();
        assert!(err.to_string().contains("rain must not be negative"));
    }

    #[test]
    fn non_finite_rejected() {
        let mut e = entry("2025-03-01", 19.0, 30.0);
        e.rad = f64::NAN;
        let err = validate_weather_entries(&[e]).unwrap_err();
        assert!(err.to_string().contains("rad is not a finite number"));
    }

    #[test]
    fn empty_series_rejected() {
        assert!(matches!(
            validate_weather_entries(&[]),
            Err(CropCastError::InvalidInput(_))
        ));
    }

    #[test]
    fn new_day_leaves_et0_to_estimate() {
        let day = WeatherDay::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 10.0, 20.0, 0.0, 15.0);
        assert_eq!(day.et0, None);
        assert_eq!(day.with_et0(3.5).et0, Some(3.5));
    }
}

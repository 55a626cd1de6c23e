use crate::error::{CropCastError, Result};
use crate::models::WeatherDay;
use chrono::NaiveDate;
use std::io::BufRead;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 5] = ["date", "tmin", "tmax", "rain", "rad"];

/// Column positions resolved from the header row.
struct Columns {
    date: usize,
    tmin: usize,
    tmax: usize,
    rain: usize,
    rad: usize,
    et0: Option<usize>,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self> {
        let names: Vec<String> = header
            .trim_start_matches('\u{feff}')
            .split(',')
            .map(|h| h.trim().to_lowercase())
            .collect();
        let find = |name: &str| names.iter().position(|h| h == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| find(*c).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(CropCastError::InvalidInput(format!(
                "weather CSV header is missing column(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            date: find("date").unwrap_or(0),
            tmin: find("tmin").unwrap_or(0),
            tmax: find("tmax").unwrap_or(0),
            rain: find("rain").unwrap_or(0),
            rad: find("rad").unwrap_or(0),
            et0: find("et0"),
        })
    }

    fn parse_row(&self, line: &str) -> std::result::Result<WeatherDay, String> {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        let cell = |idx: usize, name: &str| {
            cells
                .get(idx)
                .copied()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("missing {}", name))
        };
        let number = |idx: usize, name: &str| -> std::result::Result<f64, String> {
            let raw = cell(idx, name)?;
            let v: f64 = raw
                .parse()
                .map_err(|_| format!("{} '{}' is not a number", name, raw))?;
            if v.is_finite() {
                Ok(v)
            } else {
                Err(format!("{} is not finite", name))
            }
        };

        let raw_date = cell(self.date, "date")?;
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|e| format!("date '{}': {}", raw_date, e))?;

        let et0 = match self.et0 {
            Some(idx) if cells.get(idx).is_some_and(|v| !v.is_empty()) => Some(number(idx, "et0")?),
            _ => None,
        };

        Ok(WeatherDay {
            date,
            tmin: number(self.tmin, "tmin")?,
            tmax: number(self.tmax, "tmax")?,
            rain: number(self.rain, "rain")?,
            rad: number(self.rad, "rad")?,
            et0,
        })
    }
}

/// Lenient CSV parsing: malformed rows are logged and skipped.
///
/// Expects a header naming `date,tmin,tmax,rain,rad` and optionally `et0`, in
/// any order. An empty or absent `et0` cell leaves the value to be estimated.
pub fn parse_weather_csv<R: BufRead>(reader: R) -> Result<Vec<WeatherDay>> {
    let mut lines = reader.lines().enumerate();

    let columns = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break Columns::from_header(&line)?;
                }
            }
            None => return Ok(Vec::new()),
        }
    };

    let mut days = Vec::new();
    for (idx, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match columns.parse_row(&line) {
            Ok(day) => days.push(day),
            Err(reason) => {
                tracing::warn!(line = idx + 1, row = %line, %reason, "Skipping malformed weather row");
            }
        }
    }

    tracing::debug!(days = days.len(), "Parsed weather CSV");
    Ok(days)
}

pub fn parse_weather_csv_str(content: &str) -> Result<Vec<WeatherDay>> {
    parse_weather_csv(content.as_bytes())
}

pub fn load_weather_csv(path: &Path) -> Result<Vec<WeatherDay>> {
    let file = std::fs::File::open(path).map_err(|e| {
        CropCastError::NotFound(format!("weather CSV {}: {}", path.display(), e))
    })?;
    parse_weather_csv(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_optional_et0() {
        let csv = "date,tmin,tmax,rain,rad,et0\n\
                   2025-03-01,19,30,0,18.5,4.1\n\
                   2025-03-02,19.5,30.6,3.2,17.9,\n";
        let days = parse_weather_csv_str(csv).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].et0, Some(4.1));
        assert_eq!(days[1].et0, None);
        assert_eq!(days[1].rain, 3.2);
    }

    #[test]
    fn skips_malformed_rows_and_continues() {
        let csv = "date,tmin,tmax,rain,rad\n\
                   2025-03-01,19,30,0,18\n\
                   not-a-date,19,30,0,18\n\
                   2025-03-03,warm,30,0,18\n\
                   2025-03-04,19,30\n\
                   \n\
                   2025-03-05,18,29,1,17\n";
        let days = parse_weather_csv_str(csv).unwrap();
        let dates: Vec<String> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-03-01", "2025-03-05"]);
    }

    #[test]
    fn header_order_is_free() {
        let csv = "rad,date,rain,tmax,tmin\n18,2025-03-01,2,30,19\n";
        let days = parse_weather_csv_str(csv).unwrap();
        assert_eq!(days[0].tmin, 19.0);
        assert_eq!(days[0].tmax, 30.0);
        assert_eq!(days[0].rad, 18.0);
        assert_eq!(days[0].et0, None);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = parse_weather_csv_str("date,tmin,tmax,rad\n").unwrap_err();
        assert!(err.to_string().contains("rain"));
    }

    #[test]
    fn empty_input_gives_no_days() {
        assert!(parse_weather_csv_str("").unwrap().is_empty());
        assert!(parse_weather_csv_str("date,tmin,tmax,rain,rad\n").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_weather_csv(Path::new("/nonexistent/weather.csv")).unwrap_err();
        assert!(matches!(err, CropCastError::NotFound(_)));
    }
}

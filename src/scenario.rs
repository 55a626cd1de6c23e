use crate::catalog::CropCatalog;
use crate::config::{SimulationConfig, SoilDefaults, WeatherConfig};
use crate::datasources::{LiveWeather, WeatherSource};
use crate::error::{CropCastError, Result};
use crate::models::{
    validate_weather_entries, FieldConfig, Management, WeatherDay, WeatherEntry,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFormat {
    Yaml,
    Json,
}

impl ScenarioFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ScenarioFormat::Json,
            _ => ScenarioFormat::Yaml,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    fields: Vec<FieldEntry>,
    #[serde(default)]
    soil: Option<SoilEntry>,
    #[serde(default)]
    storage_capacity_t: Option<f64>,
    #[serde(default)]
    weather_csv: Option<PathBuf>,
    #[serde(default)]
    weather: Option<Vec<WeatherEntry>>,
    #[serde(default)]
    live_weather: Option<LiveWeather>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default = "default_area")]
    area_ha: f64,
    crop: String,
    plant_date: NaiveDate,
    #[serde(default = "default_density")]
    density_plants_m2: f64,
    #[serde(default)]
    irrigation_mm_day: f64,
}

fn default_area() -> f64 {
    1.0
}

fn default_density() -> f64 {
    6.0
}

/// Soil overrides; anything left out falls back to the configured defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SoilEntry {
    depth_cm: Option<u32>,
    fc_mm: Option<f64>,
    wp_mm: Option<f64>,
    ks_mm_day: Option<f64>,
    runoff_threshold_mm: Option<f64>,
}

impl SoilEntry {
    fn resolve(&self, defaults: &SoilDefaults) -> Result<SoilDefaults> {
        let soil = SoilDefaults {
            depth_cm: self.depth_cm.unwrap_or(defaults.depth_cm),
            fc_mm: self.fc_mm.unwrap_or(defaults.fc_mm),
            wp_mm: self.wp_mm.unwrap_or(defaults.wp_mm),
            ks_mm_day: self.ks_mm_day.unwrap_or(defaults.ks_mm_day),
            runoff_threshold_mm: self
                .runoff_threshold_mm
                .unwrap_or(defaults.runoff_threshold_mm),
        };
        validate_soil(&soil)?;
        Ok(soil)
    }
}

fn validate_soil(soil: &SoilDefaults) -> Result<()> {
    let numbers = [
        ("fc_mm", soil.fc_mm),
        ("wp_mm", soil.wp_mm),
        ("ks_mm_day", soil.ks_mm_day),
        ("runoff_threshold_mm", soil.runoff_threshold_mm),
    ];
    if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
        return Err(CropCastError::InvalidInput(format!(
            "soil.{} must be a non-negative number",
            name
        )));
    }
    if soil.depth_cm == 0 {
        return Err(CropCastError::InvalidInput(
            "soil.depth_cm must be positive".to_string(),
        ));
    }
    if soil.wp_mm >= soil.fc_mm {
        return Err(CropCastError::InvalidInput(format!(
            "soil.wp_mm ({}) must be below soil.fc_mm ({})",
            soil.wp_mm, soil.fc_mm
        )));
    }
    Ok(())
}

/// Where a scenario's weather comes from once parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioWeather {
    Inline(Vec<WeatherDay>),
    Source(WeatherSource),
}

/// A validated set of fields sharing one weather series.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub fields: Vec<FieldConfig>,
    pub weather: ScenarioWeather,
    pub storage_capacity_t: Option<f64>,
}

impl Scenario {
    /// Load and validate a scenario file. Relative `weather_csv` paths resolve
    /// against the scenario's own directory.
    pub fn load(path: &Path, catalog: &CropCatalog, simulation: &SimulationConfig) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CropCastError::NotFound(format!("scenario {}: {}", path.display(), e))
        })?;
        let scenario = Self::parse(
            &content,
            ScenarioFormat::from_path(path),
            catalog,
            &simulation.default_soil,
            path.parent(),
        )?;
        tracing::info!(
            path = %path.display(),
            fields = scenario.fields.len(),
            "Loaded scenario"
        );
        Ok(scenario)
    }

    pub fn parse(
        content: &str,
        format: ScenarioFormat,
        catalog: &CropCatalog,
        soil_defaults: &SoilDefaults,
        base_dir: Option<&Path>,
    ) -> Result<Self> {
        let file: ScenarioFile = match format {
            ScenarioFormat::Yaml => serde_yaml::from_str(content)?,
            ScenarioFormat::Json => serde_json::from_str(content)?,
        };

        if file.fields.is_empty() {
            return Err(CropCastError::InvalidInput(
                "scenario defines no fields".to_string(),
            ));
        }

        let soil = file
            .soil
            .unwrap_or_default()
            .resolve(soil_defaults)?
            .profile();

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(file.fields.len());
        for (i, entry) in file.fields.into_iter().enumerate() {
            let id = entry.id.trim().to_string();
            if id.is_empty() {
                return Err(CropCastError::InvalidInput(format!(
                    "fields[{}]: id must not be empty",
                    i
                )));
            }
            if !seen.insert(id.clone()) {
                return Err(CropCastError::InvalidInput(format!(
                    "fields[{}]: duplicate field id '{}'",
                    i, id
                )));
            }
            let reject = |reason: &str| {
                CropCastError::InvalidInput(format!("fields[{}] ({}): {}", i, id, reason))
            };
            if !entry.area_ha.is_finite() || entry.area_ha <= 0.0 {
                return Err(reject("area_ha must be positive"));
            }
            if !entry.density_plants_m2.is_finite() || entry.density_plants_m2 <= 0.0 {
                return Err(reject("density_plants_m2 must be positive"));
            }
            if !entry.irrigation_mm_day.is_finite() || entry.irrigation_mm_day < 0.0 {
                return Err(reject("irrigation_mm_day must not be negative"));
            }

            let crop = catalog.get(&entry.crop)?.clone();
            fields.push(FieldConfig {
                name: entry.name.unwrap_or_else(|| id.clone()),
                id,
                area_ha: entry.area_ha,
                soil: soil.clone(),
                crop,
                management: Management::new(entry.plant_date, entry.density_plants_m2)
                    .with_irrigation(entry.irrigation_mm_day),
            });
        }

        if let Some(capacity) = file.storage_capacity_t {
            if !capacity.is_finite() || capacity < 0.0 {
                return Err(CropCastError::InvalidInput(
                    "storage_capacity_t must be a non-negative number".to_string(),
                ));
            }
        }

        let weather = match (file.weather_csv, file.weather, file.live_weather) {
            (Some(csv), None, None) => {
                let path = match base_dir {
                    Some(dir) if csv.is_relative() => dir.join(csv),
                    _ => csv,
                };
                ScenarioWeather::Source(WeatherSource::File(path))
            }
            (None, Some(entries), None) => {
                ScenarioWeather::Inline(validate_weather_entries(&entries)?)
            }
            (None, None, Some(live)) => {
                live.validate()?;
                ScenarioWeather::Source(WeatherSource::Live(live))
            }
            (None, None, None) => {
                return Err(CropCastError::InvalidInput(
                    "scenario needs one of weather_csv, weather or live_weather".to_string(),
                ))
            }
            _ => {
                return Err(CropCastError::InvalidInput(
                    "scenario must give only one of weather_csv, weather or live_weather"
                        .to_string(),
                ))
            }
        };

        Ok(Self {
            fields,
            weather,
            storage_capacity_t: file.storage_capacity_t,
        })
    }

    /// Replace the scenario's weather origin with a live forecast.
    pub fn with_live_weather(mut self, live: LiveWeather) -> Self {
        self.weather = ScenarioWeather::Source(WeatherSource::Live(live));
        self
    }

    /// Scenario capacity, else the configured one.
    pub fn storage_capacity(&self, simulation: &SimulationConfig) -> f64 {
        self.storage_capacity_t
            .unwrap_or(simulation.storage_capacity_t)
    }

    pub async fn load_weather(&self, config: &WeatherConfig) -> Result<Vec<WeatherDay>> {
        let days = match &self.weather {
            ScenarioWeather::Inline(days) => days.clone(),
            ScenarioWeather::Source(source) => source.load(config).await?,
        };
        if days.is_empty() {
            return Err(CropCastError::InvalidInput(
                "weather series is empty".to_string(),
            ));
        }
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INLINE: &str = r#"
fields:
  - id: north
    name: North block
    area_ha: 2.5
    crop: Maize
    plant_date: 2025-03-01
    density_plants_m2: 6.5
    irrigation_mm_day: 3
  - id: south
    crop: cowpea
    plant_date: 2025-03-05
storage_capacity_t: 40
weather:
  - {date: 2025-03-01, tmin: 19, tmax: 30, rain: 0, rad: 18}
  - {date: 2025-03-02, tmin: 20, tmax: 31, rain: 4, rad: 17, et0: 4.2}
"#;

    fn parse(yaml: &str) -> Result<Scenario> {
        Scenario::parse(
            yaml,
            ScenarioFormat::Yaml,
            &CropCatalog::builtin(),
            &SoilDefaults::default(),
            Some(Path::new("/data/farm")),
        )
    }

    #[test]
    fn parses_inline_scenario() {
        let scenario = parse(INLINE).unwrap();
        assert_eq!(scenario.fields.len(), 2);
        assert_eq!(scenario.fields[0].crop.species, "maize");
        assert_eq!(scenario.fields[0].management.irrigation_mm_day, 3.0);
        assert_eq!(scenario.fields[1].name, "south");
        assert_eq!(scenario.fields[1].area_ha, 1.0);
        assert_eq!(scenario.storage_capacity_t, Some(40.0));
        match &scenario.weather {
            ScenarioWeather::Inline(days) => {
                assert_eq!(days.len(), 2);
                assert_eq!(days[1].et0, Some(4.2));
            }
            other => panic!("expected inline weather, got {:?}", other),
        }
    }

    #[test]
    fn soil_overrides_merge_with_defaults() {
        let yaml = INLINE.replace(
            "storage_capacity_t: 40",
            "soil: {fc_mm: 180, runoff_threshold_mm: 10}",
        );
        let scenario = parse(&yaml).unwrap();
        let soil = &scenario.fields[0].soil;
        assert_eq!(soil.rootzone_capacity(), 180.0);
        assert_eq!(soil.runoff_threshold_mm, 10.0);
        assert_eq!(soil.layers[0].depth_cm, 60);
    }

    #[test]
    fn inverted_soil_is_rejected() {
        let yaml = INLINE.replace("storage_capacity_t: 40", "soil: {fc_mm: 30}");
        assert!(matches!(parse(&yaml), Err(CropCastError::InvalidInput(_))));
    }

    #[test]
    fn bad_inline_entry_rejects_whole_scenario() {
        let yaml = INLINE.replace("tmin: 20, tmax: 31", "tmin: 33, tmax: 31");
        let err = parse(&yaml).unwrap_err();
        assert!(err.to_string().contains("weather[1]"));
    }

    #[test]
    fn unknown_crop_is_unsupported() {
        let yaml = INLINE.replace("crop: cowpea", "crop: kale");
        assert!(matches!(
            parse(&yaml),
            Err(CropCastError::UnsupportedCrop { .. })
        ));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let yaml = INLINE.replace("id: south", "id: north");
        let err = parse(&yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn weather_origin_must_be_unique() {
        let both = format!("{}weather_csv: weather.csv\n", INLINE);
        assert!(parse(&both).is_err());

        let none = "fields:\n  - {id: a, crop: maize, plant_date: 2025-03-01}\n";
        assert!(parse(none).is_err());
    }

    #[test]
    fn relative_csv_resolves_against_scenario_dir() {
        let yaml = "fields:\n  - {id: a, crop: rice, plant_date: 2025-03-01}\nweather_csv: weather.csv\n";
        let scenario = parse(yaml).unwrap();
        assert_eq!(
            scenario.weather,
            ScenarioWeather::Source(WeatherSource::File(PathBuf::from("/data/farm/weather.csv")))
        );
    }

    #[test]
    fn live_weather_defaults_hours() {
        let yaml = "fields:\n  - {id: a, crop: rice, plant_date: 2025-03-01}\nlive_weather: {lat: 6.5, lon: 3.4}\n";
        let scenario = parse(yaml).unwrap();
        assert_eq!(
            scenario.weather,
            ScenarioWeather::Source(WeatherSource::Live(LiveWeather::new(6.5, 3.4, 48)))
        );
    }

    #[test]
    fn json_scenarios_are_accepted() {
        let json = r#"{
            "fields": [{"id": "a", "crop": "sorghum", "plant_date": "2025-03-01"}],
            "weather": [{"date": "2025-03-01", "tmin": 20, "tmax": 32, "rad": 19}]
        }"#;
        let scenario = Scenario::parse(
            json,
            ScenarioFormat::Json,
            &CropCatalog::builtin(),
            &SoilDefaults::default(),
            None,
        )
        .unwrap();
        assert_eq!(scenario.fields[0].crop.species, "sorghum");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let yaml = format!("{}harvest_crew: 4\n", INLINE);
        assert!(matches!(parse(&yaml), Err(CropCastError::Yaml(_))));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ScenarioFormat::from_path(Path::new("a.JSON")), ScenarioFormat::Json);
        assert_eq!(ScenarioFormat::from_path(Path::new("a.yml")), ScenarioFormat::Yaml);
    }

    #[test]
    fn capacity_falls_back_to_config() {
        let mut scenario = parse(INLINE).unwrap();
        let simulation = SimulationConfig::default();
        assert_eq!(scenario.storage_capacity(&simulation), 40.0);
        scenario.storage_capacity_t = None;
        assert_eq!(scenario.storage_capacity(&simulation), 100.0);
    }
}

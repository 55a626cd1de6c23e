use crate::error::{CropCastError, Result};
use crate::models::{SoilLayer, SoilProfile};
use dialoguer::{Confirm, Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_OPENWEATHERMAP_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Optional YAML crop table merged over the built-in catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherConfig {
    #[serde(default = "default_open_meteo_url")]
    pub open_meteo_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweathermap: Option<OpenWeatherMapConfig>,
}

fn default_open_meteo_url() -> String {
    DEFAULT_OPEN_METEO_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            open_meteo_url: default_open_meteo_url(),
            timeout_secs: default_timeout_secs(),
            openweathermap: None,
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    #[serde(default = "default_openweathermap_url")]
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_openweathermap_url() -> String {
    DEFAULT_OPENWEATHERMAP_URL.to_string()
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("url", &self.url)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl OpenWeatherMapConfig {
    /// Keys copied from a template are treated as absent.
    pub fn has_real_key(&self) -> bool {
        const PLACEHOLDERS: [&str; 3] = [
            "your_openweather_api_key",
            "your_openweather_api_key_here",
            "replace_me",
        ];
        let key = self.api_key.trim().to_lowercase();
        !key.is_empty()
            && !key.starts_with("${")
            && !PLACEHOLDERS.iter().any(|p| key.contains(p))
    }

    pub fn is_usable(&self) -> bool {
        self.enabled && self.has_real_key()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    #[serde(default = "default_storage_capacity")]
    pub storage_capacity_t: f64,
    #[serde(default)]
    pub default_soil: SoilDefaults,
}

fn default_storage_capacity() -> f64 {
    100.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            storage_capacity_t: default_storage_capacity(),
            default_soil: SoilDefaults::default(),
        }
    }
}

/// Single-layer soil used when a scenario does not describe its own.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SoilDefaults {
    pub depth_cm: u32,
    pub fc_mm: f64,
    pub wp_mm: f64,
    pub ks_mm_day: f64,
    pub runoff_threshold_mm: f64,
}

impl Default for SoilDefaults {
    fn default() -> Self {
        Self {
            depth_cm: 60,
            fc_mm: 150.0,
            wp_mm: 40.0,
            ks_mm_day: 50.0,
            runoff_threshold_mm: 20.0,
        }
    }
}

impl SoilDefaults {
    pub fn profile(&self) -> SoilProfile {
        SoilProfile::new(vec![SoilLayer::new(
            self.depth_cm,
            self.fc_mm,
            self.wp_mm,
            self.ks_mm_day,
        )])
        .with_runoff_threshold(self.runoff_threshold_mm)
    }
}

impl Config {
    /// Load from `config_override`, or the first standard location that exists.
    /// Falls back to defaults when no file is found.
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(CropCastError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p
            }
            None => {
                let p = Self::find_config_path()?;
                if !p.exists() {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
                p
            }
        };

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| CropCastError::Config(format!("Failed to read config: {}", e)))?;
        let config = Self::from_yaml_str(&config_str)?;
        tracing::debug!(path = %config_path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);
        serde_yaml::from_str(&content)
            .map_err(|e| CropCastError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("cropcast").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/cropcast/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CropCastError::Config("Cannot determine config directory".into()))?
            .join("cropcast");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        let input_err = |e: dialoguer::Error| CropCastError::Config(format!("Input error: {}", e));

        println!();
        println!("Let's set up cropcast!");
        println!();

        println!("Simulation");
        let storage_capacity_t: f64 = Input::new()
            .with_prompt("  Storage capacity (t)")
            .default(default_storage_capacity())
            .interact_text()
            .map_err(input_err)?;

        let fc_mm: f64 = Input::new()
            .with_prompt("  Default root-zone field capacity (mm)")
            .default(SoilDefaults::default().fc_mm)
            .interact_text()
            .map_err(input_err)?;

        let catalog: String = Input::new()
            .with_prompt("  Custom crop catalog YAML (blank for built-in only)")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_err)?;

        println!();

        println!("Weather");
        let open_meteo_url: String = Input::new()
            .with_prompt("  Open-Meteo forecast URL")
            .default(default_open_meteo_url())
            .interact_text()
            .map_err(input_err)?;

        let use_owm = Confirm::new()
            .with_prompt("  Use OpenWeatherMap One Call when available?")
            .default(false)
            .interact()
            .map_err(input_err)?;

        let openweathermap = if use_owm {
            let api_key: String = Password::new()
                .with_prompt("  API key (or ${OPENWEATHER_API_KEY})")
                .allow_empty_password(true)
                .interact()
                .map_err(input_err)?;
            Some(OpenWeatherMapConfig {
                api_key,
                url: default_openweathermap_url(),
                enabled: true,
            })
        } else {
            None
        };

        println!();

        let config = Config {
            weather: WeatherConfig {
                open_meteo_url,
                timeout_secs: default_timeout_secs(),
                openweathermap,
            },
            simulation: SimulationConfig {
                storage_capacity_t,
                default_soil: SoilDefaults {
                    fc_mm,
                    ..SoilDefaults::default()
                },
            },
            catalog_path: if catalog.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(catalog.trim()))
            },
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| CropCastError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# cropcast configuration\n# Generated by `cropcast init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        let re = match regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
            Ok(re) => re,
            Err(_) => return result,
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }
}

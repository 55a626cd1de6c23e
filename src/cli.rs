use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cropcast",
    version,
    about = "Daily crop growth, yield and harvest-date projection"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate every field in a scenario and print the run results
    Simulate {
        /// Scenario file (YAML or JSON)
        scenario: PathBuf,

        /// Write JSON output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        live: LiveWeatherArgs,
    },
    /// Simulate a scenario and build a capacity-aware harvest plan
    Plan {
        /// Scenario file (YAML or JSON)
        scenario: PathBuf,

        /// Storage capacity in tonnes (overrides scenario and config)
        #[arg(long)]
        capacity: Option<f64>,

        /// Write JSON output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        live: LiveWeatherArgs,
    },
    /// Run one field through ten days of mild synthetic weather
    Quick {
        #[arg(long, default_value = "maize")]
        crop: String,
    },
    /// List supported crops by category
    Crops,
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
}

/// Replace the scenario's weather with a live forecast.
#[derive(clap::Args, Debug, Clone)]
pub struct LiveWeatherArgs {
    #[arg(long, requires_all = ["lat", "lon"])]
    pub live_weather: bool,

    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Forecast horizon in hours
    #[arg(long, default_value_t = 48)]
    pub hours: u32,
}

impl LiveWeatherArgs {
    pub fn location(&self) -> Option<(f64, f64)> {
        if !self.live_weather {
            return None;
        }
        self.lat.zip(self.lon)
    }
}

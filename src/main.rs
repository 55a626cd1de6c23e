mod cli;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use clap::Parser;
use cli::{Cli, Commands, LiveWeatherArgs};
use cropcast::catalog::CropCatalog;
use cropcast::config::Config;
use cropcast::datasources::{LiveWeather, OpenMeteoClient, OpenWeatherMapClient};
use cropcast::engine::{build_harvest_plan, run_field, run_fields};
use cropcast::models::{FieldConfig, Management, RunResult, WeatherDay};
use cropcast::scenario::Scenario;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Init = cli.command {
        Config::setup_interactive().context("Interactive setup failed")?;
        return Ok(());
    }

    let config = match Config::load(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Run `cropcast init` or copy config/config.yaml.example to config/config.yaml");
            std::process::exit(1);
        }
    };
    let catalog = CropCatalog::load(config.catalog_path.as_deref())
        .context("Failed to load crop catalog")?;

    match cli.command {
        Commands::Simulate {
            scenario,
            output,
            live,
        } => {
            let results = simulate(&config, &catalog, &scenario, &live).await?.1;
            write_json(&results, output.as_deref())?;
        }
        Commands::Plan {
            scenario,
            capacity,
            output,
            live,
        } => {
            let (loaded, results) = simulate(&config, &catalog, &scenario, &live).await?;
            let capacity = capacity.unwrap_or_else(|| loaded.storage_capacity(&config.simulation));
            let plan = build_harvest_plan(&results, capacity);
            write_json(&plan, output.as_deref())?;
        }
        Commands::Quick { crop } => {
            let result = quick(&config, &catalog, &crop)?;
            write_json(&result, None)?;
        }
        Commands::Crops => print_crops(&catalog),
        Commands::Check => check(&config, &catalog, cli.config.as_ref()).await,
        Commands::Init => {}
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn simulate(
    config: &Config,
    catalog: &CropCatalog,
    path: &Path,
    live: &LiveWeatherArgs,
) -> Result<(Scenario, Vec<RunResult>)> {
    let mut scenario = Scenario::load(path, catalog, &config.simulation)
        .with_context(|| format!("Failed to load scenario {}", path.display()))?;
    if let Some((lat, lon)) = live.location() {
        scenario = scenario.with_live_weather(LiveWeather::new(lat, lon, live.hours));
    }

    let weather = scenario
        .load_weather(&config.weather)
        .await
        .context("Failed to load weather")?;
    let results = run_fields(&scenario.fields, &weather)?;
    Ok((scenario, results))
}

fn quick(config: &Config, catalog: &CropCatalog, crop: &str) -> Result<RunResult> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).context("invalid start date")?;
    // Alternating 19/20 and 30/31 °C, light rain every third day
    let weather: Vec<WeatherDay> = (0..10u64)
        .filter_map(|i| {
            let warm = (i % 2) as f64;
            let rain = if i % 3 == 0 { 3.0 } else { 0.0 };
            start
                .checked_add_days(Days::new(i))
                .map(|date| WeatherDay::new(date, 19.0 + warm, 30.0 + warm, rain, 18.0))
        })
        .collect();

    let field = FieldConfig {
        id: "demo".to_string(),
        name: "Demo field".to_string(),
        area_ha: 1.0,
        soil: config.simulation.default_soil.profile(),
        crop: catalog.get(crop)?.clone(),
        management: Management::new(start, 6.0),
    };
    Ok(run_field(&field, &weather)?)
}

fn print_crops(catalog: &CropCatalog) {
    let mut listed = Vec::new();
    for (category, names) in catalog.categories() {
        println!("{}", category);
        for name in names {
            print_crop_line(catalog, name);
            listed.push(name.to_lowercase());
        }
        println!();
    }

    let uncategorised: Vec<String> = catalog
        .supported()
        .into_iter()
        .filter(|name| !listed.contains(name))
        .collect();
    if !uncategorised.is_empty() {
        println!("Other");
        for name in &uncategorised {
            print_crop_line(catalog, name);
        }
    }
}

fn print_crop_line(catalog: &CropCatalog, name: &str) {
    match catalog.baseline(name) {
        Ok(b) => println!(
            "  {:<12} {:>5.1} t/acre  {:>3} days",
            name, b.tonnes_per_acre, b.cycle_days
        ),
        Err(_) => println!("  {}", name),
    }
}

async fn check(config: &Config, catalog: &CropCatalog, config_override: Option<&PathBuf>) {
    if Config::exists(config_override) {
        println!("Config:          OK");
    } else {
        println!("Config:          not found (using defaults)");
    }
    println!("Crop catalog:    {} crops", catalog.len());

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(config.weather.timeout_secs.max(1)))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            println!("HTTP client:     FAILED ({})", e);
            return;
        }
    };

    let open_meteo = OpenMeteoClient::new(client.clone(), config.weather.open_meteo_url.clone());
    match open_meteo.fetch_daily(0.0, 0.0, 1).await {
        Ok(_) => println!("Open-Meteo:      OK"),
        Err(e) => println!("Open-Meteo:      OFFLINE ({})", e),
    }

    match config.weather.openweathermap.clone() {
        Some(owm) if owm.is_usable() => {
            match OpenWeatherMapClient::new(client, owm).fetch_daily(0.0, 0.0, 1).await {
                Ok(_) => println!("OpenWeatherMap:  OK"),
                Err(e) => println!("OpenWeatherMap:  OFFLINE ({})", e),
            }
        }
        Some(_) => println!("OpenWeatherMap:  disabled (no usable API key)"),
        None => println!("OpenWeatherMap:  not configured"),
    }
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

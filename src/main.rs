use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use medi_snow::timezone::FixedTimezoneResolver;
use medi_snow::{
    AvalancheService, LocationService, MediSnowConfig, PersistentCache, TimezoneResolver,
    TzfTimezoneResolver, WeatherService, logging,
};

#[derive(Parser)]
#[command(name = "medi-snow", author, version, about = "Mountain weather and avalanche forecasts", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Elevation and place metadata for a coordinate
    Point(PointArgs),
    /// Multi-model weather forecast
    Forecast {
        #[command(flatten)]
        point: PointArgs,
        /// IANA timezone to use instead of looking it up
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Avalanche forecast for the enclosing zone
    Avalanche(PointArgs),
    /// Latest NWS area forecast discussion
    Discussion(PointArgs),
}

#[derive(Args)]
struct PointArgs {
    #[arg(long, allow_hyphen_values = true)]
    latitude: f64,
    #[arg(long, allow_hyphen_values = true)]
    longitude: f64,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open_cache(config: &MediSnowConfig) -> Option<PersistentCache> {
    PersistentCache::open(&config.cache.location)
        .inspect_err(|e| warn!(error = %e, location = %config.cache.location, "Cache unavailable"))
        .ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = MediSnowConfig::load_from_path(cli.config)?;
    logging::init(&config.logging)?;

    match cli.command {
        Commands::Point(args) => {
            let locations = LocationService::from_config(&config.providers)?;
            let point = locations.get_forecast_point(args.latitude, args.longitude).await?;
            print_json(&point)
        }
        Commands::Forecast { point, timezone } => {
            let resolver: Arc<dyn TimezoneResolver> = match timezone {
                Some(name) => Arc::new(FixedTimezoneResolver(name)),
                None => Arc::new(TzfTimezoneResolver::new()),
            };
            let locations = LocationService::from_config(&config.providers)?;
            let weather = WeatherService::from_config(&config, resolver)?;

            let point = locations.get_forecast_point(point.latitude, point.longitude).await?;
            let forecast = weather
                .get_forecast(&point)
                .await
                .with_context(|| format!("No forecast for {}", point.location.name))?;
            print_json(&forecast)
        }
        Commands::Avalanche(args) => {
            let avalanche = AvalancheService::from_config(&config, open_cache(&config))?;
            match avalanche.get_forecast(args.latitude, args.longitude).await {
                Ok(forecast) => print_json(&forecast),
                Err(e) if e.is_not_found() => {
                    eprintln!("{}", e.user_message());
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }
        Commands::Discussion(args) => {
            let locations = LocationService::from_config(&config.providers)?;
            // discussions are not timezone dependent
            let resolver = Arc::new(FixedTimezoneResolver("UTC".to_string()));
            let weather = WeatherService::from_config(&config, resolver)?;

            let point = locations.get_forecast_point(args.latitude, args.longitude).await?;
            let text = weather.get_forecast_discussion(&point).await?;
            println!("{text}");
            Ok(())
        }
    }
}

use plotcheck::Config;
use std::env;
use std::error::Error;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use plotcheck::adapters::outbound::{
    init_combined_logger, install_tracing_subscriber, FileMapSource, OverpassMapSource,
};
use plotcheck::application::{CheckRequest, PlacementService};
use plotcheck::domains::placement::MapDataSource;

/// Reads one check request (JSON) from the file named by the first argument,
/// or stdin, and prints the JSON verdict.
///
/// Environment:
///   PLOTCHECK_CONFIG    TOML config (default: config.toml, built-in defaults if absent)
///   PLOTCHECK_SNAPSHOT  answer from a saved Overpass JSON file instead of the live API
///   PLOTCHECK_GEOJSON   write footprint and classified features to this GeoJSON file
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    install_tracing_subscriber("info")?;

    let config_path = env::var("PLOTCHECK_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = match Config::from_file(&config_path).await {
        Ok(config) => {
            info!("Configuration loaded from {}", config_path);
            config
        }
        Err(e) => {
            warn!("Using default configuration ({}: {})", config_path, e);
            Config::default()
        }
    };

    let logger = init_combined_logger(config.logging.file.as_deref());

    let source: Arc<dyn MapDataSource> = match env::var("PLOTCHECK_SNAPSHOT") {
        Ok(path) => {
            info!("Reading map data from snapshot {}", path);
            Arc::new(FileMapSource::new(path))
        }
        Err(_) => {
            let overpass = OverpassMapSource::new(&config.overpass)?;
            info!("Querying Overpass at {}", overpass.url());
            Arc::new(overpass)
        }
    };

    let service = PlacementService::from_config(&config, source, logger)?;

    let body = match env::args().nth(1) {
        Some(path) if path != "-" => tokio::fs::read_to_string(&path).await?,
        _ => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };
    let request: CheckRequest = serde_json::from_str(&body)?;

    let report = service.report(request).await;

    if let Ok(path) = env::var("PLOTCHECK_GEOJSON") {
        tokio::fs::write(&path, report.to_geojson().to_string()).await?;
        info!("Decision geometry written to {}", path);
    }

    let response: plotcheck::application::CheckResponse = report.verdict.into();
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

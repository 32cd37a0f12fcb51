/*!
shroommap Command Line Interface

Loads mushroom observations, applies color/spot filters and writes the
resulting map as GeoJSON, a Leaflet HTML page, or plain text.
*/

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shroommap::model::{COLORS, SPOTS};
use shroommap::{
    Attribute, LatLng, LeafletPage, MapConfig, MarkerLayer, Orchestrator, Record, ShroomError,
    Source, Status, Tag, VERSION,
};

#[derive(Parser)]
#[command(name = "shroommap")]
#[command(about = "Filterable map of mushroom observations")]
#[command(version = VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load observations, apply filters and write the map
    Render {
        /// Data source connection string
        #[arg(long, default_value = "builtin://mushrooms")]
        source: String,

        /// Color filter (option value or tag name)
        #[arg(long)]
        color: Option<String>,

        /// Spot pattern filter (option value or tag name)
        #[arg(long)]
        spots: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "geojson")]
        format: OutputFormat,

        /// Output file path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Map center latitude
        #[arg(long)]
        lat: Option<f64>,

        /// Map center longitude
        #[arg(long)]
        lon: Option<f64>,

        /// Initial zoom level
        #[arg(long)]
        zoom: Option<u8>,

        /// Base tile layer URL template
        #[arg(long)]
        tile_url: Option<String>,
    },

    /// List the filter options for both attributes
    Options {
        /// Print as JSON instead of tab-separated text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Geojson,
    Html,
    Text,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shroommap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            source,
            color,
            spots,
            format,
            output,
            lat,
            lon,
            zoom,
            tile_url,
        } => {
            let mut config = MapConfig::from_env()?;
            if let Some(lat) = lat {
                config.view.center.lat = lat;
            }
            if let Some(lon) = lon {
                config.view.center.lon = lon;
            }
            if let Some(zoom) = zoom {
                config.view.zoom = zoom;
            }
            if let Some(tile_url) = tile_url {
                config.view.tile_url = tile_url;
            }
            config.validate()?;

            let source = Source::from_connection_string(&source)?;
            let mut app = Orchestrator::boot(MarkerLayer::new(), &config)?;
            app.load(&source).await;

            if let Some(value) = color {
                app.select(Attribute::Color, &value);
            }
            if let Some(value) = spots {
                app.select(Attribute::Spots, &value);
            }

            match app.status() {
                Status::LoadFailed => {
                    if let Some(err) = app.load_error() {
                        warn!("Showing an empty map: {}", err);
                    }
                }
                Status::NoData => info!("No observations available"),
                _ => info!(
                    "Showing {} of {} observations",
                    app.visible().len(),
                    app.canonical().len()
                ),
            }

            let rendered = match format {
                OutputFormat::Geojson => serde_json::to_string_pretty(&app.surface().to_geojson())
                    .map_err(|e| ShroomError::WriterError(e.to_string()))?,
                OutputFormat::Html => LeafletPage::new().render(app.surface())?,
                OutputFormat::Text => text_listing(app.visible()),
            };

            if let Some(path) = output {
                std::fs::write(&path, &rendered)?;
                info!("Map written to {}", path.display());
            } else {
                println!("{}", rendered);
            }
        }

        Commands::Options { json } => {
            if json {
                let options = serde_json::json!({
                    "color": COLORS.options(),
                    "spots": SPOTS.options(),
                });
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                for (attribute, options) in [
                    (Attribute::Color, COLORS.options()),
                    (Attribute::Spots, SPOTS.options()),
                ] {
                    println!("{}:", attribute);
                    for option in options {
                        println!("  {}\t{}", option.value, option.label);
                    }
                }
            }
        }
    }

    Ok(())
}

/// One tab-separated line per visible record
fn text_listing(records: &[Record]) -> String {
    records
        .iter()
        .map(|record| {
            let LatLng { lat, lon } = record.position;
            format!(
                "{}\t{},{}\t{}\t{}",
                record.name,
                lat,
                lon,
                record.color.label(),
                record.spots.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

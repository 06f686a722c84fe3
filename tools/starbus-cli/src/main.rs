use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use starbus_core::favorites::FileStore;
use starbus_core::provider::DaeguBusClient;
use starbus_core::StarbusConfig;

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "starbus",
    author,
    version,
    about = "Daegu bus stops, live arrivals and favorites",
    long_about = "Searches Daegu bus stops, shows live arrival estimates and keeps a \
                  list of favorite stops.\n\n\
                  Route itineraries and vehicle positions come from the data.go.kr \
                  open API and need a service key."
)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, env = "STARBUS_CONFIG")]
    config: Option<PathBuf>,

    /// Decoded data.go.kr service key for route lookups
    #[arg(long, env = "DAEGU_SERVICE_KEY", hide_env_values = true)]
    service_key: Option<String>,

    /// Directory holding the favorites snapshot
    #[arg(long, env = "STARBUS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search stops by name
    Search {
        query: String,

        /// Filter and rank the way autocomplete does instead of listing
        /// the provider's answer as is
        #[arg(long)]
        ranked: bool,
    },

    /// Show current arrivals at a stop once
    Arrivals { stop_id: String },

    /// Poll arrivals until interrupted; defaults to the first favorite
    Watch { stop_id: Option<String> },

    /// Manage favorite stops
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Show a route's itinerary with live vehicles
    Route {
        route_id: String,

        /// Highlight this stop
        #[arg(long)]
        stop: Option<String>,
    },

    /// Convert east-belt grid coordinates to latitude/longitude
    Locate { x: f64, y: f64 },
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
    List,

    /// Add or remove a stop, found by searching for `query`
    Toggle { query: String, stop_id: String },
}

fn load_config(args: &Args) -> Result<StarbusConfig> {
    let mut config = match &args.config {
        Some(path) => StarbusConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => StarbusConfig::default(),
    };

    if let Some(key) = &args.service_key {
        config.service_key = Some(key.clone());
    }
    if let Some(dir) = &args.data_dir {
        config.favorites_dir = Some(dir.clone());
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = load_config(&args)?;
    tracing::debug!(?config.favorites_dir, "configuration loaded");

    if let Command::Locate { x, y } = args.command {
        commands::locate(x, y);
        return Ok(());
    }

    let client = Arc::new(DaeguBusClient::new(&config).context("Failed to build HTTP client")?);
    let store = Arc::new(FileStore::new(
        config
            .favorites_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".starbus")),
    ));

    match args.command {
        Command::Search { query, ranked } => commands::search(client, &query, ranked).await,
        Command::Arrivals { stop_id } => commands::arrivals(client, &stop_id).await,
        Command::Watch { stop_id } => commands::watch(client, store, &config, stop_id).await,
        Command::Favorites { action } => match action {
            FavoritesAction::List => commands::list_favorites(store),
            FavoritesAction::Toggle { query, stop_id } => {
                commands::toggle_favorite(client, store, &config, &query, &stop_id).await
            }
        },
        Command::Route { route_id, stop } => {
            commands::route(client, store, &config, &route_id, stop).await
        }
        Command::Locate { .. } => Ok(()),
    }
}

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use usermap::database::Database;
use usermap::server::{start_server, AppState};
use usermap::settings::Settings;
use usermap::utils::{get_snapshot_path, open_browser};
use usermap::{HttpSource, LoadState, UserMap, UserMapProps};

#[derive(Parser, Debug)]
#[command(name = "usermap", version, about = "Map of clients and volunteers by city")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the map page and the user endpoints
    Serve {
        /// Port to listen on (overrides usermap.ini)
        #[arg(long)]
        port: Option<u16>,
        /// JSON file with users (overrides usermap.ini)
        #[arg(long = "data")]
        data_file: Option<String>,
    },
    /// Fetch from a running server and print the markers one render produces
    Markers {
        #[arg(long, default_value = "http://127.0.0.1:3001")]
        url: String,
        #[arg(long, action = clap::ArgAction::SetTrue)]
        clients: bool,
        #[arg(long, action = clap::ArgAction::SetTrue)]
        volunteers: bool,
        #[arg(long, default_value = "row")]
        view: String,
        /// Zoom reported by the viewport before rendering
        #[arg(long)]
        zoom: Option<f64>,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("usermap=info,tower_http=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
}

/// Fill the store from the data file, falling back to the last snapshot
/// written for that same file.
fn load_users(db: &Database, data_file: Option<&str>) -> Result<()> {
    let Some(data_file) = data_file else {
        warn!("No data file configured, serving an empty map");
        return Ok(());
    };

    let snapshot = get_snapshot_path();
    let sources = vec![data_file.to_string()];

    match db.import_json(Path::new(data_file)) {
        Ok(_) => {
            if let Err(e) = db.save_to_disk(&snapshot, &sources) {
                warn!("Failed to save snapshot: {:#}", e);
            }
        }
        Err(e) => {
            warn!("{:#}", e);
            if db.load_from_disk(&snapshot, &sources)? {
                info!("Loaded users from snapshot {}", snapshot.display());
            } else {
                warn!("No usable snapshot for {}, serving an empty map", data_file);
            }
        }
    }
    Ok(())
}

async fn serve(port: Option<u16>, data_file: Option<String>) -> Result<()> {
    let mut settings = Settings::load().context("Failed to load settings")?;
    if settings.apply_overrides(port, data_file) {
        match settings.save() {
            Ok(()) => info!("Saved settings to {}", Settings::config_path().display()),
            Err(e) => warn!("Failed to save settings: {:#}", e),
        }
    }

    let db = Database::new();
    load_users(&db, settings.data_file.as_deref())?;
    info!("{} users in store", db.get_users_count()?);

    let port = settings.port;
    if settings.auto_open_browser {
        open_browser(&format!("http://127.0.0.1:{}", port));
    }

    start_server(AppState::new(db, settings), port).await
}

async fn print_markers(
    url: String,
    props: UserMapProps,
    zoom: Option<f64>,
) -> Result<()> {
    let source = HttpSource::new(url);
    let mut map = UserMap::new(props);
    map.mount(&source).await;

    if let LoadState::Failed(message) = map.load_state() {
        bail!("Could not load map data from {}: {}", source.base_url(), message);
    }
    if let Some(zoom) = zoom {
        map.handle_viewport_change(zoom);
    }

    println!("{}", serde_json::to_string_pretty(&map.payload())?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        None => serve(None, None).await,
        Some(Command::Serve { port, data_file }) => serve(port, data_file).await,
        Some(Command::Markers {
            url,
            clients,
            volunteers,
            view,
            zoom,
        }) => print_markers(url, UserMapProps::new(view, clients, volunteers), zoom).await,
    }
}

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::constants::{CONFIG_FILE, SNAPSHOT_FILE};

/// Returns the cross-platform directory for application data
pub fn get_app_data_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        let home_dir = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home_dir)
            .join("Library")
            .join("Application Support")
            .join("UserMap")
    } else if cfg!(target_os = "windows") {
        match std::env::var("APPDATA") {
            Ok(appdata) => PathBuf::from(appdata).join("UserMap"),
            Err(_) => PathBuf::from(".").join("UserMap"),
        }
    } else if let Ok(xdg_data_home) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data_home).join("UserMap")
    } else {
        // ~/.local/share/UserMap
        let home_dir = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home_dir)
            .join(".local")
            .join("share")
            .join("UserMap")
    }
}

/// Ensures the directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<(), std::io::Error> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn get_config_path() -> PathBuf {
    get_app_data_dir().join(CONFIG_FILE)
}

pub fn get_snapshot_path() -> PathBuf {
    get_app_data_dir().join(SNAPSHOT_FILE)
}

/// Open `url` in the default browser. Failures are only logged.
pub fn open_browser(url: &str) {
    let result = if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", "", url]).spawn()
    } else if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    if let Err(e) = result {
        tracing::warn!("Failed to open browser for {}: {}", url, e);
    }
}

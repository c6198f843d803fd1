use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_PORT;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub port: u16,
    /// JSON file with the users to serve
    pub data_file: Option<String>,
    /// Layout variant used when a request does not name one
    pub default_view: String,
    #[serde(default)]
    pub auto_open_browser: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_file: None,
            default_view: "row".to_string(),
            auto_open_browser: false,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Read `key = value` lines. Missing file means defaults; unknown keys
    /// and unparsable values are ignored.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut settings = Settings::default();
        if !config_path.exists() {
            return Ok(settings);
        }

        let file = File::open(config_path).context("Failed to open config file")?;
        let reader = BufReader::new(file);
        let mut config_map = HashMap::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line from config")?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        if let Some(port_str) = config_map.get("port") {
            match port_str.parse::<u16>() {
                Ok(port) => settings.port = port,
                Err(_) => tracing::warn!("Ignoring invalid port in config: {}", port_str),
            }
        }
        if let Some(data_file) = config_map.get("data_file") {
            let data_file = data_file.trim_matches('"');
            if !data_file.is_empty() {
                settings.data_file = Some(data_file.to_string());
            }
        }
        if let Some(view) = config_map.get("default_view") {
            settings.default_view = view.trim_matches('"').to_string();
        }
        if let Some(auto_open_str) = config_map.get("auto_open_browser") {
            if let Ok(auto_open) = auto_open_str.parse::<bool>() {
                settings.auto_open_browser = auto_open;
            }
        }

        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Creating config directory")?;
        }

        let mut content = String::new();
        content.push_str("# UserMap Configuration File\n");
        content.push_str(&format!("port = {}\n", self.port));
        if let Some(ref data_file) = self.data_file {
            content.push_str(&format!("data_file = \"{}\"\n", data_file));
        }
        content.push_str(&format!("default_view = \"{}\"\n", self.default_view));
        content.push_str(&format!("auto_open_browser = {}\n", self.auto_open_browser));

        std::fs::write(config_path, content).context("Failed to write to config file")?;
        Ok(())
    }

    /// Apply command line overrides. Returns true when anything changed.
    pub fn apply_overrides(&mut self, port: Option<u16>, data_file: Option<String>) -> bool {
        let mut changed = false;
        if let Some(port) = port {
            changed |= self.port != port;
            self.port = port;
        }
        if let Some(data_file) = data_file {
            changed |= self.data_file.as_deref() != Some(data_file.as_str());
            self.data_file = Some(data_file);
        }
        changed
    }

    pub fn config_path() -> PathBuf {
        crate::utils::get_config_path()
    }
}

use std::sync::{Arc, Mutex};
use crate::database::Database;
use crate::settings::Settings;

// Application state for sharing the user store and settings
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Arc<Mutex<Settings>>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        Self {
            db,
            settings: Arc::new(Mutex::new(settings)),
        }
    }

    pub fn default_view(&self) -> String {
        self.settings
            .lock()
            .map(|s| s.default_view.clone())
            .unwrap_or_else(|_| Settings::default().default_view)
    }
}

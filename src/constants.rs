// Port configuration
pub const DEFAULT_PORT: u16 = 3001;

// Marker colors
pub const CLIENT_COLOR: &str = "#F1592A";
pub const VOLUNTEER_COLOR: &str = "#29AAE2";
pub const MIXED_COLOR: &str = "#17294d";
pub const MARKER_FILL_OPACITY: f64 = 0.5;

// Marker sizing. Below DETAIL_ZOOM every dot has the same radius.
pub const DETAIL_ZOOM: f64 = 9.0;
pub const OVERVIEW_RADIUS: u32 = 2;
pub const MIN_DETAIL_RADIUS: u32 = 5;

// Zoom the component starts with before any viewport change is reported
pub const INITIAL_ZOOM: f64 = 2.0;
pub const MIN_ZOOM: f64 = 1.5;
pub const MAX_ZOOM: f64 = 10.0;

// Popup message ids and their default labels
pub const CLIENTS_MESSAGE_ID: &str = "HomePage.UserSelectClients";
pub const CLIENTS_LABEL: &str = "Clients";
pub const VOLUNTEERS_MESSAGE_ID: &str = "HomePage.UserSelectVolunteers";
pub const VOLUNTEERS_LABEL: &str = "Volunteers";

pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"http://osm.org/copyright\">OpenStreetMap</a> contributors";

// Store snapshot
pub const SNAPSHOT_VERSION: u32 = 1;
pub const SNAPSHOT_FILE: &str = "users_v1.bin";
pub const CONFIG_FILE: &str = "usermap.ini";

//! The user map component and the pure derivations behind it.

pub mod data;
pub mod marker;
pub mod mode;
pub mod state;
pub mod view;

pub use data::{CitiesResponse, City, Counts, CountsResponse, MapData};
pub use marker::{build_marker, detail_radius, radius_at, Marker, Popup, PopupLine};
pub use mode::{ModeStrategy, ViewMode};
pub use state::{LoadState, MapPayload, UserMap, UserMapProps, UserMapState};
pub use view::{MapView, Viewport};

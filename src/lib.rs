//! Map of clients and volunteers by city.
//!
//! The [`map`] module holds the component: mode selection, eligibility,
//! color and radius derivation over data fetched through [`client`]. The
//! [`server`] module serves the aggregated data and an embedded Leaflet page.

pub mod aggregation;
pub mod client;
pub mod constants;
pub mod database;
pub mod map;
pub mod server;
pub mod settings;
pub mod utils;

pub use client::{DataSource, FetchError, HttpSource};
pub use database::{Database, Role, UserRecord};
pub use map::{City, Counts, LoadState, Marker, UserMap, UserMapProps, ViewMode};
pub use settings::Settings;

use serde::{Deserialize, Serialize};

/// Users sharing a location, bucketed per role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    /// `[lat, lon]` on the wire
    pub coordinates: (f64, f64),
    pub client_count: u64,
    pub volunteer_count: u64,
}

impl City {
    pub fn total(&self) -> u64 {
        self.client_count.saturating_add(self.volunteer_count)
    }
}

/// Global totals used as denominators for the detail radius.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub client_count: u64,
    pub volunteer_count: u64,
    pub all_count: u64,
}

// Wire envelopes for GET /users/cities and GET /users/counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitiesResponse {
    pub cities: Vec<City>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountsResponse {
    pub counts: Counts,
}

/// Everything one mount fetches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapData {
    pub cities: Vec<City>,
    pub counts: Counts,
}

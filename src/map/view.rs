use serde::Serialize;

use crate::constants::{MAX_ZOOM, MIN_ZOOM, TILE_ATTRIBUTION, TILE_URL};

/// Layout variant of the map. `row` frames the whole world; anything else
/// frames North America.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MapView {
    Row,
    Full,
}

impl MapView {
    pub fn from_prop(view: &str) -> Self {
        if view == "row" {
            MapView::Row
        } else {
            MapView::Full
        }
    }

    pub fn viewport(self) -> Viewport {
        match self {
            MapView::Row => Viewport {
                center: (40.4637, -3.7492),
                zoom: 1.5,
                min_zoom: MIN_ZOOM,
                max_zoom: MAX_ZOOM,
                max_bounds: [(85.0, -180.0), (-85.0, 180.0)],
                tile_url: TILE_URL,
                attribution: TILE_ATTRIBUTION,
            },
            MapView::Full => Viewport {
                center: (37.0902, -95.7129),
                zoom: 4.0,
                min_zoom: MIN_ZOOM,
                max_zoom: MAX_ZOOM,
                max_bounds: [(50.5933, -136.5005), (14.3868, -67.5503)],
                tile_url: TILE_URL,
                attribution: TILE_ATTRIBUTION,
            },
        }
    }
}

/// Initial framing handed to the map widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub center: (f64, f64),
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub max_bounds: [(f64, f64); 2],
    pub tile_url: &'static str,
    pub attribution: &'static str,
}

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use rust_embed::RustEmbed;
use serde::Deserialize;
use tracing::error;

use crate::aggregation::{aggregate_cities, total_counts};
use crate::map::{CitiesResponse, CountsResponse, LoadState, MapPayload, UserMap, UserMapProps};

use super::state::AppState;

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

// GET /users/cities
pub async fn get_cities(State(state): State<AppState>) -> Result<Json<CitiesResponse>, StatusCode> {
    let users = state.db.get_all_users().map_err(|e| {
        error!("User store error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(CitiesResponse {
        cities: aggregate_cities(&users),
    }))
}

// GET /users/counts
pub async fn get_counts(State(state): State<AppState>) -> Result<Json<CountsResponse>, StatusCode> {
    let users = state.db.get_all_users().map_err(|e| {
        error!("User store error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(CountsResponse {
        counts: total_counts(&users),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkerQuery {
    pub clients: Option<bool>,
    pub volunteers: Option<bool>,
    pub view: Option<String>,
    pub zoom: Option<f64>,
}

/// GET /api/markers: mount a map component on the local store and return
/// one render of it. A failed load still returns the payload, with its
/// `load` field carrying the error, under a 500 status.
pub async fn get_markers(
    State(state): State<AppState>,
    Query(query): Query<MarkerQuery>,
) -> (StatusCode, Json<MapPayload>) {
    let props = UserMapProps::new(
        query.view.unwrap_or_else(|| state.default_view()),
        query.clients.unwrap_or(false),
        query.volunteers.unwrap_or(false),
    );

    let mut map = UserMap::new(props);
    map.mount(&state.db).await;
    if let Some(zoom) = query.zoom {
        map.handle_viewport_change(zoom);
    }

    render(&map)
}

fn render(map: &UserMap) -> (StatusCode, Json<MapPayload>) {
    let status = match map.load_state() {
        LoadState::Failed(message) => {
            error!("Failed to build markers: {}", message);
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::OK,
    };
    (status, Json(map.payload()))
}

fn embedded(path: &str, content_type: &'static str) -> Response {
    match Asset::get(path) {
        Some(file) => ([(header::CONTENT_TYPE, content_type)], file.data.into_owned()).into_response(),
        None => {
            error!("Embedded asset missing: {}", path);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

pub async fn index_html() -> Response {
    match Asset::get("index.html") {
        Some(file) => Html(file.data.into_owned()).into_response(),
        None => {
            error!("Embedded asset missing: index.html");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

pub async fn style_css() -> Response {
    embedded("style.css", "text/css")
}

pub async fn script_js() -> Response {
    embedded("script.js", "application/javascript")
}

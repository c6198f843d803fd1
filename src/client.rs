//! Fetch pipeline for the map component.
//!
//! A mount performs exactly one sequence: the city list, then the global
//! counts. The second request is only issued once the first one resolved.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::map::{CitiesResponse, City, Counts, CountsResponse, MapData};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Store error: {0}")]
    Store(String),
}

/// Anything that can provide the two data sets the map needs.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_cities(&self) -> Result<Vec<City>, FetchError>;

    async fn fetch_counts(&self) -> Result<Counts, FetchError>;

    /// Cities first, then counts. Stops at the first failure.
    async fn load(&self) -> Result<MapData, FetchError> {
        let cities = self.fetch_cities().await?;
        let counts = self.fetch_counts().await?;
        Ok(MapData { cities, counts })
    }
}

/// Reads `/users/cities` and `/users/counts` from a running server.
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "fetching");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status().as_u16(),
                url,
            });
        }

        resp.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Decode(e.to_string())
            } else {
                FetchError::Network(e)
            }
        })
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_cities(&self) -> Result<Vec<City>, FetchError> {
        let body: CitiesResponse = self.get_json("/users/cities").await?;
        Ok(body.cities)
    }

    async fn fetch_counts(&self) -> Result<Counts, FetchError> {
        let body: CountsResponse = self.get_json("/users/counts").await?;
        Ok(body.counts)
    }
}

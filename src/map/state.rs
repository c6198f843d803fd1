use serde::Serialize;
use tracing::{debug, info, warn};

use super::data::{City, Counts, MapData};
use super::marker::{build_marker, Marker};
use super::mode::ViewMode;
use super::view::{MapView, Viewport};
use crate::client::DataSource;
use crate::constants::{DETAIL_ZOOM, INITIAL_ZOOM, OVERVIEW_RADIUS};

/// Inputs of the map component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserMapProps {
    pub view: String,
    pub view_clients: bool,
    pub view_volunteers: bool,
}

impl UserMapProps {
    pub fn new(view: impl Into<String>, view_clients: bool, view_volunteers: bool) -> Self {
        Self {
            view: view.into(),
            view_clients,
            view_volunteers,
        }
    }

    pub fn mode(&self) -> Option<ViewMode> {
        ViewMode::select(self.view_clients, self.view_volunteers)
    }

    pub fn map_view(&self) -> MapView {
        MapView::from_prop(&self.view)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

/// Everything the component keeps between renders.
#[derive(Debug, Clone, PartialEq)]
pub struct UserMapState {
    pub cities: Vec<City>,
    pub counts: Counts,
    pub zoom: f64,
    pub load: LoadState,
}

impl Default for UserMapState {
    fn default() -> Self {
        Self {
            cities: Vec::new(),
            counts: Counts::default(),
            zoom: INITIAL_ZOOM,
            load: LoadState::Loading,
        }
    }
}

impl UserMapState {
    /// Markers for `mode` at the current zoom, in city order.
    pub fn markers(&self, mode: Option<ViewMode>) -> Vec<Marker> {
        let Some(mode) = mode else {
            return Vec::new();
        };
        self.cities
            .iter()
            .enumerate()
            .filter_map(|(index, city)| build_marker(index, mode, city, &self.counts, self.zoom))
            .collect()
    }
}

/// Serialized form of one render, consumed by the browser page.
#[derive(Debug, Clone, Serialize)]
pub struct MapPayload {
    pub view: MapView,
    pub mode: Option<ViewMode>,
    pub load: LoadState,
    pub viewport: Viewport,
    pub zoom: f64,
    pub detail_zoom: f64,
    pub overview_radius: u32,
    pub markers: Vec<Marker>,
}

/// The map component: props in, markers out.
pub struct UserMap {
    props: UserMapProps,
    state: UserMapState,
    mounted: bool,
}

impl UserMap {
    pub fn new(props: UserMapProps) -> Self {
        Self {
            props,
            state: UserMapState::default(),
            mounted: false,
        }
    }

    /// Run the fetch sequence once. Later calls are ignored; the data stays
    /// as fetched for the component's lifetime.
    pub async fn mount<S: DataSource + ?Sized>(&mut self, source: &S) {
        if self.mounted {
            debug!("user map already mounted, skipping fetch");
            return;
        }
        self.mounted = true;

        match source.load().await {
            Ok(data) => self.apply(data),
            Err(e) => {
                warn!("user map data could not be loaded: {}", e);
                self.state.load = LoadState::Failed(e.to_string());
            }
        }
    }

    fn apply(&mut self, data: MapData) {
        info!(
            cities = data.cities.len(),
            all_count = data.counts.all_count,
            "user map data loaded"
        );
        self.state.cities = data.cities;
        self.state.counts = data.counts;
        self.state.load = LoadState::Loaded;
    }

    /// New toggles or layout. Never triggers a fetch.
    pub fn set_props(&mut self, props: UserMapProps) {
        self.props = props;
    }

    /// Record the zoom reported by the map widget after a pan or zoom.
    pub fn handle_viewport_change(&mut self, zoom: f64) {
        self.state.zoom = zoom;
    }

    pub fn props(&self) -> &UserMapProps {
        &self.props
    }

    pub fn state(&self) -> &UserMapState {
        &self.state
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state.load
    }

    pub fn mode(&self) -> Option<ViewMode> {
        self.props.mode()
    }

    pub fn viewport(&self) -> Viewport {
        self.props.map_view().viewport()
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.state.markers(self.mode())
    }

    pub fn payload(&self) -> MapPayload {
        MapPayload {
            view: self.props.map_view(),
            mode: self.mode(),
            load: self.state.load.clone(),
            viewport: self.viewport(),
            zoom: self.state.zoom,
            detail_zoom: DETAIL_ZOOM,
            overview_radius: OVERVIEW_RADIUS,
            markers: self.markers(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FetchError;
    use crate::constants::{CLIENT_COLOR, MIXED_COLOR, VOLUNTEER_COLOR};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSource {
        data: MapData,
        city_calls: AtomicUsize,
        count_calls: AtomicUsize,
    }

    impl StaticSource {
        fn new(cities: Vec<City>, counts: Counts) -> Self {
            Self {
                data: MapData { cities, counts },
                city_calls: AtomicUsize::new(0),
                count_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DataSource for StaticSource {
        async fn fetch_cities(&self) -> Result<Vec<City>, FetchError> {
            self.city_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.data.cities.clone())
        }

        async fn fetch_counts(&self) -> Result<Counts, FetchError> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.data.counts)
        }
    }

    struct BrokenCities {
        count_calls: AtomicUsize,
    }

    #[async_trait]
    impl DataSource for BrokenCities {
        async fn fetch_cities(&self) -> Result<Vec<City>, FetchError> {
            Err(FetchError::Decode("unexpected end of input".to_string()))
        }

        async fn fetch_counts(&self) -> Result<Counts, FetchError> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Counts::default())
        }
    }

    struct BrokenCounts {
        city_calls: AtomicUsize,
    }

    #[async_trait]
    impl DataSource for BrokenCounts {
        async fn fetch_cities(&self) -> Result<Vec<City>, FetchError> {
            self.city_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![city("Madrid", 3, 0)])
        }

        async fn fetch_counts(&self) -> Result<Counts, FetchError> {
            Err(FetchError::Status {
                status: 502,
                url: "http://localhost/users/counts".to_string(),
            })
        }
    }

    fn city(name: &str, client_count: u64, volunteer_count: u64) -> City {
        City {
            name: name.to_string(),
            coordinates: (40.4, -3.7),
            client_count,
            volunteer_count,
        }
    }

    fn madrid_source() -> StaticSource {
        StaticSource::new(
            vec![city("Madrid", 3, 0)],
            Counts {
                client_count: 10,
                volunteer_count: 10,
                all_count: 20,
            },
        )
    }

    #[tokio::test]
    async fn test_madrid_client_mode_detail_radius() {
        let mut map = UserMap::new(UserMapProps::new("row", true, false));
        map.mount(&madrid_source()).await;
        map.handle_viewport_change(9.0);

        let markers = map.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].radius, 35);
        assert_eq!(markers[0].color, CLIENT_COLOR);
    }

    #[tokio::test]
    async fn test_madrid_volunteer_mode_excluded() {
        let mut map = UserMap::new(UserMapProps::new("row", false, true));
        map.mount(&madrid_source()).await;
        map.handle_viewport_change(9.0);
        assert!(map.markers().is_empty());
    }

    #[tokio::test]
    async fn test_no_toggle_renders_no_markers() {
        let mut map = UserMap::new(UserMapProps::new("row", false, false));
        map.mount(&madrid_source()).await;
        assert_eq!(map.mode(), None);
        assert!(map.markers().is_empty());
        assert_eq!(map.load_state(), &LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_all_mode_colors() {
        let source = StaticSource::new(
            vec![city("A", 10, 0), city("B", 0, 5), city("C", 2, 2), city("D", 0, 0)],
            Counts {
                client_count: 12,
                volunteer_count: 7,
                all_count: 19,
            },
        );
        let mut map = UserMap::new(UserMapProps::new("full", true, true));
        map.mount(&source).await;

        let markers = map.markers();
        let colors: Vec<(&str, &str)> = markers
            .iter()
            .map(|m| (m.name.as_str(), m.color))
            .collect();
        assert_eq!(
            colors,
            vec![("A", CLIENT_COLOR), ("B", VOLUNTEER_COLOR), ("C", MIXED_COLOR)]
        );
    }

    #[tokio::test]
    async fn test_overview_radius_at_initial_zoom() {
        let mut map = UserMap::new(UserMapProps::new("row", true, false));
        map.mount(&madrid_source()).await;
        assert_eq!(map.state().zoom, INITIAL_ZOOM);
        assert_eq!(map.markers()[0].radius, 2);
    }

    #[tokio::test]
    async fn test_mount_fetches_once_in_order() {
        let source = madrid_source();
        let mut map = UserMap::new(UserMapProps::new("row", true, false));
        map.mount(&source).await;
        map.mount(&source).await;
        map.set_props(UserMapProps::new("full", true, true));
        map.handle_viewport_change(10.0);
        let _ = map.markers();

        assert_eq!(source.city_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.count_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_cities_fetch_skips_counts() {
        let source = BrokenCities {
            count_calls: AtomicUsize::new(0),
        };
        let mut map = UserMap::new(UserMapProps::new("row", true, true));
        map.mount(&source).await;

        assert!(matches!(map.load_state(), LoadState::Failed(msg) if msg.contains("Decode")));
        assert_eq!(source.count_calls.load(Ordering::SeqCst), 0);
        assert!(map.state().cities.is_empty());
        assert!(map.markers().is_empty());
    }

    #[tokio::test]
    async fn test_failed_counts_fetch_keeps_no_cities() {
        let source = BrokenCounts {
            city_calls: AtomicUsize::new(0),
        };
        let mut map = UserMap::new(UserMapProps::new("row", true, true));
        map.mount(&source).await;
        map.handle_viewport_change(9.0);

        assert!(matches!(map.load_state(), LoadState::Failed(msg) if msg.contains("HTTP 502")));
        assert_eq!(source.city_calls.load(Ordering::SeqCst), 1);
        assert!(map.state().cities.is_empty());
        assert_eq!(map.state().counts, Counts::default());
        assert!(map.markers().is_empty());
    }

    #[tokio::test]
    async fn test_rerender_is_idempotent() {
        let mut map = UserMap::new(UserMapProps::new("row", true, true));
        map.mount(&madrid_source()).await;
        map.handle_viewport_change(9.5);
        assert_eq!(map.markers(), map.markers());
    }

    #[test]
    fn test_markers_before_mount_are_empty() {
        let map = UserMap::new(UserMapProps::new("row", true, true));
        assert_eq!(map.load_state(), &LoadState::Loading);
        assert!(map.markers().is_empty());
    }

    #[tokio::test]
    async fn test_payload_reports_view_and_thresholds() {
        let mut map = UserMap::new(UserMapProps::new("row", true, false));
        map.mount(&madrid_source()).await;
        let payload = map.payload();
        assert_eq!(payload.view, MapView::Row);
        assert_eq!(payload.mode, Some(ViewMode::Client));
        assert_eq!(payload.detail_zoom, 9.0);
        assert_eq!(payload.overview_radius, 2);
        assert_eq!(payload.markers[0].detail_radius, 35);
    }
}

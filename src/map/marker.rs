use serde::Serialize;
use std::fmt;

use super::data::{City, Counts};
use super::mode::ViewMode;
use crate::constants::{
    CLIENTS_LABEL, CLIENTS_MESSAGE_ID, DETAIL_ZOOM, MARKER_FILL_OPACITY, MIN_DETAIL_RADIUS,
    OVERVIEW_RADIUS, VOLUNTEERS_LABEL, VOLUNTEERS_MESSAGE_ID,
};

/// One `label: count` row of a marker popup. `message_id` lets the page swap
/// in a translated label; `label` is the default text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupLine {
    pub message_id: &'static str,
    pub label: &'static str,
    pub count: u64,
}

impl PopupLine {
    pub fn clients(count: u64) -> Self {
        Self {
            message_id: CLIENTS_MESSAGE_ID,
            label: CLIENTS_LABEL,
            count,
        }
    }

    pub fn volunteers(count: u64) -> Self {
        Self {
            message_id: VOLUNTEERS_MESSAGE_ID,
            label: VOLUNTEERS_LABEL,
            count,
        }
    }
}

impl fmt::Display for PopupLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<PopupLine>,
}

/// A circle marker ready to be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub key: String,
    pub name: String,
    pub center: (f64, f64),
    pub color: &'static str,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    /// Radius at the zoom the marker was built for
    pub radius: u32,
    /// Radius once the viewport reaches the detail zoom
    pub detail_radius: u32,
    pub popup: Popup,
}

/// Count-proportional radius: `floor(count / total * 100)` plus the minimum,
/// or just the minimum when that floor is zero.
///
/// A zero `total` is treated as a zero ratio. The floor is taken on integers
/// so a share such as 29/100 scales to exactly 29.
pub fn detail_radius(count: u64, total: u64) -> u32 {
    let scaled = if total == 0 {
        0
    } else {
        u128::from(count) * 100 / u128::from(total)
    };
    let scaled = u32::try_from(scaled).unwrap_or(u32::MAX - MIN_DETAIL_RADIUS);
    if scaled == 0 {
        MIN_DETAIL_RADIUS
    } else {
        scaled.saturating_add(MIN_DETAIL_RADIUS)
    }
}

/// Radius for `city` at `zoom`. Dots stay uniform until the detail zoom.
pub fn radius_at(zoom: f64, mode: ViewMode, city: &City, counts: &Counts) -> u32 {
    if zoom >= DETAIL_ZOOM {
        let (count, total) = mode.share(city, counts);
        detail_radius(count, total)
    } else {
        OVERVIEW_RADIUS
    }
}

/// Build the marker for `city`, or `None` when the city has nobody to show
/// in this mode.
pub fn build_marker(
    index: usize,
    mode: ViewMode,
    city: &City,
    counts: &Counts,
    zoom: f64,
) -> Option<Marker> {
    if !mode.is_eligible(city) {
        return None;
    }

    let color = mode.color(city);
    let (count, total) = mode.share(city, counts);

    Some(Marker {
        key: format!("{}-{}", index, city.name),
        name: city.name.clone(),
        center: city.coordinates,
        color,
        fill_color: color,
        fill_opacity: MARKER_FILL_OPACITY,
        radius: radius_at(zoom, mode, city, counts),
        detail_radius: detail_radius(count, total),
        popup: Popup {
            title: city.name.clone(),
            lines: mode.popup_lines(city),
        },
    })
}

//! View mode selection and the per-mode dispatch table.
//!
//! Every mode-dependent decision (color, popup, eligibility, radius share)
//! goes through [`ModeStrategy`], so adding a mode means adding one table
//! entry rather than another branch in each method.

use serde::{Deserialize, Serialize};

use super::data::{City, Counts};
use super::marker::PopupLine;
use crate::constants::{CLIENT_COLOR, MIXED_COLOR, VOLUNTEER_COLOR};

/// Which role population is being visualized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Client,
    Volunteer,
    All,
}

/// Mode-specific behavior. One static instance per [`ViewMode`].
pub struct ModeStrategy {
    pub color: fn(&City) -> &'static str,
    pub popup: fn(&City) -> Vec<PopupLine>,
    pub eligible: fn(&City) -> bool,
    /// `(city count, global total)` feeding the detail radius
    pub share: fn(&City, &Counts) -> (u64, u64),
}

static CLIENT_STRATEGY: ModeStrategy = ModeStrategy {
    color: client_color,
    popup: client_popup,
    eligible: has_clients,
    share: client_share,
};

static VOLUNTEER_STRATEGY: ModeStrategy = ModeStrategy {
    color: volunteer_color,
    popup: volunteer_popup,
    eligible: has_volunteers,
    share: volunteer_share,
};

static ALL_STRATEGY: ModeStrategy = ModeStrategy {
    color: mixed_color,
    popup: all_popup,
    eligible: has_anyone,
    share: all_share,
};

impl ViewMode {
    /// Derive the mode from the two toggles. `None` means nothing is selected
    /// and the map renders without markers.
    pub fn select(show_clients: bool, show_volunteers: bool) -> Option<Self> {
        match (show_clients, show_volunteers) {
            (true, false) => Some(ViewMode::Client),
            (false, true) => Some(ViewMode::Volunteer),
            (true, true) => Some(ViewMode::All),
            (false, false) => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ViewMode::Client => "client",
            ViewMode::Volunteer => "volunteer",
            ViewMode::All => "all",
        }
    }

    pub fn strategy(self) -> &'static ModeStrategy {
        match self {
            ViewMode::Client => &CLIENT_STRATEGY,
            ViewMode::Volunteer => &VOLUNTEER_STRATEGY,
            ViewMode::All => &ALL_STRATEGY,
        }
    }

    pub fn is_eligible(self, city: &City) -> bool {
        (self.strategy().eligible)(city)
    }

    pub fn color(self, city: &City) -> &'static str {
        (self.strategy().color)(city)
    }

    pub fn popup_lines(self, city: &City) -> Vec<PopupLine> {
        (self.strategy().popup)(city)
    }

    pub fn share(self, city: &City, counts: &Counts) -> (u64, u64) {
        (self.strategy().share)(city, counts)
    }
}

fn client_color(_: &City) -> &'static str {
    CLIENT_COLOR
}

fn volunteer_color(_: &City) -> &'static str {
    VOLUNTEER_COLOR
}

// A single-role city takes that role's color
fn mixed_color(city: &City) -> &'static str {
    if city.client_count == 0 {
        VOLUNTEER_COLOR
    } else if city.volunteer_count == 0 {
        CLIENT_COLOR
    } else {
        MIXED_COLOR
    }
}

fn client_popup(city: &City) -> Vec<PopupLine> {
    vec![PopupLine::clients(city.client_count)]
}

fn volunteer_popup(city: &City) -> Vec<PopupLine> {
    vec![PopupLine::volunteers(city.volunteer_count)]
}

fn all_popup(city: &City) -> Vec<PopupLine> {
    vec![
        PopupLine::clients(city.client_count),
        PopupLine::volunteers(city.volunteer_count),
    ]
}

fn has_clients(city: &City) -> bool {
    city.client_count != 0
}

fn has_volunteers(city: &City) -> bool {
    city.volunteer_count != 0
}

fn has_anyone(city: &City) -> bool {
    city.total() != 0
}

fn client_share(city: &City, counts: &Counts) -> (u64, u64) {
    (city.client_count, counts.client_count)
}

fn volunteer_share(city: &City, counts: &Counts) -> (u64, u64) {
    (city.volunteer_count, counts.volunteer_count)
}

fn all_share(city: &City, counts: &Counts) -> (u64, u64) {
    (city.total(), counts.all_count)
}

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEFAULT_MARKER_ICON, SELECTED_MARKER_ICON};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Static input describing one point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub info: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Position of a place in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceId(pub usize);

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque marker id issued by the map widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerIcon {
    Default,
    Selected,
}

impl MarkerIcon {
    pub fn asset_path(&self) -> &'static str {
        match self {
            MarkerIcon::Default => DEFAULT_MARKER_ICON,
            MarkerIcon::Selected => SELECTED_MARKER_ICON,
        }
    }
}

/// Text shown in the shared info overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayContent {
    pub title: String,
    pub description: String,
}

/// Venue data attached once both lookups succeeded
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Enrichment {
    pub venue_id: Option<String>,
    pub url: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub address: String,
    pub info: String,
    pub tags: Vec<String>,
    pub position: LatLng,
    pub marker: MarkerHandle,
    pub enrichment: Enrichment,
}

impl Place {
    pub fn is_enriched(&self) -> bool {
        self.enrichment.complete
    }

    /// Venue details to display; `None` until enrichment completed
    pub fn venue_details(&self) -> Option<&Enrichment> {
        self.is_enriched().then_some(&self.enrichment)
    }

    pub fn overlay_content(&self) -> OverlayContent {
        OverlayContent {
            title: self.name.clone(),
            description: self.address.clone(),
        }
    }
}

/// Toggle over one tag value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub name: String,
    pub enabled: bool,
}

impl Filter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
        }
    }
}

/// What the venue search should be keyed by
#[derive(Debug, Clone, PartialEq)]
pub struct VenueQuery {
    pub position: LatLng,
    pub name: String,
}

impl From<&Place> for VenueQuery {
    fn from(place: &Place) -> Self {
        Self {
            position: place.position,
            name: place.name.clone(),
        }
    }
}

/// First candidate returned by a venue search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueMatch {
    pub id: String,
    pub url: Option<String>,
    pub phone: Option<String>,
}

/// First photo descriptor returned for a venue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRef {
    pub prefix: String,
    pub suffix: String,
}

impl PhotoRef {
    pub fn url(&self, size: &str) -> String {
        format!("{}{}{}", self.prefix, size, self.suffix)
    }
}

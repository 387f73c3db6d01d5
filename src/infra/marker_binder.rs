use std::collections::HashSet;
use std::sync::Arc;

use crate::app::ports::MapWidgetPort;
use crate::filter::VisibilityObserver;
use crate::types::{MarkerHandle, PlaceId};

/// Mirrors the filter result onto marker visibility: every marker is shown
/// when its place is in the visible set and hidden otherwise.
pub struct MarkerVisibilityBinder {
    map: Arc<dyn MapWidgetPort>,
    markers: Vec<(PlaceId, MarkerHandle)>,
}

impl MarkerVisibilityBinder {
    pub fn new(map: Arc<dyn MapWidgetPort>, markers: Vec<(PlaceId, MarkerHandle)>) -> Self {
        Self { map, markers }
    }
}

impl VisibilityObserver for MarkerVisibilityBinder {
    fn visible_changed(&self, visible: &[PlaceId]) {
        let visible: HashSet<PlaceId> = visible.iter().copied().collect();
        for (id, marker) in &self.markers {
            self.map.set_visible(*marker, visible.contains(id));
        }
    }
}

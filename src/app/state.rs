use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::app::enrich_use_case::EnrichUseCase;
use crate::app::ports::{MapWidgetPort, VenueLookupPort};
use crate::catalog::Catalog;
use crate::config::MapConfig;
use crate::error::{BrowserError, Result};
use crate::filter::FilterEngine;
use crate::infra::marker_binder::MarkerVisibilityBinder;
use crate::observability::metrics;
use crate::types::{Filter, MarkerHandle, MarkerIcon, Place, PlaceId, PlaceRecord};

/// Which place is on display and whether its last lookup failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub current: Option<PlaceId>,
    pub connection_error: bool,
}

/// Everything one browsing session owns: the map, the places, the filters,
/// the selection and the venue lookup.
pub struct AppState {
    map: Arc<dyn MapWidgetPort>,
    map_config: MapConfig,
    catalog: Catalog,
    filters: FilterEngine,
    selection: Selection,
    enricher: EnrichUseCase,
    started: bool,
}

impl AppState {
    pub fn new(
        records: &[PlaceRecord],
        map: Arc<dyn MapWidgetPort>,
        map_config: MapConfig,
        lookup: Arc<dyn VenueLookupPort>,
        photo_size: &str,
    ) -> Self {
        let catalog = Catalog::build(records, map.as_ref());
        let mut filters = FilterEngine::new(&catalog);
        let markers = catalog.places().iter().map(|p| (p.id, p.marker)).collect();
        filters.subscribe(Box::new(MarkerVisibilityBinder::new(map.clone(), markers)));

        Self {
            map,
            map_config,
            catalog,
            filters,
            selection: Selection::default(),
            enricher: EnrichUseCase::new(lookup, photo_size),
            started: false,
        }
    }

    /// Put the markers on the map and center it. Repeated calls are no-ops.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.map.set_view(self.map_config.center(), self.map_config.zoom);
        self.map.attach_markers(&self.catalog.markers());
        self.started = true;
        info!(
            places = self.catalog.len(),
            filters = self.filters.filters().len(),
            "Browser started"
        );
    }

    /// Take the markers and the overlay off the map.
    pub fn shutdown(&mut self) {
        if !self.started {
            return;
        }
        self.map.close_overlay();
        self.map.detach_markers(&self.catalog.markers());
        self.started = false;
        info!("Browser shut down");
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Re-center after the viewport changed size
    pub fn on_resize(&self) {
        self.map.set_view(self.map_config.center(), self.map_config.zoom);
    }

    pub fn places(&self) -> &[Place] {
        self.catalog.places()
    }

    pub fn place(&self, id: PlaceId) -> Option<&Place> {
        self.catalog.get(id)
    }

    pub fn find_place(&self, name: &str) -> Option<&Place> {
        self.catalog.by_name(name)
    }

    pub fn filters(&self) -> &[Filter] {
        self.filters.filters()
    }

    pub fn search_text(&self) -> &str {
        self.filters.query()
    }

    pub fn visible_places(&self) -> Vec<&Place> {
        self.filters
            .visible()
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .collect()
    }

    pub fn toggle_filter(&mut self, name: &str) -> Result<bool> {
        self.filters.toggle(name)
    }

    pub fn set_filter(&mut self, name: &str, enabled: bool) -> Result<()> {
        self.filters.set_enabled(name, enabled)
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filters.set_query(text);
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn current_place(&self) -> Option<&Place> {
        self.selection.current.and_then(|id| self.catalog.get(id))
    }

    /// Show `id` on the map and enrich it if it never was.
    ///
    /// Lookup failures do not fail the call; they set
    /// `Selection::connection_error` and the place is still selected.
    pub async fn select(&mut self, id: PlaceId) -> Result<&Place> {
        let (marker, content) = {
            let place = self
                .catalog
                .get(id)
                .ok_or_else(|| BrowserError::UnknownPlace(id.to_string()))?;
            (place.marker, place.overlay_content())
        };
        metrics::selection::selected();

        self.map.open_overlay(marker, &content);
        if let Some(previous) = self.current_place() {
            self.map.set_icon(previous.marker, MarkerIcon::Default);
        }
        self.map.set_icon(marker, MarkerIcon::Selected);
        self.selection.connection_error = false;

        if let Some(place) = self.catalog.get_mut(id) {
            if let Err(e) = self.enricher.enrich(place).await {
                warn!(place = %place.name, error = %e, "Could not load venue details");
                self.selection.connection_error = true;
            }
        }

        self.selection.current = Some(id);
        debug!(place = %id, error = self.selection.connection_error, "Selection updated");
        self.catalog
            .get(id)
            .ok_or_else(|| BrowserError::UnknownPlace(id.to_string()))
    }

    /// Marker click notification from the map
    pub async fn on_marker_click(&mut self, marker: MarkerHandle) -> Result<&Place> {
        let id = self
            .catalog
            .by_marker(marker)
            .map(|p| p.id)
            .ok_or_else(|| BrowserError::UnknownPlace(format!("marker {}", marker.0)))?;
        self.select(id).await
    }
}

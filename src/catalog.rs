use tracing::debug;

use crate::app::ports::MapWidgetPort;
use crate::types::{
    Enrichment, Filter, LatLng, MarkerHandle, MarkerIcon, Place, PlaceId, PlaceRecord,
};

/// The fixed set of places for a session plus one filter per distinct tag
#[derive(Debug)]
pub struct Catalog {
    places: Vec<Place>,
    filters: Vec<Filter>,
}

impl Catalog {
    /// Build places from static records, creating a marker for each on `map`.
    pub fn build(records: &[PlaceRecord], map: &dyn MapWidgetPort) -> Self {
        let places: Vec<Place> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let position = LatLng::new(record.lat, record.lng);
                Place {
                    id: PlaceId(idx),
                    name: record.name.clone(),
                    address: record.address.clone(),
                    info: record.info.clone(),
                    tags: record.tags.clone(),
                    position,
                    marker: map.add_marker(position, MarkerIcon::Default),
                    enrichment: Enrichment::default(),
                }
            })
            .collect();

        let filters = derive_filters(records);
        debug!(places = places.len(), filters = filters.len(), "Catalog built");
        Self { places, filters }
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn get(&self, id: PlaceId) -> Option<&Place> {
        self.places.get(id.0)
    }

    pub fn get_mut(&mut self, id: PlaceId) -> Option<&mut Place> {
        self.places.get_mut(id.0)
    }

    pub fn by_marker(&self, marker: MarkerHandle) -> Option<&Place> {
        self.places.iter().find(|p| p.marker == marker)
    }

    /// Case-insensitive exact name lookup
    pub fn by_name(&self, name: &str) -> Option<&Place> {
        let wanted = name.to_lowercase();
        self.places.iter().find(|p| p.name.to_lowercase() == wanted)
    }

    pub fn markers(&self) -> Vec<MarkerHandle> {
        self.places.iter().map(|p| p.marker).collect()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

/// One enabled filter per distinct tag, in order of first appearance across
/// the records.
pub fn derive_filters(records: &[PlaceRecord]) -> Vec<Filter> {
    let mut filters: Vec<Filter> = Vec::new();
    for tag in records.iter().flat_map(|r| r.tags.iter()) {
        if !filters.iter().any(|f| &f.name == tag) {
            filters.push(Filter::new(tag.clone()));
        }
    }
    filters
}

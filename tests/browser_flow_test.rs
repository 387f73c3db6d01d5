use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use place_browser::app::ports::{MapWidgetPort, VenueLookupPort};
use place_browser::app::state::AppState;
use place_browser::config::MapConfig;
use place_browser::data::seed_places;
use place_browser::error::{BrowserError, Result as BrowserResult};
use place_browser::infra::map_widget::InMemoryMap;
use place_browser::types::{
    LatLng, MarkerIcon, PhotoRef, PlaceId, PlaceRecord, VenueMatch, VenueQuery,
};

/// Venue lookup whose outcome can be switched between calls
#[derive(Default)]
struct FakeFoursquare {
    fail_search: Mutex<bool>,
    fail_photo: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl FakeFoursquare {
    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl VenueLookupPort for FakeFoursquare {
    async fn search_venue(&self, query: &VenueQuery) -> BrowserResult<VenueMatch> {
        self.calls.lock().unwrap().push(format!("search {}", query.name));
        if *self.fail_search.lock().unwrap() {
            return Err(BrowserError::Api { message: "offline".into() });
        }
        Ok(VenueMatch {
            id: format!("venue-{}", query.name.len()),
            url: Some("https://example.com".into()),
            phone: Some("(312) 555-0199".into()),
        })
    }

    async fn first_photo(&self, venue_id: &str) -> BrowserResult<PhotoRef> {
        self.calls.lock().unwrap().push(format!("photo {}", venue_id));
        if *self.fail_photo.lock().unwrap() {
            return Err(BrowserError::Api { message: "offline".into() });
        }
        Ok(PhotoRef {
            prefix: "https://photos.example/".into(),
            suffix: format!("/{}.jpg", venue_id),
        })
    }
}

fn session(records: &[PlaceRecord]) -> (AppState, Arc<InMemoryMap>, Arc<FakeFoursquare>) {
    let map = Arc::new(InMemoryMap::new());
    let lookup = Arc::new(FakeFoursquare::default());
    let mut state = AppState::new(
        records,
        map.clone(),
        MapConfig::default(),
        lookup.clone(),
        "width400",
    );
    state.start();
    (state, map, lookup)
}

fn visible_names(state: &AppState) -> Vec<String> {
    state.visible_places().iter().map(|p| p.name.clone()).collect()
}

fn rec(name: &str, tags: &[&str]) -> PlaceRecord {
    PlaceRecord {
        name: name.to_string(),
        address: format!("{} street", name),
        lat: 41.0,
        lng: -87.0,
        info: String::new(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[test]
fn test_filter_walkthrough_drives_markers() -> Result<()> {
    let (mut state, map, _) = session(&[rec("A", &["X"]), rec("B", &["Y"])]);
    let marker_a = state.places()[0].marker;
    let marker_b = state.places()[1].marker;
    assert_eq!(map.displayed_markers(), vec![marker_a, marker_b]);

    state.toggle_filter("Y")?;
    assert_eq!(visible_names(&state), vec!["A"]);
    assert_eq!(map.displayed_markers(), vec![marker_a]);

    state.set_search("b");
    assert_eq!(state.search_text(), "b");
    assert!(visible_names(&state).is_empty());
    assert!(map.displayed_markers().is_empty());

    state.set_search("");
    state.toggle_filter("Y")?;
    assert_eq!(visible_names(&state), vec!["A", "B"]);
    assert_eq!(map.displayed_markers(), vec![marker_a, marker_b]);
    Ok(())
}

#[test]
fn test_start_and_shutdown_lifecycle() {
    let (mut state, map, _) = session(&seed_places());
    assert!(state.is_started());
    assert_eq!(map.displayed_markers().len(), 8);
    let (center, zoom) = map.view().unwrap();
    assert_eq!(center, MapConfig::default().center());
    assert_eq!(zoom, 11);

    state.start();
    assert_eq!(map.marker_count(), 8);

    map.set_view(LatLng::new(0.0, 0.0), 3);
    state.on_resize();
    assert_eq!(map.view(), Some((MapConfig::default().center(), 11)));

    state.shutdown();
    assert!(!state.is_started());
    assert!(map.displayed_markers().is_empty());
}

#[tokio::test]
async fn test_select_enriches_once() -> Result<()> {
    let (mut state, map, lookup) = session(&seed_places());
    let id = state.find_place("Jazz Showcase").unwrap().id;

    let place = state.select(id).await?;
    assert!(place.is_enriched());
    assert_eq!(place.enrichment.phone.as_deref(), Some("(312) 555-0199"));
    assert_eq!(
        place.enrichment.photo_url.as_deref(),
        Some("https://photos.example/width400/venue-13.jpg")
    );
    assert!(!state.selection().connection_error);
    assert_eq!(state.selection().current, Some(id));
    assert_eq!(lookup.call_count(), 2);

    let overlay = map.overlay().unwrap();
    assert_eq!(overlay.content.title, "Jazz Showcase");
    assert_eq!(overlay.content.description, "806 S Plymouth Ct, Chicago, IL 60605");

    state.select(id).await?;
    assert_eq!(lookup.call_count(), 2);
    assert_eq!(state.current_place().map(|p| p.id), Some(id));
    Ok(())
}

#[tokio::test]
async fn test_search_failure_sets_error_and_still_selects() -> Result<()> {
    let (mut state, _, lookup) = session(&seed_places());
    *lookup.fail_search.lock().unwrap() = true;

    let place = state.select(PlaceId(2)).await?;
    assert!(!place.is_enriched());
    assert!(place.enrichment.venue_id.is_none());
    assert!(state.selection().connection_error);
    assert_eq!(state.selection().current, Some(PlaceId(2)));
    assert_eq!(lookup.call_count(), 1);

    // the next selection retries and clears the flag
    *lookup.fail_search.lock().unwrap() = false;
    let place = state.select(PlaceId(2)).await?;
    assert!(place.is_enriched());
    assert!(!state.selection().connection_error);
    assert_eq!(lookup.call_count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_photo_failure_leaves_place_unenriched() -> Result<()> {
    let (mut state, _, lookup) = session(&seed_places());
    *lookup.fail_photo.lock().unwrap() = true;

    let place = state.select(PlaceId(0)).await?;
    assert!(!place.is_enriched());
    assert!(place.venue_details().is_none());
    assert!(place.enrichment.venue_id.is_none());
    assert!(place.enrichment.url.is_none());
    assert!(place.enrichment.phone.is_none());
    assert!(state.selection().connection_error);
    assert_eq!(lookup.call_count(), 2);

    *lookup.fail_photo.lock().unwrap() = false;
    let place = state.select(PlaceId(0)).await?;
    let details = place.venue_details().expect("details after a full lookup");
    assert_eq!(details.url.as_deref(), Some("https://example.com"));
    assert_eq!(details.phone.as_deref(), Some("(312) 555-0199"));
    assert!(!state.selection().connection_error);
    Ok(())
}

#[tokio::test]
async fn test_selection_swaps_marker_icons() -> Result<()> {
    let (mut state, map, _) = session(&seed_places());
    let first = state.places()[0].marker;
    let second = state.places()[1].marker;

    state.select(PlaceId(0)).await?;
    assert_eq!(map.marker(first).unwrap().icon, MarkerIcon::Selected);

    state.on_marker_click(second).await?;
    assert_eq!(map.marker(first).unwrap().icon, MarkerIcon::Default);
    assert_eq!(map.marker(second).unwrap().icon, MarkerIcon::Selected);
    assert_eq!(map.overlay().unwrap().anchor, second);
    assert_eq!(state.selection().current, Some(PlaceId(1)));
    Ok(())
}

#[tokio::test]
async fn test_unknown_place_is_an_error() {
    let (mut state, _, lookup) = session(&seed_places());
    let err = state.select(PlaceId(99)).await.unwrap_err();
    assert!(matches!(err, BrowserError::UnknownPlace(_)));
    assert!(state.place(PlaceId(99)).is_none());
    assert_eq!(lookup.call_count(), 0);
    assert_eq!(state.selection().current, None);
}

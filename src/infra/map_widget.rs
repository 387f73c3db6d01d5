use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::app::ports::MapWidgetPort;
use crate::types::{LatLng, MarkerHandle, MarkerIcon, OverlayContent};

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerState {
    pub position: LatLng,
    pub icon: MarkerIcon,
    pub visible: bool,
    pub attached: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    pub anchor: MarkerHandle,
    pub content: OverlayContent,
}

#[derive(Debug, Default)]
struct MapState {
    next_marker: u64,
    markers: BTreeMap<MarkerHandle, MarkerState>,
    overlay: Option<OverlayState>,
    view: Option<(LatLng, u8)>,
}

/// Map widget that only records what a real map would display
#[derive(Debug, Clone, Default)]
pub struct InMemoryMap {
    state: Arc<Mutex<MapState>>,
}

impl InMemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MapState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<MarkerState> {
        self.lock().markers.get(&handle).cloned()
    }

    pub fn marker_count(&self) -> usize {
        self.lock().markers.len()
    }

    /// Markers that are both on the map and visible
    pub fn displayed_markers(&self) -> Vec<MarkerHandle> {
        self.lock()
            .markers
            .iter()
            .filter(|(_, m)| m.attached && m.visible)
            .map(|(h, _)| *h)
            .collect()
    }

    pub fn overlay(&self) -> Option<OverlayState> {
        self.lock().overlay.clone()
    }

    pub fn view(&self) -> Option<(LatLng, u8)> {
        self.lock().view
    }
}

impl MapWidgetPort for InMemoryMap {
    fn add_marker(&self, position: LatLng, icon: MarkerIcon) -> MarkerHandle {
        let mut state = self.lock();
        let handle = MarkerHandle(state.next_marker);
        state.next_marker += 1;
        state.markers.insert(
            handle,
            MarkerState {
                position,
                icon,
                visible: true,
                attached: false,
            },
        );
        handle
    }

    fn attach_markers(&self, markers: &[MarkerHandle]) {
        let mut state = self.lock();
        for handle in markers {
            if let Some(marker) = state.markers.get_mut(handle) {
                marker.attached = true;
            }
        }
        debug!(count = markers.len(), "Markers attached");
    }

    fn detach_markers(&self, markers: &[MarkerHandle]) {
        let mut state = self.lock();
        for handle in markers {
            if let Some(marker) = state.markers.get_mut(handle) {
                marker.attached = false;
            }
        }
        if state.overlay.as_ref().is_some_and(|o| markers.contains(&o.anchor)) {
            state.overlay = None;
        }
    }

    fn set_visible(&self, marker: MarkerHandle, visible: bool) {
        if let Some(m) = self.lock().markers.get_mut(&marker) {
            m.visible = visible;
        }
    }

    fn set_icon(&self, marker: MarkerHandle, icon: MarkerIcon) {
        if let Some(m) = self.lock().markers.get_mut(&marker) {
            m.icon = icon;
        }
    }

    fn open_overlay(&self, marker: MarkerHandle, content: &OverlayContent) {
        self.lock().overlay = Some(OverlayState {
            anchor: marker,
            content: content.clone(),
        });
    }

    fn close_overlay(&self) {
        self.lock().overlay = None;
    }

    fn set_view(&self, center: LatLng, zoom: u8) {
        self.lock().view = Some((center, zoom));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_is_shared() {
        let map = InMemoryMap::new();
        let a = map.add_marker(LatLng::new(1.0, 1.0), MarkerIcon::Default);
        let b = map.add_marker(LatLng::new(2.0, 2.0), MarkerIcon::Default);
        let content = |t: &str| OverlayContent {
            title: t.to_string(),
            description: String::new(),
        };

        map.open_overlay(a, &content("A"));
        map.open_overlay(b, &content("B"));

        let overlay = map.overlay().unwrap();
        assert_eq!(overlay.anchor, b);
        assert_eq!(overlay.content.title, "B");
    }

    #[test]
    fn test_displayed_requires_attached_and_visible() {
        let map = InMemoryMap::new();
        let a = map.add_marker(LatLng::new(1.0, 1.0), MarkerIcon::Default);
        let b = map.add_marker(LatLng::new(2.0, 2.0), MarkerIcon::Default);
        assert!(map.displayed_markers().is_empty());

        map.attach_markers(&[a, b]);
        map.set_visible(b, false);
        assert_eq!(map.displayed_markers(), vec![a]);
    }

    #[test]
    fn test_detach_closes_overlay_on_detached_marker() {
        let map = InMemoryMap::new();
        let a = map.add_marker(LatLng::new(1.0, 1.0), MarkerIcon::Default);
        map.attach_markers(&[a]);
        map.open_overlay(
            a,
            &OverlayContent {
                title: "A".into(),
                description: "addr".into(),
            },
        );

        map.detach_markers(&[a]);
        assert!(map.overlay().is_none());
        assert!(!map.marker(a).unwrap().attached);
    }
}

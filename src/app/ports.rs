use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    LatLng, MarkerHandle, MarkerIcon, OverlayContent, PhotoRef, VenueMatch, VenueQuery,
};

/// Two-step venue lookup used to enrich a place
#[async_trait]
pub trait VenueLookupPort: Send + Sync {
    async fn search_venue(&self, query: &VenueQuery) -> Result<VenueMatch>;
    async fn first_photo(&self, venue_id: &str) -> Result<PhotoRef>;
}

#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The map widget the markers and the shared info overlay live on.
///
/// Calls are synchronous UI operations; implementations keep their own state
/// behind `&self`.
pub trait MapWidgetPort: Send + Sync {
    fn add_marker(&self, position: LatLng, icon: MarkerIcon) -> MarkerHandle;
    fn attach_markers(&self, markers: &[MarkerHandle]);
    fn detach_markers(&self, markers: &[MarkerHandle]);
    fn set_visible(&self, marker: MarkerHandle, visible: bool);
    fn set_icon(&self, marker: MarkerHandle, icon: MarkerIcon);
    fn open_overlay(&self, marker: MarkerHandle, content: &OverlayContent);
    fn close_overlay(&self);
    fn set_view(&self, center: LatLng, zoom: u8);
}

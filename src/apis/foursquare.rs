use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::app::ports::{HttpClientPort, VenueLookupPort};
use crate::config::FoursquareConfig;
use crate::constants::SEARCH_INTENT_MATCH;
use crate::error::{BrowserError, Result};
use crate::observability::metrics;
use crate::types::{PhotoRef, VenueMatch, VenueQuery};

/// Foursquare v2 venue search + photo lookup
pub struct FoursquareClient {
    http: Box<dyn HttpClientPort>,
    config: FoursquareConfig,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    meta: Meta,
    response: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meta {
    code: u16,
    error_detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    venues: Vec<Venue>,
}

#[derive(Debug, Deserialize)]
struct Venue {
    id: String,
    url: Option<String>,
    contact: Option<Contact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Contact {
    formatted_phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotosResponse {
    photos: PhotoPage,
}

#[derive(Debug, Deserialize)]
struct PhotoPage {
    #[serde(default)]
    items: Vec<PhotoItem>,
}

#[derive(Debug, Deserialize)]
struct PhotoItem {
    prefix: String,
    suffix: String,
}

impl FoursquareClient {
    pub fn new(http: Box<dyn HttpClientPort>, config: FoursquareConfig) -> Self {
        if !config.has_credentials() {
            warn!("Foursquare credentials are not configured; lookups will be rejected");
        }
        Self { http, config }
    }

    pub fn search_url(&self, query: &VenueQuery) -> Result<Url> {
        let ll = query.position.to_string();
        let params = [
            ("ll", ll.as_str()),
            ("intent", SEARCH_INTENT_MATCH),
            ("name", query.name.as_str()),
        ];
        self.endpoint(&["venues", "search"], &params)
    }

    pub fn photos_url(&self, venue_id: &str) -> Result<Url> {
        self.endpoint(&["venues", venue_id, "photos"], &[])
    }

    /// Base URL plus percent-encoded path segments and the auth/version params
    fn endpoint(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let invalid = |reason: String| {
            BrowserError::Config(format!("Invalid Foursquare base URL '{}': {}", base, reason))
        };
        let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .extend_pairs(params.iter())
            .append_pair("client_id", &self.config.client_id)
            .append_pair("client_secret", &self.config.client_secret)
            .append_pair("v", &self.config.version);
        Ok(url)
    }

    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let resp = self.http.get(url.as_str()).await?;
        if !resp.is_success() {
            return Err(BrowserError::Api {
                message: format!("Foursquare returned HTTP {}", resp.status),
            });
        }
        Ok(resp.bytes)
    }
}

/// Check `meta` before looking at the response so API errors keep their detail
fn decode_envelope<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    if envelope.meta.code != 200 {
        return Err(BrowserError::Api {
            message: envelope
                .meta
                .error_detail
                .unwrap_or_else(|| format!("Foursquare meta code {}", envelope.meta.code)),
        });
    }
    let response = envelope
        .response
        .ok_or_else(|| BrowserError::MissingField("response".into()))?;
    Ok(serde_json::from_value(response)?)
}

/// First venue of a search response body
pub fn parse_venue_search(bytes: &[u8]) -> Result<VenueMatch> {
    let response: SearchResponse = decode_envelope(bytes)?;
    let venue = response
        .venues
        .into_iter()
        .next()
        .ok_or_else(|| BrowserError::MissingField("response.venues[0]".into()))?;
    Ok(VenueMatch {
        id: venue.id,
        url: venue.url,
        phone: venue.contact.and_then(|c| c.formatted_phone),
    })
}

/// First photo of a venue photos response body
pub fn parse_first_photo(bytes: &[u8]) -> Result<PhotoRef> {
    let response: PhotosResponse = decode_envelope(bytes)?;
    let item = response
        .photos
        .items
        .into_iter()
        .next()
        .ok_or_else(|| BrowserError::MissingField("response.photos.items[0]".into()))?;
    Ok(PhotoRef {
        prefix: item.prefix,
        suffix: item.suffix,
    })
}

#[async_trait]
impl VenueLookupPort for FoursquareClient {
    #[instrument(skip(self), fields(name = %query.name))]
    async fn search_venue(&self, query: &VenueQuery) -> Result<VenueMatch> {
        let url = self.search_url(query)?;
        debug!("Searching Foursquare venues");
        let result = self.fetch(&url).await.and_then(|bytes| parse_venue_search(&bytes));
        match &result {
            Ok(venue) => {
                metrics::venues::search_success();
                debug!(venue_id = %venue.id, "Venue matched");
            }
            Err(e) => {
                metrics::venues::search_error();
                warn!(error = %e, "Venue search failed");
            }
        }
        result
    }

    #[instrument(skip(self))]
    async fn first_photo(&self, venue_id: &str) -> Result<PhotoRef> {
        let url = self.photos_url(venue_id)?;
        let result = self.fetch(&url).await.and_then(|bytes| parse_first_photo(&bytes));
        match &result {
            Ok(_) => metrics::venues::photo_success(),
            Err(e) => {
                metrics::venues::photo_error();
                warn!(error = %e, "Photo lookup failed");
            }
        }
        result
    }
}

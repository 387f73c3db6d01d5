/// Foursquare v2 endpoint and the API version date the lookups are written against
pub const FOURSQUARE_BASE_URL: &str = "https://api.foursquare.com/v2";
pub const FOURSQUARE_API_VERSION: &str = "20150828";

/// Size token spliced between a photo's prefix and suffix
pub const DEFAULT_PHOTO_SIZE: &str = "width400";

/// Venue search intent: only return a venue that matches the given name
pub const SEARCH_INTENT_MATCH: &str = "match";

// Marker artwork
pub const DEFAULT_MARKER_ICON: &str = "img/arrow.png";
pub const SELECTED_MARKER_ICON: &str = "img/marker_selected.png";

// Initial map viewport (south side of Chicago)
pub const DEFAULT_CENTER_LAT: f64 = 41.795296;
pub const DEFAULT_CENTER_LNG: f64 = -87.624742;
pub const DEFAULT_ZOOM: u8 = 11;

pub const DEFAULT_CONFIG_PATH: &str = "browser.toml";

// Environment overrides for the Foursquare credentials
pub const ENV_CLIENT_ID: &str = "FOURSQUARE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "FOURSQUARE_CLIENT_SECRET";

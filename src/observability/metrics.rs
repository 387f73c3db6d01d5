//! Metrics for the place browser.
//!
//! Thin wrappers over the `metrics` macros so call sites never spell out
//! metric names. Nothing is recorded until `init` installs a recorder.

use std::fmt;
use std::sync::OnceLock;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    FilterRecomputes,
    FilterVisiblePlaces,
    PlaceSelections,
    VenueSearchSuccess,
    VenueSearchError,
    PhotoLookupSuccess,
    PhotoLookupError,
    EnrichmentComplete,
    EnrichmentFailed,
    EnrichmentSkipped,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::FilterRecomputes => "place_browser_filter_recomputes_total",
            MetricName::FilterVisiblePlaces => "place_browser_filter_visible_places",
            MetricName::PlaceSelections => "place_browser_selections_total",
            MetricName::VenueSearchSuccess => "place_browser_venue_search_success_total",
            MetricName::VenueSearchError => "place_browser_venue_search_error_total",
            MetricName::PhotoLookupSuccess => "place_browser_photo_lookup_success_total",
            MetricName::PhotoLookupError => "place_browser_photo_lookup_error_total",
            MetricName::EnrichmentComplete => "place_browser_enrichment_complete_total",
            MetricName::EnrichmentFailed => "place_browser_enrichment_failed_total",
            MetricName::EnrichmentSkipped => "place_browser_enrichment_skipped_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static METRICS_HANDLE: OnceLock<metrics_exporter_prometheus::PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Calling it twice is an error from the
/// exporter and is reported as such.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;
    METRICS_HANDLE.set(handle).ok();
    info!("Metrics recorder installed");
    Ok(())
}

/// Render everything recorded so far in the Prometheus text format
pub fn render() -> Option<String> {
    METRICS_HANDLE.get().map(|handle| handle.render())
}

pub mod filters {
    use super::MetricName;

    pub fn recomputed(visible: usize) {
        ::metrics::counter!(MetricName::FilterRecomputes.as_str()).increment(1);
        ::metrics::gauge!(MetricName::FilterVisiblePlaces.as_str()).set(visible as f64);
    }
}

pub mod selection {
    use super::MetricName;

    pub fn selected() {
        ::metrics::counter!(MetricName::PlaceSelections.as_str()).increment(1);
    }

    pub fn enrichment_complete() {
        ::metrics::counter!(MetricName::EnrichmentComplete.as_str()).increment(1);
    }

    pub fn enrichment_failed() {
        ::metrics::counter!(MetricName::EnrichmentFailed.as_str()).increment(1);
    }

    /// Place was already enriched, no lookups issued
    pub fn enrichment_skipped() {
        ::metrics::counter!(MetricName::EnrichmentSkipped.as_str()).increment(1);
    }
}

pub mod venues {
    use super::MetricName;

    pub fn search_success() {
        ::metrics::counter!(MetricName::VenueSearchSuccess.as_str()).increment(1);
    }

    pub fn search_error() {
        ::metrics::counter!(MetricName::VenueSearchError.as_str()).increment(1);
    }

    pub fn photo_success() {
        ::metrics::counter!(MetricName::PhotoLookupSuccess.as_str()).increment(1);
    }

    pub fn photo_error() {
        ::metrics::counter!(MetricName::PhotoLookupError.as_str()).increment(1);
    }
}

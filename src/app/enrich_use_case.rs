use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::app::ports::VenueLookupPort;
use crate::error::Result;
use crate::observability::metrics;
use crate::types::{Enrichment, Place, VenueQuery};

/// Attaches venue details and a photo to a place.
///
/// The photo lookup only runs once the venue search succeeded. Nothing is
/// attached to the place unless both steps succeed.
pub struct EnrichUseCase {
    lookup: Arc<dyn VenueLookupPort>,
    photo_size: String,
}

impl EnrichUseCase {
    pub fn new(lookup: Arc<dyn VenueLookupPort>, photo_size: impl Into<String>) -> Self {
        Self {
            lookup,
            photo_size: photo_size.into(),
        }
    }

    #[instrument(skip_all, fields(place = %place.name))]
    pub async fn enrich(&self, place: &mut Place) -> Result<()> {
        if place.is_enriched() {
            debug!("Already enriched, skipping lookups");
            metrics::selection::enrichment_skipped();
            return Ok(());
        }

        match self.run_lookups(place).await {
            Ok(()) => {
                metrics::selection::enrichment_complete();
                info!("Place enriched");
                Ok(())
            }
            Err(e) => {
                metrics::selection::enrichment_failed();
                Err(e)
            }
        }
    }

    async fn run_lookups(&self, place: &mut Place) -> Result<()> {
        let venue = self.lookup.search_venue(&VenueQuery::from(&*place)).await?;
        let photo = self.lookup.first_photo(&venue.id).await?;

        place.enrichment = Enrichment {
            photo_url: Some(photo.url(&self.photo_size)),
            venue_id: Some(venue.id),
            url: venue.url,
            phone: venue.phone,
            complete: true,
        };
        Ok(())
    }
}

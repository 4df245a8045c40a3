//! City jumps and address search.
//!
//! Navigation only moves the viewport. Loading data for the new area is a
//! separate, explicit refresh.

use log::{error, info};

use crate::city::City;
use crate::notice::Notice;
use crate::source::{GeocodedPlace, Geocoder, qualify_query};

use super::{MapViewState, RefreshPhase};

/// Zoom level applied after a successful address search.
pub const SEARCH_ZOOM: u8 = 15;

/// Result of an address search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query was blank; nothing was requested.
    Skipped,
    /// The viewport moved to the match.
    Moved(GeocodedPlace),
    /// No match or a failed request; the viewport is unchanged.
    Failed(Notice),
}

impl MapViewState {
    /// Centre the viewport on `city` at its preset zoom.
    pub fn go_to_city(&mut self, city: City) {
        info!("jumping to {city}");
        self.viewport.set_view(city.center(), city.zoom());
    }

    /// Geocode `query` within Paraguay and centre the viewport on the match.
    ///
    /// Blank queries are ignored. An empty result raises
    /// [`Notice::NotFound`]; a transport failure raises
    /// [`Notice::FetchFailure`]. Neither moves the viewport.
    pub async fn search_address<G>(&mut self, geocoder: &G, query: &str) -> SearchOutcome
    where
        G: Geocoder + ?Sized,
    {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return SearchOutcome::Skipped;
        }
        self.status.loading = true;
        let result = geocoder.geocode(&qualify_query(trimmed)).await;
        // An outstanding refresh keeps the indicator until it completes.
        if self.phase != RefreshPhase::Loading {
            self.status.loading = false;
        }
        let notice = match result {
            Ok(Some(place)) => {
                info!(
                    "address {trimmed:?} resolved to {:.5},{:.5}",
                    place.location.y, place.location.x
                );
                self.viewport.set_view(place.location, SEARCH_ZOOM);
                return SearchOutcome::Moved(place);
            }
            Ok(None) => Notice::NotFound {
                query: trimmed.to_owned(),
            },
            Err(err) => {
                error!("address search for {trimmed:?} failed: {err}");
                Notice::from(&err)
            }
        };
        self.status.notice = Some(notice.clone());
        SearchOutcome::Failed(notice)
    }
}

//! Viewport-driven refresh cycle.
//!
//! A refresh is split into [`MapViewState::begin_refresh`] and
//! [`MapViewState::complete_refresh`] so a caller can await the fetch in
//! between without holding the state. Each begin bumps a generation counter;
//! a completion carrying an older generation is discarded untouched, so only
//! the most recently started refresh ever renders.

use log::{debug, error, info, warn};

use crate::bbox::BoundingBox;
use crate::classify::classify_all;
use crate::layers::aggregate;
use crate::notice::Notice;
use crate::poi::RawPoint;
use crate::query::{OverpassQuery, build_query};
use crate::source::{GeodataError, GeodataSource};

use super::MapViewState;

/// Phase of the refresh state machine.
///
/// `Success` and `Failed` are terminal and immediately fall back to `Idle`;
/// they are reported through [`RefreshOutcome::phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    /// Ready for the next trigger.
    Idle,
    /// A fetch is outstanding.
    Loading,
    /// The last refresh rendered its results.
    Success,
    /// The last refresh failed and left the layers empty.
    Failed,
}

/// Handle for one started refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshTicket {
    generation: u64,
    bbox: BoundingBox,
    query: OverpassQuery,
}

impl RefreshTicket {
    /// Generation number assigned when the refresh began.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Area being refreshed.
    #[must_use]
    pub const fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Query to send to the geodata service.
    #[must_use]
    pub const fn query(&self) -> &OverpassQuery {
        &self.query
    }
}

/// Result of completing a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Results were rendered.
    Success {
        /// Distinct points received.
        points: usize,
        /// Markers placed across all category layers.
        markers: usize,
    },
    /// The fetch failed; the notice was raised and layers left empty.
    Failed(Notice),
    /// A newer refresh started before this one completed; nothing changed.
    Superseded,
}

impl RefreshOutcome {
    /// Terminal phase reached, or `None` for a superseded refresh.
    #[must_use]
    pub const fn phase(&self) -> Option<RefreshPhase> {
        match self {
            Self::Success { .. } => Some(RefreshPhase::Success),
            Self::Failed(_) => Some(RefreshPhase::Failed),
            Self::Superseded => None,
        }
    }
}

impl MapViewState {
    /// Start refreshing the current viewport.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        let bbox = self.viewport.bounds();
        self.begin_refresh_in(bbox)
    }

    /// Start refreshing an explicit area.
    ///
    /// Shows the loading indicator and detaches and empties every layer
    /// before the fetch is issued, so stale markers never outlive the
    /// request that replaces them.
    pub fn begin_refresh_in(&mut self, bbox: BoundingBox) -> RefreshTicket {
        self.generation += 1;
        self.phase = RefreshPhase::Loading;
        self.status.loading = true;
        self.clear_layers();
        let query = build_query(&bbox);
        debug!(
            "refresh #{} started for {}",
            self.generation,
            bbox.to_overpass()
        );
        RefreshTicket {
            generation: self.generation,
            bbox,
            query,
        }
    }

    /// Apply the fetch result of a started refresh.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<RawPoint>, GeodataError>,
    ) -> RefreshOutcome {
        if ticket.generation != self.generation {
            warn!(
                "discarding refresh #{}; refresh #{} is newer",
                ticket.generation, self.generation
            );
            return RefreshOutcome::Superseded;
        }
        let outcome = match result {
            Ok(points) => self.render(&points),
            Err(err) => self.fail(&err),
        };
        self.status.loading = false;
        self.phase = RefreshPhase::Idle;
        outcome
    }

    /// Run a full refresh of the current viewport against `source`.
    pub async fn refresh<S>(&mut self, source: &S) -> RefreshOutcome
    where
        S: GeodataSource + ?Sized,
    {
        let ticket = self.begin_refresh();
        let result = source.fetch_points(ticket.query()).await;
        self.complete_refresh(ticket, result)
    }

    /// Run a full refresh of `bbox` against `source`.
    pub async fn refresh_in<S>(&mut self, source: &S, bbox: BoundingBox) -> RefreshOutcome
    where
        S: GeodataSource + ?Sized,
    {
        let ticket = self.begin_refresh_in(bbox);
        let result = source.fetch_points(ticket.query()).await;
        self.complete_refresh(ticket, result)
    }

    fn render(&mut self, points: &[RawPoint]) -> RefreshOutcome {
        let classified = classify_all(points);
        let aggregation = aggregate(&classified);
        let markers = aggregation.layers.total_markers();
        self.layers = aggregation.layers;
        self.heat = aggregation.heat;
        self.status.point_count = classified.len().to_string();
        self.apply_visibility();
        info!(
            "refresh #{} rendered {} points as {markers} markers",
            self.generation,
            classified.len()
        );
        RefreshOutcome::Success {
            points: classified.len(),
            markers,
        }
    }

    fn fail(&mut self, err: &GeodataError) -> RefreshOutcome {
        error!("refresh #{} failed: {err}", self.generation);
        let notice = Notice::from(err);
        self.status.point_count = "0".to_owned();
        self.status.notice = Some(notice.clone());
        self.apply_visibility();
        RefreshOutcome::Failed(notice)
    }
}

//! The explicitly owned state of one map view.
//!
//! [`MapViewState`] replaces the ambient globals of a browser map: it holds
//! the viewport, the per-category layers, the heat surface, which of those
//! are attached to the map, the user's selection and the status displays.
//! Every pipeline stage reads and mutates it through `&mut self`, so all
//! changes happen on the caller's single execution context.

mod navigation;
mod refresh;

pub use navigation::{SEARCH_ZOOM, SearchOutcome};
pub use refresh::{RefreshOutcome, RefreshPhase, RefreshTicket};

use log::debug;

use crate::category::{Category, LayerKey};
use crate::city::City;
use crate::layers::{HeatSurface, LayerTable};
use crate::notice::Notice;
use crate::viewport::{Viewport, ViewportSize};
use crate::visibility::{VisibilitySelection, active_layers_summary};

/// Text displays and indicators surrounding the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDisplay {
    /// Whether the loading indicator is shown.
    pub loading: bool,
    /// Number of points loaded by the last refresh.
    pub point_count: String,
    /// Labels of the active layers, or a placeholder.
    pub active_layers: String,
    /// Blocking notification awaiting dismissal.
    pub notice: Option<Notice>,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            loading: false,
            point_count: "0".to_owned(),
            active_layers: String::new(),
            notice: None,
        }
    }
}

/// State of one map view and its overlays.
///
/// # Examples
/// ```
/// use civic_map_core::{Category, LayerKey, MapViewState};
///
/// let mut view = MapViewState::default();
/// assert!(view.is_attached(LayerKey::Category(Category::Police)));
/// assert_eq!(view.status().active_layers, "Police");
///
/// view.toggle_layer(LayerKey::Category(Category::Police));
/// assert_eq!(view.status().active_layers, "None");
/// ```
#[derive(Debug, Clone)]
pub struct MapViewState {
    viewport: Viewport,
    layers: LayerTable,
    heat: Option<HeatSurface>,
    attached: [bool; Category::COUNT],
    heat_attached: bool,
    selection: VisibilitySelection,
    status: StatusDisplay,
    phase: RefreshPhase,
    generation: u64,
}

impl Default for MapViewState {
    /// Centred on [`City::INITIAL`] with the default container size.
    fn default() -> Self {
        let city = City::INITIAL;
        Self::new(Viewport::new(
            city.center(),
            city.zoom(),
            ViewportSize::default(),
        ))
    }
}

impl MapViewState {
    /// A view showing `viewport` with the default selection applied.
    ///
    /// The default selection is reconciled immediately, so the first refresh
    /// renders into an already attached police layer.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self::with_selection(viewport, VisibilitySelection::default())
    }

    /// A view showing `viewport` with an explicit initial selection.
    #[must_use]
    pub fn with_selection(viewport: Viewport, selection: VisibilitySelection) -> Self {
        let mut state = Self {
            viewport,
            layers: LayerTable::default(),
            heat: None,
            attached: [false; Category::COUNT],
            heat_attached: false,
            selection,
            status: StatusDisplay::default(),
            phase: RefreshPhase::Idle,
            generation: 0,
        };
        state.apply_visibility();
        state
    }

    /// Current viewport.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable viewport, for pans and resizes driven by the map.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Per-category layers from the last successful refresh.
    #[must_use]
    pub const fn layers(&self) -> &LayerTable {
        &self.layers
    }

    /// Heat surface from the last successful refresh, if any point had a
    /// positive weight.
    #[must_use]
    pub const fn heat(&self) -> Option<&HeatSurface> {
        self.heat.as_ref()
    }

    /// Layers the user has toggled on.
    #[must_use]
    pub const fn selection(&self) -> &VisibilitySelection {
        &self.selection
    }

    /// Indicators and text displays.
    #[must_use]
    pub const fn status(&self) -> &StatusDisplay {
        &self.status
    }

    /// Current refresh phase.
    #[must_use]
    pub const fn phase(&self) -> RefreshPhase {
        self.phase
    }

    /// Whether `key` is attached to the map.
    #[must_use]
    pub fn is_attached(&self, key: LayerKey) -> bool {
        match key {
            LayerKey::Category(category) => self.attached[category.index()],
            LayerKey::Heat => self.heat_attached,
        }
    }

    /// Keys of every attached layer, categories first.
    pub fn attached_layers(&self) -> impl Iterator<Item = LayerKey> + '_ {
        LayerKey::ALL
            .into_iter()
            .filter(|key| self.is_attached(*key))
    }

    /// Flip `key` in the selection and reconcile attachments.
    ///
    /// Returns whether `key` is selected afterwards.
    pub fn toggle_layer(&mut self, key: LayerKey) -> bool {
        let selected = self.selection.toggle(key);
        debug!("layer {key} toggled {}", if selected { "on" } else { "off" });
        self.apply_visibility();
        selected
    }

    /// Replace the selection and reconcile attachments.
    pub fn set_selection(&mut self, selection: VisibilitySelection) {
        self.selection = selection;
        self.apply_visibility();
    }

    /// Dismiss the pending notification, if any.
    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.status.notice.take()
    }

    /// Attach selected layers, detach deselected ones, and refresh the
    /// active-layers summary.
    ///
    /// The heat surface is attached only when it exists.
    pub fn apply_visibility(&mut self) {
        for category in Category::ALL {
            let wanted = self.selection.is_selected(LayerKey::Category(category));
            let slot = &mut self.attached[category.index()];
            if *slot != wanted {
                debug!(
                    "{} layer {category} ({} markers)",
                    if wanted { "attaching" } else { "detaching" },
                    self.layers[category].len()
                );
                *slot = wanted;
            }
        }
        let heat_wanted = self.selection.is_selected(LayerKey::Heat) && self.heat.is_some();
        if self.heat_attached != heat_wanted {
            debug!(
                "{} heat surface",
                if heat_wanted { "attaching" } else { "detaching" }
            );
            self.heat_attached = heat_wanted;
        }
        self.status.active_layers = active_layers_summary(&self.selection, self.heat.is_some());
    }

    /// Detach and empty every layer and drop the heat surface.
    fn clear_layers(&mut self) {
        self.attached = [false; Category::COUNT];
        self.layers.clear();
        self.heat_attached = false;
        self.heat = None;
    }
}

#[cfg(test)]
mod tests;

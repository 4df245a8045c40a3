//! User layer selection and the active-layers summary.
//!
//! The selection is process-wide UI state: it survives refreshes and is
//! changed only by explicit toggles. Attachment of layers to the map is
//! reconciled against it by [`crate::MapViewState`].

use std::collections::BTreeSet;

use crate::category::{Category, LayerKey};

/// Summary shown when no layer contributes.
pub const NO_ACTIVE_LAYERS: &str = "None";

/// Separator between labels in the summary.
pub const SUMMARY_SEPARATOR: &str = " • ";

/// Set of layer keys currently toggled on.
///
/// # Examples
/// ```
/// use civic_map_core::{Category, LayerKey, VisibilitySelection};
///
/// let mut selection = VisibilitySelection::default();
/// assert!(selection.is_selected(LayerKey::Category(Category::Police)));
/// assert!(!selection.toggle(LayerKey::Category(Category::Police)));
/// assert!(selection.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilitySelection {
    keys: BTreeSet<LayerKey>,
}

impl Default for VisibilitySelection {
    /// Police only.
    fn default() -> Self {
        Self::from_keys([LayerKey::Category(Category::Police)])
    }
}

impl VisibilitySelection {
    /// A selection with nothing toggled on.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            keys: BTreeSet::new(),
        }
    }

    /// A selection containing exactly `keys`.
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = LayerKey>,
    {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Flip membership of `key`, returning whether it is now selected.
    pub fn toggle(&mut self, key: LayerKey) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// Whether `key` is toggled on.
    #[must_use]
    pub fn is_selected(&self, key: LayerKey) -> bool {
        self.keys.contains(&key)
    }

    /// Whether nothing is toggled on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Selected keys: categories in enumeration order, then heat.
    pub fn iter(&self) -> impl Iterator<Item = LayerKey> + '_ {
        self.keys.iter().copied()
    }
}

/// Join the labels of selected layers in enumeration order.
///
/// Category labels are listed whenever selected. The heat label is listed
/// only when a heat surface exists for the current refresh.
#[must_use]
pub fn active_layers_summary(selection: &VisibilitySelection, heat_present: bool) -> String {
    let labels: Vec<&str> = LayerKey::ALL
        .into_iter()
        .filter(|key| selection.is_selected(*key))
        .filter(|key| *key != LayerKey::Heat || heat_present)
        .map(LayerKey::label)
        .collect();
    if labels.is_empty() {
        NO_ACTIVE_LAYERS.to_owned()
    } else {
        labels.join(SUMMARY_SEPARATOR)
    }
}

//! Persisted discovery results.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use smartwatch_sdk::{load_json, save_json, StoreError};
use smartwatch_types::Baseline;
use tracing::debug;

use super::DiscoveredItem;

/// Baselines of all monitored items, keyed by item.
///
/// Written by discovery, read by every check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaselineStore {
    items: BTreeMap<String, Baseline>,
}

impl BaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load baselines from a JSON file. A missing file yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let store = load_json::<Self>(path)?.unwrap_or_default();
        debug!(path = %path.display(), items = store.len(), "loaded baselines");
        Ok(store)
    }

    /// Write all baselines to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        save_json(path.as_ref(), self)
    }

    /// Replace the whole content with a fresh discovery run.
    ///
    /// Items that were not rediscovered are dropped.
    pub fn replace(&mut self, discovered: impl IntoIterator<Item = DiscoveredItem>) {
        self.items = discovered
            .into_iter()
            .map(|d| (d.item, d.parameters))
            .collect();
    }

    /// Baseline of an item.
    pub fn get(&self, item: &str) -> Option<&Baseline> {
        self.items.get(item)
    }

    /// Iterate over all items in order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Baseline)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<DiscoveredItem> for BaselineStore {
    fn from_iter<T: IntoIterator<Item = DiscoveredItem>>(iter: T) -> Self {
        let mut store = Self::new();
        store.replace(iter);
        store
    }
}

//! Shared asset map filled while fragments are decoded.

use std::collections::{BTreeMap, btree_map::Entry};

use log::warn;

use crate::metrics;

/// Outcome of offering an asset to the [`AssetMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetInsert {
    /// The name was new and the payload was stored.
    Inserted,
    /// The name was known with the same payload.
    Duplicate,
    /// The name was known with a different payload; the first one was kept.
    Conflict,
}

/// Named asset payloads (data URLs), first-seen payload wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetMap {
    assets: BTreeMap<String, String>,
}

impl AssetMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Offer `payload` under `name`.
    ///
    /// A different payload for a known name is logged and counted but never
    /// replaces the stored one.
    pub fn insert(&mut self, name: &str, payload: &str) -> AssetInsert {
        match self.assets.entry(name.to_owned()) {
            Entry::Vacant(vacant) => {
                vacant.insert(payload.to_owned());
                AssetInsert::Inserted
            }
            Entry::Occupied(occupied) if occupied.get() == payload => AssetInsert::Duplicate,
            Entry::Occupied(_) => {
                warn!("asset `{name}` captured with differing payloads; keeping the first");
                metrics::inc_asset_conflicts();
                AssetInsert::Conflict
            }
        }
    }

    /// Payload stored for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> { self.assets.get(name).map(String::as_str) }

    /// Whether `name` has a payload.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool { self.assets.contains_key(name) }

    /// Number of stored assets.
    #[must_use]
    pub fn len(&self) -> usize { self.assets.len() }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.assets.is_empty() }

    /// Iterate assets in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assets.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

//! Key-to-sound bindings and the multi-key selection set.

use crate::models::{KeyId, SoundRef};
use serde::Serialize;
use std::collections::{btree_map, BTreeMap, BTreeSet};

/// Mapping from key to bound sound. A missing entry means "no sound bound".
///
/// Values of this type handed out by the store are snapshots: mutating one
/// never affects the live store or a saved template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BindingMap(BTreeMap<KeyId, SoundRef>);

impl BindingMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sound bound to `key`, if any.
    pub fn get(&self, key: KeyId) -> Option<&SoundRef> {
        self.0.get(&key)
    }

    /// True if `key` has a sound.
    pub fn contains(&self, key: KeyId) -> bool {
        self.0.contains_key(&key)
    }

    /// Binds `key`, returning the sound it replaced.
    pub fn insert(&mut self, key: KeyId, sound: SoundRef) -> Option<SoundRef> {
        self.0.insert(key, sound)
    }

    /// Unbinds `key`, returning the sound it had.
    pub fn remove(&mut self, key: KeyId) -> Option<SoundRef> {
        self.0.remove(&key)
    }

    /// Keeps only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(KeyId) -> bool) {
        self.0.retain(|key, _| keep(*key));
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates bindings in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, KeyId, SoundRef> {
        self.0.iter()
    }

    /// Bound keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.0.keys().copied()
    }
}

impl FromIterator<(KeyId, SoundRef)> for BindingMap {
    fn from_iter<I: IntoIterator<Item = (KeyId, SoundRef)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a BindingMap {
    type Item = (&'a KeyId, &'a SoundRef);
    type IntoIter = btree_map::Iter<'a, KeyId, SoundRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for BindingMap {
    type Item = (KeyId, SoundRef);
    type IntoIter = btree_map::IntoIter<KeyId, SoundRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Keys chosen for the next bulk operation.
///
/// Read-only outside the crate; membership changes only through
/// [`BindingStore::select_key`](crate::store::BindingStore::select_key) and
/// [`BindingStore::clear_selection`](crate::store::BindingStore::clear_selection).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet(BTreeSet<KeyId>);

impl SelectionSet {
    /// True if `key` is selected.
    pub fn contains(&self, key: KeyId) -> bool {
        self.0.contains(&key)
    }

    /// Number of selected keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates selected keys.
    pub fn iter(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.0.iter().copied()
    }

    /// Selected keys sorted by label, for display.
    pub fn sorted(&self) -> Vec<KeyId> {
        let mut keys: Vec<KeyId> = self.iter().collect();
        keys.sort_by_key(|key| key.as_str());
        keys
    }

    /// Status line text ("Selected keys: A, S" or "No keys selected").
    pub fn describe(&self) -> String {
        if self.is_empty() {
            "No keys selected".to_string()
        } else {
            let labels: Vec<&str> = self.sorted().into_iter().map(KeyId::as_str).collect();
            format!("Selected keys: {}", labels.join(", "))
        }
    }

    pub(crate) fn insert(&mut self, key: KeyId) -> bool {
        self.0.insert(key)
    }

    pub(crate) fn remove(&mut self, key: KeyId) -> bool {
        self.0.remove(&key)
    }

    pub(crate) fn take(&mut self) -> Vec<KeyId> {
        std::mem::take(&mut self.0).into_iter().collect()
    }
}

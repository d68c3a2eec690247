//! The fixed set of addressable keys.

use crate::models::{KeyId, KeyWidth};
use serde::Serialize;
use std::collections::BTreeSet;

/// Rows of the default keyboard, top to bottom.
///
/// `Shift` and `Ctrl` appear twice (left and right cap) but are one key each.
const STANDARD_ROWS: [&[KeyId]; 4] = [
    &[
        KeyId::Q,
        KeyId::W,
        KeyId::E,
        KeyId::R,
        KeyId::T,
        KeyId::Y,
        KeyId::U,
        KeyId::I,
        KeyId::O,
        KeyId::P,
    ],
    &[
        KeyId::A,
        KeyId::S,
        KeyId::D,
        KeyId::F,
        KeyId::G,
        KeyId::H,
        KeyId::J,
        KeyId::K,
        KeyId::L,
    ],
    &[
        KeyId::Shift,
        KeyId::Z,
        KeyId::X,
        KeyId::C,
        KeyId::V,
        KeyId::B,
        KeyId::N,
        KeyId::M,
        KeyId::Shift,
    ],
    &[KeyId::Ctrl, KeyId::Space, KeyId::Enter, KeyId::Ctrl],
];

/// Display metadata for one registered key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyInfo {
    /// Key identifier
    pub id: KeyId,
    /// Cap label
    pub label: &'static str,
    /// Width class
    pub width: KeyWidth,
    /// Row of the key's first appearance (0 = top)
    pub row: usize,
}

/// Immutable registry of the keys a keyboard offers.
///
/// Built once at startup. Every `KeyId` that enters a binding map or a
/// selection set is checked against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRegistry {
    rows: Vec<Vec<KeyId>>,
    keys: Vec<KeyId>,
    members: BTreeSet<KeyId>,
}

impl KeyRegistry {
    /// The default four-row keyboard.
    pub fn standard() -> Self {
        Self::from_rows(STANDARD_ROWS.iter().map(|row| row.to_vec()))
    }

    /// Builds a registry from visual rows. A key may appear in several
    /// positions; it is registered once, at its first appearance.
    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = KeyId>,
    {
        let rows: Vec<Vec<KeyId>> = rows
            .into_iter()
            .map(|row| row.into_iter().collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        let mut members = BTreeSet::new();
        let mut keys = Vec::new();
        for key in rows.iter().flatten() {
            if members.insert(*key) {
                keys.push(*key);
            }
        }

        Self {
            rows,
            keys,
            members,
        }
    }

    /// Builds a single-row registry from a list of keys.
    pub fn from_keys(keys: impl IntoIterator<Item = KeyId>) -> Self {
        Self::from_rows([keys])
    }

    /// All keys in first-appearance order, without duplicates.
    pub fn all_keys(&self) -> &[KeyId] {
        &self.keys
    }

    /// True if `id` belongs to this keyboard.
    pub fn is_valid(&self, id: KeyId) -> bool {
        self.members.contains(&id)
    }

    /// Visual rows, including repeated caps.
    pub fn rows(&self) -> &[Vec<KeyId>] {
        &self.rows
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if the registry has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Display metadata for `id`, if registered.
    pub fn info(&self, id: KeyId) -> Option<KeyInfo> {
        let row = self.rows.iter().position(|keys| keys.contains(&id))?;
        Some(KeyInfo {
            id,
            label: id.as_str(),
            width: id.width(),
            row,
        })
    }
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

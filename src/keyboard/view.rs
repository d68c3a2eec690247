//! Per-cap handler records and a plain-text keyboard renderer.
//!
//! A [`KeyboardView`] is built once from a [`KeyRegistry`]. Each visual cap
//! becomes a [`KeySlot`] that knows which key it stands for, so a click on
//! either `Shift` cap dispatches the same `KeyId`.

use std::fmt::Write;

use crate::error::EngineResult;
use crate::keyboard::KeyRegistry;
use crate::models::{KeyId, KeyWidth};
use crate::session::{KeyPress, Session};
use crate::store::BindingStore;

/// Cells each row is shifted right by, relative to the row above.
const ROW_STAGGER: usize = 2;

/// One visual key cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeySlot {
    /// Key this cap triggers
    pub key: KeyId,
    /// Visual row (0 = top)
    pub row: usize,
    /// Position within the row (0 = leftmost)
    pub column: usize,
    /// Width class of the cap
    pub width: KeyWidth,
}

impl KeySlot {
    /// Handles a click on this cap.
    pub fn press(&self, session: &mut Session, additive: bool) -> EngineResult<KeyPress> {
        session.press_key(self.key, additive)
    }
}

/// All caps of a keyboard, in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardView {
    slots: Vec<KeySlot>,
    rows: usize,
}

impl KeyboardView {
    /// Creates one slot per visual cap of `registry`.
    pub fn new(registry: &KeyRegistry) -> Self {
        let slots = registry
            .rows()
            .iter()
            .enumerate()
            .flat_map(|(row, keys)| {
                keys.iter().enumerate().map(move |(column, key)| KeySlot {
                    key: *key,
                    row,
                    column,
                    width: key.width(),
                })
            })
            .collect();

        Self {
            slots,
            rows: registry.rows().len(),
        }
    }

    /// Every cap, row by row.
    pub fn slots(&self) -> &[KeySlot] {
        &self.slots
    }

    /// First cap for `key`, if the keyboard shows it.
    pub fn find(&self, key: KeyId) -> Option<&KeySlot> {
        self.slots.iter().find(|slot| slot.key == key)
    }

    /// Renders the keyboard as text.
    ///
    /// Selected caps are marked `*`, caps with a bound sound are marked `+`.
    pub fn render(&self, store: &BindingStore) -> String {
        let mut output = String::new();

        for row in 0..self.rows {
            let mut line = " ".repeat(row * ROW_STAGGER);
            for slot in self.slots.iter().filter(|slot| slot.row == row) {
                line.push_str(&render_cap(slot, store));
            }
            let _ = writeln!(output, "{}", line.trim_end());
        }

        let _ = writeln!(output, "{}", store.selection().describe());
        output
    }
}

fn render_cap(slot: &KeySlot, store: &BindingStore) -> String {
    let mut text = slot.key.as_str().to_string();
    if store.bindings().contains(slot.key) {
        text.push('+');
    }
    if store.selection().contains(slot.key) {
        text.push('*');
    }

    let inner = slot.width.cells().saturating_sub(2).max(text.len());
    format!("[{text:^inner$}]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SoundRef;
    use std::sync::Arc;

    fn store() -> BindingStore {
        let resolver = |_: &SoundRef| true;
        BindingStore::new(Arc::new(KeyRegistry::standard()), Box::new(resolver))
    }

    #[test]
    fn test_one_slot_per_cap() {
        let view = KeyboardView::new(&KeyRegistry::standard());
        assert_eq!(view.slots().len(), 10 + 9 + 9 + 4);

        let shift_caps: Vec<&KeySlot> = view
            .slots()
            .iter()
            .filter(|slot| slot.key == KeyId::Shift)
            .collect();
        assert_eq!(shift_caps.len(), 2);
        assert_eq!(shift_caps[0].column, 0);
        assert_eq!(shift_caps[1].column, 8);
    }

    #[test]
    fn test_find() {
        let view = KeyboardView::new(&KeyRegistry::standard());
        let slot = view.find(KeyId::Enter).unwrap();
        assert_eq!((slot.row, slot.column), (3, 2));
        assert_eq!(slot.width, KeyWidth::Wide);

        let small = KeyboardView::new(&KeyRegistry::from_keys([KeyId::A]));
        assert!(small.find(KeyId::Enter).is_none());
    }

    #[test]
    fn test_render_marks_selection_and_bindings() {
        let view = KeyboardView::new(&KeyRegistry::standard());
        let mut store = store();
        store.bind(KeyId::A, SoundRef::new("a.wav")).unwrap();
        store.select_key(KeyId::S, false);

        let text = view.render(&store);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("[ Q ]"));
        assert!(lines[1].starts_with("  [A+ ][S* ]"));
        assert_eq!(lines[4], "Selected keys: S");
    }
}

//! Selection state, either self-managed or controlled by the host.

use egui::{Modifiers, PointerButton};

use crate::model::ItemKey;

/// Ordered, duplicate-free set of selected item keys.
///
/// Once the host supplies a list through [`SelectionHolder::reconcile`], that
/// list is authoritative and [`SelectionHolder::toggle`] requests are ignored.
#[derive(Debug, Clone, Default)]
pub struct SelectionHolder {
    keys: Vec<ItemKey>,
    controlled: bool,
}

impl SelectionHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &[ItemKey] {
        &self.keys
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.keys.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// Adopt the host's selection.
    ///
    /// `Some(list)` makes the selection controlled and returns the new list
    /// when it differs by value from the current one. `None` hands control
    /// back to the holder, keeping the last list.
    pub fn reconcile(&mut self, incoming: Option<&[ItemKey]>) -> Option<Vec<ItemKey>> {
        let Some(incoming) = incoming else {
            self.controlled = false;
            return None;
        };
        self.controlled = true;
        let incoming = dedup(incoming.iter().cloned());
        if incoming == self.keys {
            return None;
        }
        self.keys = incoming;
        Some(self.keys.clone())
    }

    /// Apply a click or rectangle selection.
    ///
    /// Returns the new selection when it changed.
    pub fn toggle(
        &mut self,
        keys: &[ItemKey],
        modifiers: Modifiers,
        button: PointerButton,
    ) -> Option<Vec<ItemKey>> {
        if self.controlled {
            return None;
        }
        // right-click on a selected item keeps a multi-selection intact
        if button == PointerButton::Secondary && keys.len() == 1 && self.contains(&keys[0]) {
            return None;
        }

        let next = if modifiers.ctrl || modifiers.shift || modifiers.command {
            let mut next = self.keys.clone();
            for key in dedup(keys.iter().cloned()) {
                match next.iter().position(|k| *k == key) {
                    Some(pos) => {
                        next.remove(pos);
                    }
                    None => next.push(key),
                }
            }
            next
        } else {
            dedup(keys.iter().cloned())
        };

        if next == self.keys {
            return None;
        }
        self.keys = next;
        Some(self.keys.clone())
    }

    /// Drop everything. Ignored while controlled.
    pub fn clear(&mut self) -> Option<Vec<ItemKey>> {
        if self.controlled || self.keys.is_empty() {
            return None;
        }
        self.keys.clear();
        Some(Vec::new())
    }
}

fn dedup(keys: impl IntoIterator<Item = ItemKey>) -> Vec<ItemKey> {
    let mut out: Vec<ItemKey> = Vec::new();
    for key in keys {
        if !out.contains(&key) {
            out.push(key);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn k(n: i64) -> ItemKey {
        ItemKey::Number(n)
    }

    fn click(holder: &mut SelectionHolder, key: i64, modifiers: Modifiers) -> Option<Vec<ItemKey>> {
        holder.toggle(&[k(key)], modifiers, PointerButton::Primary)
    }

    #[test]
    fn click_then_ctrl_click_sequence() {
        let mut sel = SelectionHolder::new();
        assert_eq!(click(&mut sel, 1, Modifiers::NONE), Some(vec![k(1)]));
        assert_eq!(click(&mut sel, 2, Modifiers::CTRL), Some(vec![k(1), k(2)]));
        assert_eq!(click(&mut sel, 1, Modifiers::CTRL), Some(vec![k(2)]));
    }

    #[test]
    fn shift_behaves_like_ctrl() {
        let mut sel = SelectionHolder::new();
        click(&mut sel, 1, Modifiers::NONE);
        assert_eq!(click(&mut sel, 3, Modifiers::SHIFT), Some(vec![k(1), k(3)]));
    }

    #[test]
    fn unchanged_selection_does_not_notify() {
        let mut sel = SelectionHolder::new();
        click(&mut sel, 1, Modifiers::NONE);
        assert_eq!(click(&mut sel, 1, Modifiers::NONE), None);
        assert_eq!(sel.toggle(&[], Modifiers::CTRL, PointerButton::Primary), None);
    }

    #[test]
    fn right_click_on_selected_item_keeps_multi_selection() {
        let mut sel = SelectionHolder::new();
        sel.toggle(&[k(1), k(2)], Modifiers::NONE, PointerButton::Primary);
        assert_eq!(sel.toggle(&[k(2)], Modifiers::NONE, PointerButton::Secondary), None);
        assert_eq!(sel.keys(), &[k(1), k(2)]);

        // an unselected item still replaces the selection
        assert_eq!(
            sel.toggle(&[k(5)], Modifiers::NONE, PointerButton::Secondary),
            Some(vec![k(5)])
        );
    }

    #[test]
    fn duplicates_are_collapsed() {
        let mut sel = SelectionHolder::new();
        sel.toggle(&[k(1), k(1), k(2)], Modifiers::NONE, PointerButton::Primary);
        assert_eq!(sel.keys(), &[k(1), k(2)]);
        assert_eq!(sel.reconcile(Some(&[k(4), k(4)])), Some(vec![k(4)]));
    }

    #[test]
    fn controlled_selection_wins() {
        let mut sel = SelectionHolder::new();
        assert_eq!(sel.reconcile(Some(&[k(7)])), Some(vec![k(7)]));
        assert_eq!(sel.reconcile(Some(&[k(7)])), None);
        assert_eq!(click(&mut sel, 1, Modifiers::NONE), None);
        assert_eq!(click(&mut sel, 7, Modifiers::CTRL), None);
        assert_eq!(sel.clear(), None);
        assert_eq!(sel.keys(), &[k(7)]);

        assert_eq!(sel.reconcile(None), None);
        assert!(!sel.is_controlled());
        assert_eq!(click(&mut sel, 1, Modifiers::NONE), Some(vec![k(1)]));
    }

    proptest! {
        #[test]
        fn ctrl_toggle_is_its_own_inverse(start in prop::collection::vec(0i64..20, 0..10), key in 0i64..20) {
            let mut sel = SelectionHolder::new();
            let start: Vec<ItemKey> = start.into_iter().map(k).collect();
            sel.toggle(&start, Modifiers::NONE, PointerButton::Primary);
            let before: std::collections::BTreeSet<_> = sel.keys().iter().cloned().collect();
            click(&mut sel, key, Modifiers::CTRL);
            click(&mut sel, key, Modifiers::CTRL);
            let after: std::collections::BTreeSet<_> = sel.keys().iter().cloned().collect();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn controlled_list_is_immune_to_toggles(
            list in prop::collection::vec(0i64..20, 0..6),
            clicks in prop::collection::vec((0i64..20, any::<bool>()), 0..12),
        ) {
            let mut sel = SelectionHolder::new();
            let list: Vec<ItemKey> = list.into_iter().map(k).collect();
            sel.reconcile(Some(&list));
            let expected = sel.keys().to_vec();
            for (key, ctrl) in clicks {
                let mods = if ctrl { Modifiers::CTRL } else { Modifiers::NONE };
                prop_assert_eq!(click(&mut sel, key, mods), None);
            }
            prop_assert_eq!(sel.keys(), expected.as_slice());
        }
    }
}

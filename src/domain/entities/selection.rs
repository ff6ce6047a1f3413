use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::entities::display_item::{DisplayItem, ItemKind};

/// Identity of a selectable entry. Keyed by kind and id because ids are not
/// unique across kinds and list positions reorder between fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionKey {
    pub kind: ItemKind,
    pub id: i64,
}

/// The set of entries currently picked in the visible list.
///
/// Invariant: keys always belong to the active scope. The owning controller
/// clears the set on every scope transition and after a successful bulk
/// mutation; it survives page moves and search resets within a scope.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    keys: HashSet<SelectionKey>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of one item. Items without an id are ignored.
    pub fn toggle(&mut self, item: &DisplayItem) {
        if let Some(key) = item.selection_key() {
            if !self.keys.insert(key) {
                self.keys.remove(&key);
            }
        }
    }

    /// Selects every visible item that carries an id
    pub fn select_all<'a>(&mut self, visible: impl IntoIterator<Item = &'a DisplayItem>) {
        self.keys
            .extend(visible.into_iter().filter_map(DisplayItem::selection_key));
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn contains(&self, key: &SelectionKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Snapshot of the selected keys, for handing to a bulk operation
    pub fn to_vec(&self) -> Vec<SelectionKey> {
        self.keys.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(kind: ItemKind, id: Option<i64>) -> DisplayItem {
        DisplayItem {
            id,
            name: "entry".to_string(),
            kind,
            deleted_at: Utc::now(),
            size_bytes: None,
            entry_count: None,
        }
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = SelectionSet::new();
        let file = item(ItemKind::File, Some(7));

        selection.toggle(&file);
        assert_eq!(selection.len(), 1);

        selection.toggle(&file);
        assert!(selection.is_empty());
    }

    #[test]
    fn same_id_different_kind_are_distinct() {
        let mut selection = SelectionSet::new();
        selection.toggle(&item(ItemKind::File, Some(7)));
        selection.toggle(&item(ItemKind::Folder, Some(7)));

        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn items_without_id_are_ignored() {
        let mut selection = SelectionSet::new();
        selection.toggle(&item(ItemKind::File, None));
        assert!(selection.is_empty());

        selection.select_all(&[
            item(ItemKind::File, Some(1)),
            item(ItemKind::File, None),
            item(ItemKind::Folder, Some(2)),
        ]);
        assert_eq!(selection.len(), 2);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::selection::SelectionKey;

/// Kind of a trashed entry. IDs are only unique within a kind, so the kind
/// travels with the id everywhere an item is referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Folder,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::File => "file",
            ItemKind::Folder => "folder",
        }
    }
}

/// One entry of the rendered trash list.
///
/// Materialized fresh from every successful fetch and never mutated in
/// place; a refetch replaces the whole list. The id is optional because the
/// remote API occasionally omits it; such entries still render but can
/// never be selected or mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayItem {
    pub id: Option<i64>,
    pub name: String,
    pub kind: ItemKind,
    pub deleted_at: DateTime<Utc>,
    /// Size in bytes (files only)
    pub size_bytes: Option<u64>,
    /// Contained entry count (folders only)
    pub entry_count: Option<u64>,
}

impl DisplayItem {
    /// Selection key for this item, or None when it carries no id
    pub fn selection_key(&self) -> Option<SelectionKey> {
        self.id.map(|id| SelectionKey {
            kind: self.kind,
            id,
        })
    }
}

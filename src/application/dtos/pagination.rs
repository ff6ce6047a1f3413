use serde::{Deserialize, Serialize};

/// Pagination state of one remote collection.
///
/// Pages are 1-based, matching the remote API. The root listing holds one
/// instance; a folder listing holds two (folders and files) that share a
/// page size but reach their last page independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    /// Current page (starts at 1)
    pub page: usize,
    /// Page size
    pub per_page: usize,
    /// Total number of items
    pub total_items: usize,
    /// Total number of pages
    pub total_pages: usize,
}

impl PaginationState {
    /// Builds a state from a page position and item total, deriving
    /// total_pages.
    pub fn new(page: usize, per_page: usize, total_items: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + per_page - 1) / per_page
        };

        Self {
            page: page.max(1),
            per_page,
            total_items,
            total_pages,
        }
    }

    /// State before any data has arrived
    pub fn empty(per_page: usize) -> Self {
        Self::new(1, per_page, 0)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether `page` is a position the UI may request. Requests beyond the
    /// known last page are rejected; until totals are known any page >= 1
    /// is accepted.
    pub fn accepts(&self, page: usize) -> bool {
        page >= 1 && (self.total_pages == 0 || page <= self.total_pages)
    }
}

/// Parameters of one list request against the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Committed search term, when non-empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Requested page (starts at 1)
    pub page: usize,
    /// Requested page size
    pub per_page: usize,
}

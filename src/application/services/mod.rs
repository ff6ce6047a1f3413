pub mod bulk_operations;
pub mod search_debounce;
pub mod trash_browser;

#[cfg(test)]
mod trash_browser_test;

pub use bulk_operations::{BulkOperationResult, BulkOperationService, BulkOutcome};
pub use trash_browser::TrashBrowser;

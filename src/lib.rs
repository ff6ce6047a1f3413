//! cirrus-trash — trash navigation and bulk-lifecycle core for the Cirrus
//! Drive web client.
//!
//! The remote storage API owns the data; this crate owns the in-memory
//! state machine of the trash view: scope resolution (root vs. inside a
//! deleted folder), dual-paginated folder contents, debounced search, the
//! navigation stack with breadcrumbs, the selection set, and bulk
//! restore / permanent-delete execution.
//!
//! The layout follows the hexagonal pattern:
//!
//! - Domain layer: view-state entities (domain/*)
//! - Application layer: the browser state machine, bulk executor, DTOs and
//!   the outbound gateway port (application/*)
//! - Infrastructure layer: the HTTP adapter for the storage API
//!   (infrastructure/*)
//! - Common: configuration and error handling (common/*)

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;

pub use application::dtos::pagination::{PageRequest, PaginationState};
pub use application::dtos::trash_dto::{EmptyTrashOutcomeDto, FolderContentsDto, TrashPageDto};
pub use application::ports::trash_gateway::TrashGateway;
pub use application::services::bulk_operations::{
    BulkOperationResult, BulkOperationService, BulkOutcome,
};
pub use application::services::trash_browser::{
    ConfirmDialog, FetchSpec, FetchTicket, ListSegment, ListedItem, TrashBrowser,
};
pub use common::config::AppConfig;
pub use common::errors::{DomainError, ErrorKind};
pub use domain::entities::display_item::{DisplayItem, ItemKind};
pub use domain::entities::navigation::{NavigationFrame, Scope};
pub use domain::entities::selection::{SelectionKey, SelectionSet};
pub use infrastructure::clients::http_trash_gateway::HttpTrashGateway;

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::dtos::pagination::{PageRequest, PaginationState};
use crate::application::dtos::trash_dto::{EmptyTrashOutcomeDto, FolderContentsDto, TrashPageDto};
use crate::application::ports::trash_gateway::TrashGateway;
use crate::application::services::bulk_operations::{BulkOperationResult, BulkOperationService};
use crate::application::services::search_debounce::DebouncedQuery;
use crate::common::config::AppConfig;
use crate::common::errors::{DomainError, Result};
use crate::domain::entities::display_item::DisplayItem;
use crate::domain::entities::navigation::{NavigationFrame, NavigationStack, Scope};
use crate::domain::entities::selection::{SelectionKey, SelectionSet};

/// Label of the root breadcrumb
pub const ROOT_BREADCRUMB: &str = "Trash";

/// Which paginated collection a listed entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSegment {
    /// Root scope: one mixed file/folder collection
    Mixed,
    /// Folder scope: the folders collection
    Folders,
    /// Folder scope: the files collection
    Files,
}

/// One entry of the merged display list, tagged with its segment
#[derive(Debug, Clone)]
pub struct ListedItem {
    pub segment: ListSegment,
    pub item: DisplayItem,
}

/// Confirmation dialog currently awaiting the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmDialog {
    RestoreSelected,
    DeleteSelected,
    DeleteSingle(SelectionKey),
    EmptyTrash,
}

/// Identity of the state a fetch was issued against. A response is applied
/// only while its ticket is still current; anything else is stale and gets
/// dropped instead of rendered into the wrong view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    scope: Scope,
}

/// The request the scope resolver decided on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchSpec {
    Root(PageRequest),
    Folder { folder_id: i64, request: PageRequest },
}

/// State machine of the trash view.
///
/// Owns every piece of view state the page threads around: the navigation
/// stack, the debounced search term, the per-scope pagination cursors, the
/// selection set, the pending confirmation dialog and the merged display
/// list. The view layer holds it by reference; remote data enters only
/// through the epoch-guarded `apply_*` methods.
pub struct TrashBrowser {
    gateway: Arc<dyn TrashGateway>,
    bulk: BulkOperationService,
    per_page: usize,
    search: DebouncedQuery,
    nav: NavigationStack,
    selection: SelectionSet,
    root_pagination: PaginationState,
    folders_pagination: PaginationState,
    files_pagination: PaginationState,
    items: Vec<ListedItem>,
    error: Option<DomainError>,
    dialog: Option<ConfirmDialog>,
    epoch: u64,
}

impl TrashBrowser {
    pub fn new(gateway: Arc<dyn TrashGateway>, config: &AppConfig) -> Self {
        let per_page = config.pagination.effective_per_page();

        Self {
            bulk: BulkOperationService::new(gateway.clone(), &config.concurrency),
            gateway,
            per_page,
            search: DebouncedQuery::new(config.search.debounce()),
            nav: NavigationStack::new(),
            selection: SelectionSet::new(),
            root_pagination: PaginationState::empty(per_page),
            folders_pagination: PaginationState::empty(per_page),
            files_pagination: PaginationState::empty(per_page),
            items: Vec::new(),
            error: None,
            dialog: None,
            epoch: 0,
        }
    }

    // ---- view accessors -------------------------------------------------

    pub fn scope(&self) -> Scope {
        self.nav.scope()
    }

    pub fn breadcrumbs(&self) -> Vec<String> {
        self.nav.breadcrumbs(ROOT_BREADCRUMB)
    }

    pub fn frames(&self) -> &[NavigationFrame] {
        self.nav.frames()
    }

    /// Merged display list: at root one mixed segment, inside a folder the
    /// folders segment followed by the files segment
    pub fn items(&self) -> &[ListedItem] {
        &self.items
    }

    pub fn root_pagination(&self) -> &PaginationState {
        &self.root_pagination
    }

    pub fn folders_pagination(&self) -> &PaginationState {
        &self.folders_pagination
    }

    pub fn files_pagination(&self) -> &PaginationState {
        &self.files_pagination
    }

    /// Terminal fetch error of the current scope, if any. Cleared by the
    /// next successful apply; retrying is the page shell's affordance.
    pub fn error(&self) -> Option<&DomainError> {
        self.error.as_ref()
    }

    pub fn dialog(&self) -> Option<&ConfirmDialog> {
        self.dialog.as_ref()
    }

    pub fn search_input(&self) -> &str {
        self.search.input()
    }

    pub fn search_term(&self) -> &str {
        self.search.value()
    }

    // ---- search ---------------------------------------------------------

    /// Records a search keystroke; the term commits after the debounce
    /// window via `settle_search`
    pub fn set_search_input(&mut self, text: impl Into<String>) {
        self.search.set_input(text);
    }

    /// Waits out the debounce window. When the committed term changes, all
    /// three page cursors restart at 1 and in-flight responses become
    /// stale. Returns whether a new term committed.
    pub async fn settle_search(&mut self) -> bool {
        if self.search.settled().await.is_none() {
            return false;
        }

        debug!(term = %self.search.value(), "search term committed");
        self.root_pagination.page = 1;
        self.folders_pagination.page = 1;
        self.files_pagination.page = 1;
        self.bump_epoch();
        true
    }

    // ---- navigation -----------------------------------------------------

    /// Enters a deleted folder: pushes a frame, restarts the folder/file
    /// cursors and drops the selection (scope transition).
    #[instrument(skip(self, folder_name))]
    pub fn open_folder(&mut self, folder_id: i64, folder_name: impl Into<String>) {
        self.nav.push(folder_id, folder_name);
        self.enter_scope();
    }

    /// Breadcrumb navigation. `index = 0` returns to root; `index = k`
    /// keeps the first `k` frames. Truncating to the current depth or
    /// beyond is a no-op and not a scope transition.
    #[instrument(skip(self))]
    pub fn go_to_breadcrumb(&mut self, index: usize) {
        if index >= self.nav.depth() {
            return;
        }
        self.nav.truncate_to(index);
        self.enter_scope();
    }

    fn enter_scope(&mut self) {
        self.folders_pagination = PaginationState::empty(self.per_page);
        self.files_pagination = PaginationState::empty(self.per_page);
        self.selection.clear();
        self.error = None;
        self.bump_epoch();
    }

    // ---- pagination -----------------------------------------------------

    /// Moves the root cursor. Rejected outside root scope, beyond the known
    /// last page, or when nothing changes.
    pub fn set_root_page(&mut self, page: usize) -> bool {
        if !self.nav.is_root() || !Self::move_cursor(&mut self.root_pagination, page) {
            return false;
        }
        self.bump_epoch();
        true
    }

    /// Moves the folders-segment cursor (folder scope only). The next fetch
    /// uses `max(folder_page, file_page)` for both segments.
    pub fn set_folders_page(&mut self, page: usize) -> bool {
        if self.nav.is_root() || !Self::move_cursor(&mut self.folders_pagination, page) {
            return false;
        }
        self.bump_epoch();
        true
    }

    /// Moves the files-segment cursor (folder scope only)
    pub fn set_files_page(&mut self, page: usize) -> bool {
        if self.nav.is_root() || !Self::move_cursor(&mut self.files_pagination, page) {
            return false;
        }
        self.bump_epoch();
        true
    }

    fn move_cursor(state: &mut PaginationState, page: usize) -> bool {
        if !state.accepts(page) || page == state.page {
            return false;
        }
        state.page = page;
        true
    }

    // ---- selection ------------------------------------------------------

    pub fn toggle_selected(&mut self, item: &DisplayItem) {
        self.selection.toggle(item);
    }

    pub fn select_all_visible(&mut self) {
        self.selection
            .select_all(self.items.iter().map(|listed| &listed.item));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, key: &SelectionKey) -> bool {
        self.selection.contains(key)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    // ---- dialogs --------------------------------------------------------

    pub fn open_dialog(&mut self, dialog: ConfirmDialog) {
        self.dialog = Some(dialog);
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    // ---- fetching -------------------------------------------------------

    /// Resolves the current scope into a request and a ticket for applying
    /// the response later. Inside a folder both segments are requested with
    /// the larger of the two cursors: advancing one segment re-requests the
    /// other at the same page number.
    pub fn begin_fetch(&self) -> (FetchTicket, FetchSpec) {
        let scope = self.nav.scope();
        let search = match self.search.value() {
            "" => None,
            term => Some(term.to_string()),
        };

        let spec = match scope {
            Scope::Root => FetchSpec::Root(PageRequest {
                search,
                page: self.root_pagination.page,
                per_page: self.per_page,
            }),
            Scope::InFolder(folder_id) => FetchSpec::Folder {
                folder_id,
                request: PageRequest {
                    search,
                    page: self.folders_pagination.page.max(self.files_pagination.page),
                    per_page: self.per_page,
                },
            },
        };

        (
            FetchTicket {
                epoch: self.epoch,
                scope,
            },
            spec,
        )
    }

    /// Applies a root listing. Returns false when the ticket went stale and
    /// the response was discarded.
    pub fn apply_root_page(&mut self, ticket: &FetchTicket, page: TrashPageDto) -> bool {
        if !self.ticket_is_current(ticket) {
            return false;
        }

        self.items = page
            .items
            .into_iter()
            .map(|item| ListedItem {
                segment: ListSegment::Mixed,
                item,
            })
            .collect();
        self.root_pagination = page.pagination;
        self.error = None;
        true
    }

    /// Applies folder contents as the folders segment followed by the files
    /// segment. Returns false when the ticket went stale.
    pub fn apply_folder_contents(&mut self, ticket: &FetchTicket, contents: FolderContentsDto) -> bool {
        if !self.ticket_is_current(ticket) {
            return false;
        }

        let mut items = Vec::with_capacity(contents.folders.len() + contents.files.len());
        items.extend(contents.folders.into_iter().map(|item| ListedItem {
            segment: ListSegment::Folders,
            item,
        }));
        items.extend(contents.files.into_iter().map(|item| ListedItem {
            segment: ListSegment::Files,
            item,
        }));

        self.items = items;
        self.folders_pagination = contents.folders_pagination;
        self.files_pagination = contents.files_pagination;
        self.error = None;
        true
    }

    /// Records a fetch failure as the current scope's terminal error state.
    /// Stale failures are dropped like stale data. The last good list stays
    /// visible underneath the error banner.
    pub fn apply_fetch_error(&mut self, ticket: &FetchTicket, error: DomainError) -> bool {
        if !self.ticket_is_current(ticket) {
            return false;
        }
        self.error = Some(error);
        true
    }

    fn ticket_is_current(&self, ticket: &FetchTicket) -> bool {
        if ticket.epoch != self.epoch || ticket.scope != self.nav.scope() {
            debug!(
                ticket_epoch = ticket.epoch,
                current_epoch = self.epoch,
                "discarding stale response"
            );
            return false;
        }
        true
    }

    /// Resolves the current scope, fetches it and applies the response.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<()> {
        let (ticket, spec) = self.begin_fetch();
        let gateway = self.gateway.clone();

        let outcome = match spec {
            FetchSpec::Root(request) => gateway
                .list_trash(&request)
                .await
                .map(|page| self.apply_root_page(&ticket, page)),
            FetchSpec::Folder { folder_id, request } => gateway
                .list_folder_contents(folder_id, &request)
                .await
                .map(|contents| self.apply_folder_contents(&ticket, contents)),
        };

        match outcome {
            Ok(_) => Ok(()),
            Err(e) => {
                let returned = DomainError::new(e.kind, e.entity_type, e.message.clone());
                self.apply_fetch_error(&ticket, e);
                Err(returned)
            }
        }
    }

    // ---- bulk operations ------------------------------------------------

    /// Restores the current selection
    pub async fn restore_selected(&mut self) -> BulkOperationResult {
        let targets = self.selection.to_vec();
        self.run_bulk_restore(targets).await
    }

    /// Permanently deletes the current selection
    pub async fn delete_selected_permanently(&mut self) -> BulkOperationResult {
        let targets = self.selection.to_vec();
        self.run_bulk_delete(targets).await
    }

    /// Restores an explicit item list (context-menu path, bypasses the
    /// selection). Items without an id are skipped silently.
    pub async fn restore_items(&mut self, items: &[DisplayItem]) -> BulkOperationResult {
        self.run_bulk_restore(Self::mutation_targets(items)).await
    }

    /// Permanently deletes an explicit item list (context-menu path)
    pub async fn delete_items_permanently(&mut self, items: &[DisplayItem]) -> BulkOperationResult {
        self.run_bulk_delete(Self::mutation_targets(items)).await
    }

    async fn run_bulk_restore(&mut self, targets: Vec<SelectionKey>) -> BulkOperationResult {
        if targets.is_empty() {
            return BulkOperationResult::default();
        }
        let result = self.bulk.restore_items(&targets).await;
        self.finish_bulk(&result).await;
        result
    }

    async fn run_bulk_delete(&mut self, targets: Vec<SelectionKey>) -> BulkOperationResult {
        if targets.is_empty() {
            return BulkOperationResult::default();
        }
        let result = self.bulk.delete_items_permanently(&targets).await;
        self.finish_bulk(&result).await;
        result
    }

    /// Empties the whole trash. On success the stack collapses to root (the
    /// browsed folder may no longer exist) and the root listing refetches.
    #[instrument(skip(self))]
    pub async fn empty_trash(&mut self) -> Result<EmptyTrashOutcomeDto> {
        let outcome = self.bulk.empty_trash().await?;

        self.nav.clear();
        self.selection.clear();
        self.dialog = None;
        self.enter_scope_after_empty();

        if let Err(e) = self.refresh().await {
            warn!("refetch after emptying trash failed: {}", e);
        }

        Ok(outcome)
    }

    fn enter_scope_after_empty(&mut self) {
        self.root_pagination = PaginationState::empty(self.per_page);
        self.folders_pagination = PaginationState::empty(self.per_page);
        self.files_pagination = PaginationState::empty(self.per_page);
        self.error = None;
        self.bump_epoch();
    }

    /// Post-settlement bookkeeping shared by restore and delete: close the
    /// confirmation dialog, drop the selection only on full success, and
    /// refetch unconditionally. The read-through cache only ever holds the
    /// active scope, so invalidating "both datasets" collapses to one
    /// refetch.
    async fn finish_bulk(&mut self, result: &BulkOperationResult) {
        self.dialog = None;

        if result.is_full_success() {
            self.selection.clear();
            info!(count = result.succeeded, "bulk operation succeeded");
        }

        if let Err(e) = self.refresh().await {
            warn!("refetch after bulk operation failed: {}", e);
        }
    }

    fn mutation_targets(items: &[DisplayItem]) -> Vec<SelectionKey> {
        items.iter().filter_map(DisplayItem::selection_key).collect()
    }

    fn bump_epoch(&mut self) {
        self.epoch += 1;
    }
}

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::application::dtos::pagination::{PageRequest, PaginationState};
use crate::application::dtos::trash_dto::{EmptyTrashOutcomeDto, FolderContentsDto, TrashPageDto};
use crate::application::ports::trash_gateway::TrashGateway;
use crate::application::services::trash_browser::{ConfirmDialog, ListSegment, TrashBrowser};
use crate::common::config::AppConfig;
use crate::common::errors::{DomainError, Result};
use crate::domain::entities::display_item::{DisplayItem, ItemKind};
use crate::domain::entities::navigation::Scope;
use crate::domain::entities::selection::SelectionKey;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn file(id: i64, name: &str) -> DisplayItem {
    DisplayItem {
        id: Some(id),
        name: name.to_string(),
        kind: ItemKind::File,
        deleted_at: Utc::now(),
        size_bytes: Some(1024),
        entry_count: None,
    }
}

fn folder(id: i64, name: &str) -> DisplayItem {
    DisplayItem {
        id: Some(id),
        name: name.to_string(),
        kind: ItemKind::Folder,
        deleted_at: Utc::now(),
        size_bytes: None,
        entry_count: Some(3),
    }
}

/// Scope of a recorded list request: None = root, Some(id) = folder
type RecordedRequest = (Option<i64>, PageRequest);

// Mock gateway for testing
struct MockTrashGateway {
    list_requests: Mutex<Vec<RecordedRequest>>,
    root_items: Mutex<Vec<DisplayItem>>,
    root_total: Mutex<usize>,
    folder_folders: Mutex<Vec<DisplayItem>>,
    folder_files: Mutex<Vec<DisplayItem>>,
    folders_total: Mutex<usize>,
    files_total: Mutex<usize>,
    list_should_fail: Mutex<bool>,
    failing_mutations: Mutex<HashSet<SelectionKey>>,
    restored: Mutex<Vec<SelectionKey>>,
    deleted: Mutex<Vec<SelectionKey>>,
    empty_calls: Mutex<usize>,
}

impl MockTrashGateway {
    fn new() -> Self {
        Self {
            list_requests: Mutex::new(Vec::new()),
            root_items: Mutex::new(Vec::new()),
            root_total: Mutex::new(0),
            folder_folders: Mutex::new(Vec::new()),
            folder_files: Mutex::new(Vec::new()),
            folders_total: Mutex::new(0),
            files_total: Mutex::new(0),
            list_should_fail: Mutex::new(false),
            failing_mutations: Mutex::new(HashSet::new()),
            restored: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            empty_calls: Mutex::new(0),
        }
    }

    fn set_root(&self, items: Vec<DisplayItem>, total: usize) {
        *self.root_items.lock().unwrap() = items;
        *self.root_total.lock().unwrap() = total;
    }

    fn set_folder(&self, folders: Vec<DisplayItem>, folders_total: usize, files: Vec<DisplayItem>, files_total: usize) {
        *self.folder_folders.lock().unwrap() = folders;
        *self.folders_total.lock().unwrap() = folders_total;
        *self.folder_files.lock().unwrap() = files;
        *self.files_total.lock().unwrap() = files_total;
    }

    fn fail_listings(&self, fail: bool) {
        *self.list_should_fail.lock().unwrap() = fail;
    }

    fn fail_mutation(&self, key: SelectionKey) {
        self.failing_mutations.lock().unwrap().insert(key);
    }

    fn request_count(&self) -> usize {
        self.list_requests.lock().unwrap().len()
    }

    fn last_request(&self) -> RecordedRequest {
        self.list_requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl TrashGateway for MockTrashGateway {
    async fn list_trash(&self, request: &PageRequest) -> Result<TrashPageDto> {
        self.list_requests
            .lock()
            .unwrap()
            .push((None, request.clone()));

        if *self.list_should_fail.lock().unwrap() {
            return Err(DomainError::network_error("Trash", "connection refused"));
        }

        Ok(TrashPageDto {
            items: self.root_items.lock().unwrap().clone(),
            pagination: PaginationState::new(
                request.page,
                request.per_page,
                *self.root_total.lock().unwrap(),
            ),
        })
    }

    async fn list_folder_contents(
        &self,
        folder_id: i64,
        request: &PageRequest,
    ) -> Result<FolderContentsDto> {
        self.list_requests
            .lock()
            .unwrap()
            .push((Some(folder_id), request.clone()));

        if *self.list_should_fail.lock().unwrap() {
            return Err(DomainError::network_error("TrashFolder", "connection refused"));
        }

        Ok(FolderContentsDto {
            folders: self.folder_folders.lock().unwrap().clone(),
            folders_pagination: PaginationState::new(
                request.page,
                request.per_page,
                *self.folders_total.lock().unwrap(),
            ),
            files: self.folder_files.lock().unwrap().clone(),
            files_pagination: PaginationState::new(
                request.page,
                request.per_page,
                *self.files_total.lock().unwrap(),
            ),
        })
    }

    async fn restore_item(&self, id: i64, kind: ItemKind) -> Result<()> {
        let key = SelectionKey { kind, id };
        if self.failing_mutations.lock().unwrap().contains(&key) {
            return Err(DomainError::network_error("TrashItem", "restore failed"));
        }
        self.restored.lock().unwrap().push(key);
        Ok(())
    }

    async fn delete_item_permanently(&self, id: i64, kind: ItemKind) -> Result<()> {
        let key = SelectionKey { kind, id };
        if self.failing_mutations.lock().unwrap().contains(&key) {
            return Err(DomainError::network_error("TrashItem", "delete failed"));
        }
        self.deleted.lock().unwrap().push(key);
        Ok(())
    }

    async fn empty_trash(&self) -> Result<EmptyTrashOutcomeDto> {
        *self.empty_calls.lock().unwrap() += 1;
        Ok(EmptyTrashOutcomeDto {
            deleted_files: 2,
            deleted_folders: 1,
        })
    }
}

fn browser_with(gateway: Arc<MockTrashGateway>) -> TrashBrowser {
    TrashBrowser::new(gateway, &AppConfig::default())
}

#[tokio::test]
async fn navigation_scenario_builds_breadcrumbs() {
    // Arrange
    let gateway = Arc::new(MockTrashGateway::new());
    let mut browser = browser_with(gateway);

    // Act: root -> Photos -> 2024, then breadcrumb back to Photos
    assert_eq!(browser.scope(), Scope::Root);
    assert_eq!(browser.breadcrumbs(), vec!["Trash"]);

    browser.open_folder(29, "Photos");
    assert_eq!(browser.breadcrumbs(), vec!["Trash", "Photos"]);

    browser.open_folder(31, "2024");
    assert_eq!(browser.breadcrumbs(), vec!["Trash", "Photos", "2024"]);

    browser.go_to_breadcrumb(1);

    // Assert
    assert_eq!(browser.scope(), Scope::InFolder(29));
    assert_eq!(browser.breadcrumbs(), vec!["Trash", "Photos"]);

    browser.go_to_breadcrumb(0);
    assert_eq!(browser.scope(), Scope::Root);
}

#[tokio::test]
async fn breadcrumb_past_depth_is_a_no_op_and_keeps_selection() {
    // Arrange
    let gateway = Arc::new(MockTrashGateway::new());
    gateway.set_root(vec![file(1, "a.txt")], 1);
    let mut browser = browser_with(gateway);
    browser.refresh().await.unwrap();
    browser.select_all_visible();
    assert_eq!(browser.selected_count(), 1);

    // Act: truncating an empty stack to 0 or beyond is not a transition
    browser.go_to_breadcrumb(0);
    browser.go_to_breadcrumb(5);

    // Assert
    assert_eq!(browser.scope(), Scope::Root);
    assert_eq!(browser.selected_count(), 1, "no scope transition, selection must survive");
}

#[tokio::test]
async fn scope_transitions_clear_selection_but_page_moves_do_not() {
    // Arrange
    let gateway = Arc::new(MockTrashGateway::new());
    gateway.set_root(vec![file(1, "a.txt"), file(2, "b.txt")], 45);
    let mut browser = browser_with(gateway.clone());
    browser.refresh().await.unwrap();
    browser.select_all_visible();
    assert_eq!(browser.selected_count(), 2);

    // Act: a page move within the scope keeps the selection
    assert!(browser.set_root_page(2));
    assert_eq!(browser.selected_count(), 2);

    // ...but entering a folder drops it
    browser.open_folder(29, "Photos");

    // Assert
    assert_eq!(browser.selected_count(), 0);

    // And coming back through a breadcrumb drops it again
    browser.refresh().await.unwrap();
    browser.select_all_visible();
    browser.go_to_breadcrumb(0);
    assert_eq!(browser.selected_count(), 0);
}

#[tokio::test]
async fn folder_fetch_uses_the_larger_of_the_two_cursors() {
    // Arrange: 30 folders (2 pages at 20) and 10 files (1 page)
    let gateway = Arc::new(MockTrashGateway::new());
    gateway.set_folder(vec![folder(5, "sub")], 30, vec![file(6, "f.txt")], 10);
    let mut browser = browser_with(gateway.clone());
    browser.open_folder(29, "Photos");
    browser.refresh().await.unwrap();

    // Act: advance only the folders segment
    assert!(browser.set_folders_page(2));
    browser.refresh().await.unwrap();

    // Assert: both segments were requested at page 2
    let (scope, request) = gateway.last_request();
    assert_eq!(scope, Some(29));
    assert_eq!(request.page, 2, "request must use max(folder_page, file_page)");

    // The files segment has a single page, so its own cursor cannot move
    assert!(!browser.set_files_page(2));
}

#[tokio::test]
async fn folder_list_merges_folders_before_files() {
    // Arrange
    let gateway = Arc::new(MockTrashGateway::new());
    gateway.set_folder(
        vec![folder(5, "sub"), folder(6, "other")],
        2,
        vec![file(7, "f.txt")],
        1,
    );
    let mut browser = browser_with(gateway);
    browser.open_folder(29, "Photos");

    // Act
    browser.refresh().await.unwrap();

    // Assert: folders segment first, files segment second, each tagged
    let segments: Vec<ListSegment> = browser.items().iter().map(|l| l.segment).collect();
    assert_eq!(
        segments,
        vec![ListSegment::Folders, ListSegment::Folders, ListSegment::Files]
    );
}

#[tokio::test]
async fn page_moves_beyond_total_pages_are_rejected() {
    // Arrange: 45 items at 20 per page -> 3 pages
    let gateway = Arc::new(MockTrashGateway::new());
    gateway.set_root(Vec::new(), 45);
    let mut browser = browser_with(gateway);
    browser.refresh().await.unwrap();
    assert_eq!(browser.root_pagination().total_pages, 3);

    // Act + Assert
    assert!(!browser.set_root_page(4), "page 4 of 3 must be a no-op");
    assert_eq!(browser.root_pagination().page, 1);
    assert!(browser.set_root_page(3));
    assert_eq!(browser.root_pagination().page, 3);
}

#[tokio::test]
async fn stale_responses_are_discarded() {
    // Arrange: issue a root fetch, then navigate away before it lands
    let gateway = Arc::new(MockTrashGateway::new());
    let mut browser = browser_with(gateway);
    let (ticket, _) = browser.begin_fetch();

    browser.open_folder(29, "Photos");

    // Act: the late root response arrives for the abandoned scope
    let stale_page = TrashPageDto {
        items: vec![file(1, "late.txt")],
        pagination: PaginationState::new(1, 20, 1),
    };
    let applied = browser.apply_root_page(&ticket, stale_page);

    // Assert
    assert!(!applied, "response for an abandoned scope must be dropped");
    assert!(browser.items().is_empty());

    // A stale error is dropped the same way
    let stale_error = DomainError::network_error("Trash", "late failure");
    assert!(!browser.apply_fetch_error(&ticket, stale_error));
    assert!(browser.error().is_none());
}

#[tokio::test(start_paused = true)]
async fn committed_search_resets_all_cursors() {
    init_tracing();

    // Arrange: move the root cursor off page 1 first
    let gateway = Arc::new(MockTrashGateway::new());
    gateway.set_root(Vec::new(), 45);
    let mut browser = browser_with(gateway.clone());
    browser.refresh().await.unwrap();
    assert!(browser.set_root_page(2));

    // Act
    browser.set_search_input("report");
    let committed = browser.settle_search().await;

    // Assert
    assert!(committed);
    assert_eq!(browser.root_pagination().page, 1);
    assert_eq!(browser.folders_pagination().page, 1);
    assert_eq!(browser.files_pagination().page, 1);

    browser.refresh().await.unwrap();
    let (_, request) = gateway.last_request();
    assert_eq!(request.search.as_deref(), Some("report"));

    // Nothing pending: settle resolves immediately without a commit
    assert!(!browser.settle_search().await);
}

#[tokio::test]
async fn fetch_errors_become_the_scope_error_state() {
    // Arrange
    let gateway = Arc::new(MockTrashGateway::new());
    gateway.set_root(vec![file(1, "a.txt")], 1);
    let mut browser = browser_with(gateway.clone());
    browser.refresh().await.unwrap();
    assert_eq!(browser.items().len(), 1);

    // Act
    gateway.fail_listings(true);
    let result = browser.refresh().await;

    // Assert: terminal error, last good list still visible
    assert!(result.is_err());
    assert!(browser.error().is_some());
    assert_eq!(browser.items().len(), 1);

    // A later successful refetch clears the error
    gateway.fail_listings(false);
    browser.refresh().await.unwrap();
    assert!(browser.error().is_none());
}

#[tokio::test]
async fn successful_bulk_restore_clears_selection_and_refetches() {
    init_tracing();

    // Arrange
    let gateway = Arc::new(MockTrashGateway::new());
    gateway.set_root(vec![file(1, "a.txt"), file(2, "b.txt")], 2);
    let mut browser = browser_with(gateway.clone());
    browser.refresh().await.unwrap();
    browser.select_all_visible();
    browser.open_dialog(ConfirmDialog::RestoreSelected);
    let requests_before = gateway.request_count();

    // Act
    let result = browser.restore_selected().await;

    // Assert
    assert_eq!(result.attempted, 2);
    assert_eq!(result.succeeded, 2);
    assert_eq!(result.failed, 0);
    assert_eq!(gateway.restored.lock().unwrap().len(), 2);
    assert_eq!(browser.selected_count(), 0, "selection clears on full success");
    assert!(browser.dialog().is_none(), "dialog closes on completion");
    assert!(gateway.request_count() > requests_before, "must refetch after mutation");
}

#[tokio::test]
async fn failed_bulk_delete_completes_siblings_and_keeps_selection() {
    // Arrange: one of three deletions fails remotely
    let gateway = Arc::new(MockTrashGateway::new());
    gateway.set_root(
        vec![file(1, "a.txt"), file(2, "b.txt"), file(3, "c.txt")],
        3,
    );
    gateway.fail_mutation(SelectionKey {
        kind: ItemKind::File,
        id: 2,
    });
    let mut browser = browser_with(gateway.clone());
    browser.refresh().await.unwrap();
    browser.select_all_visible();
    let requests_before = gateway.request_count();

    // Act
    let result = browser.delete_selected_permanently().await;

    // Assert: siblings settled despite the failure
    assert_eq!(result.attempted, 3);
    assert_eq!(result.succeeded, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(gateway.deleted.lock().unwrap().len(), 2);
    assert_eq!(
        browser.selected_count(),
        3,
        "selection only clears on full success"
    );
    assert!(gateway.request_count() > requests_before, "refetch is unconditional");
}

#[tokio::test]
async fn context_menu_mutations_skip_items_without_ids() {
    // Arrange
    let gateway = Arc::new(MockTrashGateway::new());
    let mut browser = browser_with(gateway.clone());

    let mut orphan = file(0, "orphan.txt");
    orphan.id = None;

    // Act
    let result = browser.restore_items(&[orphan, file(7, "ok.txt")]).await;

    // Assert: the id-less item is skipped silently, not counted as failed
    assert_eq!(result.attempted, 1);
    assert_eq!(result.succeeded, 1);
    assert_eq!(result.failed, 0);
}

#[tokio::test]
async fn bulk_with_empty_selection_is_a_no_op() {
    // Arrange
    let gateway = Arc::new(MockTrashGateway::new());
    let mut browser = browser_with(gateway.clone());

    // Act
    let result = browser.restore_selected().await;

    // Assert: nothing attempted, nothing refetched
    assert_eq!(result.attempted, 0);
    assert_eq!(gateway.request_count(), 0);
}

#[tokio::test]
async fn empty_trash_resets_navigation_to_root() {
    // Arrange: browsing a nested folder that is about to disappear
    let gateway = Arc::new(MockTrashGateway::new());
    let mut browser = browser_with(gateway.clone());
    browser.open_folder(29, "Photos");
    browser.open_folder(31, "2024");
    browser.select_all_visible();
    browser.open_dialog(ConfirmDialog::EmptyTrash);

    // Act
    let outcome = browser.empty_trash().await.unwrap();

    // Assert
    assert_eq!(outcome.deleted_files, 2);
    assert_eq!(outcome.deleted_folders, 1);
    assert_eq!(*gateway.empty_calls.lock().unwrap(), 1);
    assert_eq!(browser.scope(), Scope::Root);
    assert_eq!(browser.breadcrumbs(), vec!["Trash"]);
    assert_eq!(browser.selected_count(), 0);
    assert!(browser.dialog().is_none());

    // The refetch after emptying targets the root listing
    let (scope, _) = gateway.last_request();
    assert_eq!(scope, None);
}

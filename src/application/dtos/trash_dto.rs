use serde::{Deserialize, Serialize};

use crate::application::dtos::pagination::PaginationState;
use crate::domain::entities::display_item::DisplayItem;

/// One page of the root trash listing: a mixed file/folder list with a
/// single pagination state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashPageDto {
    pub items: Vec<DisplayItem>,
    pub pagination: PaginationState,
}

/// Contents of a deleted folder: folders and files as two independently
/// paginated collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderContentsDto {
    pub folders: Vec<DisplayItem>,
    pub folders_pagination: PaginationState,
    pub files: Vec<DisplayItem>,
    pub files_pagination: PaginationState,
}

/// Counts reported by the remote API after emptying the trash
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmptyTrashOutcomeDto {
    pub deleted_files: u64,
    pub deleted_folders: u64,
}

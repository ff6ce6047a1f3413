use async_trait::async_trait;

use crate::application::dtos::pagination::PageRequest;
use crate::application::dtos::trash_dto::{EmptyTrashOutcomeDto, FolderContentsDto, TrashPageDto};
use crate::common::errors::Result;
use crate::domain::entities::display_item::ItemKind;

/// Outbound port for the remote storage API's trash endpoints
#[async_trait]
pub trait TrashGateway: Send + Sync {
    /// Lists the trash root: a mixed file/folder page
    async fn list_trash(&self, request: &PageRequest) -> Result<TrashPageDto>;

    /// Lists the contents of a deleted folder as two paginated collections
    async fn list_folder_contents(
        &self,
        folder_id: i64,
        request: &PageRequest,
    ) -> Result<FolderContentsDto>;

    /// Restores one trashed item to its original location
    async fn restore_item(&self, id: i64, kind: ItemKind) -> Result<()>;

    /// Permanently deletes one trashed item
    async fn delete_item_permanently(&self, id: i64, kind: ItemKind) -> Result<()>;

    /// Empties the whole trash in one remote call
    async fn empty_trash(&self) -> Result<EmptyTrashOutcomeDto>;
}

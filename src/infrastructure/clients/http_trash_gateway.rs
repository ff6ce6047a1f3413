use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::application::dtos::pagination::{PageRequest, PaginationState};
use crate::application::dtos::trash_dto::{EmptyTrashOutcomeDto, FolderContentsDto, TrashPageDto};
use crate::application::ports::trash_gateway::TrashGateway;
use crate::common::config::ApiConfig;
use crate::common::errors::{DomainError, Result};
use crate::domain::entities::display_item::{DisplayItem, ItemKind};

const BODY_SNIPPET_LEN: usize = 200;

// ---- wire payloads ------------------------------------------------------

/// One entry as the API serializes it. Everything is optional: the API has
/// been seen omitting ids and sizes, and a malformed entry must degrade to
/// an unselectable row rather than fail the whole page.
#[derive(Debug, Deserialize)]
struct EntryPayload {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    entry_type: Option<String>,
    #[serde(default, alias = "trashed_at")]
    deleted_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "file_size")]
    size: Option<u64>,
    #[serde(default)]
    entries_count: Option<u64>,
}

impl EntryPayload {
    fn into_display_item(self) -> DisplayItem {
        let kind = if self.entry_type.as_deref() == Some("folder") {
            ItemKind::Folder
        } else {
            ItemKind::File
        };

        DisplayItem {
            id: self.id,
            name: self.name.unwrap_or_default(),
            kind,
            deleted_at: self.deleted_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            size_bytes: match kind {
                ItemKind::File => self.size,
                ItemKind::Folder => None,
            },
            entry_count: match kind {
                ItemKind::Folder => self.entries_count,
                ItemKind::File => None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct PagePayload {
    #[serde(default)]
    current_page: Option<usize>,
    #[serde(default)]
    per_page: Option<usize>,
    #[serde(default)]
    total: Option<usize>,
    #[serde(default)]
    last_page: Option<usize>,
}

impl PagePayload {
    fn into_state(self, request: &PageRequest) -> PaginationState {
        let page = self.current_page.unwrap_or(request.page);
        let per_page = self.per_page.unwrap_or(request.per_page);
        let mut state = PaginationState::new(page, per_page, self.total.unwrap_or(0));
        // The API is authoritative about its own last page
        if let Some(last_page) = self.last_page {
            state.total_pages = last_page;
        }
        state
    }
}

#[derive(Debug, Deserialize)]
struct CollectionPayload {
    #[serde(default)]
    data: Vec<EntryPayload>,
    #[serde(default)]
    pagination: Option<PagePayload>,
}

impl CollectionPayload {
    fn into_parts(self, request: &PageRequest) -> (Vec<DisplayItem>, PaginationState) {
        let items: Vec<DisplayItem> = self
            .data
            .into_iter()
            .map(EntryPayload::into_display_item)
            .collect();
        let pagination = match self.pagination {
            Some(payload) => payload.into_state(request),
            None => PaginationState::new(request.page, request.per_page, items.len()),
        };
        (items, pagination)
    }
}

#[derive(Debug, Deserialize)]
struct FolderContentsResponse {
    folders: CollectionPayload,
    files: CollectionPayload,
}

#[derive(Debug, Deserialize)]
struct DeletedCountsPayload {
    #[serde(default)]
    files: u64,
    #[serde(default)]
    folders: u64,
}

#[derive(Debug, Deserialize)]
struct EmptyTrashResponse {
    deleted: DeletedCountsPayload,
}

// ---- adapter ------------------------------------------------------------

/// reqwest-backed adapter for the storage API's trash endpoints.
///
/// The API uses numeric ids and 1-based page/perPage pagination; mutations
/// are POSTs carrying `{id, type}` bodies. Responses are parsed leniently
/// (see `EntryPayload`).
pub struct HttpTrashGateway {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpTrashGateway {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                DomainError::internal_error("Gateway", "Failed to build HTTP client")
                    .with_source(e)
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    fn list_params(request: &PageRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", request.page.to_string()),
            ("perPage", request.per_page.to_string()),
        ];
        if let Some(search) = &request.search {
            params.push(("query", search.clone()));
        }
        params
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        entity: &'static str,
    ) -> Result<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, entity))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, entity));
        }

        response.json::<T>().await.map_err(|e| {
            DomainError::internal_error(entity, "Malformed API response").with_source(e)
        })
    }

    async fn send_expect_ok(&self, builder: RequestBuilder, entity: &'static str) -> Result<()> {
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, entity))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, entity));
        }
        Ok(())
    }
}

#[async_trait]
impl TrashGateway for HttpTrashGateway {
    #[instrument(skip(self))]
    async fn list_trash(&self, request: &PageRequest) -> Result<TrashPageDto> {
        let builder = self
            .authed(self.client.get(self.url("/trash")))
            .query(&Self::list_params(request));

        let response: CollectionPayload = self.send_json(builder, "Trash").await?;
        let (items, pagination) = response.into_parts(request);
        debug!(count = items.len(), "trash root page received");

        Ok(TrashPageDto { items, pagination })
    }

    #[instrument(skip(self))]
    async fn list_folder_contents(
        &self,
        folder_id: i64,
        request: &PageRequest,
    ) -> Result<FolderContentsDto> {
        let builder = self
            .authed(
                self.client
                    .get(self.url(&format!("/trash/folders/{}", folder_id))),
            )
            .query(&Self::list_params(request));

        let response: FolderContentsResponse = self.send_json(builder, "TrashFolder").await?;
        let (folders, folders_pagination) = response.folders.into_parts(request);
        let (files, files_pagination) = response.files.into_parts(request);
        debug!(
            folders = folders.len(),
            files = files.len(),
            "folder contents received"
        );

        Ok(FolderContentsDto {
            folders,
            folders_pagination,
            files,
            files_pagination,
        })
    }

    #[instrument(skip(self))]
    async fn restore_item(&self, id: i64, kind: ItemKind) -> Result<()> {
        let builder = self
            .authed(self.client.post(self.url("/trash/restore")))
            .json(&json!({ "id": id, "type": kind.as_str() }));

        self.send_expect_ok(builder, "TrashItem")
            .await
            .map_err(|e| e.with_id(id.to_string()))
    }

    #[instrument(skip(self))]
    async fn delete_item_permanently(&self, id: i64, kind: ItemKind) -> Result<()> {
        let builder = self
            .authed(self.client.post(self.url("/trash/delete")))
            .json(&json!({ "id": id, "type": kind.as_str() }));

        self.send_expect_ok(builder, "TrashItem")
            .await
            .map_err(|e| e.with_id(id.to_string()))
    }

    #[instrument(skip(self))]
    async fn empty_trash(&self) -> Result<EmptyTrashOutcomeDto> {
        let builder = self.authed(self.client.post(self.url("/trash/empty")));
        let response: EmptyTrashResponse = self.send_json(builder, "Trash").await?;

        Ok(EmptyTrashOutcomeDto {
            deleted_files: response.deleted.files,
            deleted_folders: response.deleted.folders,
        })
    }
}

fn transport_error(error: reqwest::Error, entity: &'static str) -> DomainError {
    if error.is_timeout() {
        DomainError::timeout(entity, "Request timed out").with_source(error)
    } else {
        DomainError::network_error(entity, format!("Request failed: {}", error)).with_source(error)
    }
}

fn status_error(status: StatusCode, body: &str, entity: &'static str) -> DomainError {
    let snippet: String = body.chars().take(BODY_SNIPPET_LEN).collect();
    match status {
        StatusCode::NOT_FOUND => DomainError::not_found(entity, snippet),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            DomainError::access_denied(entity, format!("API returned {}: {}", status, snippet))
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            DomainError::timeout(entity, format!("API returned {}", status))
        }
        _ => DomainError::network_error(entity, format!("API returned {}: {}", status, snippet)),
    }
}

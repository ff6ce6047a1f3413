use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info, instrument};

use crate::application::dtos::trash_dto::EmptyTrashOutcomeDto;
use crate::application::ports::trash_gateway::TrashGateway;
use crate::common::config::ConcurrencyConfig;
use crate::common::errors::Result;
use crate::domain::entities::selection::SelectionKey;

/// Mutation applied to every item of a bulk operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkMutation {
    Restore,
    DeletePermanently,
}

impl BulkMutation {
    fn verb(&self) -> &'static str {
        match self {
            BulkMutation::Restore => "restore",
            BulkMutation::DeletePermanently => "delete",
        }
    }
}

/// Aggregate of one bulk operation. Ephemeral: consumed to pick the
/// user-facing outcome message, then dropped.
#[derive(Debug, Clone, Default)]
pub struct BulkOperationResult {
    /// Number of per-item mutations issued
    pub attempted: usize,
    /// Mutations that settled successfully
    pub succeeded: usize,
    /// Mutations that settled with an error
    pub failed: usize,
    /// Failed targets with their error messages
    pub failures: Vec<(SelectionKey, String)>,
}

impl BulkOperationResult {
    pub fn is_full_success(&self) -> bool {
        self.failed == 0
    }

    /// The single user-facing outcome. Partial failures collapse into the
    /// generic failure message; per-item detail stays in the log.
    pub fn outcome(&self) -> BulkOutcome {
        if self.is_full_success() {
            BulkOutcome::Success {
                count: self.succeeded,
            }
        } else {
            BulkOutcome::Failure
        }
    }
}

/// Outcome presented to the user after a bulk operation settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    Success { count: usize },
    Failure,
}

/// Fans a bulk operation out to one remote mutation per item.
///
/// All mutations are dispatched concurrently (bounded by the semaphore) and
/// awaited to settlement: one item failing neither aborts nor rolls back
/// its siblings. Nothing here is cancellable once started.
pub struct BulkOperationService {
    gateway: Arc<dyn TrashGateway>,
    semaphore: Arc<Semaphore>,
}

impl BulkOperationService {
    pub fn new(gateway: Arc<dyn TrashGateway>, config: &ConcurrencyConfig) -> Self {
        Self {
            gateway,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_mutations.max(1))),
        }
    }

    /// Restores every target to its original location
    pub async fn restore_items(&self, targets: &[SelectionKey]) -> BulkOperationResult {
        self.run(BulkMutation::Restore, targets).await
    }

    /// Permanently deletes every target
    pub async fn delete_items_permanently(&self, targets: &[SelectionKey]) -> BulkOperationResult {
        self.run(BulkMutation::DeletePermanently, targets).await
    }

    /// Empties the whole trash in a single remote call, no per-item fan-out
    #[instrument(skip(self))]
    pub async fn empty_trash(&self) -> Result<EmptyTrashOutcomeDto> {
        let outcome = self.gateway.empty_trash().await?;
        info!(
            deleted_files = outcome.deleted_files,
            deleted_folders = outcome.deleted_folders,
            "trash emptied"
        );
        Ok(outcome)
    }

    #[instrument(skip(self, targets), fields(count = targets.len()))]
    async fn run(&self, mutation: BulkMutation, targets: &[SelectionKey]) -> BulkOperationResult {
        info!("starting bulk {} of {} items", mutation.verb(), targets.len());

        let mut result = BulkOperationResult {
            attempted: targets.len(),
            ..Default::default()
        };

        let operations = targets.iter().copied().map(|key| {
            let gateway = self.gateway.clone();
            let semaphore = self.semaphore.clone();

            async move {
                let permit = semaphore.acquire().await.unwrap();

                let op_result = match mutation {
                    BulkMutation::Restore => gateway.restore_item(key.id, key.kind).await,
                    BulkMutation::DeletePermanently => {
                        gateway.delete_item_permanently(key.id, key.kind).await
                    }
                };

                drop(permit);

                (key, op_result)
            }
        });

        // Every mutation settles; failures are collected, never propagated
        // mid-flight
        let settled = join_all(operations).await;

        for (key, op_result) in settled {
            match op_result {
                Ok(()) => result.succeeded += 1,
                Err(e) => {
                    error!(
                        kind = key.kind.as_str(),
                        id = key.id,
                        "bulk {} failed for item: {}",
                        mutation.verb(),
                        e
                    );
                    result.failed += 1;
                    result.failures.push((key, e.to_string()));
                }
            }
        }

        info!(
            "bulk {} settled: {}/{} succeeded",
            mutation.verb(),
            result.succeeded,
            result.attempted
        );

        result
    }
}

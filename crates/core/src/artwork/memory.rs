//! In-process [`ArtworkStore`] backed by a single async mutex.
//!
//! Holding one lock for the whole of each operation gives the same
//! atomicity the Postgres store gets from transactions. Used by tests and
//! local tooling.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::artwork::checklist::Checklist;
use crate::artwork::model::{ArtworkBatch, ArtworkBatchItem, NewBatch, NewBatchItem};
use crate::artwork::review::{check_version, ReviewCommit, VersionCheck};
use crate::artwork::rollup::compute_rollup;
use crate::artwork::status::{BatchStatus, ItemStatus};
use crate::artwork::store::{ArtworkStore, ReviewOutcome};
use crate::artwork::submission::{finalize, ApproverSignature};
use crate::error::CoreError;
use crate::types::{new_id, DbId};

#[derive(Default)]
struct Inner {
    batches: HashMap<DbId, ArtworkBatch>,
    /// Items per batch, kept in `position` order.
    items: HashMap<DbId, Vec<ArtworkBatchItem>>,
}

#[derive(Default)]
pub struct MemoryArtworkStore {
    inner: Mutex<Inner>,
}

impl MemoryArtworkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite an item's status without touching the batch rollup.
    ///
    /// Simulates a write that bypassed the aggregator, e.g. a lost update.
    pub async fn force_item_status(&self, item_id: DbId, status: ItemStatus) -> bool {
        let mut inner = self.inner.lock().await;
        inner
            .items
            .values_mut()
            .flat_map(|items| items.iter_mut())
            .find(|item| item.id == item_id)
            .map(|item| item.status = status)
            .is_some()
    }
}

fn statuses(items: &[ArtworkBatchItem]) -> impl Iterator<Item = ItemStatus> + '_ {
    items.iter().map(|item| item.status)
}

#[async_trait]
impl ArtworkStore for MemoryArtworkStore {
    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }

    async fn create_batch(&self, input: NewBatch) -> Result<ArtworkBatch, CoreError> {
        let now = Utc::now();
        let batch = ArtworkBatch {
            id: new_id(),
            batch_name: input.batch_name,
            password_hash: input.password_hash,
            status: BatchStatus::Pending,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            overall_comment: None,
            approved_by_name: None,
            approved_by_company: None,
            approved_at: None,
            total_items: 0,
            approved_count: 0,
            rejected_count: 0,
            version: 0,
            password_version: 0,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        let mut inner = self.inner.lock().await;
        inner.items.insert(batch.id, Vec::new());
        inner.batches.insert(batch.id, batch.clone());
        Ok(batch)
    }

    async fn add_items(
        &self,
        batch_id: DbId,
        items: Vec<NewBatchItem>,
    ) -> Result<Vec<ArtworkBatchItem>, CoreError> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let batch = inner.batches.get_mut(&batch_id).ok_or(CoreError::NotFound {
            entity: "ArtworkBatch",
            id: batch_id,
        })?;
        if batch.is_finalized() {
            return Err(CoreError::BatchFinalized);
        }

        let now = Utc::now();
        let existing = inner.items.entry(batch_id).or_default();
        let first_position = existing.last().map_or(0, |item| item.position + 1);
        let created: Vec<ArtworkBatchItem> = items
            .into_iter()
            .enumerate()
            .map(|(i, input)| ArtworkBatchItem {
                id: new_id(),
                batch_id,
                name: input.name.trim().to_string(),
                file_url: input.file_url.trim().to_string(),
                file_type: input.file_type,
                file_size: input.file_size,
                source_link: input.source_link,
                ai_analysis: input.ai_analysis,
                status: ItemStatus::Pending,
                approval_type: None,
                customer_comment: None,
                checklist: Checklist::default(),
                position: first_position + i as i32,
                version: 0,
                created_at: now,
                updated_at: now,
            })
            .collect();
        existing.extend(created.iter().cloned());

        batch.apply_rollup(&compute_rollup(statuses(existing)));
        batch.version += 1;
        batch.updated_at = now;
        Ok(created)
    }

    async fn list_batches(&self) -> Result<Vec<ArtworkBatch>, CoreError> {
        let inner = self.inner.lock().await;
        let mut batches: Vec<ArtworkBatch> = inner.batches.values().cloned().collect();
        batches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(batches)
    }

    async fn find_batch(&self, id: DbId) -> Result<Option<ArtworkBatch>, CoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.batches.get(&id).cloned())
    }

    async fn list_items(&self, batch_id: DbId) -> Result<Vec<ArtworkBatchItem>, CoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.items.get(&batch_id).cloned().unwrap_or_default())
    }

    async fn remove_item(&self, batch_id: DbId, item_id: DbId) -> Result<ArtworkBatch, CoreError> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let batch = inner.batches.get_mut(&batch_id).ok_or(CoreError::NotFound {
            entity: "ArtworkBatch",
            id: batch_id,
        })?;
        if batch.is_finalized() {
            return Err(CoreError::BatchFinalized);
        }

        let items = inner.items.entry(batch_id).or_default();
        let index = items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or(CoreError::NotFound {
                entity: "ArtworkBatchItem",
                id: item_id,
            })?;
        items.remove(index);

        batch.apply_rollup(&compute_rollup(statuses(items)));
        batch.version += 1;
        batch.updated_at = Utc::now();
        Ok(batch.clone())
    }

    async fn set_password_hash(
        &self,
        batch_id: DbId,
        password_hash: &str,
    ) -> Result<bool, CoreError> {
        let mut inner = self.inner.lock().await;
        match inner.batches.get_mut(&batch_id) {
            Some(batch) => {
                batch.password_hash = password_hash.to_string();
                batch.password_version += 1;
                batch.version += 1;
                batch.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn commit_item_review(&self, commit: &ReviewCommit) -> Result<ReviewOutcome, CoreError> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let batch = inner
            .batches
            .get_mut(&commit.batch_id)
            .ok_or(CoreError::NotFound {
                entity: "ArtworkBatch",
                id: commit.batch_id,
            })?;
        if batch.is_finalized() {
            return Err(CoreError::BatchFinalized);
        }

        let items = inner.items.entry(commit.batch_id).or_default();
        let item = items
            .iter_mut()
            .find(|item| item.id == commit.item_id)
            .ok_or(CoreError::NotFound {
                entity: "ArtworkBatchItem",
                id: commit.item_id,
            })?;

        if check_version(item, commit)? == VersionCheck::Replay {
            return Ok(ReviewOutcome {
                item: item.clone(),
                batch: batch.clone(),
                replayed: true,
            });
        }

        let now = Utc::now();
        commit.apply_to(item, now);
        let item = item.clone();

        batch.apply_rollup(&compute_rollup(statuses(items)));
        batch.version += 1;
        batch.updated_at = now;

        Ok(ReviewOutcome {
            item,
            batch: batch.clone(),
            replayed: false,
        })
    }

    async fn commit_submission(
        &self,
        batch_id: DbId,
        signature: ApproverSignature,
    ) -> Result<ArtworkBatch, CoreError> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let batch = inner.batches.get_mut(&batch_id).ok_or(CoreError::NotFound {
            entity: "ArtworkBatch",
            id: batch_id,
        })?;
        let items = inner.items.get(&batch_id).map(Vec::as_slice).unwrap_or_default();

        let approval = finalize(batch, statuses(items), signature, Utc::now())?;
        approval.apply_to(batch);
        Ok(batch.clone())
    }
}

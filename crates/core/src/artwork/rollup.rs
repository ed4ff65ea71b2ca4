//! Batch status aggregation.
//!
//! The batch's counts and status are a pure function of its items' statuses.
//! Callers always pass the full item collection; nothing here adjusts a
//! previous rollup incrementally.

use serde::Serialize;

use crate::artwork::status::{BatchStatus, ItemStatus};

/// Counts and status derived from a batch's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchRollup {
    pub total: i32,
    pub approved_count: i32,
    pub rejected_count: i32,
    pub pending_count: i32,
    pub status: BatchStatus,
}

impl BatchRollup {
    /// True when at least one item exists and none is pending.
    pub fn is_fully_decided(&self) -> bool {
        self.total > 0 && self.pending_count == 0
    }
}

/// Derive the rollup for a batch from every item status it contains.
///
/// - no item decided (including an empty batch) -> `pending`
/// - some but not all decided -> `partial`
/// - all decided, none rejected -> `approved`
/// - all decided, at least one rejected -> `rejected`
pub fn compute_rollup<I>(statuses: I) -> BatchRollup
where
    I: IntoIterator<Item = ItemStatus>,
{
    let (mut approved, mut rejected, mut pending) = (0i32, 0i32, 0i32);
    for status in statuses {
        match status {
            ItemStatus::Approved => approved += 1,
            ItemStatus::Rejected => rejected += 1,
            ItemStatus::Pending => pending += 1,
        }
    }
    let total = approved + rejected + pending;
    let decided = approved + rejected;

    let status = if decided == 0 {
        BatchStatus::Pending
    } else if pending > 0 {
        BatchStatus::Partial
    } else if rejected > 0 {
        BatchStatus::Rejected
    } else {
        BatchStatus::Approved
    };

    BatchRollup {
        total,
        approved_count: approved,
        rejected_count: rejected,
        pending_count: pending,
        status,
    }
}

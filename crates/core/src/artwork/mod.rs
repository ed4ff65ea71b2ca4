//! Artwork proof review and approval.
//!
//! - [`status`] -- item/batch status and approval-type enums.
//! - [`checklist`] -- the fixed verification checklist and proof terms.
//! - [`decision`] -- the three-way customer decision.
//! - [`model`] -- batch and item records.
//! - [`review`] -- the per-item review engine.
//! - [`rollup`] -- batch status aggregation.
//! - [`submission`] -- the final submission gate.
//! - [`store`] -- the persistence boundary.
//! - [`memory`] -- an in-process store.
//! - [`workflow`] -- orchestration of the customer-facing operations.

pub mod checklist;
pub mod decision;
pub mod memory;
pub mod model;
pub mod review;
pub mod rollup;
pub mod status;
pub mod store;
pub mod submission;
pub mod workflow;

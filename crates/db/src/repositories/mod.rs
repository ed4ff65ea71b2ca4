//! Repository layer: one zero-sized struct per table with async query fns.

pub mod artwork_batch_repo;
pub mod artwork_item_repo;

pub use artwork_batch_repo::ArtworkBatchRepo;
pub use artwork_item_repo::ArtworkItemRepo;

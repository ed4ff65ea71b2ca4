//! Domain layer for the artwork proof review service.
//!
//! Everything in this crate is storage- and transport-agnostic: the review
//! state machine, the batch rollup, the submission gate, and the
//! [`artwork::store::ArtworkStore`] boundary that persistence crates implement.

pub mod artwork;
pub mod error;
pub mod types;

//! Trip Store
//!
//! Optimistic state for trip resources:
//! - tracked: the contract an item type implements to be counted
//! - summary: derived statistics (totals, status counters, category buckets)
//! - store: keyed collection that keeps its summary in step with every mutation
//! - mutation: records of applied mutations, used for rollback
//! - generation: refetch/invalidation revision

mod error;
mod generation;
mod mutation;
mod store;
mod summary;
mod tracked;

#[cfg(test)]
mod fixtures;

pub use error::{StoreError, StoreResult};
pub use generation::Generation;
pub use mutation::Mutation;
pub use store::{OptimisticStore, Reconcile, SortFn};
pub use summary::{GroupStats, Summary};
pub use tracked::Tracked;

//! Tracked Items
//!
//! The contract an item type implements so an [`OptimisticStore`](crate::OptimisticStore)
//! can keep its statistics up to date.

use std::fmt::Debug;
use std::hash::Hash;

/// An item kept in an optimistic collection
///
/// Every resource (members, expenses, packing, checklist, itinerary)
/// implements this once; the store does the bookkeeping generically.
pub trait Tracked: Clone + PartialEq {
    /// Opaque identifier assigned by the server
    type Id: Clone + Eq + Hash + Debug;
    /// Category/type key the statistics are bucketed by
    type Group: Clone + Ord + Debug;
    /// Flag or status the statistics count (bool for packed/completed flags)
    type Status: Clone + Ord + Debug;

    fn id(&self) -> Self::Id;

    /// Bucket key, `None` when the item is uncategorized
    fn group(&self) -> Option<Self::Group>;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);

    /// Amount summed into the statistics, in cents (expenses)
    ///
    /// Integer so that adding and removing items never drifts from a
    /// recomputed total.
    fn weight(&self) -> i64 {
        0
    }
}

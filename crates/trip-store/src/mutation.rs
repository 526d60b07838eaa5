//! Mutation Records
//!
//! Every optimistic change returns one of these so the caller can undo it
//! when the server rejects the request.

use crate::tracked::Tracked;

/// A change applied to an [`OptimisticStore`](crate::OptimisticStore)
///
/// `revision` is the store revision the change produced. A rollback only
/// applies while the item still carries that revision.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<T> {
    /// Item appended to the collection
    Inserted { item: T, revision: u64 },
    /// Item removed from `index`
    Removed { item: T, index: usize, revision: u64 },
    /// Item replaced in place
    Updated { before: T, after: T, revision: u64 },
}

impl<T: Tracked> Mutation<T> {
    pub fn id(&self) -> T::Id {
        self.item().id()
    }

    pub fn revision(&self) -> u64 {
        match self {
            Mutation::Inserted { revision, .. }
            | Mutation::Removed { revision, .. }
            | Mutation::Updated { revision, .. } => *revision,
        }
    }

    /// Short verb for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::Inserted { .. } => "insert",
            Mutation::Removed { .. } => "remove",
            Mutation::Updated { .. } => "update",
        }
    }

    /// Item state the mutation produced (the removed item for removals)
    pub fn item(&self) -> &T {
        match self {
            Mutation::Inserted { item, .. } => item,
            Mutation::Removed { item, .. } => item,
            Mutation::Updated { after, .. } => after,
        }
    }
}

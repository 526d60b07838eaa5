//! Optimistic Store
//!
//! Keyed collection plus its derived [`Summary`]. Every mutation updates the
//! collection and the summary together, synchronously, and returns a
//! [`Mutation`] the caller keeps until the server answers, then hands back
//! through [`OptimisticStore::confirm`] or [`OptimisticStore::rollback`].
//!
//! The store counts local revisions. Each item remembers the revision of its
//! last local change, so a rollback can tell whether the item moved on, and
//! a fetch result can tell whether local changes landed while it was in
//! flight.
//!
//! The summary is installed from the server and then maintained by deltas.
//! When the collection is a filtered view (category filter) the summary
//! still describes the whole trip, so `is_consistent` is only meaningful for
//! unfiltered collections.

use std::cmp;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::{StoreError, StoreResult};
use crate::mutation::Mutation;
use crate::summary::Summary;
use crate::tracked::Tracked;

/// Display order of a collection (creation time, expense date, visit time)
pub type SortFn<T> = fn(&T, &T) -> cmp::Ordering;

/// What became of a fetch result handed to [`OptimisticStore::apply_fetch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// Installed
    Applied,
    /// Dropped: local changes landed meanwhile and all of them settled, fetch again now
    Refetch,
    /// Dropped: requests still in flight; the last one to settle asks for a refetch
    Deferred,
}

/// Collection with incrementally maintained statistics
#[derive(Clone)]
pub struct OptimisticStore<T: Tracked> {
    items: Vec<T>,
    summary: Summary<T::Group, T::Status>,
    sort: Option<SortFn<T>>,
    /// Bumped by every local change, never reset
    revision: u64,
    /// Revision of each item's last local change
    touched: HashMap<T::Id, u64>,
    /// Revisions of mutations awaiting the server
    in_flight: BTreeSet<u64>,
    /// A fetch result was dropped while requests were in flight
    stale: bool,
}

impl<T: Tracked> OptimisticStore<T> {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), Summary::new())
    }

    /// Keep the collection sorted after every insert
    pub fn with_sort(mut self, sort: SortFn<T>) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Build from a collection, deriving the summary
    pub fn from_items(items: Vec<T>) -> Self {
        let summary = Summary::from_items(&items);
        Self::from_parts(items, summary)
    }

    fn from_parts(items: Vec<T>, summary: Summary<T::Group, T::Status>) -> Self {
        Self {
            items,
            summary,
            sort: None,
            revision: 0,
            touched: HashMap::new(),
            in_flight: BTreeSet::new(),
            stale: false,
        }
    }

    // ========================
    // Fetch results
    // ========================

    /// Install a freshly fetched collection and server statistics
    pub fn replace(&mut self, items: Vec<T>, summary: Summary<T::Group, T::Status>) {
        self.items = items;
        self.summary = summary;
        self.touched.clear();
        self.stale = false;
    }

    /// Install a fetch result that was requested at revision `since`
    ///
    /// The result is dropped when a local change happened after `since` or a
    /// request is still in flight: the server may not have seen those
    /// changes yet, and installing its answer would undo them locally.
    pub fn apply_fetch(&mut self, since: u64, items: Vec<T>, summary: Summary<T::Group, T::Status>) -> Reconcile {
        if self.revision == since && self.in_flight.is_empty() {
            self.replace(items, summary);
            return Reconcile::Applied;
        }
        tracing::debug!(
            since,
            revision = self.revision,
            in_flight = self.in_flight.len(),
            "fetch result dropped: local changes pending"
        );
        if self.in_flight.is_empty() {
            Reconcile::Refetch
        } else {
            self.stale = true;
            Reconcile::Deferred
        }
    }

    // ========================
    // Queries
    // ========================

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn summary(&self) -> &Summary<T::Group, T::Status> {
        &self.summary
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| &item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Revision of the last local change; pass it to [`apply_fetch`](Self::apply_fetch)
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of mutations awaiting the server
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Summary derived from the collection alone
    pub fn recompute(&self) -> Summary<T::Group, T::Status> {
        Summary::from_items(&self.items)
    }

    /// Whether the maintained summary matches the collection
    pub fn is_consistent(&self) -> bool {
        self.summary == self.recompute()
    }

    fn position(&self, id: &T::Id) -> StoreResult<usize> {
        self.items
            .iter()
            .position(|item| &item.id() == id)
            .ok_or_else(|| StoreError::UnknownItem(format!("{:?}", id)))
    }

    // ========================
    // Mutations
    // ========================

    /// Add an item confirmed by the server
    ///
    /// An item whose id is already present replaces the existing entry.
    /// Nothing is left in flight.
    pub fn insert(&mut self, item: T) -> Mutation<T> {
        let id = item.id();
        if let Ok(index) = self.position(&id) {
            let before = self.swap(index, item.clone());
            let revision = self.touch(id);
            return Mutation::Updated {
                before,
                after: item,
                revision,
            };
        }

        self.summary.record(&item);
        self.items.push(item.clone());
        if let Some(sort) = self.sort {
            self.items.sort_by(sort);
        }
        let revision = self.touch(id);
        Mutation::Inserted { item, revision }
    }

    /// Remove an item ahead of the server confirming the delete
    pub fn remove(&mut self, id: &T::Id) -> StoreResult<Mutation<T>> {
        let index = self.position(id)?;
        let item = self.items.remove(index);
        self.summary.unrecord(&item);
        self.touched.remove(id);
        let revision = self.next_revision();
        self.in_flight.insert(revision);
        Ok(Mutation::Removed { item, index, revision })
    }

    /// Apply a local edit; `None` when the edit changed nothing
    pub fn update(&mut self, id: &T::Id, edit: impl FnOnce(&mut T)) -> StoreResult<Option<Mutation<T>>> {
        let index = self.position(id)?;
        let mut after = self.items[index].clone();
        edit(&mut after);
        debug_assert!(&after.id() == id, "edits must not change the item id");
        if after == self.items[index] {
            return Ok(None);
        }
        Ok(Some(self.replace_at(index, after)))
    }

    /// Move an item to another status; `None` when it already has it
    pub fn set_status(&mut self, id: &T::Id, status: T::Status) -> StoreResult<Option<Mutation<T>>> {
        let index = self.position(id)?;
        if self.items[index].status() == status {
            return Ok(None);
        }
        self.update(id, |item| item.set_status(status))
    }

    /// The server accepted a mutation
    ///
    /// Returns true when a fetch result was dropped meanwhile and this was
    /// the last request in flight: the caller should fetch again.
    pub fn confirm(&mut self, mutation: &Mutation<T>) -> bool {
        self.in_flight.remove(&mutation.revision());
        if self.stale && self.in_flight.is_empty() {
            self.stale = false;
            return true;
        }
        false
    }

    /// Undo a mutation the server rejected
    ///
    /// Returns false when the item has changed again since, in which case the
    /// rollback is skipped and the next refetch reconciles.
    pub fn rollback(&mut self, mutation: Mutation<T>) -> bool {
        let id = mutation.id();
        let revision = mutation.revision();
        self.in_flight.remove(&revision);
        let current = self.touched.get(&id) == Some(&revision);
        match mutation {
            Mutation::Inserted { .. } => match self.position(&id) {
                Ok(index) if current => {
                    let item = self.items.remove(index);
                    self.summary.unrecord(&item);
                    self.touched.remove(&id);
                    self.next_revision();
                    true
                }
                _ => self.skip(&id),
            },
            Mutation::Removed { item, index, .. } => {
                if self.position(&id).is_ok() {
                    return self.skip(&id);
                }
                self.summary.record(&item);
                let index = index.min(self.items.len());
                self.items.insert(index, item);
                self.touch(id);
                true
            }
            Mutation::Updated { before, .. } => match self.position(&id) {
                Ok(index) if current => {
                    self.swap(index, before);
                    self.touch(id);
                    true
                }
                _ => self.skip(&id),
            },
        }
    }

    fn skip(&self, id: &T::Id) -> bool {
        tracing::debug!(?id, "rollback skipped: item changed since the mutation");
        false
    }

    /// Swap in a locally edited item and mark the change in flight
    fn replace_at(&mut self, index: usize, after: T) -> Mutation<T> {
        let before = self.swap(index, after.clone());
        let revision = self.touch(after.id());
        self.in_flight.insert(revision);
        Mutation::Updated { before, after, revision }
    }

    fn swap(&mut self, index: usize, item: T) -> T {
        let before = std::mem::replace(&mut self.items[index], item);
        self.summary.unrecord(&before);
        self.summary.record(&self.items[index]);
        before
    }

    fn next_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    fn touch(&mut self, id: T::Id) -> u64 {
        let revision = self.next_revision();
        self.touched.insert(id, revision);
        revision
    }
}

impl<T: Tracked<Status = bool>> OptimisticStore<T> {
    /// Flip the item's flag (packed, completed)
    pub fn toggle(&mut self, id: &T::Id) -> StoreResult<Mutation<T>> {
        let index = self.position(id)?;
        let mut after = self.items[index].clone();
        after.set_status(!after.status());
        Ok(self.replace_at(index, after))
    }
}

impl<T: Tracked> Default for OptimisticStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Tracked + fmt::Debug> fmt::Debug for OptimisticStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimisticStore")
            .field("items", &self.items)
            .field("summary", &self.summary)
            .field("sorted", &self.sort.is_some())
            .field("revision", &self.revision)
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Task;
    use crate::summary::GroupStats;

    fn two_in_a() -> OptimisticStore<Task> {
        OptimisticStore::from_items(vec![Task::new(4, "A", true), Task::new(5, "A", false)])
    }

    fn summary(total: u32, completed: u32, groups: &[(&str, u32, u32)]) -> Summary<String, bool> {
        let mut summary = Summary::new()
            .with_total(total)
            .with_status(true, completed)
            .with_status(false, total - completed);
        for (key, total, completed) in groups {
            summary = summary.with_group(
                key.to_string(),
                GroupStats::with_counts(*total, 0, [(true, *completed), (false, total - completed)]),
            );
        }
        summary
    }

    #[test]
    fn test_toggle_moves_one_count() {
        let mut store = two_in_a();
        assert_eq!(store.summary(), &summary(2, 1, &[("A", 2, 1)]));

        store.toggle(&5).expect("toggle failed");

        assert!(store.get(&5).unwrap().done);
        assert_eq!(store.summary(), &summary(2, 2, &[("A", 2, 2)]));
    }

    #[test]
    fn test_delete_after_toggle() {
        let mut store = two_in_a();
        store.toggle(&5).unwrap();
        store.remove(&5).expect("remove failed");

        assert_eq!(store.len(), 1);
        assert_eq!(store.summary(), &summary(1, 1, &[("A", 1, 1)]));
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut store = two_in_a();
        let original = store.clone();

        store.toggle(&5).unwrap();
        store.toggle(&5).unwrap();

        assert_eq!(store.items(), original.items());
        assert_eq!(store.summary(), original.summary());
    }

    #[test]
    fn test_deleting_last_item_drops_bucket() {
        let mut store = OptimisticStore::from_items(vec![Task::new(1, "A", false), Task::new(2, "B", true)]);
        store.remove(&2).unwrap();

        assert!(store.summary().group(&"B".to_string()).is_none());
        assert!(store.summary().groups().all(|(_, bucket)| bucket.total > 0));
    }

    #[test]
    fn test_insert_creates_bucket() {
        let mut store = two_in_a();
        let mutation = store.insert(Task::new(9, "C", false));

        assert_eq!(mutation.kind(), "insert");
        let bucket = store.summary().group(&"C".to_string()).unwrap();
        assert_eq!((bucket.total, bucket.completed()), (1, 0));
        assert!(store.is_consistent());
    }

    #[test]
    fn test_insert_existing_id_replaces() {
        let mut store = two_in_a();
        let mutation = store.insert(Task::new(5, "B", true));

        assert!(matches!(mutation, Mutation::Updated { .. }));
        assert_eq!(store.len(), 2);
        assert!(store.summary().group(&"B".to_string()).is_some());
        assert!(store.is_consistent());
    }

    #[test]
    fn test_insert_keeps_sort_order() {
        let newest_first: SortFn<Task> = |a, b| b.created_at.cmp(&a.created_at);
        let mut store = OptimisticStore::new().with_sort(newest_first);
        store.insert(Task::new(1, "A", false));
        store.insert(Task::new(3, "A", false));
        store.insert(Task::new(2, "A", false));

        let ids: Vec<u32> = store.items().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_unknown_id_is_an_error() {
        let mut store = two_in_a();
        assert_eq!(store.toggle(&42), Err(StoreError::UnknownItem("42".into())));
        assert!(store.remove(&42).is_err());
        assert!(store.set_status(&42, true).is_err());
    }

    #[test]
    fn test_set_status_same_value_is_noop() {
        let mut store = two_in_a();
        assert_eq!(store.set_status(&4, true), Ok(None));
        assert!(store.set_status(&4, false).unwrap().is_some());
        assert_eq!(store.summary().completed(), 0);
    }

    #[test]
    fn test_update_without_change_is_noop() {
        let mut store = two_in_a();
        assert_eq!(store.update(&4, |_| {}), Ok(None));
    }

    #[test]
    fn test_update_moving_group() {
        let mut store = two_in_a();
        store
            .update(&4, |task| task.group = Some("B".into()))
            .unwrap()
            .expect("group change is a mutation");

        assert_eq!(store.summary(), &summary(2, 1, &[("A", 1, 0), ("B", 1, 1)]));
    }

    #[test]
    fn test_failed_toggle_rolls_back() {
        let mut store = two_in_a();
        let original = store.clone();

        let mutation = store.toggle(&5).unwrap();
        assert!(store.rollback(mutation));

        assert_eq!(store.items(), original.items());
        assert_eq!(store.summary(), original.summary());
    }

    #[test]
    fn test_failed_delete_restores_position() {
        let mut store = OptimisticStore::from_items(vec![
            Task::new(1, "A", false),
            Task::new(2, "A", true),
            Task::new(3, "B", false),
        ]);
        let original = store.clone();

        let mutation = store.remove(&2).unwrap();
        assert!(store.rollback(mutation));

        assert_eq!(store.items(), original.items());
        assert_eq!(store.summary(), original.summary());
    }

    #[test]
    fn test_stale_rollback_is_skipped() {
        let mut store = two_in_a();
        let first = store.toggle(&5).unwrap();
        store.toggle(&5).unwrap();

        assert!(!store.rollback(first));
        assert!(!store.get(&5).unwrap().done);
        assert!(store.is_consistent());
    }

    #[test]
    fn test_rollback_skipped_when_item_returns_to_same_value() {
        let mut store = two_in_a();
        let first = store.toggle(&5).unwrap();
        store.toggle(&5).unwrap();
        let third = store.toggle(&5).unwrap();

        // Same value as after the first toggle, but a later request owns it
        assert_eq!(store.get(&5), Some(first.item()));
        assert!(!store.rollback(first));
        assert!(store.get(&5).unwrap().done);

        assert!(store.rollback(third));
        assert!(!store.get(&5).unwrap().done);
        assert!(store.is_consistent());
    }

    #[test]
    fn test_rollback_of_rolled_back_item_is_skipped() {
        let mut store = two_in_a();
        let first = store.toggle(&5).unwrap();
        let second = store.toggle(&5).unwrap();

        assert!(store.rollback(second));
        assert!(!store.rollback(first));
        assert!(store.get(&5).unwrap().done);
    }

    #[test]
    fn test_rollback_insert_removes_item() {
        let mut store = two_in_a();
        let mutation = store.insert(Task::new(7, "A", false));
        assert!(store.rollback(mutation));
        assert!(store.get(&7).is_none());
        assert_eq!(store.summary().total, 2);
    }

    #[test]
    fn test_server_summary_is_kept_for_filtered_views() {
        let mut store: OptimisticStore<Task> = OptimisticStore::new();
        store.replace(vec![Task::new(5, "A", false)], summary(3, 1, &[("A", 1, 0), ("B", 2, 1)]));

        store.toggle(&5).unwrap();

        assert_eq!(store.summary(), &summary(3, 2, &[("A", 1, 1), ("B", 2, 1)]));
        assert!(!store.is_consistent());
    }

    #[test]
    fn test_fetch_applied_when_nothing_changed() {
        let mut store = two_in_a();
        let since = store.revision();

        let outcome = store.apply_fetch(since, vec![Task::new(6, "B", false)], summary(1, 0, &[("B", 1, 0)]));

        assert_eq!(outcome, Reconcile::Applied);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_fetch_during_pending_toggle_is_deferred() {
        let mut store = two_in_a();
        let since = store.revision();
        let stale_items = store.items().to_vec();
        let stale_summary = store.summary().clone();

        let mutation = store.toggle(&5).unwrap();
        let outcome = store.apply_fetch(since, stale_items, stale_summary);

        assert_eq!(outcome, Reconcile::Deferred);
        assert!(store.get(&5).unwrap().done);
        assert_eq!(store.in_flight(), 1);

        // Server accepted the toggle: fetch again now that it has it
        assert!(store.confirm(&mutation));
        assert_eq!(store.in_flight(), 0);
        assert!(!store.confirm(&mutation));
    }

    #[test]
    fn test_fetch_started_before_settled_change_refetches() {
        let mut store = two_in_a();
        let since = store.revision();
        let stale_items = store.items().to_vec();
        let stale_summary = store.summary().clone();

        let mutation = store.remove(&4).unwrap();
        assert!(!store.confirm(&mutation));

        assert_eq!(store.apply_fetch(since, stale_items, stale_summary), Reconcile::Refetch);
        assert!(store.get(&4).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_fetch_waits_for_every_request() {
        let mut store = two_in_a();
        let toggle = store.toggle(&4).unwrap();
        let remove = store.remove(&5).unwrap();
        let since = store.revision();

        assert_eq!(store.apply_fetch(since, Vec::new(), Summary::new()), Reconcile::Deferred);
        assert!(store.rollback(toggle));
        assert_eq!(store.in_flight(), 1);
        assert!(store.confirm(&remove));
    }
}

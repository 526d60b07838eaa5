//! Statistics Summary
//!
//! Derived aggregate of a collection: totals, per-status counters and one
//! bucket per category. Counters are kept canonical (no zero entries, no
//! empty buckets) so an incrementally maintained summary compares equal to
//! one recomputed from scratch.

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::tracked::Tracked;

/// Per-category bucket
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats<S: Ord> {
    pub total: u32,
    pub amount: i64,
    pub statuses: BTreeMap<S, u32>,
}

impl<S: Ord + Clone> GroupStats<S> {
    pub fn new() -> Self {
        Self {
            total: 0,
            amount: 0,
            statuses: BTreeMap::new(),
        }
    }

    /// Bucket as reported by the server
    pub fn with_counts(total: u32, amount: i64, statuses: impl IntoIterator<Item = (S, u32)>) -> Self {
        let mut stats = Self {
            total,
            amount,
            statuses: BTreeMap::new(),
        };
        for (status, count) in statuses {
            if count > 0 {
                stats.statuses.insert(status, count);
            }
        }
        stats
    }

    /// Number of items in this bucket with the given status
    pub fn count(&self, status: &S) -> u32 {
        self.statuses.get(status).copied().unwrap_or(0)
    }

    fn add(&mut self, status: S, weight: i64) {
        self.total += 1;
        self.amount += weight;
        *self.statuses.entry(status).or_insert(0) += 1;
    }

    fn sub(&mut self, status: &S, weight: i64) {
        self.total = self.total.saturating_sub(1);
        self.amount -= weight;
        decrement(&mut self.statuses, status);
    }
}

impl<S: Ord + Clone> Default for GroupStats<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupStats<bool> {
    /// Flagged items (packed, completed)
    pub fn completed(&self) -> u32 {
        self.count(&true)
    }
}

/// Aggregate statistics of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Summary<G: Ord, S: Ord> {
    pub total: u32,
    pub amount: i64,
    pub statuses: BTreeMap<S, u32>,
    pub groups: BTreeMap<G, GroupStats<S>>,
}

impl<G: Ord + Clone + Debug, S: Ord + Clone> Summary<G, S> {
    pub fn new() -> Self {
        Self {
            total: 0,
            amount: 0,
            statuses: BTreeMap::new(),
            groups: BTreeMap::new(),
        }
    }

    /// Recompute from scratch over a collection
    pub fn from_items<'a, T>(items: impl IntoIterator<Item = &'a T>) -> Self
    where
        T: Tracked<Group = G, Status = S> + 'a,
    {
        let mut summary = Self::new();
        for item in items {
            summary.record(item);
        }
        summary
    }

    // ========================
    // Builders (server statistics)
    // ========================

    pub fn with_total(mut self, total: u32) -> Self {
        self.total = total;
        self
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_status(mut self, status: S, count: u32) -> Self {
        if count > 0 {
            self.statuses.insert(status, count);
        }
        self
    }

    /// Add a category bucket; empty buckets are ignored
    pub fn with_group(mut self, key: G, stats: GroupStats<S>) -> Self {
        if stats.total > 0 {
            self.groups.insert(key, stats);
        }
        self
    }

    // ========================
    // Incremental bookkeeping
    // ========================

    /// Count an item that entered the collection
    pub fn record<T>(&mut self, item: &T)
    where
        T: Tracked<Group = G, Status = S>,
    {
        let status = item.status();
        let weight = item.weight();
        self.total += 1;
        self.amount += weight;
        *self.statuses.entry(status.clone()).or_insert(0) += 1;
        if let Some(key) = item.group() {
            self.groups.entry(key).or_default().add(status, weight);
        }
    }

    /// Uncount an item that left the collection, dropping its bucket when it empties
    pub fn unrecord<T>(&mut self, item: &T)
    where
        T: Tracked<Group = G, Status = S>,
    {
        let status = item.status();
        let weight = item.weight();
        self.total = self.total.saturating_sub(1);
        self.amount -= weight;
        decrement(&mut self.statuses, &status);
        if let Some(key) = item.group() {
            let emptied = match self.groups.get_mut(&key) {
                Some(bucket) => {
                    bucket.sub(&status, weight);
                    bucket.total == 0
                }
                None => {
                    tracing::debug!(?key, "unrecord: no bucket for item category");
                    false
                }
            };
            if emptied {
                self.groups.remove(&key);
            }
        }
    }

    // ========================
    // Queries
    // ========================

    /// Number of items with the given status
    pub fn count(&self, status: &S) -> u32 {
        self.statuses.get(status).copied().unwrap_or(0)
    }

    pub fn group(&self, key: &G) -> Option<&GroupStats<S>> {
        self.groups.get(key)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&G, &GroupStats<S>)> {
        self.groups.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl<G: Ord + Clone + Debug, S: Ord + Clone> Default for Summary<G, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Ord + Clone + Debug> Summary<G, bool> {
    /// Flagged items (packed, completed)
    pub fn completed(&self) -> u32 {
        self.count(&true)
    }

    /// Items still unflagged
    pub fn pending(&self) -> u32 {
        self.count(&false)
    }
}

fn decrement<S: Ord>(counts: &mut BTreeMap<S, u32>, status: &S) {
    if let Some(count) = counts.get_mut(status) {
        *count = count.saturating_sub(1);
        if *count == 0 {
            counts.remove(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Task;

    #[test]
    fn test_from_items_buckets_by_group() {
        let items = vec![
            Task::new(1, "A", false),
            Task::new(2, "A", true),
            Task::new(3, "B", true),
        ];
        let summary = Summary::from_items(&items);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed(), 2);
        assert_eq!(summary.pending(), 1);
        let a = summary.group(&"A".to_string()).unwrap();
        assert_eq!((a.total, a.completed()), (2, 1));
        let b = summary.group(&"B".to_string()).unwrap();
        assert_eq!((b.total, b.completed()), (1, 1));
    }

    #[test]
    fn test_unrecord_drops_empty_bucket() {
        let task = Task::new(1, "A", true);
        let mut summary = Summary::from_items([&task]);
        summary.unrecord(&task);

        assert!(summary.is_empty());
        assert_eq!(summary.groups().count(), 0);
        assert_eq!(summary, Summary::new());
    }

    #[test]
    fn test_uncategorized_items_count_globally_only() {
        let mut task = Task::new(1, "A", false);
        task.group = None;
        let summary = Summary::from_items([&task]);

        assert_eq!(summary.total, 1);
        assert_eq!(summary.groups().count(), 0);
    }

    #[test]
    fn test_builders_skip_zero_entries() {
        let built: Summary<String, bool> = Summary::new()
            .with_total(2)
            .with_status(true, 0)
            .with_status(false, 2)
            .with_group("A".into(), GroupStats::with_counts(2, 0, [(true, 0), (false, 2)]))
            .with_group("B".into(), GroupStats::new());

        let items = vec![Task::new(1, "A", false), Task::new(2, "A", false)];
        assert_eq!(built, Summary::from_items(&items));
    }

    #[test]
    fn test_weights_are_summed() {
        let items = vec![
            Task::new(1, "A", false).with_weight(1250),
            Task::new(2, "A", false).with_weight(750),
        ];
        let mut summary = Summary::from_items(&items);
        assert_eq!(summary.amount, 2000);
        assert_eq!(summary.group(&"A".to_string()).unwrap().amount, 2000);

        summary.unrecord(&items[0]);
        assert_eq!(summary.amount, 750);
    }

    #[test]
    fn test_cent_amounts_do_not_drift() {
        let items = vec![
            Task::new(1, "A", false).with_weight(10),
            Task::new(2, "A", false).with_weight(20),
            Task::new(3, "B", false).with_weight(30),
        ];
        let mut summary = Summary::from_items(&items);
        summary.unrecord(&items[0]);

        assert_eq!(summary.amount, 50);
        assert_eq!(summary, Summary::from_items(&items[1..]));
    }
}

//! Packing List

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use trip_store::{GroupStats, SortFn, Summary, Tracked};

use super::{de_count, de_id, Category, ListFilter, MemberRef, Resource, StatusField};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingItem {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    /// Nullable: the category may have been deleted
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub packed: bool,
    /// `None` for shared items
    #[serde(default)]
    pub assigned_to: Option<MemberRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_quantity() -> u32 {
    1
}

impl Tracked for PackingItem {
    type Id = String;
    type Group = String;
    type Status = bool;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn group(&self) -> Option<String> {
        self.category.as_ref().map(|c| c.id.clone())
    }

    fn status(&self) -> bool {
        self.packed
    }

    fn set_status(&mut self, packed: bool) {
        self.packed = packed;
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackingCategoryStat {
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "de_count")]
    pub total: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub packed: u32,
}

/// `statistics/` of the packing list
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PackingStatistics {
    #[serde(default, deserialize_with = "de_count")]
    pub total_items: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub packed_items: u32,
    #[serde(default)]
    pub category_stats: Vec<PackingCategoryStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPackingItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub quantity: u32,
    /// `None` for shared items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackingFilter {
    pub category_id: Option<String>,
}

impl ListFilter<PackingItem> for PackingFilter {
    fn query(&self) -> Vec<(String, String)> {
        self.category_id
            .iter()
            .map(|id| ("category_id".to_string(), id.clone()))
            .collect()
    }

    fn matches(&self, item: &PackingItem) -> bool {
        match &self.category_id {
            Some(id) => item.category.as_ref().is_some_and(|category| &category.id == id),
            None => true,
        }
    }
}

impl Resource for PackingItem {
    const SEGMENT: &'static str = "packing";
    const CATEGORIES: Option<&'static str> = Some("/packing/categories/");

    type Statistics = PackingStatistics;
    type Filter = PackingFilter;
    type Draft = NewPackingItem;

    fn summarize(stats: &PackingStatistics) -> Summary<String, bool> {
        let unpacked = stats.total_items.saturating_sub(stats.packed_items);
        let summary = Summary::new()
            .with_total(stats.total_items)
            .with_status(true, stats.packed_items)
            .with_status(false, unpacked);
        stats
            .category_stats
            .iter()
            .filter_map(|stat| stat.category.as_ref().map(|c| (c.id.clone(), stat)))
            .fold(summary, |summary, (key, stat)| {
                let unpacked = stat.total.saturating_sub(stat.packed);
                summary.with_group(
                    key,
                    GroupStats::with_counts(stat.total, 0, [(true, stat.packed), (false, unpacked)]),
                )
            })
    }

    fn sort() -> Option<SortFn<Self>> {
        Some(|a, b| b.created_at.cmp(&a.created_at))
    }
}

impl StatusField for PackingItem {
    fn status_body(packed: &bool) -> Value {
        json!({ "packed": packed })
    }
}

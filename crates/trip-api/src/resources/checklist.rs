//! Trip Checklist
//!
//! Tasks grouped by trip phase, each with a completion flag and an optional
//! due date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use trip_store::{GroupStats, SortFn, Summary, Tracked};

use super::{de_count, de_id, ListFilter, MemberRef, Resource, StatusField};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChecklistCategory {
    #[default]
    PreTrip,
    DuringTrip,
    PostTrip,
}

impl ChecklistCategory {
    pub const ALL: [ChecklistCategory; 3] = [
        ChecklistCategory::PreTrip,
        ChecklistCategory::DuringTrip,
        ChecklistCategory::PostTrip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChecklistCategory::PreTrip => "PRE_TRIP",
            ChecklistCategory::DuringTrip => "DURING_TRIP",
            ChecklistCategory::PostTrip => "POST_TRIP",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChecklistCategory::PreTrip => "Pre-Trip",
            ChecklistCategory::DuringTrip => "During Trip",
            ChecklistCategory::PostTrip => "Post-Trip",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: ChecklistCategory,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub assigned_to: Option<MemberRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ChecklistItem {
    /// Due today or later
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due >= today)
    }
}

/// Open items due today or later, soonest first
pub fn upcoming_checklist(items: &[ChecklistItem], today: NaiveDate) -> Vec<ChecklistItem> {
    let mut upcoming: Vec<_> = items
        .iter()
        .filter(|item| !item.is_completed && item.is_upcoming(today))
        .cloned()
        .collect();
    upcoming.sort_by_key(|item| item.due_date);
    upcoming
}

impl Tracked for ChecklistItem {
    type Id = String;
    type Group = ChecklistCategory;
    type Status = bool;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn group(&self) -> Option<ChecklistCategory> {
        Some(self.category)
    }

    fn status(&self) -> bool {
        self.is_completed
    }

    fn set_status(&mut self, is_completed: bool) {
        self.is_completed = is_completed;
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChecklistCategoryStat {
    pub category: ChecklistCategory,
    #[serde(default, deserialize_with = "de_count")]
    pub total: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub completed: u32,
}

/// `statistics/` of the checklist
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChecklistStatistics {
    #[serde(default, deserialize_with = "de_count")]
    pub total_items: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub completed_items: u32,
    #[serde(default)]
    pub category_stats: Vec<ChecklistCategoryStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewChecklistItem {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub category: ChecklistCategory,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChecklistFilter {
    pub category: Option<ChecklistCategory>,
    pub upcoming: bool,
}

impl ListFilter<ChecklistItem> for ChecklistFilter {
    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(category) = self.category {
            query.push(("category".to_string(), category.as_str().to_string()));
        }
        if self.upcoming {
            query.push(("upcoming".to_string(), "true".to_string()));
        }
        query
    }

    fn matches(&self, item: &ChecklistItem) -> bool {
        self.category.map_or(true, |category| item.category == category)
            && (!self.upcoming || item.is_upcoming(Utc::now().date_naive()))
    }
}

impl Resource for ChecklistItem {
    const SEGMENT: &'static str = "checklist";

    type Statistics = ChecklistStatistics;
    type Filter = ChecklistFilter;
    type Draft = NewChecklistItem;

    fn summarize(stats: &ChecklistStatistics) -> Summary<ChecklistCategory, bool> {
        let pending = stats.total_items.saturating_sub(stats.completed_items);
        let summary = Summary::new()
            .with_total(stats.total_items)
            .with_status(true, stats.completed_items)
            .with_status(false, pending);
        stats.category_stats.iter().fold(summary, |summary, stat| {
            let pending = stat.total.saturating_sub(stat.completed);
            summary.with_group(
                stat.category,
                GroupStats::with_counts(stat.total, 0, [(true, stat.completed), (false, pending)]),
            )
        })
    }

    fn sort() -> Option<SortFn<Self>> {
        Some(|a, b| b.created_at.cmp(&a.created_at))
    }
}

impl StatusField for ChecklistItem {
    fn status_body(is_completed: &bool) -> Value {
        json!({ "is_completed": is_completed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, due: Option<NaiveDate>) -> ChecklistItem {
        ChecklistItem {
            id: id.into(),
            title: "Book hotel".into(),
            description: String::new(),
            category: ChecklistCategory::PreTrip,
            priority: Priority::High,
            due_date: due,
            is_completed: false,
            assigned_to: None,
            created_at: None,
        }
    }

    #[test]
    fn test_upcoming() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        assert!(item("1", Some(today)).is_upcoming(today));
        assert!(!item("2", today.pred_opt()).is_upcoming(today));
        assert!(!item("3", None).is_upcoming(today));
    }

    #[test]
    fn test_upcoming_checklist_order() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let mut done = item("4", today.succ_opt());
        done.is_completed = true;
        let items = vec![
            item("1", NaiveDate::from_ymd_opt(2025, 5, 20)),
            item("2", today.pred_opt()),
            item("3", Some(today)),
            done,
        ];
        let ids: Vec<_> = upcoming_checklist(&items, today).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn test_summarize_statistics() {
        let stats: ChecklistStatistics = serde_json::from_str(
            r#"{"total_items": 2, "completed_items": 1, "pending_items": 1,
                "category_stats": [{"category": "PRE_TRIP", "total": 2, "completed": 1}]}"#,
        )
        .unwrap();
        let summary = ChecklistItem::summarize(&stats);

        let bucket = summary.group(&ChecklistCategory::PreTrip).unwrap();
        assert_eq!((bucket.total, bucket.completed()), (2, 1));
        assert_eq!(summary.completed(), 1);
    }

    #[test]
    fn test_filter_query() {
        let filter = ChecklistFilter {
            category: Some(ChecklistCategory::DuringTrip),
            upcoming: true,
        };
        assert_eq!(
            filter.query(),
            vec![
                ("category".to_string(), "DURING_TRIP".to_string()),
                ("upcoming".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_matches() {
        let today = Utc::now().date_naive();
        let soon = item("1", today.succ_opt());
        let during = ChecklistItem {
            category: ChecklistCategory::DuringTrip,
            ..item("2", None)
        };

        assert!(ChecklistFilter::default().matches(&during));
        let pre_trip = ChecklistFilter {
            category: Some(ChecklistCategory::PreTrip),
            upcoming: false,
        };
        assert!(pre_trip.matches(&soon));
        assert!(!pre_trip.matches(&during));

        let upcoming = ChecklistFilter {
            category: None,
            upcoming: true,
        };
        assert!(upcoming.matches(&soon));
        assert!(!upcoming.matches(&during));
    }
}

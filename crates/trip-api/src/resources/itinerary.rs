//! Trip Itinerary
//!
//! Places to visit. Each item has a three-way status; statistics count
//! items per status only, the type is used as a list filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use trip_store::{SortFn, Summary, Tracked};

use super::{de_count, de_id, Category, ListFilter, Resource, StatusField};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItineraryStatus {
    #[default]
    Planned,
    Visited,
    Skipped,
}

impl ItineraryStatus {
    pub const ALL: [ItineraryStatus; 3] = [
        ItineraryStatus::Planned,
        ItineraryStatus::Visited,
        ItineraryStatus::Skipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItineraryStatus::Planned => "PLANNED",
            ItineraryStatus::Visited => "VISITED",
            ItineraryStatus::Skipped => "SKIPPED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItineraryStatus::Planned => "Planned",
            ItineraryStatus::Visited => "Visited",
            ItineraryStatus::Skipped => "Skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItem {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<Category>,
    #[serde(default)]
    pub status: ItineraryStatus,
    #[serde(default)]
    pub visit_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Tracked for ItineraryItem {
    type Id = String;
    type Group = ();
    type Status = ItineraryStatus;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn group(&self) -> Option<()> {
        None
    }

    fn status(&self) -> ItineraryStatus {
        self.status
    }

    fn set_status(&mut self, status: ItineraryStatus) {
        self.status = status;
    }
}

/// Items that are still on the plan, in visiting order
pub fn organized_itinerary(items: &[ItineraryItem]) -> Vec<ItineraryItem> {
    let mut organized: Vec<_> = items
        .iter()
        .filter(|item| item.status != ItineraryStatus::Skipped)
        .cloned()
        .collect();
    organized.sort_by(by_visit_time);
    organized
}

// Unscheduled items go last
fn by_visit_time(a: &ItineraryItem, b: &ItineraryItem) -> std::cmp::Ordering {
    match (a.visit_time, b.visit_time) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
}

/// `statistics/` of the itinerary, keyed by status value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ItineraryStatistics {
    #[serde(default, deserialize_with = "de_count")]
    pub total: u32,
    #[serde(rename = "PLANNED", alias = "planned", default, deserialize_with = "de_count")]
    pub planned: u32,
    #[serde(rename = "VISITED", alias = "visited", default, deserialize_with = "de_count")]
    pub visited: u32,
    #[serde(rename = "SKIPPED", alias = "skipped", default, deserialize_with = "de_count")]
    pub skipped: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewItineraryItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
    pub status: ItineraryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItineraryFilter {
    pub status: Option<ItineraryStatus>,
    pub type_id: Option<String>,
}

impl ListFilter<ItineraryItem> for ItineraryFilter {
    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(type_id) = &self.type_id {
            query.push(("type_id".to_string(), type_id.clone()));
        }
        query
    }

    fn matches(&self, item: &ItineraryItem) -> bool {
        self.status.map_or(true, |status| item.status == status)
            && self
                .type_id
                .as_ref()
                .map_or(true, |id| item.kind.as_ref().is_some_and(|kind| &kind.id == id))
    }
}

impl Resource for ItineraryItem {
    const SEGMENT: &'static str = "itineraries";
    const CATEGORIES: Option<&'static str> = Some("/itineraries/types/");

    type Statistics = ItineraryStatistics;
    type Filter = ItineraryFilter;
    type Draft = NewItineraryItem;

    fn summarize(stats: &ItineraryStatistics) -> Summary<(), ItineraryStatus> {
        Summary::new()
            .with_total(stats.total)
            .with_status(ItineraryStatus::Planned, stats.planned)
            .with_status(ItineraryStatus::Visited, stats.visited)
            .with_status(ItineraryStatus::Skipped, stats.skipped)
    }

    fn sort() -> Option<SortFn<Self>> {
        Some(by_visit_time)
    }
}

impl StatusField for ItineraryItem {
    fn status_body(status: &ItineraryStatus) -> Value {
        json!({ "status": status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stop(id: &str, status: ItineraryStatus, hour: Option<u32>) -> ItineraryItem {
        ItineraryItem {
            id: id.into(),
            name: format!("Stop {}", id),
            kind: None,
            status,
            visit_time: hour.map(|h| Utc.with_ymd_and_hms(2025, 7, 1, h, 0, 0).unwrap()),
            location: String::new(),
            notes: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_item_with_type() {
        let item: ItineraryItem = serde_json::from_str(
            r#"{"id": 4, "name": "Louvre", "type": {"id": 2, "name": "Activities & Entertainment"},
                "status": "VISITED", "visit_time": "2025-07-01T09:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(item.id, "4");
        assert_eq!(item.kind.unwrap().id, "2");
        assert_eq!(item.status, ItineraryStatus::Visited);
    }

    #[test]
    fn test_organized_drops_skipped_and_orders_by_visit() {
        let items = vec![
            stop("a", ItineraryStatus::Planned, Some(15)),
            stop("b", ItineraryStatus::Skipped, Some(8)),
            stop("c", ItineraryStatus::Visited, Some(9)),
            stop("d", ItineraryStatus::Planned, None),
        ];
        let ids: Vec<_> = organized_itinerary(&items).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["c", "a", "d"]);
    }

    #[test]
    fn test_statistics_keys() {
        let stats: ItineraryStatistics =
            serde_json::from_str(r#"{"total": 4, "PLANNED": 2, "VISITED": 1, "SKIPPED": 1}"#).unwrap();
        let summary = ItineraryItem::summarize(&stats);
        assert_eq!(summary.count(&ItineraryStatus::Planned), 2);
        assert_eq!(summary.count(&ItineraryStatus::Skipped), 1);
        assert_eq!(summary.total, 4);
    }

    #[test]
    fn test_filter_query() {
        let filter = ItineraryFilter {
            status: Some(ItineraryStatus::Planned),
            type_id: Some("7".into()),
        };
        assert_eq!(
            filter.query(),
            vec![
                ("status".to_string(), "PLANNED".to_string()),
                ("type_id".to_string(), "7".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_matches() {
        let mut item = stop("a", ItineraryStatus::Planned, Some(10));
        item.kind = Some(Category {
            id: "7".into(),
            name: "Food".into(),
        });

        assert!(ItineraryFilter::default().matches(&item));
        assert!(ItineraryFilter {
            status: Some(ItineraryStatus::Planned),
            type_id: Some("7".into()),
        }
        .matches(&item));
        assert!(!ItineraryFilter {
            status: Some(ItineraryStatus::Visited),
            type_id: None,
        }
        .matches(&item));
        assert!(!ItineraryFilter {
            status: None,
            type_id: Some("3".into()),
        }
        .matches(&stop("b", ItineraryStatus::Planned, None)));
    }
}

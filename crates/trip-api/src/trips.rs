//! Trips
//!
//! The trips a user owns or joined, creating and editing them, joining a
//! public trip, and the per-day itinerary summary shown on a trip's
//! overview.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::{ApiResult, FieldErrors};
use crate::resources::de_id;
use crate::transport::{ApiRequest, Transport};

const TRIPS_PATH: &str = "/trips/";
const MY_TRIPS_PATH: &str = "/trips/my_trips/";
const JOINED_TRIPS_PATH: &str = "/trips/joined_trips/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "destination")]
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub notes: String,
    /// User ids of the members
    #[serde(default, deserialize_with = "de_ids")]
    pub members: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Trip {
    /// Number of days, both ends included
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days().max(0) + 1
    }

    /// `Mar 15 - Mar 22, 2025`
    pub fn dates_label(&self) -> String {
        format!(
            "{} - {}",
            self.start_date.format("%b %-d"),
            self.end_date.format("%b %-d, %Y")
        )
    }

    /// Draft prefilled with this trip, for editing
    pub fn to_draft(&self) -> TripDraft {
        TripDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            is_public: self.is_public,
            notes: self.notes.clone(),
        }
    }
}

/// Body of a trip create or full update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_public: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl TripDraft {
    /// Checks the backend would reject anyway, reported the same way
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.title.trim().is_empty() {
            errors
                .fields
                .insert("title".to_string(), vec!["Title is required.".to_string()]);
        }
        if self.end_date < self.start_date {
            errors.fields.insert(
                "end_date".to_string(),
                vec!["End date must not be before the start date.".to_string()],
            );
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// One day of the itinerary summary
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DaySummary {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub locations: Vec<String>,
    /// Names of the day's itinerary items
    #[serde(default)]
    pub itineraries: Vec<String>,
    #[serde(default)]
    pub tasks: u32,
    #[serde(default)]
    pub locations_visited: u32,
    #[serde(default)]
    pub tasks_completed: u32,
}

impl DaySummary {
    pub fn total(&self) -> u32 {
        self.itineraries.len() as u32 + self.tasks
    }

    pub fn completed(&self) -> u32 {
        self.locations_visited + self.tasks_completed
    }

    /// Every stop visited and every task done
    pub fn is_complete(&self) -> bool {
        self.total() > 0 && self.completed() >= self.total()
    }
}

pub fn trip_path(trip_id: &str) -> String {
    format!("/trips/{}/", trip_id)
}

impl<T: Transport> ApiClient<T> {
    /// Trips the user owns
    pub async fn my_trips(&self) -> ApiResult<Vec<Trip>> {
        self.get(MY_TRIPS_PATH).await
    }

    /// Trips the user joined as an accepted member
    pub async fn joined_trips(&self) -> ApiResult<Vec<Trip>> {
        self.get(JOINED_TRIPS_PATH).await
    }

    /// Public trips open for joining
    pub async fn public_trips(&self) -> ApiResult<Vec<Trip>> {
        self.get_with_query(TRIPS_PATH, vec![("is_public".to_string(), "true".to_string())])
            .await
    }

    pub async fn trip(&self, trip_id: &str) -> ApiResult<Trip> {
        self.get(&trip_path(trip_id)).await
    }

    pub async fn create_trip(&self, draft: &TripDraft) -> ApiResult<Trip> {
        self.post(TRIPS_PATH, draft).await
    }

    pub async fn update_trip(&self, trip_id: &str, draft: &TripDraft) -> ApiResult<Trip> {
        self.put(&trip_path(trip_id), draft).await
    }

    /// Ask to join a public trip; membership starts out pending
    pub async fn join_trip(&self, trip_id: &str) -> ApiResult<()> {
        let path = format!("{}join/", trip_path(trip_id));
        self.execute(ApiRequest::post(path)).await?;
        tracing::info!(trip = trip_id, "join requested");
        Ok(())
    }

    pub async fn itinerary_summary(&self, trip_id: &str) -> ApiResult<Vec<DaySummary>> {
        self.get(&format!("{}itineraries/summary/", trip_path(trip_id))).await
    }
}

/// Member ids arrive as integers or UUID strings
fn de_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip() -> Trip {
        serde_json::from_str(
            r#"{"id": 4, "title": "Bali", "location": "Bali, Indonesia", "start_date": "2025-03-15",
                "end_date": "2025-03-22", "is_public": true, "members": [2, "7"]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_trip_from_json() {
        let trip = trip();
        assert_eq!(trip.id, "4");
        assert_eq!(trip.members, vec!["2".to_string(), "7".to_string()]);
        assert_eq!(trip.duration_days(), 8);
        assert_eq!(trip.dates_label(), "Mar 15 - Mar 22, 2025");
    }

    #[test]
    fn test_draft_from_trip() {
        let draft = trip().to_draft();
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["start_date"], "2025-03-15");
        assert_eq!(body["is_public"], true);
        assert!(body.get("notes").is_none());
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = trip().to_draft();
        draft.title = "  ".into();
        draft.end_date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let errors = draft.validate().unwrap_err();
        assert!(errors.field("title").is_some());
        assert!(errors.field("end_date").is_some());
    }

    #[test]
    fn test_day_summary_completion() {
        let day: DaySummary = serde_json::from_str(
            r#"{"date": "March 16", "locations": ["Ubud"], "itineraries": ["Rice Terraces", "Monkey Forest"],
                "tasks": 1, "locations_visited": 2, "tasks_completed": 1}"#,
        )
        .unwrap();
        assert_eq!(day.total(), 3);
        assert!(day.is_complete());

        assert!(!DaySummary::default().is_complete());
    }
}

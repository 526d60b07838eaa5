//! Trip Resources
//!
//! Every per-trip resource lives under `/trips/{trip}/{segment}/` with an
//! `items/` collection and a `statistics/` summary. The [`Resource`] trait
//! describes one resource; the generic client methods below serve all five.

mod checklist;
mod expenses;
mod itinerary;
mod members;
mod packing;

pub use checklist::{
    upcoming_checklist, ChecklistCategory, ChecklistFilter, ChecklistItem, ChecklistStatistics, NewChecklistItem, Priority,
};
pub use expenses::{Expense, ExpenseStatistics, NewExpense};
pub use itinerary::{
    organized_itinerary, ItineraryFilter, ItineraryItem, ItineraryStatistics, ItineraryStatus, NewItineraryItem,
};
pub use members::{Member, MemberFilter, MemberPatch, MemberRef, MemberRole, MemberStatistics, MemberStatus, NewMember};
pub use packing::{NewPackingItem, PackingFilter, PackingItem, PackingStatistics};

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use trip_store::{SortFn, Summary, Tracked};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::transport::Transport;

/// Category or type reference (packing/expense categories, itinerary types)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
}

/// A per-trip collection backed by the API
pub trait Resource:
    Tracked<Id = String, Group: Send + Sync + 'static, Status: Send + Sync + 'static>
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Path segment under `/trips/{trip}/`
    const SEGMENT: &'static str;
    /// Reference list endpoint (categories/types), if the resource has one
    const CATEGORIES: Option<&'static str> = None;

    /// Wire shape of `statistics/`
    type Statistics: DeserializeOwned + Clone + PartialEq + Send + Sync + 'static;
    /// Query of `items/`
    type Filter: ListFilter<Self> + Clone + PartialEq + Default + Send + Sync + 'static;
    /// Body of a create
    type Draft: Serialize + 'static;

    /// Convert the server statistics into the generic summary
    fn summarize(statistics: &Self::Statistics) -> Summary<Self::Group, Self::Status>;

    /// Display order kept after local inserts
    fn sort() -> Option<SortFn<Self>> {
        None
    }
}

/// Resources whose status is changed with a PATCH of one field
pub trait StatusField: Resource {
    fn status_body(status: &Self::Status) -> Value;
}

/// Query parameters of a filtered list
pub trait ListFilter<T> {
    fn query(&self) -> Vec<(String, String)>;

    /// Whether the server would list `item` under this filter
    fn matches(&self, item: &T) -> bool;
}

/// Resource without list filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFilter;

impl<T> ListFilter<T> for NoFilter {
    fn query(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    fn matches(&self, _item: &T) -> bool {
        true
    }
}

// ========================
// Paths
// ========================

pub fn items_path<R: Resource>(trip_id: &str) -> String {
    format!("/trips/{}/{}/items/", trip_id, R::SEGMENT)
}

pub fn item_path<R: Resource>(trip_id: &str, id: &str) -> String {
    format!("/trips/{}/{}/items/{}/", trip_id, R::SEGMENT, id)
}

pub fn statistics_path<R: Resource>(trip_id: &str) -> String {
    format!("/trips/{}/{}/statistics/", trip_id, R::SEGMENT)
}

// ========================
// Generic resource calls
// ========================

impl<T: Transport> ApiClient<T> {
    pub async fn list<R: Resource>(&self, trip_id: &str, filter: &R::Filter) -> ApiResult<Vec<R>> {
        self.get_with_query(&items_path::<R>(trip_id), ListFilter::<R>::query(filter)).await
    }

    pub async fn statistics<R: Resource>(&self, trip_id: &str) -> ApiResult<R::Statistics> {
        self.get(&statistics_path::<R>(trip_id)).await
    }

    /// Create an item; the response carries the authoritative id and category
    pub async fn create<R: Resource>(&self, trip_id: &str, draft: &R::Draft) -> ApiResult<R> {
        self.post(&items_path::<R>(trip_id), draft).await
    }

    pub async fn update<R: Resource, B: Serialize>(&self, trip_id: &str, id: &str, patch: &B) -> ApiResult<()> {
        self.patch(&item_path::<R>(trip_id, id), patch).await
    }

    pub async fn update_status<R: StatusField>(&self, trip_id: &str, id: &str, status: &R::Status) -> ApiResult<()> {
        self.patch(&item_path::<R>(trip_id, id), &R::status_body(status)).await
    }

    pub async fn remove<R: Resource>(&self, trip_id: &str, id: &str) -> ApiResult<()> {
        self.delete(&item_path::<R>(trip_id, id)).await
    }

    /// Reference list of the resource; empty when it has none
    pub async fn categories<R: Resource>(&self) -> ApiResult<Vec<Category>> {
        match R::CATEGORIES {
            Some(path) => self.get(path).await,
            None => Ok(Vec::new()),
        }
    }
}

// ========================
// Serde helpers
// ========================

/// Ids arrive as UUID strings or integers
pub(crate) fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id: {}", other))),
    }
}

/// Money fields arrive as decimal strings (`"12.50"`) or numbers; kept as cents
pub(crate) fn de_cents<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let text = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s,
        Value::Null => return Ok(0),
        other => return Err(serde::de::Error::custom(format!("invalid decimal: {}", other))),
    };
    parse_cents(&text).ok_or_else(|| serde::de::Error::custom(format!("invalid decimal: {}", text)))
}

/// Cents written back as a decimal string
pub(crate) fn ser_cents<S: Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_cents(*cents))
}

/// Parse a decimal amount into cents without going through floats
///
/// Digits past the second decimal are rounded half away from zero.
pub fn parse_cents(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut fraction = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tens = fraction.next().unwrap_or(0);
    let ones = fraction.next().unwrap_or(0);
    let round_up = fraction.next().is_some_and(|digit| digit >= 5);

    let cents = whole
        .checked_mul(100)?
        .checked_add(tens * 10 + ones + i64::from(round_up))?;
    Some(if negative { -cents } else { cents })
}

/// Cents as a decimal string with two places
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, cents / 100, cents % 100)
}

/// Counters that may be missing or null
pub(crate) fn de_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "de_id")]
        id: String,
        #[serde(deserialize_with = "de_cents")]
        amount: i64,
        #[serde(default, deserialize_with = "de_count")]
        count: u32,
    }

    #[test]
    fn test_lenient_fields() {
        let sample: Sample = serde_json::from_str(r#"{"id": 12, "amount": "19.90", "count": null}"#).unwrap();
        assert_eq!(sample.id, "12");
        assert_eq!(sample.amount, 1990);
        assert_eq!(sample.count, 0);

        let sample: Sample = serde_json::from_str(r#"{"id": "a1b2", "amount": 5}"#).unwrap();
        assert_eq!(sample.id, "a1b2");
        assert_eq!(sample.amount, 500);

        let sample: Sample = serde_json::from_str(r#"{"id": 1, "amount": 0.3}"#).unwrap();
        assert_eq!(sample.amount, 30);
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("12.5"), Some(1250));
        assert_eq!(parse_cents(" 0.01 "), Some(1));
        assert_eq!(parse_cents(".5"), Some(50));
        assert_eq!(parse_cents("7"), Some(700));
        assert_eq!(parse_cents("-3.20"), Some(-320));
        assert_eq!(parse_cents("1.005"), Some(101));
        assert_eq!(parse_cents("1.004"), Some(100));
        assert_eq!(parse_cents(""), None);
        assert_eq!(parse_cents("."), None);
        assert_eq!(parse_cents("1e3"), None);
        assert_eq!(parse_cents("12,50"), None);
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(44000), "440.00");
        assert_eq!(format_cents(-1250), "-12.50");
        assert_eq!(format_cents(7), "0.07");
    }

    #[test]
    fn test_paths() {
        assert_eq!(items_path::<PackingItem>("t1"), "/trips/t1/packing/items/");
        assert_eq!(item_path::<ChecklistItem>("t1", "9"), "/trips/t1/checklist/items/9/");
        assert_eq!(statistics_path::<ItineraryItem>("t1"), "/trips/t1/itineraries/statistics/");
        assert_eq!(statistics_path::<Member>("t1"), "/trips/t1/members/statistics/");
        assert_eq!(items_path::<Expense>("t1"), "/trips/t1/expenses/items/");
    }
}

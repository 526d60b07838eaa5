//! Trip Members
//!
//! Invited users with a role and an invitation status. Statistics count
//! members per status; there are no category buckets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use trip_store::{SortFn, Summary, Tracked};

use super::{de_count, de_id, ListFilter, Resource, StatusField};
use crate::auth::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Accepted,
    Pending,
    Declined,
}

impl MemberStatus {
    pub const ALL: [MemberStatus; 3] = [MemberStatus::Accepted, MemberStatus::Pending, MemberStatus::Declined];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Accepted => "ACCEPTED",
            MemberStatus::Pending => "PENDING",
            MemberStatus::Declined => "DECLINED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MemberStatus::Accepted => "Accepted",
            MemberStatus::Pending => "Pending",
            MemberStatus::Declined => "Declined",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Organizer,
    CoOrganizer,
    #[default]
    Member,
}

impl MemberRole {
    pub const ALL: [MemberRole; 3] = [MemberRole::Organizer, MemberRole::CoOrganizer, MemberRole::Member];

    pub fn label(&self) -> &'static str {
        match self {
            MemberRole::Organizer => "Organizer",
            MemberRole::CoOrganizer => "Co-Organizer",
            MemberRole::Member => "Member",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: MemberRole,
    pub status: MemberStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Member {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.email
        } else {
            &self.name
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == MemberStatus::Accepted
    }
}

/// Member as embedded in other items (packing/checklist assignee, expense payer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRef {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub role: MemberRole,
}

impl MemberRef {
    pub fn display_name(&self) -> String {
        match &self.user {
            Some(user) => user.display_name(),
            None => self.id.clone(),
        }
    }

    /// Whether this is the signed-in user
    pub fn is_user(&self, user: &User) -> bool {
        self.user.as_ref().is_some_and(|u| u.id == user.id)
    }
}

impl Tracked for Member {
    type Id = String;
    type Group = ();
    type Status = MemberStatus;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn group(&self) -> Option<()> {
        None
    }

    fn status(&self) -> MemberStatus {
        self.status
    }

    fn set_status(&mut self, status: MemberStatus) {
        self.status = status;
    }
}

/// `statistics/` of members
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MemberStatistics {
    #[serde(default, deserialize_with = "de_count")]
    pub total: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub accepted: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub pending: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub declined: u32,
}

/// Invitation payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMember {
    pub email: String,
    pub role: MemberRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Partial member update
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<MemberRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,
}

impl MemberPatch {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.status.is_none()
    }

    pub fn apply(&self, member: &mut Member) {
        if let Some(role) = self.role {
            member.role = role;
        }
        if let Some(status) = self.status {
            member.status = status;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberFilter {
    pub status: Option<MemberStatus>,
}

impl ListFilter<Member> for MemberFilter {
    fn query(&self) -> Vec<(String, String)> {
        self.status
            .map(|status| vec![("status".to_string(), status.as_str().to_string())])
            .unwrap_or_default()
    }

    fn matches(&self, member: &Member) -> bool {
        self.status.map_or(true, |status| member.status == status)
    }
}

impl Resource for Member {
    const SEGMENT: &'static str = "members";

    type Statistics = MemberStatistics;
    type Filter = MemberFilter;
    type Draft = NewMember;

    fn summarize(stats: &MemberStatistics) -> Summary<(), MemberStatus> {
        Summary::new()
            .with_total(stats.total)
            .with_status(MemberStatus::Accepted, stats.accepted)
            .with_status(MemberStatus::Pending, stats.pending)
            .with_status(MemberStatus::Declined, stats.declined)
    }

    fn sort() -> Option<SortFn<Self>> {
        Some(|a, b| b.created_at.cmp(&a.created_at))
    }
}

impl StatusField for Member {
    fn status_body(status: &MemberStatus) -> Value {
        json!({ "status": status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_from_json() {
        let member: Member = serde_json::from_str(
            r#"{"id": "m-1", "email": "leo@example.com", "role": "CO_ORGANIZER", "status": "PENDING", "created_at": "2025-03-01T10:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(member.role, MemberRole::CoOrganizer);
        assert_eq!(member.status(), MemberStatus::Pending);
        assert_eq!(member.display_name(), "leo@example.com");
        assert!(member.group().is_none());
    }

    #[test]
    fn test_member_ref_name() {
        let member: MemberRef = serde_json::from_str(
            r#"{"id": 9, "role": "ORGANIZER", "user": {"id": 2, "email": "ana@example.com", "first_name": "Ana", "last_name": "Lima"}}"#,
        )
        .unwrap();
        assert_eq!(member.id, "9");
        assert_eq!(member.display_name(), "Ana Lima");
        assert_eq!(member.role, MemberRole::Organizer);

        let bare: MemberRef = serde_json::from_str(r#"{"id": "m-3"}"#).unwrap();
        assert_eq!(bare.display_name(), "m-3");
    }

    #[test]
    fn test_summarize_statistics() {
        let stats: MemberStatistics =
            serde_json::from_str(r#"{"total": 3, "accepted": 2, "pending": 1, "declined": 0}"#).unwrap();
        let summary = Member::summarize(&stats);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.count(&MemberStatus::Accepted), 2);
        assert_eq!(summary.count(&MemberStatus::Declined), 0);
        assert!(!summary.statuses.contains_key(&MemberStatus::Declined));
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = MemberPatch {
            role: None,
            status: Some(MemberStatus::Accepted),
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "status": "ACCEPTED" }));
        assert!(MemberPatch::default().is_empty());
    }

    #[test]
    fn test_filter_query() {
        assert!(ListFilter::<Member>::query(&MemberFilter::default()).is_empty());
        let filter = MemberFilter {
            status: Some(MemberStatus::Declined),
        };
        assert_eq!(
            ListFilter::<Member>::query(&filter),
            vec![("status".to_string(), "DECLINED".to_string())]
        );
    }

    #[test]
    fn test_filter_matches_status() {
        let member: Member =
            serde_json::from_str(r#"{"id": "m-1", "email": "leo@example.com", "status": "PENDING"}"#).unwrap();
        assert!(MemberFilter::default().matches(&member));
        assert!(MemberFilter {
            status: Some(MemberStatus::Pending)
        }
        .matches(&member));
        assert!(!MemberFilter {
            status: Some(MemberStatus::Accepted)
        }
        .matches(&member));
    }

    #[test]
    fn test_status_body() {
        assert_eq!(Member::status_body(&MemberStatus::Declined), json!({ "status": "DECLINED" }));
    }
}

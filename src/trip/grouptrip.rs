use chrono::{
    DateTime,
    Utc
};
use serde::{
    Serialize,
    Deserialize
};
use uuid::Uuid;

use crate::objectwithuuid::{
    ObjectWithUUID,
    find_by_uuid_mut
};
use crate::plannererror::PlannerError;
use crate::time::rangeofdates::RangeOfDates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupTripStatus {
    Planning,
    Confirmed,
    Cancelled
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Member
}

/// How a group trip's dates land on one member's leave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalLeaveImpact {
    pub leave_days_needed: u32,
    pub efficiency: f64,
    pub conflicts: Vec<String>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTripMember {
    user_id: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    role: MemberRole,
    joined_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    personal_leave_impact: Option<PersonalLeaveImpact>
}

impl GroupTripMember {
    pub fn new(
        user_id: &str,
        email: &str,
        display_name: Option<String>,
        role: MemberRole,
        joined_at: DateTime<Utc>
    ) -> GroupTripMember {
        GroupTripMember {
            user_id: user_id.to_owned(),
            email: email.to_owned(),
            display_name,
            role,
            joined_at,
            personal_leave_impact: None
        }
    }

    pub fn owner(user_id: &str, email: &str, display_name: Option<String>, joined_at: DateTime<Utc>) -> GroupTripMember {
        GroupTripMember::new(user_id, email, display_name, MemberRole::Owner, joined_at)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn role(&self) -> MemberRole {
        self.role
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    pub fn personal_leave_impact(&self) -> Option<&PersonalLeaveImpact> {
        self.personal_leave_impact.as_ref()
    }

    pub fn set_personal_leave_impact(&mut self, impact: Option<PersonalLeaveImpact>) {
        self.personal_leave_impact = impact;
    }
}

/// A date range put up for a vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedDate {
    id: Uuid,
    suggested_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suggested_by_name: Option<String>,
    #[serde(flatten)]
    range: RangeOfDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(default)]
    votes: Vec<String>,
    created_at: DateTime<Utc>
}

impl ObjectWithUUID for SuggestedDate {
    fn uuid(&self) -> &Uuid {
        &self.id
    }
}

impl SuggestedDate {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn suggested_by(&self) -> &str {
        &self.suggested_by
    }

    pub fn suggested_by_name(&self) -> Option<&str> {
        self.suggested_by_name.as_deref()
    }

    pub fn range(&self) -> RangeOfDates {
        self.range
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn votes(&self) -> &[String] {
        &self.votes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Adds `user_id`'s vote, or withdraws it when already cast.
    /// Returns whether the user now votes for this suggestion.
    pub fn toggle_vote(&mut self, user_id: &str) -> bool {
        if let Some(position) = self.votes.iter().position(|v| v == user_id) {
            self.votes.remove(position);
            false
        } else {
            self.votes.push(user_id.to_owned());
            true
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripComment {
    id: Uuid,
    user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_name: Option<String>,
    text: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    replies: Vec<TripComment>
}

impl ObjectWithUUID for TripComment {
    fn uuid(&self) -> &Uuid {
        &self.id
    }
}

impl TripComment {
    pub fn new(user_id: &str, user_name: Option<String>, text: &str, created_at: DateTime<Utc>) -> Result<TripComment, PlannerError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PlannerError::invalid_trip("comment is empty"));
        }
        Ok(TripComment {
            id: Uuid::new_v4(),
            user_id: user_id.to_owned(),
            user_name,
            text: text.to_owned(),
            created_at,
            replies: Vec::new()
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn replies(&self) -> &[TripComment] {
        &self.replies
    }
}

/// Members, proposals, votes and discussion of a group trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTripData {
    members: Vec<GroupTripMember>,
    created_by: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    suggested_dates: Vec<SuggestedDate>,
    #[serde(default)]
    comments: Vec<TripComment>,
    status: GroupTripStatus
}

impl GroupTripData {
    pub fn new(owner: GroupTripMember, created_at: DateTime<Utc>) -> GroupTripData {
        GroupTripData {
            created_by: owner.user_id.clone(),
            members: vec![owner],
            created_at,
            suggested_dates: Vec::new(),
            comments: Vec::new(),
            status: GroupTripStatus::Planning
        }
    }

    pub fn members(&self) -> &[GroupTripMember] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [GroupTripMember] {
        &mut self.members
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn suggested_dates(&self) -> &[SuggestedDate] {
        &self.suggested_dates
    }

    pub fn comments(&self) -> &[TripComment] {
        &self.comments
    }

    pub fn status(&self) -> GroupTripStatus {
        self.status
    }

    pub fn set_status(&mut self, status: GroupTripStatus) {
        self.status = status;
    }

    /// Adds a member unless one with the same user id already joined.
    pub fn add_member(&mut self, member: GroupTripMember) -> bool {
        if self.members.iter().any(|m| m.user_id == member.user_id) {
            return false;
        }
        self.members.push(member);
        true
    }

    pub fn suggest_dates(
        &mut self,
        suggested_by: &str,
        suggested_by_name: Option<String>,
        range: RangeOfDates,
        reason: Option<String>,
        created_at: DateTime<Utc>
    ) -> Uuid {
        let reason = reason
            .map(|r| r.trim().to_owned())
            .filter(|r| !r.is_empty());
        let suggestion = SuggestedDate {
            id: Uuid::new_v4(),
            suggested_by: suggested_by.to_owned(),
            suggested_by_name,
            range,
            reason,
            votes: Vec::new(),
            created_at
        };
        let id = suggestion.id;
        self.suggested_dates.push(suggestion);
        id
    }

    pub fn toggle_vote(&mut self, suggestion_id: Uuid, user_id: &str) -> Result<bool, PlannerError> {
        find_by_uuid_mut(&mut self.suggested_dates, &suggestion_id)
            .map(|s| s.toggle_vote(user_id))
            .ok_or(PlannerError::SuggestionNotFound(suggestion_id))
    }

    /// Suggestions by vote count, most voted first; equal counts keep their order.
    pub fn suggestions_by_votes(&self) -> Vec<&SuggestedDate> {
        let mut sorted: Vec<&SuggestedDate> = self.suggested_dates.iter().collect();
        sorted.sort_by(|a, b| b.votes.len().cmp(&a.votes.len()));
        sorted
    }

    pub fn add_comment(&mut self, comment: TripComment) -> Uuid {
        let id = comment.id;
        self.comments.push(comment);
        id
    }

    pub fn add_reply(&mut self, comment_id: Uuid, reply: TripComment) -> Result<Uuid, PlannerError> {
        let id = reply.id;
        let comment = find_by_uuid_mut(&mut self.comments, &comment_id)
            .ok_or_else(|| PlannerError::invalid_trip(format!("comment {comment_id} not found")))?;
        comment.replies.push(reply);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
    }

    fn group() -> GroupTripData {
        GroupTripData::new(GroupTripMember::owner("current-user", "you@example.com", None, now()), now())
    }

    fn range(d1: u32, d2: u32) -> RangeOfDates {
        RangeOfDates::new(
            NaiveDate::from_ymd_opt(2026, 6, d1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, d2).unwrap()
        )
    }

    #[test]
    fn vote_twice_withdraws() {
        let mut data = group();
        let id = data.suggest_dates("current-user", None, range(1, 5), None, now());
        assert!(data.toggle_vote(id, "alice").unwrap());
        assert!(!data.toggle_vote(id, "alice").unwrap());
        assert!(data.suggested_dates()[0].votes().is_empty());
        assert!(matches!(
            data.toggle_vote(Uuid::nil(), "alice"),
            Err(PlannerError::SuggestionNotFound(_))
        ));
    }

    #[test]
    fn suggestions_sorted_by_votes() {
        let mut data = group();
        let first = data.suggest_dates("current-user", None, range(1, 5), Some("  ".to_owned()), now());
        let second = data.suggest_dates("bob", Some("Bob".to_owned()), range(8, 12), Some("long weekend".to_owned()), now());
        data.toggle_vote(second, "alice").unwrap();
        let sorted = data.suggestions_by_votes();
        assert_eq!(sorted[0].id(), second);
        assert_eq!(sorted[1].id(), first);
        assert_eq!(sorted[1].reason(), None);
        assert_eq!(sorted[0].reason(), Some("long weekend"));
    }

    #[test]
    fn members_are_unique_by_user_id() {
        let mut data = group();
        let alice = GroupTripMember::new("alice", "alice@example.com", None, MemberRole::Member, now());
        assert!(data.add_member(alice.clone()));
        assert!(!data.add_member(alice));
        assert_eq!(data.members().len(), 2);
        assert_eq!(data.created_by(), "current-user");
    }

    #[test]
    fn comments_and_replies() {
        let mut data = group();
        assert!(TripComment::new("alice", None, "   ", now()).is_err());
        let id = data.add_comment(TripComment::new("alice", None, "Beach?", now()).unwrap());
        data.add_reply(id, TripComment::new("bob", None, "Mountains!", now()).unwrap()).unwrap();
        assert_eq!(data.comments()[0].replies()[0].text(), "Mountains!");
    }

    #[test]
    fn suggestion_serializes_flat_dates() {
        let mut data = group();
        data.suggest_dates("current-user", None, range(1, 5), None, now());
        let json = serde_json::to_value(&data.suggested_dates()[0]).unwrap();
        assert_eq!(json["startDate"], "2026-06-01");
        assert_eq!(json["endDate"], "2026-06-05");
    }
}

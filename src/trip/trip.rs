use chrono::{
    DateTime,
    Duration,
    NaiveDate,
    Utc
};
use serde::{
    Serialize,
    Deserialize
};
use uuid::Uuid;

use crate::objectwithuuid::ObjectWithUUID;
use crate::plannererror::PlannerError;
use crate::time::rangeofdates::RangeOfDates;
use crate::trip::grouptrip::{
    GroupTripData,
    GroupTripMember
};

/// Days an invitation link stays valid after it is issued.
pub const INVITATION_VALID_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    #[default]
    Personal,
    Group
}

/// A planned trip: where, how long, and optionally when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    id: Uuid,
    destination: String,
    days: u32,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(rename = "type", default)]
    trip_type: TripType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    invitation_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    invitation_expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group_trip_data: Option<GroupTripData>
}

impl ObjectWithUUID for Trip {
    fn uuid(&self) -> &Uuid {
        &self.id
    }
}

impl Trip {
    pub fn personal(destination: &str, days: u32) -> Result<Trip, PlannerError> {
        let destination = validate_trip(destination, days)?;
        Ok(Trip {
            id: Uuid::new_v4(),
            destination,
            days,
            start_date: None,
            end_date: None,
            notes: None,
            trip_type: TripType::Personal,
            invitation_token: None,
            invitation_expires_at: None,
            group_trip_data: None
        })
    }

    /// A group trip in planning with `owner` as its only member and a fresh invitation.
    pub fn group(destination: &str, days: u32, owner: GroupTripMember, now: DateTime<Utc>) -> Result<Trip, PlannerError> {
        let mut trip = Trip::personal(destination, days)?;
        trip.trip_type = TripType::Group;
        trip.group_trip_data = Some(GroupTripData::new(owner, now));
        trip.regenerate_invitation(now);
        Ok(trip)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    pub fn trip_type(&self) -> TripType {
        self.trip_type
    }

    pub fn is_group(&self) -> bool {
        self.trip_type == TripType::Group
    }

    /// Booked days, when both ends are set.
    pub fn range(&self) -> Option<RangeOfDates> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(RangeOfDates::new(start, end)),
            _ => None
        }
    }

    pub fn is_dated(&self) -> bool {
        self.range().is_some()
    }

    /// Renames and resizes the trip. A dated trip keeps its start and gets a
    /// new end date. Nothing changes when the update fails.
    pub fn update(&mut self, destination: &str, days: u32) -> Result<(), PlannerError> {
        let destination = validate_trip(destination, days)?;
        let range = match self.start_date {
            Some(start) if days != self.days => Some(
                RangeOfDates::from_trip(start, days)
                    .ok_or_else(|| PlannerError::invalid_trip("trip end date out of range"))?
            ),
            _ => None
        };
        self.destination = destination;
        self.days = days;
        if let Some(range) = range {
            self.set_range(range);
        }
        Ok(())
    }

    /// Books `[start, start + days - 1]`.
    pub fn select_dates(&mut self, start: NaiveDate) -> Result<RangeOfDates, PlannerError> {
        let range = RangeOfDates::from_trip(start, self.days)
            .ok_or_else(|| PlannerError::invalid_trip("trip end date out of range"))?;
        self.set_range(range);
        Ok(range)
    }

    pub fn set_range(&mut self, range: RangeOfDates) {
        self.start_date = Some(range.start_date());
        self.end_date = Some(range.end_date());
    }

    pub fn clear_dates(&mut self) {
        self.start_date = None;
        self.end_date = None;
    }

    pub fn group_trip_data(&self) -> Option<&GroupTripData> {
        self.group_trip_data.as_ref()
    }

    pub fn group_trip_data_mut(&mut self) -> Result<&mut GroupTripData, PlannerError> {
        let id = self.id;
        self.group_trip_data.as_mut().ok_or(PlannerError::NotAGroupTrip(id))
    }

    pub fn invitation_token(&self) -> Option<&str> {
        self.invitation_token.as_deref()
    }

    pub fn invitation_expires_at(&self) -> Option<DateTime<Utc>> {
        self.invitation_expires_at
    }

    /// Issues a new invitation token valid for seven days from `now`.
    pub fn regenerate_invitation(&mut self, now: DateTime<Utc>) -> &str {
        self.invitation_expires_at = Some(now + Duration::days(INVITATION_VALID_DAYS));
        self.invitation_token.insert(generate_invitation_token())
    }

    /// Group trip reachable through `token` at instant `now`.
    pub fn accepts_invitation(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.is_group()
            && self.invitation_token.as_deref() == Some(token)
            && self.invitation_expires_at.is_some_and(|expires_at| expires_at > now)
    }

    /// Checks the invariants a decoded trip must hold.
    pub fn validate(&self) -> Result<(), PlannerError> {
        validate_trip(&self.destination, self.days)?;
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => {
                Err(PlannerError::invalid_trip(format!("trip {} ends before it starts", self.id)))
            },
            (Some(_), None) | (None, Some(_)) => {
                Err(PlannerError::invalid_trip(format!("trip {} has only one end date", self.id)))
            },
            _ => {
                if self.is_group() && self.group_trip_data.is_none() {
                    Err(PlannerError::invalid_trip(format!("group trip {} has no group data", self.id)))
                } else {
                    Ok(())
                }
            }
        }
    }
}

fn validate_trip(destination: &str, days: u32) -> Result<String, PlannerError> {
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(PlannerError::invalid_trip("destination is empty"));
    }
    if days == 0 {
        return Err(PlannerError::invalid_trip("a trip lasts at least one day"));
    }
    Ok(destination.to_owned())
}

/// 64 hex characters drawn from two random v4 UUIDs.
pub fn generate_invitation_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.push_str(&Uuid::new_v4().simple().to_string());
    token
}

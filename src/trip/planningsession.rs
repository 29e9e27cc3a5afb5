use chrono::{
    DateTime,
    NaiveDate,
    Utc
};
use tracing::{
    debug,
    info
};
use uuid::Uuid;

use crate::configuration::Configuration;
use crate::objectwithuuid::{
    find_by_uuid,
    find_by_uuid_mut
};
use crate::optimizer::dateoptimization::efficiency;
use crate::optimizer::leavescanner::{
    BetterDateSuggestion,
    LeaveScanner,
    ScoreTable
};
use crate::plannererror::PlannerError;
use crate::storage::storeddata::StoredData;
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::calendar::workingdayindex::WorkingDayIndex;
use crate::time::holiday::holiday::Holiday;
use crate::time::rangeofdates::RangeOfDates;
use crate::trip::grouptrip::{
    GroupTripMember,
    GroupTripStatus,
    PersonalLeaveImpact,
    TripComment
};
use crate::trip::trip::Trip;

/// One user's plan for one year: holidays, leave allowance and trips.
///
/// Derived state (the working-day index) is rebuilt in full whenever the
/// holidays change. Score tables are produced on request and never cached, so
/// a changed trip length is simply a new call to [`PlanningSession::scores`].
pub struct PlanningSession {
    configuration: Configuration,
    annual_leave: u32,
    raw_holidays: Vec<Holiday>,
    index: WorkingDayIndex,
    trips: Vec<Trip>
}

impl PlanningSession {
    pub fn new(configuration: Configuration) -> Result<PlanningSession, PlannerError> {
        let raw_holidays = configuration.holidays().to_vec();
        let annual_leave = configuration.annual_leave();
        PlanningSession::build(configuration, annual_leave, raw_holidays, Vec::new())
    }

    /// Resumes from a snapshot. The snapshot's year, leave allowance and
    /// holidays win over the configuration's.
    pub fn restore(configuration: Configuration, stored: StoredData) -> Result<PlanningSession, PlannerError> {
        let configuration = configuration.with_year(stored.selected_year, stored.annual_leave, stored.holidays.clone())?;
        let session = PlanningSession::build(configuration, stored.annual_leave, stored.holidays, stored.trips)?;
        info!(trips = session.trips.len(), year = session.year(), "restored planning session");
        Ok(session)
    }

    fn build(
        configuration: Configuration,
        annual_leave: u32,
        mut raw_holidays: Vec<Holiday>,
        trips: Vec<Trip>
    ) -> Result<PlanningSession, PlannerError> {
        raw_holidays.sort_by_key(|h| h.date());
        let year = configuration.year();
        let calendar = configuration.calendar_with(raw_holidays.clone());
        let index = WorkingDayIndex::new(calendar, year).ok_or(PlannerError::YearOutOfRange(year))?;
        Ok(PlanningSession {
            configuration,
            annual_leave,
            raw_holidays,
            index,
            trips
        })
    }

    pub fn snapshot(&self) -> StoredData {
        StoredData {
            annual_leave: self.annual_leave,
            trips: self.trips.clone(),
            holidays: self.raw_holidays.clone(),
            selected_year: self.year()
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn year(&self) -> i32 {
        self.index.year()
    }

    pub fn index(&self) -> &WorkingDayIndex {
        &self.index
    }

    pub fn annual_leave(&self) -> u32 {
        self.annual_leave
    }

    pub fn set_annual_leave(&mut self, annual_leave: u32) {
        self.annual_leave = annual_leave;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Holidays
    // ─────────────────────────────────────────────────────────────────────

    /// Holidays as entered, sorted by date.
    pub fn raw_holidays(&self) -> &[Holiday] {
        &self.raw_holidays
    }

    /// Holidays on their observed days.
    pub fn holidays(&self) -> &[Holiday] {
        self.index.raw_calendar().holidays()
    }

    /// Replaces every holiday and rebuilds the working-day index.
    pub fn set_holidays(&mut self, mut raw_holidays: Vec<Holiday>) -> Result<(), PlannerError> {
        raw_holidays.sort_by_key(|h| h.date());
        self.raw_holidays = raw_holidays;
        self.rebuild()
    }

    pub fn add_holiday(&mut self, date: NaiveDate, name: &str) -> Result<(), PlannerError> {
        let holiday = named_holiday(date, name)?;
        let mut holidays = self.raw_holidays.clone();
        holidays.push(holiday);
        self.set_holidays(holidays)
    }

    pub fn remove_holiday(&mut self, index: usize) -> Result<Holiday, PlannerError> {
        self.check_holiday_index(index)?;
        let mut holidays = self.raw_holidays.clone();
        let removed = holidays.remove(index);
        self.set_holidays(holidays)?;
        Ok(removed)
    }

    pub fn update_holiday(&mut self, index: usize, date: NaiveDate, name: &str) -> Result<(), PlannerError> {
        self.check_holiday_index(index)?;
        let holiday = named_holiday(date, name)?;
        let mut holidays = self.raw_holidays.clone();
        holidays[index] = holiday;
        self.set_holidays(holidays)
    }

    fn check_holiday_index(&self, index: usize) -> Result<(), PlannerError> {
        let len = self.raw_holidays.len();
        if index >= len {
            return Err(PlannerError::HolidayIndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn rebuild(&mut self) -> Result<(), PlannerError> {
        let year = self.year();
        let calendar = self.configuration.calendar_with(self.raw_holidays.clone());
        self.index = WorkingDayIndex::new(calendar, year).ok_or(PlannerError::YearOutOfRange(year))?;
        debug!(year, holidays = self.raw_holidays.len(), "rebuilt working day index");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────────────

    pub fn scanner(&self) -> LeaveScanner<'_> {
        LeaveScanner::new(&self.index)
    }

    /// Full rescan of every start date for `trip_days`.
    pub fn scores(&self, trip_days: u32) -> ScoreTable {
        self.scanner().score_all_start_dates(trip_days)
    }

    /// Suggests a better start near `selected_start` for a trip of `trip_days`.
    ///
    /// Only dated trips count as booked; dates merely proposed on group trips
    /// do not block a suggestion. `exclude` leaves the trip being edited out of
    /// the booked ranges.
    pub fn better_nearby<F>(
        &self,
        selected_start: NaiveDate,
        trip_days: u32,
        exclude: Option<Uuid>,
        is_disabled: F
    ) -> Option<BetterDateSuggestion>
        where F: Fn(NaiveDate) -> bool {
        let booked = self.booked_ranges(exclude);
        self.scores(trip_days).find_better_nearby(selected_start, is_disabled, &booked)
    }

    /// Suggests a better start for a dated trip, ignoring its own booking.
    pub fn better_nearby_for_trip(&self, trip_id: Uuid) -> Result<Option<BetterDateSuggestion>, PlannerError> {
        let trip = self.trip(trip_id)?;
        Ok(trip.start_date().and_then(|start| {
            self.better_nearby(start, trip.days(), Some(trip_id), |_| false)
        }))
    }

    /// Leave days `trip` consumes at its chosen dates; 0 when undated.
    ///
    /// Trips inside the planned year use the index; trips crossing into another
    /// year are counted day by day on the calendar.
    pub fn leave_days_for(&self, trip: &Trip) -> u32 {
        let Some(start) = trip.start_date() else {
            return 0;
        };
        self.index
            .leave_days_needed(start, trip.days())
            .or_else(|| {
                RangeOfDates::from_trip(start, trip.days())
                    .map(|range| self.index.count_working_days(&range))
            })
            .unwrap_or(0)
    }

    pub fn total_leave_used(&self) -> u32 {
        self.trips
            .iter()
            .filter(|t| t.is_dated())
            .map(|t| self.leave_days_for(t))
            .sum()
    }

    /// Allowance left; negative when the plan overspends.
    pub fn remaining_leave(&self) -> i64 {
        i64::from(self.annual_leave) - i64::from(self.total_leave_used())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Trips
    // ─────────────────────────────────────────────────────────────────────

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trip(&self, id: Uuid) -> Result<&Trip, PlannerError> {
        find_by_uuid(&self.trips, &id).ok_or(PlannerError::TripNotFound(id))
    }

    fn trip_mut(&mut self, id: Uuid) -> Result<&mut Trip, PlannerError> {
        find_by_uuid_mut(&mut self.trips, &id).ok_or(PlannerError::TripNotFound(id))
    }

    /// Dated trips, plus group trips still gathering votes.
    pub fn confirmed_trips(&self) -> Vec<&Trip> {
        self.trips
            .iter()
            .filter(|t| {
                t.is_dated()
                    || t.group_trip_data().is_some_and(|g| g.status() == GroupTripStatus::Planning)
            })
            .collect()
    }

    pub fn add_trip(&mut self, destination: &str, days: u32) -> Result<Uuid, PlannerError> {
        let trip = Trip::personal(destination, days)?;
        let id = trip.id();
        info!(%id, destination = trip.destination(), days, "added trip");
        self.trips.push(trip);
        Ok(id)
    }

    pub fn add_group_trip(
        &mut self,
        destination: &str,
        days: u32,
        owner: GroupTripMember,
        now: DateTime<Utc>
    ) -> Result<Uuid, PlannerError> {
        let trip = Trip::group(destination, days, owner, now)?;
        let id = trip.id();
        info!(%id, destination = trip.destination(), days, "added group trip");
        self.trips.push(trip);
        Ok(id)
    }

    pub fn update_trip(&mut self, id: Uuid, destination: &str, days: u32) -> Result<(), PlannerError> {
        self.trip_mut(id)?.update(destination, days)
    }

    pub fn remove_trip(&mut self, id: Uuid) -> Result<Trip, PlannerError> {
        let position = self.trips
            .iter()
            .position(|t| t.id() == id)
            .ok_or(PlannerError::TripNotFound(id))?;
        info!(%id, "removed trip");
        Ok(self.trips.remove(position))
    }

    /// Books the trip from `start` for its length.
    pub fn select_dates(&mut self, id: Uuid, start: NaiveDate) -> Result<RangeOfDates, PlannerError> {
        let range = self.trip_mut(id)?.select_dates(start)?;
        info!(%id, start = %range.start_date(), end = %range.end_date(), "selected trip dates");
        Ok(range)
    }

    pub fn clear_dates(&mut self, id: Uuid) -> Result<(), PlannerError> {
        self.trip_mut(id)?.clear_dates();
        Ok(())
    }

    /// Booked ranges of every dated trip except `exclude`.
    pub fn booked_ranges(&self, exclude: Option<Uuid>) -> Vec<RangeOfDates> {
        self.trips
            .iter()
            .filter(|t| Some(t.id()) != exclude)
            .filter_map(|t| t.range())
            .collect()
    }

    /// Dated trips other than `exclude` that overlap `range`.
    pub fn conflicting_trips(&self, range: &RangeOfDates, exclude: Option<Uuid>) -> Vec<&Trip> {
        self.trips
            .iter()
            .filter(|t| Some(t.id()) != exclude)
            .filter(|t| t.range().is_some_and(|r| r.overlaps(range)))
            .collect()
    }

    pub fn has_conflict(&self, start: NaiveDate, days: u32, exclude: Option<Uuid>) -> bool {
        RangeOfDates::from_trip(start, days)
            .is_some_and(|range| range.conflicts_with(&self.booked_ranges(exclude)))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Group trips
    // ─────────────────────────────────────────────────────────────────────

    pub fn suggest_dates(
        &mut self,
        trip_id: Uuid,
        suggested_by: &str,
        suggested_by_name: Option<String>,
        range: RangeOfDates,
        reason: Option<String>,
        now: DateTime<Utc>
    ) -> Result<Uuid, PlannerError> {
        let data = self.trip_mut(trip_id)?.group_trip_data_mut()?;
        Ok(data.suggest_dates(suggested_by, suggested_by_name, range, reason, now))
    }

    /// Casts or withdraws `user_id`'s vote; returns whether the vote now stands.
    pub fn toggle_vote(&mut self, trip_id: Uuid, suggestion_id: Uuid, user_id: &str) -> Result<bool, PlannerError> {
        self.trip_mut(trip_id)?.group_trip_data_mut()?.toggle_vote(suggestion_id, user_id)
    }

    pub fn add_comment(
        &mut self,
        trip_id: Uuid,
        user_id: &str,
        user_name: Option<String>,
        text: &str,
        now: DateTime<Utc>
    ) -> Result<Uuid, PlannerError> {
        let comment = TripComment::new(user_id, user_name, text, now)?;
        Ok(self.trip_mut(trip_id)?.group_trip_data_mut()?.add_comment(comment))
    }

    /// Fixes the group trip's dates and marks it confirmed.
    pub fn confirm_group_dates(&mut self, trip_id: Uuid, range: RangeOfDates) -> Result<(), PlannerError> {
        let trip = self.trip_mut(trip_id)?;
        trip.group_trip_data_mut()?.set_status(GroupTripStatus::Confirmed);
        trip.set_range(range);
        info!(%trip_id, start = %range.start_date(), end = %range.end_date(), "confirmed group trip");
        Ok(())
    }

    /// Confirms the dates of one of the trip's suggestions.
    pub fn confirm_suggestion(&mut self, trip_id: Uuid, suggestion_id: Uuid) -> Result<(), PlannerError> {
        let range = self.trip(trip_id)?
            .group_trip_data()
            .ok_or(PlannerError::NotAGroupTrip(trip_id))?
            .suggested_dates()
            .iter()
            .find(|s| s.id() == suggestion_id)
            .map(|s| s.range())
            .ok_or(PlannerError::SuggestionNotFound(suggestion_id))?;
        self.confirm_group_dates(trip_id, range)
    }

    pub fn cancel_group_trip(&mut self, trip_id: Uuid) -> Result<(), PlannerError> {
        self.trip_mut(trip_id)?.group_trip_data_mut()?.set_status(GroupTripStatus::Cancelled);
        info!(%trip_id, "cancelled group trip");
        Ok(())
    }

    pub fn regenerate_invitation(&mut self, trip_id: Uuid, now: DateTime<Utc>) -> Result<String, PlannerError> {
        let trip = self.trip_mut(trip_id)?;
        if !trip.is_group() {
            return Err(PlannerError::NotAGroupTrip(trip_id));
        }
        Ok(trip.regenerate_invitation(now).to_owned())
    }

    /// Group trip whose invitation `token` is still valid at `now`.
    pub fn find_trip_by_invitation(&self, token: &str, now: DateTime<Utc>) -> Option<&Trip> {
        self.trips.iter().find(|t| t.accepts_invitation(token, now))
    }

    /// Adds `member` to the group trip the invitation points at.
    pub fn join_group_trip(&mut self, token: &str, member: GroupTripMember, now: DateTime<Utc>) -> Result<Uuid, PlannerError> {
        let trip_id = self
            .find_trip_by_invitation(token, now)
            .map(|t| t.id())
            .ok_or_else(|| PlannerError::invalid_trip("invitation is unknown or expired"))?;
        let user_id = member.user_id().to_owned();
        if self.trip_mut(trip_id)?.group_trip_data_mut()?.add_member(member) {
            info!(%trip_id, user_id, "member joined group trip");
        }
        Ok(trip_id)
    }

    /// What the trip's chosen dates cost in leave, and which other trips they
    /// collide with. `None` while the trip has no dates.
    pub fn member_leave_impact(&self, trip_id: Uuid) -> Result<Option<PersonalLeaveImpact>, PlannerError> {
        let trip = self.trip(trip_id)?;
        let Some(range) = trip.range() else {
            return Ok(None);
        };
        let leave_days_needed = self.leave_days_for(trip);
        let conflicts = self
            .conflicting_trips(&range, Some(trip_id))
            .into_iter()
            .map(|t| t.destination().to_owned())
            .collect();
        Ok(Some(PersonalLeaveImpact {
            leave_days_needed,
            efficiency: efficiency(trip.days(), leave_days_needed),
            conflicts
        }))
    }

    /// Stores the current leave impact on every member of the group trip.
    pub fn refresh_member_impacts(&mut self, trip_id: Uuid) -> Result<(), PlannerError> {
        let impact = self.member_leave_impact(trip_id)?;
        for member in self.trip_mut(trip_id)?.group_trip_data_mut()?.members_mut() {
            member.set_personal_leave_impact(impact.clone());
        }
        Ok(())
    }
}

fn named_holiday(date: NaiveDate, name: &str) -> Result<Holiday, PlannerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PlannerError::invalid_configuration(format!("holiday on {date} has no name")));
    }
    Ok(Holiday::new(date, name))
}

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use leaveplanner::configuration::Configuration;
use leaveplanner::plannererror::PlannerError;
use leaveplanner::storage::storeddata::StoredData;
use leaveplanner::time::rangeofdates::RangeOfDates;
use leaveplanner::trip::grouptrip::{GroupTripMember, GroupTripStatus, MemberRole};
use leaveplanner::trip::planningsession::PlanningSession;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 8, 30, 0).unwrap()
}

fn session() -> PlanningSession {
    PlanningSession::new(Configuration::new()).unwrap()
}

fn owner() -> GroupTripMember {
    GroupTripMember::owner("current-user", "you@example.com", Some("You".to_owned()), now())
}

#[test]
fn leave_budget_follows_selected_dates() {
    let mut session = session();
    let id = session.add_trip("Bali", 4).unwrap();
    assert_eq!(session.total_leave_used(), 0);

    session.select_dates(id, ymd(2026, 4, 3)).unwrap();
    assert_eq!(session.leave_days_for(session.trip(id).unwrap()), 1);
    assert_eq!(session.remaining_leave(), 17);

    session.clear_dates(id).unwrap();
    assert_eq!(session.total_leave_used(), 0);
}

#[test]
fn trip_crossing_into_next_year_is_counted_on_the_calendar() {
    let mut session = session();
    let id = session.add_trip("Hokkaido", 7).unwrap();
    // Mon Dec 28 to Sun Jan 3: Dec 28-31 and Jan 1 (no 2027 holidays known).
    session.select_dates(id, ymd(2026, 12, 28)).unwrap();
    assert_eq!(session.total_leave_used(), 5);
}

#[test]
fn conflicts_with_other_trips() {
    let mut session = session();
    let first = session.add_trip("Bangkok", 5).unwrap();
    session.select_dates(first, ymd(2026, 3, 1)).unwrap();

    assert!(session.has_conflict(ymd(2026, 3, 5), 6, None));
    assert!(!session.has_conflict(ymd(2026, 3, 6), 5, None));
    assert!(!session.has_conflict(ymd(2026, 3, 5), 6, Some(first)));
    assert_eq!(session.booked_ranges(None), vec![RangeOfDates::new(ymd(2026, 3, 1), ymd(2026, 3, 5))]);
}

#[test]
fn better_nearby_skips_booked_trips() {
    let mut session = session();
    let booked = session.add_trip("Bangkok", 4).unwrap();
    session.select_dates(booked, ymd(2026, 3, 6)).unwrap();

    // Wed Mar 11, 4 days, needs 3. Mar 6 to 9 are booked days, so the first
    // free 2-day option is Thu Mar 12.
    let suggestion = session.better_nearby(ymd(2026, 3, 11), 4, None, |_| false).unwrap();
    assert_eq!(suggestion.suggested_date(), ymd(2026, 3, 12));

    let suggestion = session.better_nearby(ymd(2026, 3, 11), 4, Some(booked), |_| false).unwrap();
    assert_eq!(suggestion.suggested_date(), ymd(2026, 3, 6));
}

#[test]
fn better_nearby_may_start_before_a_booked_weekend() {
    let mut session = session();
    let weekend = session.add_trip("Johor Bahru", 2).unwrap();
    session.select_dates(weekend, ymd(2026, 3, 7)).unwrap();

    let suggestion = session.better_nearby(ymd(2026, 3, 11), 4, None, |_| false).unwrap();
    assert_eq!(suggestion.suggested_date(), ymd(2026, 3, 6));
    assert!(session.has_conflict(suggestion.suggested_date(), 4, None));
}

#[test]
fn better_nearby_for_dated_trip() {
    let mut session = session();
    let id = session.add_trip("Penang", 5).unwrap();
    assert!(session.better_nearby_for_trip(id).unwrap().is_none());
    session.select_dates(id, ymd(2026, 3, 9)).unwrap();
    let suggestion = session.better_nearby_for_trip(id).unwrap().unwrap();
    assert_eq!(suggestion.suggested_date(), ymd(2026, 3, 4));
    assert!(matches!(session.better_nearby_for_trip(Uuid::nil()), Err(PlannerError::TripNotFound(_))));
}

#[test]
fn holiday_edits_rebuild_the_index() {
    let mut session = session();
    let id = session.add_trip("Langkawi", 5).unwrap();
    session.select_dates(id, ymd(2026, 7, 6)).unwrap();
    assert_eq!(session.total_leave_used(), 5);

    session.add_holiday(ymd(2026, 7, 8), "Company Day").unwrap();
    assert_eq!(session.total_leave_used(), 4);
    assert!(session.scores(5).get(ymd(2026, 7, 6)).unwrap().near_holidays().contains(&"Company Day".to_owned()));

    let position = session.raw_holidays().iter().position(|h| h.name() == "Company Day").unwrap();
    session.update_holiday(position, ymd(2026, 7, 20), "Company Day").unwrap();
    assert_eq!(session.total_leave_used(), 5);

    let removed = session.remove_holiday(position).unwrap();
    assert_eq!(removed.date(), ymd(2026, 7, 20));
    assert!(matches!(
        session.remove_holiday(99),
        Err(PlannerError::HolidayIndexOutOfRange { index: 99, .. })
    ));
}

#[test]
fn unnamed_holidays_are_rejected() {
    let mut session = session();
    let before = session.raw_holidays().to_vec();
    assert!(matches!(session.add_holiday(ymd(2026, 7, 8), " "), Err(PlannerError::InvalidConfiguration(_))));
    assert!(matches!(session.update_holiday(0, ymd(2026, 1, 1), ""), Err(PlannerError::InvalidConfiguration(_))));
    assert_eq!(session.raw_holidays(), before.as_slice());

    session.update_holiday(0, ymd(2026, 1, 2), " New Year's Day ").unwrap();
    let json = session.snapshot().encode().unwrap();
    let stored = StoredData::load(Some(&json)).unwrap();
    let restored = PlanningSession::restore(Configuration::new(), stored).unwrap();
    assert_eq!(restored.raw_holidays()[0].name(), "New Year's Day");
    assert_eq!(restored.raw_holidays()[0].date(), ymd(2026, 1, 2));
}

#[test]
fn raw_holidays_stay_sorted() {
    let mut session = session();
    session.add_holiday(ymd(2026, 1, 2), "Bridge Day").unwrap();
    let dates: Vec<NaiveDate> = session.raw_holidays().iter().map(|h| h.date()).collect();
    assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(dates[1], ymd(2026, 1, 2));
}

#[test]
fn snapshot_restores_session() {
    let mut session = session();
    let id = session.add_trip("Bali", 4).unwrap();
    session.select_dates(id, ymd(2026, 4, 3)).unwrap();
    session.set_annual_leave(21);

    let json = session.snapshot().encode().unwrap();
    let stored = StoredData::load(Some(&json)).unwrap();
    let restored = PlanningSession::restore(Configuration::new(), stored).unwrap();

    assert_eq!(restored.annual_leave(), 21);
    assert_eq!(restored.trips(), session.trips());
    assert_eq!(restored.total_leave_used(), 1);
    assert_eq!(restored.year(), 2026);
}

#[test]
fn group_trip_voting_and_confirmation() {
    let mut session = session();
    let trip_id = session.add_group_trip("Seoul", 5, owner(), now()).unwrap();
    assert_eq!(session.confirmed_trips().len(), 1);

    let early = session
        .suggest_dates(trip_id, "current-user", None, RangeOfDates::new(ymd(2026, 5, 27), ymd(2026, 5, 31)), None, now())
        .unwrap();
    let late = session
        .suggest_dates(trip_id, "alice", Some("Alice".to_owned()), RangeOfDates::new(ymd(2026, 8, 6), ymd(2026, 8, 10)), Some("National Day".to_owned()), now())
        .unwrap();

    assert!(session.toggle_vote(trip_id, late, "current-user").unwrap());
    assert!(session.toggle_vote(trip_id, late, "alice").unwrap());
    assert!(session.toggle_vote(trip_id, early, "bob").unwrap());
    assert!(!session.toggle_vote(trip_id, early, "bob").unwrap());

    let data = session.trip(trip_id).unwrap().group_trip_data().unwrap();
    assert_eq!(data.suggestions_by_votes()[0].id(), late);

    session.add_comment(trip_id, "alice", None, "Let's do August", now()).unwrap();
    session.confirm_suggestion(trip_id, late).unwrap();

    let trip = session.trip(trip_id).unwrap();
    assert_eq!(trip.start_date(), Some(ymd(2026, 8, 6)));
    assert_eq!(trip.end_date(), Some(ymd(2026, 8, 10)));
    assert_eq!(trip.group_trip_data().unwrap().status(), GroupTripStatus::Confirmed);
    assert_eq!(trip.group_trip_data().unwrap().comments().len(), 1);
}

#[test]
fn group_operations_need_a_group_trip() {
    let mut session = session();
    let personal = session.add_trip("Bali", 3).unwrap();
    assert!(matches!(
        session.add_comment(personal, "alice", None, "hi", now()),
        Err(PlannerError::NotAGroupTrip(_))
    ));
    assert!(matches!(session.regenerate_invitation(personal, now()), Err(PlannerError::NotAGroupTrip(_))));
    assert!(matches!(session.cancel_group_trip(personal), Err(PlannerError::NotAGroupTrip(_))));
}

#[test]
fn invitations_expire() {
    let mut session = session();
    let trip_id = session.add_group_trip("Seoul", 5, owner(), now()).unwrap();
    let token = session.trip(trip_id).unwrap().invitation_token().unwrap().to_owned();

    assert_eq!(session.find_trip_by_invitation(&token, now()).map(|t| t.id()), Some(trip_id));
    assert!(session.find_trip_by_invitation(&token, now() + Duration::days(8)).is_none());

    let alice = GroupTripMember::new("alice", "alice@example.com", None, MemberRole::Member, now());
    assert_eq!(session.join_group_trip(&token, alice, now()).unwrap(), trip_id);
    assert_eq!(session.trip(trip_id).unwrap().group_trip_data().unwrap().members().len(), 2);

    let fresh = session.regenerate_invitation(trip_id, now() + Duration::days(10)).unwrap();
    assert!(session.find_trip_by_invitation(&token, now() + Duration::days(10)).is_none());
    assert!(session.find_trip_by_invitation(&fresh, now() + Duration::days(10)).is_some());
}

#[test]
fn member_leave_impact_reports_conflicts() {
    let mut session = session();
    let other = session.add_trip("Bangkok", 3).unwrap();
    session.select_dates(other, ymd(2026, 8, 10)).unwrap();

    let trip_id = session.add_group_trip("Seoul", 5, owner(), now()).unwrap();
    assert_eq!(session.member_leave_impact(trip_id).unwrap(), None);

    session.confirm_group_dates(trip_id, RangeOfDates::new(ymd(2026, 8, 6), ymd(2026, 8, 10))).unwrap();
    session.refresh_member_impacts(trip_id).unwrap();

    let data = session.trip(trip_id).unwrap().group_trip_data().unwrap();
    let impact = data.members()[0].personal_leave_impact().unwrap();
    // Thu Aug 6, Fri Aug 7; Aug 10 is National Day (observed).
    assert_eq!(impact.leave_days_needed, 2);
    assert_eq!(impact.conflicts, vec!["Bangkok".to_owned()]);
}

#[test]
fn changing_trip_length_moves_end_date() {
    let mut session = session();
    let id = session.add_trip("Bali", 4).unwrap();
    session.select_dates(id, ymd(2026, 4, 3)).unwrap();
    session.update_trip(id, "  Lombok ", 6).unwrap();

    let trip = session.trip(id).unwrap();
    assert_eq!(trip.destination(), "Lombok");
    assert_eq!(trip.end_date(), Some(ymd(2026, 4, 8)));
    // Apr 6, 7 and 8 are working days.
    assert_eq!(session.total_leave_used(), 3);
    assert!(session.update_trip(id, "Lombok", 0).is_err());
}

#[test]
fn removing_trips() {
    let mut session = session();
    let id = session.add_trip("Bali", 3).unwrap();
    assert!(session.add_trip("", 3).is_err());
    assert_eq!(session.remove_trip(id).unwrap().destination(), "Bali");
    assert!(matches!(session.remove_trip(id), Err(PlannerError::TripNotFound(_))));
}

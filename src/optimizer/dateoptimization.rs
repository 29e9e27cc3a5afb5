use chrono::NaiveDate;
use serde::{
    Serialize,
    Deserialize
};

use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::rangeofdates::RangeOfDates;
use crate::time::utility::shift_days;

/// Days before the first and after the last trip day searched for holidays.
pub const NEAR_HOLIDAY_WINDOW: i64 = 3;

/// Efficiency reported for a trip that needs no leave at all.
pub const ZERO_LEAVE_EFFICIENCY: f64 = f64::MAX;

/// Trip days gained per leave day spent.
#[inline]
pub fn efficiency(trip_days: u32, leave_days_needed: u32) -> f64 {
    if leave_days_needed == 0 {
        ZERO_LEAVE_EFFICIENCY
    } else {
        f64::from(trip_days) / f64::from(leave_days_needed)
    }
}

/// Score of one candidate start date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateOptimization {
    date: NaiveDate,
    efficiency: f64,
    leave_days_needed: u32,
    near_holidays: Vec<String>
}

impl DateOptimization {
    pub fn new(date: NaiveDate, trip_days: u32, leave_days_needed: u32, near_holidays: Vec<String>) -> DateOptimization {
        DateOptimization {
            date,
            efficiency: efficiency(trip_days, leave_days_needed),
            leave_days_needed,
            near_holidays
        }
    }

    /// Scores a start date against any calendar by walking the trip day by day.
    ///
    /// Unlike the indexed scan this works for any start date, including ones
    /// outside a single indexed year, and keeps zero-leave trips.
    pub fn evaluate<C>(calendar: &C, start: NaiveDate, trip_days: u32) -> Option<DateOptimization>
        where C: HolidayCalendar + ?Sized {
        let trip = RangeOfDates::from_trip(start, trip_days)?;
        let window = RangeOfDates::new(
            shift_days(trip.start_date(), -NEAR_HOLIDAY_WINDOW)?,
            shift_days(trip.end_date(), NEAR_HOLIDAY_WINDOW)?
        );
        Some(DateOptimization::new(
            start,
            trip_days,
            calendar.count_working_days(&trip),
            calendar.holiday_names_in(&window)
        ))
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    pub fn leave_days_needed(&self) -> u32 {
        self.leave_days_needed
    }

    pub fn near_holidays(&self) -> &[String] {
        &self.near_holidays
    }
}

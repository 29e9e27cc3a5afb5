use chrono::{
    Datelike,
    Days,
    NaiveDate
};

#[inline]
pub const fn is_leap (year: i32) -> bool {
    ((year % 4 == 0) && (year % 100!= 0)) || (year % 400 == 0)
}

#[inline]
pub const fn days_in_year (year: i32) -> u32 {
    if is_leap(year) { 366 } else { 365 }
}

/// First day of `year`, or `None` outside chrono's supported range.
pub fn first_day_of_year (year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Last day of `year`, or `None` outside chrono's supported range.
pub fn last_day_of_year (year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}

/// Zero-based position of `d` inside `year`, `None` when `d` belongs to another year.
#[inline]
pub fn day_index (d: NaiveDate, year: i32) -> Option<usize> {
    if d.year() == year {
        Some(d.ordinal0() as usize)
    } else {
        None
    }
}

/// Shifts `d` by a signed number of days.
pub fn shift_days (d: NaiveDate, n: i64) -> Option<NaiveDate> {
    if n >= 0 {
        d.checked_add_days(Days::new(n as u64))
    } else {
        d.checked_sub_days(Days::new(n.unsigned_abs()))
    }
}

/// Last day of a trip of `trip_days` days starting on `start`.
pub fn trip_end_date (start: NaiveDate, trip_days: u32) -> Option<NaiveDate> {
    start.checked_add_days(Days::new(u64::from(trip_days.saturating_sub(1))))
}

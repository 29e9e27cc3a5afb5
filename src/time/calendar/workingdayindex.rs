use std::collections::{HashMap, HashSet};

use chrono::{
    Datelike,
    Days,
    NaiveDate
};
use tracing::debug;

use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::calendar::leavecalendar::LeaveCalendar;
use crate::time::utility::{
    day_index,
    days_in_year,
    first_day_of_year
};

/// Non-working days of a single year as a bitset.
/// 3 × u128 = 384 bits, enough for 366 days.
#[derive(Clone)]
struct YearBitset {
    bits: [u128; 3],
}

impl YearBitset {
    fn new() -> Self {
        YearBitset { bits: [0; 3] }
    }

    #[inline]
    fn set(&mut self, day_of_year: u32) {
        let block = (day_of_year / 128) as usize;
        let bit = day_of_year % 128;
        if block < 3 {
            self.bits[block] |= 1u128 << bit;
        }
    }

    #[inline]
    fn is_set(&self, day_of_year: u32) -> bool {
        let block = (day_of_year / 128) as usize;
        let bit = day_of_year % 128;
        block < 3 && (self.bits[block] & (1u128 << bit)) != 0
    }

    fn from_calendar(calendar: &LeaveCalendar, year: i32) -> Self {
        let mut bitset = YearBitset::new();
        for date in calendar.get_holiday_set(year) {
            bitset.set(date.ordinal0());
        }
        bitset
    }

    fn count(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }
}

/// Working-day lookup for one fixed year, backed by prefix sums.
///
/// `prefix[i]` is the number of working days strictly before day index `i`
/// (Jan 1 is index 0), so `prefix[0] == 0` and
/// `prefix[i + 1] == prefix[i] + working(i)`. The working-day count of any
/// closed range inside the year is then a single subtraction.
///
/// Dates outside the indexed year fall back to the raw calendar.
pub struct WorkingDayIndex {
    raw_calendar: LeaveCalendar,
    year: i32,
    year_start: NaiveDate,
    days_in_year: usize,
    non_working: YearBitset,
    prefix: Vec<u32>,
    holiday_names_by_index: HashMap<usize, Vec<String>>
}

impl WorkingDayIndex {
    /// Builds the index of `year`. Returns `None` only when the year is outside
    /// the range chrono can represent.
    pub fn new(raw_calendar: LeaveCalendar, year: i32) -> Option<WorkingDayIndex> {
        let year_start = first_day_of_year(year)?;
        let days_in_year = days_in_year(year) as usize;
        let non_working = YearBitset::from_calendar(&raw_calendar, year);

        let mut prefix = Vec::with_capacity(days_in_year + 1);
        prefix.push(0u32);
        for i in 0..days_in_year {
            let working = !non_working.is_set(i as u32);
            prefix.push(prefix[i] + working as u32);
        }

        let mut holiday_names_by_index: HashMap<usize, Vec<String>> = HashMap::new();
        for holiday in raw_calendar.holidays_in_year(year) {
            holiday_names_by_index
                .entry(holiday.date().ordinal0() as usize)
                .or_default()
                .push(holiday.name().to_owned());
        }

        debug!(
            year,
            days_in_year,
            working_days = prefix[days_in_year],
            holidays = holiday_names_by_index.len(),
            "built working day index"
        );

        Some(WorkingDayIndex {
            raw_calendar,
            year,
            year_start,
            days_in_year,
            non_working,
            prefix,
            holiday_names_by_index
        })
    }

    pub fn raw_calendar(&self) -> &LeaveCalendar {
        &self.raw_calendar
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn year_start(&self) -> NaiveDate {
        self.year_start
    }

    pub fn days_in_year(&self) -> usize {
        self.days_in_year
    }

    pub fn prefix(&self) -> &[u32] {
        &self.prefix
    }

    pub fn working_days_in_year(&self) -> u32 {
        self.prefix[self.days_in_year]
    }

    pub fn non_working_days_in_year(&self) -> u32 {
        self.non_working.count()
    }

    pub fn index_of(&self, d: NaiveDate) -> Option<usize> {
        day_index(d, self.year)
    }

    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        if index < self.days_in_year {
            self.year_start.checked_add_days(Days::new(index as u64))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_working_index(&self, index: usize) -> bool {
        index < self.days_in_year && !self.non_working.is_set(index as u32)
    }

    /// Public holiday names observed on day `index`.
    pub fn holiday_names_at(&self, index: usize) -> &[String] {
        self.holiday_names_by_index
            .get(&index)
            .map(|names| names.as_slice())
            .unwrap_or(&[])
    }

    /// Working days in `[start_index, start_index + trip_days - 1]`, or `None`
    /// when that range leaves the indexed year.
    #[inline]
    pub fn leave_days_between(&self, start_index: usize, trip_days: usize) -> Option<u32> {
        let end = start_index.checked_add(trip_days)?;
        if trip_days == 0 || end > self.days_in_year {
            return None;
        }
        Some(self.prefix[end] - self.prefix[start_index])
    }

    /// Leave days a trip of `trip_days` days starting on `start` consumes, or
    /// `None` when the trip does not fit inside the indexed year.
    pub fn leave_days_needed(&self, start: NaiveDate, trip_days: u32) -> Option<u32> {
        let start_index = self.index_of(start)?;
        self.leave_days_between(start_index, trip_days as usize)
    }
}

impl HolidayCalendar for WorkingDayIndex {
    #[inline]
    fn is_holiday(&self, d: NaiveDate) -> bool {
        match self.index_of(d) {
            Some(index) => self.non_working.is_set(index as u32),
            None => self.raw_calendar.is_holiday(d)
        }
    }

    fn holiday_names(&self, d: NaiveDate) -> Vec<String> {
        match self.index_of(d) {
            Some(index) => self.holiday_names_at(index).to_vec(),
            None => self.raw_calendar.holiday_names(d)
        }
    }

    fn get_holiday_set(&self, year: i32) -> HashSet<NaiveDate> {
        if year != self.year {
            return self.raw_calendar.get_holiday_set(year);
        }
        (0..self.days_in_year)
            .filter(|&i| self.non_working.is_set(i as u32))
            .filter_map(|i| self.date_at(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::holiday::holiday::Holiday;
    use crate::time::rangeofdates::RangeOfDates;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn index_2026(holidays: Vec<Holiday>) -> WorkingDayIndex {
        WorkingDayIndex::new(LeaveCalendar::with_holidays(holidays), 2026).unwrap()
    }

    #[test]
    fn prefix_starts_at_zero_and_never_decreases() {
        let index = index_2026(vec![Holiday::new(ymd(2026, 1, 1), "New Year's Day")]);
        let prefix = index.prefix();
        assert_eq!(prefix.len(), 366);
        assert_eq!(prefix[0], 0);
        assert!(prefix.windows(2).all(|w| w[1] >= w[0] && w[1] - w[0] <= 1));
        // 261 weekdays in 2026, minus New Year's Day.
        assert_eq!(index.working_days_in_year(), 260);
        assert_eq!(index.non_working_days_in_year(), 105);
    }

    #[test]
    fn no_holidays_means_every_weekday_works() {
        let index = index_2026(Vec::new());
        assert_eq!(index.working_days_in_year(), 261);
        assert!(index.is_working_index(0));
        assert!(!index.is_working_index(2));
    }

    #[test]
    fn leave_days_match_brute_force() {
        let index = index_2026(vec![
            Holiday::new(ymd(2026, 4, 3), "Good Friday"),
            Holiday::new(ymd(2026, 5, 1), "Labour Day"),
        ]);
        let calendar = index.raw_calendar();
        for start in [ymd(2026, 1, 1), ymd(2026, 3, 30), ymd(2026, 4, 27), ymd(2026, 12, 25)] {
            for trip_days in [1u32, 3, 7] {
                let range = RangeOfDates::from_trip(start, trip_days).unwrap();
                assert_eq!(
                    index.leave_days_needed(start, trip_days),
                    Some(calendar.count_working_days(&range)),
                    "start {start} days {trip_days}"
                );
            }
        }
    }

    #[test]
    fn trips_leaving_the_year_have_no_count() {
        let index = index_2026(Vec::new());
        assert_eq!(index.leave_days_needed(ymd(2026, 12, 31), 1), Some(1));
        assert_eq!(index.leave_days_needed(ymd(2026, 12, 31), 2), None);
        assert_eq!(index.leave_days_needed(ymd(2025, 12, 31), 1), None);
        assert_eq!(index.leave_days_between(0, 0), None);
    }

    #[test]
    fn falls_back_to_raw_calendar_outside_year() {
        let index = index_2026(vec![Holiday::new(ymd(2027, 1, 1), "New Year's Day")]);
        assert!(index.is_holiday(ymd(2027, 1, 1)));
        assert_eq!(index.holiday_names(ymd(2027, 1, 1)), vec!["New Year's Day".to_owned()]);
        assert_eq!(index.get_holiday_set(2026), index.raw_calendar().get_holiday_set(2026));
    }
}

use std::collections::{HashMap, HashSet};

use chrono::{
    Datelike,
    Days,
    NaiveDate,
    Weekday
};

use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::holiday::holiday::{
    Holiday,
    observe_holidays
};
use crate::time::holiday::weekendadjustment::{
    WeekendAdjustment,
    WeekendAdjustmentRule
};
use crate::time::holiday::weekendmask::WeekendMask;
use crate::time::utility::{
    first_day_of_year,
    last_day_of_year
};

/// Weekends plus a list of public holidays, each already moved to its observed day.
pub struct LeaveCalendar {
    weekends: WeekendMask,
    weekend_adjustment_rule: WeekendAdjustmentRule,
    raw_holidays: Vec<Holiday>,
    holidays: Vec<Holiday>,
    holidays_by_date: HashMap<NaiveDate, Vec<usize>>
}

impl LeaveCalendar {
    /// Creates a new LeaveCalendar. With every weekday marked as weekend no
    /// holiday is moved.
    ///
    /// # Arguments
    /// * `weekends` - Weekdays that are never worked
    /// * `adjustment` - Where a holiday falling on a weekend is observed
    /// * `raw_holidays` - Statutory holiday dates as entered
    pub fn new(
        weekends: HashSet<Weekday>,
        adjustment: WeekendAdjustment,
        raw_holidays: Vec<Holiday>
    ) -> LeaveCalendar {
        let weekends = WeekendMask::new(weekends);
        let weekend_adjustment_rule = WeekendAdjustmentRule::new(weekends, adjustment);
        let holidays = observe_holidays(&raw_holidays, weekends, &weekend_adjustment_rule);

        let mut holidays_by_date: HashMap<NaiveDate, Vec<usize>> = HashMap::with_capacity(holidays.len());
        for (i, holiday) in holidays.iter().enumerate() {
            holidays_by_date.entry(holiday.date()).or_default().push(i);
        }

        LeaveCalendar {
            weekends,
            weekend_adjustment_rule,
            raw_holidays,
            holidays,
            holidays_by_date
        }
    }

    /// Saturday/Sunday weekend, holidays observed on the next weekday.
    pub fn with_holidays(raw_holidays: Vec<Holiday>) -> LeaveCalendar {
        LeaveCalendar::new(
            WeekendMask::default().to_hashset(),
            WeekendAdjustment::NextWeekday,
            raw_holidays
        )
    }

    #[inline]
    pub fn is_weekend(&self, d: NaiveDate) -> bool {
        self.weekends.is_weekend(d.weekday())
    }

    #[inline]
    pub fn is_public_holiday(&self, d: NaiveDate) -> bool {
        self.holidays_by_date.contains_key(&d)
    }

    pub fn weekends(&self) -> HashSet<Weekday> {
        self.weekends.to_hashset()
    }

    pub fn weekend_mask(&self) -> WeekendMask {
        self.weekends
    }

    pub fn weekend_adjustment(&self) -> WeekendAdjustment {
        self.weekend_adjustment_rule.adjustment()
    }

    /// Holidays as entered, before observed-day adjustment.
    pub fn raw_holidays(&self) -> &[Holiday] {
        &self.raw_holidays
    }

    /// Holidays on their observed days.
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    pub fn holidays_in_year(&self, year: i32) -> impl Iterator<Item = &Holiday> {
        self.holidays.iter().filter(move |h| h.date().year() == year)
    }
}

const SEVEN_DAYS: Days = Days::new(7);

impl HolidayCalendar for LeaveCalendar {
    fn is_holiday(&self, d: NaiveDate) -> bool {
        self.is_weekend(d) || self.is_public_holiday(d)
    }

    fn holiday_names(&self, d: NaiveDate) -> Vec<String> {
        self.holidays_by_date
            .get(&d)
            .map(|indices| indices.iter().map(|&i| self.holidays[i].name().to_owned()).collect())
            .unwrap_or_default()
    }

    /// All non-working days of `year`, weekends included.
    ///
    /// Weekends are added by stepping seven days from the first occurrence of
    /// each weekend weekday instead of visiting every day of the year.
    fn get_holiday_set(&self, year: i32) -> HashSet<NaiveDate> {
        let mut holiday_set = HashSet::with_capacity(120);

        if let (Some(year_start), Some(year_end)) = (first_day_of_year(year), last_day_of_year(year)) {
            for target_weekday in self.weekends.weekend_list() {
                let offset = (7 + target_weekday.num_days_from_monday()
                    - year_start.weekday().num_days_from_monday()) % 7;
                let mut current = year_start + Days::new(u64::from(offset));
                while current <= year_end {
                    holiday_set.insert(current);
                    current = current + SEVEN_DAYS;
                }
            }
        }

        holiday_set.extend(self.holidays_in_year(year).map(|h| h.date()));
        holiday_set
    }
}

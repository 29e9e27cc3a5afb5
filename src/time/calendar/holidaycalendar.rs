use std::collections::HashSet;

use chrono::NaiveDate;

use crate::time::rangeofdates::RangeOfDates;

/// A calendar that knows which days are not worked.
///
/// `is_holiday` covers every non-working day, weekends included. Public
/// holiday names are exposed separately through `holiday_names`.
pub trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, d: NaiveDate) -> bool;

    /// Names of the public holidays observed on `d`, in entry order.
    fn holiday_names(&self, d: NaiveDate) -> Vec<String>;

    fn get_holiday_set(&self, year: i32) -> HashSet<NaiveDate>;

    fn is_working_day(&self, d: NaiveDate) -> bool {
        !self.is_holiday(d)
    }

    /// Working days in `range`, counted day by day.
    fn count_working_days(&self, range: &RangeOfDates) -> u32 {
        range.iter().filter(|&d| self.is_working_day(d)).count() as u32
    }

    /// Public holiday names observed anywhere in `range`, deduplicated by name
    /// in first-seen order.
    fn holiday_names_in(&self, range: &RangeOfDates) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut names = Vec::new();
        for d in range.iter() {
            for name in self.holiday_names(d) {
                if seen.insert(name.clone()) {
                    names.push(name);
                }
            }
        }
        names
    }
}

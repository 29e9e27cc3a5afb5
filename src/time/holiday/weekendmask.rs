use std::collections::HashSet;

use chrono::Weekday;

/// Weekend representation using a bitmask.
/// Each bit represents a day: Mon(0), Tue(1), ..., Sun(6)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekendMask(u8);

impl WeekendMask {
    pub fn new<I>(weekends: I) -> Self
        where I: IntoIterator<Item = Weekday> {
        let mut mask = 0u8;
        for weekday in weekends {
            mask |= 1u8 << weekday.num_days_from_monday();
        }
        WeekendMask(mask)
    }

    #[inline]
    pub fn is_weekend(&self, weekday: Weekday) -> bool {
        let bit = 1u8 << weekday.num_days_from_monday();
        (self.0 & bit) != 0
    }

    /// Every day of the week is a weekend day; nothing can be worked.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.0 == 0b0111_1111
    }

    /// Weekend weekdays from Monday to Sunday.
    pub fn weekend_list(&self) -> Vec<Weekday> {
        let mut weekdays = Vec::with_capacity(7);
        for day in 0..7u8 {
            if (self.0 & (1u8 << day)) != 0 {
                if let Ok(weekday) = Weekday::try_from(day) {
                    weekdays.push(weekday);
                }
            }
        }
        weekdays
    }

    pub fn to_hashset(&self) -> HashSet<Weekday> {
        self.weekend_list().into_iter().collect()
    }
}

impl Default for WeekendMask {
    fn default() -> Self {
        WeekendMask::new([Weekday::Sat, Weekday::Sun])
    }
}

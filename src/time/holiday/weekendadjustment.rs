use chrono::{
    Datelike,
    Days,
    NaiveDate,
    Weekday
};
use serde::{
    Serialize,
    Deserialize
};

use crate::time::holiday::weekendmask::WeekendMask;

/// Direction in which a holiday falling on a weekend is observed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub enum WeekendAdjustment {
    Unadjusted = 0,
    #[default]
    NextWeekday = 1,
    PreviousWeekday = -1
}

/// Array-based weekend adjustment rule for O(1) lookup.
/// Indexed by `Weekday::num_days_from_monday()`; `None` means the day is not a weekend.
#[derive(Debug, Clone)]
pub struct WeekendAdjustmentRule {
    adjustment: WeekendAdjustment,
    rule: [Option<i64>; 7]
}

impl WeekendAdjustmentRule {
    /// Builds the shift for every weekend day, walking over consecutive weekend
    /// days in the adjustment direction (Saturday → Monday is +2 under
    /// `NextWeekday` with a Saturday/Sunday weekend).
    pub fn new(weekends: WeekendMask, adjustment: WeekendAdjustment) -> WeekendAdjustmentRule {
        let mut rule: [Option<i64>; 7] = [None; 7];
        if adjustment == WeekendAdjustment::Unadjusted || weekends.is_full() {
            return WeekendAdjustmentRule { adjustment, rule };
        }

        let step = if adjustment == WeekendAdjustment::NextWeekday {
            Weekday::succ
        } else {
            Weekday::pred
        };
        let one_day = adjustment as i64;

        for weekday in weekends.weekend_list() {
            let mut to_weekday = weekday;
            let mut shift_days = 0;
            while weekends.is_weekend(to_weekday) {
                to_weekday = step(&to_weekday);
                shift_days += one_day;
            }
            rule[weekday.num_days_from_monday() as usize] = Some(shift_days);
        }

        WeekendAdjustmentRule { adjustment, rule }
    }

    pub fn adjustment(&self) -> WeekendAdjustment {
        self.adjustment
    }

    /// Day shift applied to a holiday falling on `weekday`, if any.
    #[inline]
    pub fn shift_for(&self, weekday: Weekday) -> Option<i64> {
        self.rule[weekday.num_days_from_monday() as usize]
    }

    /// Adjusts a date according to the weekend adjustment rule.
    #[inline]
    pub fn adjust(&self, d: NaiveDate) -> NaiveDate {
        match self.shift_for(d.weekday()) {
            Some(n) if n > 0 => d.checked_add_days(Days::new(n as u64)).unwrap_or(d),
            Some(n) if n < 0 => d.checked_sub_days(Days::new(n.unsigned_abs())).unwrap_or(d),
            _ => d,
        }
    }
}

impl Default for WeekendAdjustmentRule {
    fn default() -> Self {
        WeekendAdjustmentRule::new(WeekendMask::default(), WeekendAdjustment::NextWeekday)
    }
}

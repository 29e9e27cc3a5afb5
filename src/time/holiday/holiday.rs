use std::collections::HashMap;

use chrono::{
    Datelike,
    NaiveDate
};
use serde::{
    Serialize,
    Deserialize
};

use crate::time::holiday::weekendadjustment::{
    WeekendAdjustment,
    WeekendAdjustmentRule
};
use crate::time::holiday::weekendmask::WeekendMask;
use crate::time::utility::shift_days;

pub const OBSERVED_SUFFIX: &str = " (observed)";

/// A named public holiday on a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Holiday {
    date: NaiveDate,
    name: String
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Holiday {
        Holiday { date, name: name.into() }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_observed(&self) -> bool {
        self.name.ends_with(OBSERVED_SUFFIX)
    }

    fn observed_on(&self, date: NaiveDate) -> Holiday {
        let mut name = self.name.clone();
        name.push_str(OBSERVED_SUFFIX);
        Holiday { date, name }
    }
}

/// Moves every holiday that falls on a weekend to its observed weekday.
///
/// Each weekend holiday moves by the weekend rule on its own (Saturday +2,
/// Sunday +1 for the usual weekend), so holidays sharing a date keep sharing
/// their observed day. Only when holidays on different days of one weekend
/// land on the same day does the later one move on to the following weekday:
/// a Saturday/Sunday pair is observed on Monday and Tuesday. The output keeps
/// the input order.
pub fn observe_holidays(
    raw_holidays: &[Holiday],
    weekends: WeekendMask,
    rule: &WeekendAdjustmentRule
) -> Vec<Holiday> {
    let step: i64 = match rule.adjustment() {
        WeekendAdjustment::Unadjusted => return raw_holidays.to_vec(),
        WeekendAdjustment::NextWeekday => 1,
        WeekendAdjustment::PreviousWeekday => -1
    };
    if weekends.is_full() {
        return raw_holidays.to_vec();
    }

    // Distinct weekend dates sent to each observed day, in the order the
    // adjustment walks over them.
    let mut sources_by_target: HashMap<NaiveDate, Vec<NaiveDate>> = HashMap::new();
    for holiday in raw_holidays.iter().filter(|h| weekends.is_weekend(h.date.weekday())) {
        let sources = sources_by_target.entry(rule.adjust(holiday.date)).or_default();
        if !sources.contains(&holiday.date) {
            sources.push(holiday.date);
        }
    }
    for sources in sources_by_target.values_mut() {
        sources.sort();
        if step < 0 {
            sources.reverse();
        }
    }

    raw_holidays
        .iter()
        .map(|holiday| {
            if !weekends.is_weekend(holiday.date.weekday()) {
                return holiday.clone();
            }
            let target = rule.adjust(holiday.date);
            let rank = sources_by_target
                .get(&target)
                .and_then(|sources| sources.iter().position(|&d| d == holiday.date))
                .unwrap_or(0);
            let date = (0..rank).fold(target, |d, _| next_weekday(d, step, weekends));
            holiday.observed_on(date)
        })
        .collect()
}

/// First day after `d` in the direction of `step` that is not a weekend day.
/// The mask must leave at least one working weekday.
fn next_weekday(d: NaiveDate, step: i64, weekends: WeekendMask) -> NaiveDate {
    let mut date = d;
    loop {
        match shift_days(date, step) {
            Some(next) => date = next,
            None => return date
        }
        if !weekends.is_weekend(date.weekday()) {
            return date;
        }
    }
}
